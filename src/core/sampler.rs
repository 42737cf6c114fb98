use crate::domain::model::AircraftLayout;
use crate::utils::error::{Result, VoucherError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Every seat of a layout in row-major order: `1A, 1B, ..., 32F`.
pub fn seat_pool(layout: &AircraftLayout) -> Vec<String> {
    (1..=layout.row_count())
        .flat_map(|row| {
            layout
                .seat_letters()
                .iter()
                .map(move |letter| format!("{}{}", row, letter))
        })
        .collect()
}

/// Draws `count` distinct seats uniformly at random from the layout's pool.
pub fn sample_seats<R: Rng + ?Sized>(
    layout: &AircraftLayout,
    count: usize,
    rng: &mut R,
) -> Result<Vec<String>> {
    let pool = seat_pool(layout);
    if pool.len() < count {
        return Err(VoucherError::Capacity {
            required: count,
            available: pool.len(),
        });
    }

    let picked = rand::seq::index::sample(rng, pool.len(), count);
    Ok(picked.into_iter().map(|i| pool[i].clone()).collect())
}

/// Shared random source for seat draws.
///
/// The generator is locked only for the duration of a single draw, so
/// concurrent callers never interleave inside one sample.
pub struct SeatSampler {
    rng: Mutex<StdRng>,
}

impl SeatSampler {
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    pub fn sample(&self, layout: &AircraftLayout, count: usize) -> Result<Vec<String>> {
        // a poisoned lock only means another draw panicked; the generator state is still usable
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        sample_seats(layout, count, &mut *rng)
    }
}

impl std::fmt::Debug for SeatSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeatSampler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::LayoutRegistry;
    use crate::domain::model::{AircraftType, MAX_VOUCHERS_PER_FLIGHT};
    use std::collections::HashSet;

    #[test]
    fn test_seat_pool_order_and_format() {
        let layout = AircraftLayout::new(2, &['A', 'C']).unwrap();
        assert_eq!(seat_pool(&layout), vec!["1A", "1C", "2A", "2C"]);

        let registry = LayoutRegistry::standard();
        let atr = seat_pool(registry.get(AircraftType::Atr).unwrap());
        assert_eq!(atr.len(), 72);
        assert_eq!(atr.first().map(String::as_str), Some("1A"));
        assert_eq!(atr.last().map(String::as_str), Some("18F"));
        assert!(!atr.contains(&"01A".to_string()));
        assert!(!atr.contains(&"1B".to_string()));
    }

    #[test]
    fn test_sample_distinct_members_for_every_aircraft() {
        let registry = LayoutRegistry::standard();
        let mut rng = StdRng::seed_from_u64(7);

        for aircraft in AircraftType::ALL {
            let layout = registry.get(aircraft).unwrap();
            let pool: HashSet<String> = seat_pool(layout).into_iter().collect();
            assert_eq!(pool.len(), layout.pool_size());

            for _ in 0..200 {
                let seats = sample_seats(layout, MAX_VOUCHERS_PER_FLIGHT, &mut rng).unwrap();
                assert_eq!(seats.len(), MAX_VOUCHERS_PER_FLIGHT);
                let distinct: HashSet<&String> = seats.iter().collect();
                assert_eq!(distinct.len(), MAX_VOUCHERS_PER_FLIGHT);
                assert!(seats.iter().all(|s| pool.contains(s)));
            }
        }
    }

    #[test]
    fn test_insufficient_seats() {
        let tiny = AircraftLayout::new(1, &['A', 'B']).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        match sample_seats(&tiny, 3, &mut rng) {
            Err(VoucherError::Capacity {
                required,
                available,
            }) => {
                assert_eq!(required, 3);
                assert_eq!(available, 2);
            }
            other => panic!("expected capacity error, got {:?}", other),
        }
    }

    #[test]
    fn test_exact_pool_size_returns_whole_pool() {
        let layout = AircraftLayout::new(1, &['A', 'B', 'C']).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mut seats = sample_seats(&layout, 3, &mut rng).unwrap();
        seats.sort();
        assert_eq!(seats, vec!["1A", "1B", "1C"]);
    }

    #[test]
    fn test_seeded_sampler_is_reproducible() {
        let registry = LayoutRegistry::standard();
        let layout = registry.get(AircraftType::Airbus320).unwrap();
        let a = SeatSampler::seeded(42).sample(layout, 3).unwrap();
        let b = SeatSampler::seeded(42).sample(layout, 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_seat_is_reachable() {
        // 4 seats, draws of 1: each should show up over enough trials
        let layout = AircraftLayout::new(2, &['A', 'B']).unwrap();
        let sampler = SeatSampler::seeded(11);
        let mut seen = HashSet::new();
        for _ in 0..500 {
            seen.extend(sampler.sample(&layout, 1).unwrap());
        }
        assert_eq!(seen.len(), 4);
    }
}
