use crate::core::registry::LayoutRegistry;
use crate::core::sampler::SeatSampler;
use crate::domain::model::{
    GenerateOutcome, GenerateVouchersRequest, VoucherSet, MAX_VOUCHERS_PER_FLIGHT,
};
use crate::domain::ports::VoucherRepository;
use crate::utils::error::{Result, StorageError, VoucherError};
use chrono::{NaiveDate, SubsecRound, Utc};

/// Coordinates the existence check, seat sampling and persistence of
/// voucher sets.
///
/// The pre-insert `exists` call is only a fast path. Uniqueness is decided by
/// the repository: a constraint violation on `create` means a concurrent
/// request already stored a set for the flight, and is reported as
/// [`GenerateOutcome::AlreadyExists`].
pub struct VoucherService<R: VoucherRepository> {
    repository: R,
    registry: LayoutRegistry,
    sampler: SeatSampler,
}

impl<R: VoucherRepository> VoucherService<R> {
    pub fn new(repository: R) -> Self {
        Self::with_parts(repository, LayoutRegistry::standard(), SeatSampler::from_entropy())
    }

    pub fn with_parts(repository: R, registry: LayoutRegistry, sampler: SeatSampler) -> Self {
        Self {
            repository,
            registry,
            sampler,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub async fn check_exists(&self, flight_number: &str, flight_date: NaiveDate) -> Result<bool> {
        self.repository
            .exists(flight_number, flight_date)
            .await
            .map_err(|e| {
                tracing::error!(
                    flight_number,
                    %flight_date,
                    error = %e,
                    "failed to check for existing vouchers"
                );
                VoucherError::persistence("failed to check for existing vouchers")
            })
    }

    pub async fn generate(&self, request: GenerateVouchersRequest) -> Result<GenerateOutcome> {
        let flight_number = request.flight_number.as_str();
        let flight_date = request.flight_date;

        if self.check_exists(flight_number, flight_date).await? {
            tracing::debug!(flight_number, %flight_date, "vouchers already exist");
            return Ok(GenerateOutcome::AlreadyExists);
        }

        let (aircraft_type, layout) = self
            .registry
            .layout_for(&request.aircraft_type)
            .map_err(|e| VoucherError::InvalidAircraft { value: e.0 })?;

        let seats = self.sampler.sample(layout, MAX_VOUCHERS_PER_FLIGHT)?;
        let seats: [String; MAX_VOUCHERS_PER_FLIGHT] =
            seats
                .try_into()
                .map_err(|drawn: Vec<String>| VoucherError::Capacity {
                    required: MAX_VOUCHERS_PER_FLIGHT,
                    available: drawn.len(),
                })?;

        let voucher = VoucherSet {
            crew_name: request.crew_name,
            crew_id: request.crew_id,
            flight_number: request.flight_number,
            flight_date,
            aircraft_type,
            seats,
            created_at: Utc::now().trunc_subsecs(0),
        };

        match self.repository.create(&voucher).await {
            Ok(()) => {
                tracing::info!(
                    flight_number = %voucher.flight_number,
                    %flight_date,
                    aircraft = %aircraft_type,
                    seats = ?voucher.seats,
                    "generated vouchers"
                );
                Ok(GenerateOutcome::Created {
                    seats: voucher.seats.to_vec(),
                })
            }
            Err(StorageError::ConstraintViolation) => {
                tracing::info!(
                    flight_number = %voucher.flight_number,
                    %flight_date,
                    "lost insert race, vouchers already exist"
                );
                Ok(GenerateOutcome::AlreadyExists)
            }
            Err(e) => {
                tracing::error!(
                    flight_number = %voucher.flight_number,
                    %flight_date,
                    error = %e,
                    "failed to create voucher"
                );
                Err(VoucherError::persistence("failed to save the generated vouchers"))
            }
        }
    }
}
