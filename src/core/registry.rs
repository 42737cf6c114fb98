use crate::domain::model::{AircraftLayout, AircraftType, UnknownAircraftType};
use std::collections::HashMap;

const ATR_ROWS: u32 = 18;
const AIRBUS_320_ROWS: u32 = 32;
const BOEING_737_MAX_ROWS: u32 = 32;

const ATR_SEATS_PER_ROW: [char; 4] = ['A', 'C', 'D', 'F'];
const SIX_ABREAST: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

/// Immutable mapping from aircraft type to seat layout.
#[derive(Debug, Clone)]
pub struct LayoutRegistry {
    layouts: HashMap<AircraftType, AircraftLayout>,
}

impl LayoutRegistry {
    pub fn new(entries: impl IntoIterator<Item = (AircraftType, AircraftLayout)>) -> Self {
        Self {
            layouts: entries.into_iter().collect(),
        }
    }

    /// The fleet layouts. Every [`AircraftType`] has an entry.
    pub fn standard() -> Self {
        let entries = [
            (AircraftType::Atr, ATR_ROWS, &ATR_SEATS_PER_ROW[..]),
            (AircraftType::Airbus320, AIRBUS_320_ROWS, &SIX_ABREAST[..]),
            (AircraftType::Boeing737Max, BOEING_737_MAX_ROWS, &SIX_ABREAST[..]),
        ];

        Self::new(entries.into_iter().map(|(aircraft, rows, letters)| {
            let layout = AircraftLayout::new(rows, letters)
                .unwrap_or_else(|| panic!("invalid built-in layout for {}", aircraft));
            (aircraft, layout)
        }))
    }

    pub fn get(&self, aircraft: AircraftType) -> Option<&AircraftLayout> {
        self.layouts.get(&aircraft)
    }

    /// Resolves a raw aircraft name. Matching is exact and case-sensitive.
    pub fn layout_for(
        &self,
        aircraft: &str,
    ) -> Result<(AircraftType, &AircraftLayout), UnknownAircraftType> {
        let aircraft_type: AircraftType = aircraft.parse()?;
        self.get(aircraft_type)
            .map(|layout| (aircraft_type, layout))
            .ok_or_else(|| UnknownAircraftType(aircraft.to_string()))
    }
}
