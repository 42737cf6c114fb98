use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of seats handed out per (flight number, flight date).
pub const MAX_VOUCHERS_PER_FLIGHT: usize = 3;

pub const ALREADY_EXISTS_MESSAGE: &str = "Vouchers already exist for this flight";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AircraftType {
    #[serde(rename = "ATR")]
    Atr,
    #[serde(rename = "Airbus 320")]
    Airbus320,
    #[serde(rename = "Boeing 737 Max")]
    Boeing737Max,
}

impl AircraftType {
    pub const ALL: [AircraftType; 3] = [Self::Atr, Self::Airbus320, Self::Boeing737Max];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Atr => "ATR",
            Self::Airbus320 => "Airbus 320",
            Self::Boeing737Max => "Boeing 737 Max",
        }
    }
}

impl fmt::Display for AircraftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAircraftType(pub String);

impl fmt::Display for UnknownAircraftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown aircraft type {:?}", self.0)
    }
}

impl std::error::Error for UnknownAircraftType {}

impl FromStr for AircraftType {
    type Err = UnknownAircraftType;

    /// Exact, case-sensitive match against the wire names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownAircraftType(s.to_string()))
    }
}

/// Seat geometry of one aircraft type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AircraftLayout {
    row_count: u32,
    seat_letters: Vec<char>,
}

impl AircraftLayout {
    /// Returns `None` unless `row_count >= 1` and the letters are non-empty,
    /// uppercase ASCII and duplicate-free.
    pub fn new(row_count: u32, seat_letters: &[char]) -> Option<Self> {
        if row_count == 0 || seat_letters.is_empty() {
            return None;
        }
        let well_formed = seat_letters.iter().all(|c| c.is_ascii_uppercase());
        let distinct = seat_letters
            .iter()
            .enumerate()
            .all(|(i, c)| !seat_letters[..i].contains(c));
        if !(well_formed && distinct) {
            return None;
        }
        Some(Self {
            row_count,
            seat_letters: seat_letters.to_vec(),
        })
    }

    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    pub fn seat_letters(&self) -> &[char] {
        &self.seat_letters
    }

    pub fn pool_size(&self) -> usize {
        self.row_count as usize * self.seat_letters.len()
    }
}

/// One persisted voucher assignment for a flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherSet {
    pub crew_name: String,
    #[serde(rename = "crewID")]
    pub crew_id: String,
    pub flight_number: String,
    pub flight_date: NaiveDate,
    pub aircraft_type: AircraftType,
    pub seats: [String; MAX_VOUCHERS_PER_FLIGHT],
    pub created_at: DateTime<Utc>,
}

/// A field-validated generate request. `aircraft_type` is still the raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateVouchersRequest {
    pub crew_name: String,
    pub crew_id: String,
    pub flight_number: String,
    pub flight_date: NaiveDate,
    pub aircraft_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    Created { seats: Vec<String> },
    AlreadyExists,
}

impl GenerateOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateVouchersResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seats: Option<Vec<String>>,
}

impl From<GenerateOutcome> for GenerateVouchersResponse {
    fn from(outcome: GenerateOutcome) -> Self {
        match outcome {
            GenerateOutcome::Created { seats } => Self {
                success: true,
                error: None,
                seats: Some(seats),
            },
            GenerateOutcome::AlreadyExists => Self {
                success: false,
                error: Some(ALREADY_EXISTS_MESSAGE.to_string()),
                seats: None,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckExistsResponse {
    pub exists: bool,
}
