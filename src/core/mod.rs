pub mod registry;
pub mod sampler;
pub mod voucher_service;

pub use crate::domain::model::{AircraftLayout, AircraftType, GenerateOutcome, VoucherSet};
pub use crate::domain::ports::{ConfigProvider, VoucherRepository};
pub use crate::utils::error::Result;
