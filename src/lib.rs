pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::storage::{InMemoryVoucherRepository, SqliteVoucherRepository};
pub use config::ServiceConfig;
pub use crate::core::{registry::LayoutRegistry, sampler::SeatSampler, voucher_service::VoucherService};
pub use domain::model::{GenerateOutcome, GenerateVouchersRequest, VoucherSet};
pub use utils::error::{Result, StorageError, VoucherError};
