use crate::domain::model::VoucherSet;
use crate::utils::error::StorageResult;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Persistence contract for voucher sets.
///
/// Implementations must reject a second set for the same
/// `(flight_number, flight_date)` with [`StorageError::ConstraintViolation`],
/// and `create` must be all-or-nothing.
///
/// [`StorageError::ConstraintViolation`]: crate::utils::error::StorageError::ConstraintViolation
#[async_trait]
pub trait VoucherRepository: Send + Sync {
    /// Idempotent; safe to call on every start.
    async fn ensure_schema(&self) -> StorageResult<()>;
    async fn exists(&self, flight_number: &str, flight_date: NaiveDate) -> StorageResult<bool>;
    async fn create(&self, voucher: &VoucherSet) -> StorageResult<()>;
    async fn find(
        &self,
        flight_number: &str,
        flight_date: NaiveDate,
    ) -> StorageResult<Option<VoucherSet>>;
}

pub trait ConfigProvider: Send + Sync {
    fn database_url(&self) -> &str;
    fn listen_addr(&self) -> &str;
    fn max_connections(&self) -> u32;
    fn request_timeout_secs(&self) -> u64;
    fn allowed_origins(&self) -> &[String];
}
