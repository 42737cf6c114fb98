use crate::domain::model::VoucherSet;
use crate::domain::ports::VoucherRepository;
use crate::utils::error::{StorageError, StorageResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

type FlightKey = (String, NaiveDate);

/// Process-local repository with the same uniqueness contract as the SQLite one.
#[derive(Debug, Default)]
pub struct InMemoryVoucherRepository {
    records: Mutex<HashMap<FlightKey, VoucherSet>>,
}

impl InMemoryVoucherRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, HashMap<FlightKey, VoucherSet>>> {
        self.records.lock().map_err(|_| StorageError::Failure {
            message: "voucher map lock poisoned".to_string(),
        })
    }
}

#[async_trait]
impl VoucherRepository for InMemoryVoucherRepository {
    async fn ensure_schema(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn exists(&self, flight_number: &str, flight_date: NaiveDate) -> StorageResult<bool> {
        let records = self.lock()?;
        Ok(records.contains_key(&(flight_number.to_string(), flight_date)))
    }

    async fn create(&self, voucher: &VoucherSet) -> StorageResult<()> {
        let mut records = self.lock()?;
        match records.entry((voucher.flight_number.clone(), voucher.flight_date)) {
            Entry::Occupied(_) => Err(StorageError::ConstraintViolation),
            Entry::Vacant(slot) => {
                slot.insert(voucher.clone());
                Ok(())
            }
        }
    }

    async fn find(
        &self,
        flight_number: &str,
        flight_date: NaiveDate,
    ) -> StorageResult<Option<VoucherSet>> {
        let records = self.lock()?;
        Ok(records
            .get(&(flight_number.to_string(), flight_date))
            .cloned())
    }
}
