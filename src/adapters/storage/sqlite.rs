//! SQLite-backed voucher repository.
//!
//! Seats are stored in three fixed columns so order and arity survive a
//! round trip. `UNIQUE(flight_number, flight_date)` is the authority on
//! duplicate voucher sets; a rejected insert surfaces as
//! [`StorageError::ConstraintViolation`].

use crate::domain::model::{AircraftType, VoucherSet};
use crate::domain::ports::VoucherRepository;
use crate::utils::error::{StorageError, StorageResult};
use crate::utils::validation::DATE_FORMAT;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct SqliteVoucherRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct VoucherRow {
    crew_name: String,
    crew_id: String,
    flight_number: String,
    flight_date: String,
    aircraft_type: String,
    seat1: String,
    seat2: String,
    seat3: String,
    created_at: String,
}

impl SqliteVoucherRepository {
    /// Opens (and creates if missing) the database at `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
        if !in_memory {
            let filename = options.get_filename();
            if let Some(parent) = filename.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| StorageError::Failure {
                    message: format!("failed to create database directory {:?}: {}", parent, e),
                })?;
            }
        }

        // in-memory databases vanish with their last connection
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;
        tracing::debug!(database_url, "connected to voucher database");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

impl TryFrom<VoucherRow> for VoucherSet {
    type Error = StorageError;

    fn try_from(row: VoucherRow) -> StorageResult<Self> {
        let corrupt = |what: &str, value: &str| StorageError::Corrupt {
            message: format!("invalid {} {:?} for flight {}", what, value, row.flight_number),
        };

        let flight_date = NaiveDate::parse_from_str(&row.flight_date, DATE_FORMAT)
            .map_err(|_| corrupt("flight_date", &row.flight_date))?;
        let aircraft_type = AircraftType::from_str(&row.aircraft_type)
            .map_err(|_| corrupt("aircraft_type", &row.aircraft_type))?;
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| corrupt("created_at", &row.created_at))?;

        Ok(VoucherSet {
            crew_name: row.crew_name,
            crew_id: row.crew_id,
            flight_number: row.flight_number,
            flight_date,
            aircraft_type,
            seats: [row.seat1, row.seat2, row.seat3],
            created_at,
        })
    }
}

#[async_trait]
impl VoucherRepository for SqliteVoucherRepository {
    async fn ensure_schema(&self) -> StorageResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS vouchers (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                crew_name     TEXT NOT NULL,
                crew_id       TEXT NOT NULL,
                flight_number TEXT NOT NULL,
                flight_date   TEXT NOT NULL,
                aircraft_type TEXT NOT NULL,
                seat1         TEXT NOT NULL,
                seat2         TEXT NOT NULL,
                seat3         TEXT NOT NULL,
                created_at    TEXT NOT NULL,
                UNIQUE (flight_number, flight_date)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn exists(&self, flight_number: &str, flight_date: NaiveDate) -> StorageResult<bool> {
        let found: i64 = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM vouchers
                WHERE flight_number = ?1 AND flight_date = ?2
            )
            "#,
        )
        .bind(flight_number)
        .bind(format_date(flight_date))
        .fetch_one(&self.pool)
        .await?;
        Ok(found != 0)
    }

    async fn create(&self, voucher: &VoucherSet) -> StorageResult<()> {
        let [seat1, seat2, seat3] = &voucher.seats;
        let result = sqlx::query(
            r#"
            INSERT INTO vouchers
                (crew_name, crew_id, flight_number, flight_date, aircraft_type,
                 seat1, seat2, seat3, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&voucher.crew_name)
        .bind(&voucher.crew_id)
        .bind(&voucher.flight_number)
        .bind(format_date(voucher.flight_date))
        .bind(voucher.aircraft_type.as_str())
        .bind(seat1)
        .bind(seat2)
        .bind(seat3)
        .bind(voucher.created_at.to_rfc3339_opts(SecondsFormat::Secs, true))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StorageError::ConstraintViolation)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find(
        &self,
        flight_number: &str,
        flight_date: NaiveDate,
    ) -> StorageResult<Option<VoucherSet>> {
        let row: Option<VoucherRow> = sqlx::query_as(
            r#"
            SELECT crew_name, crew_id, flight_number, flight_date, aircraft_type,
                   seat1, seat2, seat3, created_at
            FROM vouchers
            WHERE flight_number = ?1 AND flight_date = ?2
            "#,
        )
        .bind(flight_number)
        .bind(format_date(flight_date))
        .fetch_optional(&self.pool)
        .await?;

        row.map(VoucherSet::try_from).transpose()
    }
}
