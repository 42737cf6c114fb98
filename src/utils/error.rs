use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoucherError {
    #[error("invalid aircraft type specified: {value:?}")]
    InvalidAircraft { value: String },

    #[error("not enough seats available to generate vouchers: required {required}, available {available}")]
    Capacity { required: usize, available: usize },

    #[error("{message}")]
    Persistence { message: String },

    #[error("Input validation failed")]
    Validation { errors: BTreeMap<String, String> },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value {value:?} for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Who is at fault for a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Client,
    Server,
}

impl VoucherError {
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidAircraft { .. } | Self::Validation { .. } => ErrorCategory::Client,
            Self::Capacity { .. }
            | Self::Persistence { .. }
            | Self::Config { .. }
            | Self::InvalidConfigValue { .. }
            | Self::Io(_) => ErrorCategory::Server,
        }
    }

    /// Message safe to hand back to a caller. Never includes storage internals.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidAircraft { .. } => "invalid aircraft type specified".to_string(),
            Self::Capacity { .. } => "not enough seats available to generate vouchers".to_string(),
            Self::Io(_) => "an internal I/O error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

/// Failures reported by a voucher storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("uniqueness constraint violated for flight/date")]
    ConstraintViolation,

    #[error("storage failure: {message}")]
    Failure { message: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored voucher row is corrupt: {message}")]
    Corrupt { message: String },
}

pub type Result<T> = std::result::Result<T, VoucherError>;
pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let invalid = VoucherError::InvalidAircraft {
            value: "Cessna".to_string(),
        };
        assert_eq!(invalid.category(), ErrorCategory::Client);
        assert_eq!(
            VoucherError::persistence("failed to save the generated vouchers").category(),
            ErrorCategory::Server
        );
        assert_eq!(
            VoucherError::Capacity {
                required: 3,
                available: 2
            }
            .category(),
            ErrorCategory::Server
        );
    }

    #[test]
    fn test_user_friendly_message_hides_details() {
        let err = VoucherError::Capacity {
            required: 3,
            available: 1,
        };
        assert_eq!(
            err.user_friendly_message(),
            "not enough seats available to generate vouchers"
        );

        let err = VoucherError::persistence("failed to check for existing vouchers");
        assert_eq!(
            err.user_friendly_message(),
            "failed to check for existing vouchers"
        );
    }
}
