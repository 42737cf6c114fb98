use crate::utils::error::{Result, VoucherError};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::net::SocketAddr;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(VoucherError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(VoucherError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_socket_addr(field_name: &str, addr: &str) -> Result<()> {
    addr.parse::<SocketAddr>()
        .map(|_| ())
        .map_err(|e| VoucherError::InvalidConfigValue {
            field: field_name.to_string(),
            value: addr.to_string(),
            reason: format!("Invalid socket address: {}", e),
        })
}

pub fn validate_database_url(field_name: &str, url: &str) -> Result<()> {
    validate_non_empty_string(field_name, url)?;
    if !url.starts_with("sqlite:") {
        return Err(VoucherError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url.to_string(),
            reason: "Only sqlite: URLs are supported".to_string(),
        });
    }
    if url.contains('\0') {
        return Err(VoucherError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url.to_string(),
            reason: "URL contains null bytes".to_string(),
        });
    }
    Ok(())
}

/// Collects per-field problems in a request body, keyed by the JSON field name.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value unchanged if present and not blank.
    pub fn required(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        match value {
            Some(v) if !v.trim().is_empty() => Some(v.to_string()),
            _ => {
                self.errors
                    .insert(field.to_string(), format!("The {} field is required.", field));
                None
            }
        }
    }

    pub fn date(&mut self, field: &str, value: Option<&str>) -> Option<NaiveDate> {
        let raw = self.required(field, value)?;
        // chrono accepts unpadded fields, the wire format does not
        let parsed = NaiveDate::parse_from_str(&raw, DATE_FORMAT)
            .ok()
            .filter(|d| d.format(DATE_FORMAT).to_string() == raw);
        if parsed.is_none() {
            self.errors.insert(
                field.to_string(),
                format!("The {} field must be in YYYY-MM-DD format.", field),
            );
        }
        parsed
    }

    pub fn into_error(self) -> VoucherError {
        VoucherError::Validation {
            errors: self.errors,
        }
    }
}
