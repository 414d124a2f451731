//! Pre-request validation.
//!
//! These checks run right before a mutating request is sent so obviously
//! bad input never reaches the backend. They are conveniences, not system
//! invariants: the backend stays the authority.

use serde_json::{Map, Value};

/// Default upload ceiling (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

const IMAGE_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("minimum fee ({min}) must not exceed maximum fee ({max})")]
    FeeRange { min: f64, max: f64 },

    #[error("{field} must be greater than zero")]
    NonPositiveAmount { field: String },

    #[error("{field} must not be negative")]
    NegativeAmount { field: String },

    #[error("file is too large ({size} bytes, max {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("unsupported file type `{0}` (expected jpg, png, webp or gif)")]
    UnsupportedFileType(String),

    #[error("invalid email address `{0}`")]
    InvalidEmail(String),

    #[error("unknown {kind} `{value}`")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("payload must be a JSON object")]
    NotAnObject,
}

/// Check that every named field is present and non-blank.
pub fn require_fields(payload: &Map<String, Value>, fields: &[&str]) -> Result<(), ValidationError> {
    for field in fields {
        let present = match payload.get(*field) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        };
        if !present {
            return Err(ValidationError::Required { field: (*field).to_owned() });
        }
    }
    Ok(())
}

/// Borrow a JSON value as an object or reject it.
pub fn as_object(value: &Value) -> Result<&Map<String, Value>, ValidationError> {
    value.as_object().ok_or(ValidationError::NotAnObject)
}

/// Fee range check: both bounds non-negative, `min <= max` when both set.
pub fn validate_fee_range(min: Option<f64>, max: Option<f64>) -> Result<(), ValidationError> {
    if min.is_some_and(|v| v < 0.0) {
        return Err(ValidationError::NegativeAmount { field: "fee_min".into() });
    }
    if max.is_some_and(|v| v < 0.0) {
        return Err(ValidationError::NegativeAmount { field: "fee_max".into() });
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(ValidationError::FeeRange { min, max });
        }
    }
    Ok(())
}

pub fn validate_positive_amount(field: &str, amount: f64) -> Result<(), ValidationError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveAmount { field: field.to_owned() })
    }
}

/// Minimal shape check: one `@`, non-empty local part, dotted domain.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.contains('@')
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
    });
    if valid { Ok(()) } else { Err(ValidationError::InvalidEmail(email.to_owned())) }
}

/// Check an image upload before sending it. Returns the MIME type to send.
pub fn validate_image_upload(file_name: &str, size: u64, max_bytes: u64) -> Result<&'static str, ValidationError> {
    if size > max_bytes {
        return Err(ValidationError::FileTooLarge { size, max: max_bytes });
    }
    let ext = std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    IMAGE_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
        .ok_or(ValidationError::UnsupportedFileType(ext))
}

/// Read an optional numeric field that PHP forms send as number or string.
#[must_use]
pub fn numeric_field(payload: &Map<String, Value>, field: &str) -> Option<f64> {
    match payload.get(field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !s.trim().is_empty() => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
