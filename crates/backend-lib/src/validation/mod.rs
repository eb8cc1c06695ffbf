// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request field validation.
//!
//! Handlers only check presence and shape: required fields must be
//! non-empty, emails must look like `local@domain.tld`, months must be
//! `YYYY-MM`. Typed fields (dates, statuses) are already checked by serde.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));
static MONTH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").expect("month pattern compiles"));

/// Possible validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{0}")]
    MissingFields(&'static str),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid month, expected YYYY-MM: {0}")]
    InvalidMonth(String),

    #[error("{0}")]
    Invalid(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trimmed value if present and non-empty
pub fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Like [`present`] but without trimming; for secrets
pub fn present_raw(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Validate an email address shape
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    if email.len() > MAX_EMAIL_LENGTH || !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email)
}

/// Validate a `YYYY-MM` month key
pub fn validate_month(month: &str) -> ValidationResult<&str> {
    if !MONTH_REGEX.is_match(month) {
        return Err(ValidationError::InvalidMonth(month.to_string()));
    }
    Ok(month)
}

/// Reject negative money amounts
pub fn validate_amount(name: &str, amount: f64) -> ValidationResult<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ValidationError::Invalid(format!(
            "{name} must be a non-negative number"
        )));
    }
    Ok(amount)
}
