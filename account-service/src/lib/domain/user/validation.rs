//! Stateless input checks run before any side effect.
//!
//! Callers run `validate_required` ahead of the format checks so that empty
//! input reports "is required" rather than a format error.

use lazy_static::lazy_static;
use regex::Regex;

use crate::user::errors::ValidationError;

pub const PASSWORD_MIN_LENGTH: usize = 6;
pub const PASSWORD_MAX_LENGTH: usize = 40;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref HEX_COLOR_RE: Regex = Regex::new(r"^#[A-Fa-f0-9]{6}$").unwrap();
}

/// Fails when the value is absent or only whitespace; returns it otherwise.
pub fn validate_required<'a>(
    value: Option<&'a str>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::Required { field }),
    }
}

/// Inclusive bounds, counted in characters rather than bytes.
pub fn validate_string_length(
    value: &str,
    min: usize,
    max: usize,
    field: &'static str,
) -> Result<(), ValidationError> {
    let length = value.chars().count();
    if length < min || length > max {
        Err(ValidationError::Length { field, min, max })
    } else {
        Ok(())
    }
}

/// Syntactic `local@domain.tld` check, no deliverability implied.
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn validate_password(value: &str) -> Result<(), ValidationError> {
    let length = value.chars().count();
    if length < PASSWORD_MIN_LENGTH {
        Err(ValidationError::PasswordTooShort {
            min: PASSWORD_MIN_LENGTH,
        })
    } else if length > PASSWORD_MAX_LENGTH {
        Err(ValidationError::PasswordTooLong {
            max: PASSWORD_MAX_LENGTH,
        })
    } else {
        Ok(())
    }
}

pub fn validate_hex_color(value: &str) -> Result<(), ValidationError> {
    if HEX_COLOR_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidHexColor)
    }
}
