//! Input validation helpers
//!
//! Centralized text length constants and validation functions. SQLite TEXT
//! has no built-in length enforcement, so the limits live here.

use super::AppError;
use super::error::AppResult;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, neighborhood, customer, operator, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, observations
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, product codes
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Delivery addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> AppResult<()> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Normalize a customer phone, rejecting anything under 11 digits.
pub fn validate_phone(raw: &str) -> AppResult<String> {
    validate_required_text(raw, "phone", MAX_SHORT_TEXT_LEN)?;
    shared::util::normalize_phone(raw)
        .ok_or_else(|| AppError::validation("phone must have at least 11 digits (DDD + number)"))
}

/// Validate a monetary field is finite and non-negative.
pub fn validate_non_negative(value: f64, field: &str) -> AppResult<()> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number"
        )));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Centro", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("  ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert_eq!(
            validate_phone("(85) 99123-4567").unwrap(),
            "85991234567"
        );
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn test_non_negative() {
        assert!(validate_non_negative(0.0, "fee").is_ok());
        assert!(validate_non_negative(-0.01, "fee").is_err());
        assert!(validate_non_negative(f64::NAN, "fee").is_err());
    }
}
