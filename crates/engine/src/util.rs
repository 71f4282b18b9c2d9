//! Internal helpers for field validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Trim a required text field, rejecting blank values.
pub(crate) fn normalize_required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidCustomer(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate a customer phone: non-blank, at most 20 characters.
pub(crate) fn validate_phone(value: &str) -> ResultEngine<String> {
    let phone = normalize_required(value, "phone")?;
    if phone.chars().count() > 20 {
        return Err(EngineError::InvalidCustomer(
            "phone must not exceed 20 characters".to_string(),
        ));
    }
    Ok(phone)
}

/// Validate a customer document number: digits only, at most 50 characters.
///
/// The document number is the per-owner dedup key for debt records, so it is
/// normalized (trimmed) before any lookup or store.
pub(crate) fn validate_document_number(value: &str) -> ResultEngine<String> {
    let doc = value.trim();
    if doc.is_empty() {
        return Err(EngineError::InvalidCustomer(
            "document number must not be empty".to_string(),
        ));
    }
    if !doc.chars().all(|c| c.is_ascii_digit()) {
        return Err(EngineError::InvalidCustomer(
            "document number must contain only digits".to_string(),
        ));
    }
    if doc.len() > 50 {
        return Err(EngineError::InvalidCustomer(
            "document number must not exceed 50 characters".to_string(),
        ));
    }
    Ok(doc.to_string())
}

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::KeyNotFound(format!("{label} not exists")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_number_rejects_non_digits() {
        assert!(validate_document_number("12a45").is_err());
        assert!(validate_document_number("").is_err());
        assert!(validate_document_number("  ").is_err());
    }

    #[test]
    fn document_number_trims() {
        assert_eq!(validate_document_number(" 12345 ").unwrap(), "12345");
    }

    #[test]
    fn document_number_rejects_over_50_chars() {
        let doc = "1".repeat(51);
        assert!(validate_document_number(&doc).is_err());
        let doc = "1".repeat(50);
        assert!(validate_document_number(&doc).is_ok());
    }

    #[test]
    fn phone_rejects_over_20_chars() {
        assert!(validate_phone("123456789012345678901").is_err());
        assert_eq!(validate_phone(" 555-0100 ").unwrap(), "555-0100");
    }
}
