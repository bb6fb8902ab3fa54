//! # Validation Module
//!
//! Input validation for the scan engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI layer (external)                                          │
//! │  ├── Keystroke filtering (digits only in the barcode field)            │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (inside the session reducer)                     │
//! │  ├── Barcode length and character rules                                │
//! │  └── Search query bounds                                               │
//! │                                                                         │
//! │  The reducer rejects invalid input without a mode change, so the UI    │
//! │  layer can never push the machine into an undefined state.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::BARCODE_MIN_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Barcode Validation
// =============================================================================

/// Validates a manually entered barcode.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at least 8 characters
/// - Must contain only ASCII digits
///
/// Decoder-produced codes skip this check; only manual input is validated.
///
/// ## Returns
/// The trimmed code.
///
/// ## Example
/// ```rust
/// use koko_core::validation::validate_barcode;
///
/// assert!(validate_barcode("8801043032197").is_ok());
/// assert!(validate_barcode("1234567").is_err());   // too short
/// assert!(validate_barcode("12345abc").is_err());  // non-digits
/// ```
pub fn validate_barcode(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if code.len() < BARCODE_MIN_LENGTH {
        return Err(ValidationError::TooShort {
            field: "barcode".to_string(),
            min: BARCODE_MIN_LENGTH,
        });
    }

    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    Ok(code.to_string())
}

// =============================================================================
// Search Query Validation
// =============================================================================

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (no results, no error)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_barcode_accepts_eight_digits() {
        assert_eq!(validate_barcode("12345678").unwrap(), "12345678");
        assert_eq!(validate_barcode("8801043032197").unwrap(), "8801043032197");
    }

    #[test]
    fn test_validate_barcode_rejects_seven_digits() {
        assert!(matches!(
            validate_barcode("1234567"),
            Err(ValidationError::TooShort { .. })
        ));
    }

    #[test]
    fn test_validate_barcode_rejects_non_digits() {
        assert!(matches!(
            validate_barcode("12345abc"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        // 8+ chars but with a separator is still invalid
        assert!(validate_barcode("8801-043-032").is_err());
    }

    #[test]
    fn test_validate_barcode_trims_whitespace() {
        assert_eq!(validate_barcode("  88010430  ").unwrap(), "88010430");
        assert!(validate_barcode("   ").is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  ramen ").unwrap(), "ramen");
        assert!(validate_search_query(&"a".repeat(200)).is_err());
        assert_eq!(validate_search_query("").unwrap(), "");
    }
}
