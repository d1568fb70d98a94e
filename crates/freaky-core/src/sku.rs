//! SKU format validation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Error, Result};

static SKU_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]{3}[0-9]{3}$").unwrap());

pub const SKU_FORMAT_MESSAGE: &str =
    "SKU måste vara i formatet XXXYYY, där X är bokstäver och Y är siffror (t.ex. ABC123).";

/// Check that a SKU is three letters followed by three digits (case-insensitive).
pub fn validate_sku(sku: &str) -> Result<()> {
    if SKU_RE.is_match(sku) {
        Ok(())
    } else {
        Err(Error::Validation(SKU_FORMAT_MESSAGE.to_string()))
    }
}

/// Canonical stored form of a SKU.
pub fn normalize_sku(sku: &str) -> String {
    sku.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_skus() {
        assert!(validate_sku("ABC123").is_ok());
        assert!(validate_sku("abc123").is_ok());
    }

    #[test]
    fn test_invalid_skus() {
        for sku in ["AB123", "ABCD123", "123ABC", "ABC12", "", "ÅÄÖ123"] {
            let err = validate_sku(sku).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{sku}");
        }
    }

    #[test]
    fn test_normalize_sku() {
        assert_eq!(normalize_sku("  abc123 "), "ABC123");
    }
}
