//! Validation utilities for user input.
//!
//! This module provides reusable validation functions for ids and claim fields.

use crate::error::{GateError, Result};

/// Longest card id accepted.
pub const MAX_CARD_ID_LEN: usize = 64;

/// Validate a Mazoku card id.
///
/// Card ids must:
/// - Be between 1 and 64 characters
/// - Contain only alphanumeric characters, dashes and underscores
///
/// # Examples
///
/// ```
/// use gatebot::utils::validation::validate_card_id;
///
/// assert!(validate_card_id("0f3c2a").is_ok());
/// assert!(validate_card_id("card_01-b").is_ok());
/// assert!(validate_card_id("").is_err());
/// assert!(validate_card_id("../admin").is_err());
/// ```
pub fn validate_card_id(card_id: &str) -> Result<()> {
    if card_id.is_empty() {
        return Err(GateError::Validation(
            "Card id cannot be empty".to_string()
        ));
    }

    if card_id.len() > MAX_CARD_ID_LEN {
        return Err(GateError::Validation(
            format!("Card id too long: {} characters (max {})", card_id.len(), MAX_CARD_ID_LEN)
        ));
    }

    if !card_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(GateError::Validation(
            "Card id can only contain letters, numbers, dashes and underscores".to_string()
        ));
    }

    Ok(())
}

/// Validate a print number. Prints start at 1.
///
/// # Examples
///
/// ```
/// use gatebot::utils::validation::validate_print;
///
/// assert!(validate_print(1).is_ok());
/// assert!(validate_print(0).is_err());
/// ```
pub fn validate_print(print: i64) -> Result<()> {
    if print < 1 {
        return Err(GateError::Validation(
            format!("Print must be at least 1, got {}", print)
        ));
    }
    Ok(())
}

/// Validate a tier name. Unknown tiers are accepted, blank ones are not.
///
/// # Examples
///
/// ```
/// use gatebot::utils::validation::validate_tier;
///
/// assert!(validate_tier("SSRT").is_ok());
/// assert!(validate_tier("LEGEND").is_ok());
/// assert!(validate_tier("   ").is_err());
/// ```
pub fn validate_tier(tier: &str) -> Result<()> {
    if tier.trim().is_empty() {
        return Err(GateError::Validation(
            "Tier cannot be empty".to_string()
        ));
    }
    Ok(())
}

/// Validate a Discord snowflake given as a string.
pub fn validate_snowflake(id: &str) -> Result<()> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(GateError::Validation(
            format!("Not a Discord id: '{}'", id)
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_card_id() {
        // Valid ids
        assert!(validate_card_id("abc123").is_ok());
        assert!(validate_card_id("a").is_ok());
        assert!(validate_card_id("0f3c2a-77_b").is_ok());
        assert!(validate_card_id(&"x".repeat(64)).is_ok());

        // Invalid ids
        assert!(validate_card_id("").is_err());
        assert!(validate_card_id(&"x".repeat(65)).is_err());
        assert!(validate_card_id("card id").is_err()); // space
        assert!(validate_card_id("card/1").is_err()); // slash
        assert!(validate_card_id("카드").is_err()); // non-ascii
    }

    #[test]
    fn test_validate_print() {
        assert!(validate_print(1).is_ok());
        assert!(validate_print(2000).is_ok());
        assert!(validate_print(0).is_err());
        assert!(validate_print(-10).is_err());
    }

    #[test]
    fn test_validate_tier() {
        assert!(validate_tier("ct").is_ok());
        assert!(validate_tier("MYSTERY").is_ok());
        assert!(validate_tier("").is_err());
        assert!(validate_tier(" \t").is_err());
    }

    #[test]
    fn test_validate_snowflake() {
        assert!(validate_snowflake("123456789012345678").is_ok());
        assert!(validate_snowflake("").is_err());
        assert!(validate_snowflake("12ab").is_err());
    }
}
