//! Money Conversion Module
//!
//! Conversion between client-facing strings and `rust_decimal::Decimal`
//! amounts. All client input MUST go through this module.
//!
//! ## Design Principles
//! 1. Explicit Error Handling: No silent truncation
//! 2. Strict format: `1.5`, never `.5`, `1.`, `+1` or `1e3`
//! 3. Amounts are strictly positive
//!
//! ## Usage
//! ```rust
//! use lockstep_transfer::money::{format_amount, parse_amount};
//!
//! let amount = parse_amount("100.5", 2).unwrap();
//! assert_eq!(format_amount(amount, 2), "100.50");
//! ```

use rust_decimal::prelude::*;
use thiserror::Error;

/// Default scale accepted for client amounts (cents)
pub const DEFAULT_SCALE: u32 = 2;

// ============================================================================
// Error Types
// ============================================================================

/// Money conversion errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Precision overflow: provided {provided} decimals, max allowed {max}")]
    PrecisionOverflow { provided: u32, max: u32 },

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Amount too large, would overflow")]
    Overflow,

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

// ============================================================================
// Parse: Client → Decimal
// ============================================================================

/// Convert a client string amount to a validated `Decimal`
///
/// # Errors
/// * `InvalidFormat` - empty, `.5` / `5.`, multiple dots, non-digits
/// * `InvalidAmount` - signed or zero amounts
/// * `PrecisionOverflow` - more than `max_scale` fractional digits
/// * `Overflow` - does not fit in a `Decimal`
pub fn parse_amount(amount_str: &str, max_scale: u32) -> Result<Decimal, MoneyError> {
    let amount_str = amount_str.trim();
    if amount_str.is_empty() {
        return Err(MoneyError::InvalidFormat("empty string".into()));
    }

    if amount_str.starts_with('-') || amount_str.starts_with('+') {
        return Err(MoneyError::InvalidAmount);
    }

    let (whole, frac) = match amount_str.split_once('.') {
        None => (amount_str, ""),
        Some((whole, frac)) => {
            if whole.is_empty() {
                return Err(MoneyError::InvalidFormat(
                    "missing leading zero (e.g., use 0.5 instead of .5)".into(),
                ));
            }
            if frac.is_empty() {
                return Err(MoneyError::InvalidFormat(
                    "missing fractional part (e.g., use 5.0 instead of 5.)".into(),
                ));
            }
            if frac.contains('.') {
                return Err(MoneyError::InvalidFormat("multiple decimal points".into()));
            }
            (whole, frac)
        }
    };

    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(MoneyError::InvalidFormat(format!(
            "invalid character in amount: {}",
            amount_str
        )));
    }

    // REJECT if too many decimals (no silent truncation!)
    if frac.len() > max_scale as usize {
        return Err(MoneyError::PrecisionOverflow {
            provided: frac.len() as u32,
            max: max_scale,
        });
    }

    // Format is already validated: the only remaining failure is magnitude.
    let amount = Decimal::from_str_exact(amount_str).map_err(|_| MoneyError::Overflow)?;

    validate_amount(amount, max_scale)
}

/// Validate a `Decimal` that already crossed the API boundary
pub fn validate_amount(amount: Decimal, max_scale: u32) -> Result<Decimal, MoneyError> {
    if amount <= Decimal::ZERO {
        return Err(MoneyError::InvalidAmount);
    }

    let normalized = amount.normalize();
    if normalized.scale() > max_scale {
        return Err(MoneyError::PrecisionOverflow {
            provided: normalized.scale(),
            max: max_scale,
        });
    }

    Ok(amount)
}

// ============================================================================
// Format: Decimal → Client
// ============================================================================

/// Format an amount with exactly `display_decimals` places (banker's rounding)
pub fn format_amount(value: Decimal, display_decimals: u32) -> String {
    let rounded =
        value.round_dp_with_strategy(display_decimals, RoundingStrategy::MidpointNearestEven);
    format!("{:.prec$}", rounded, prec = display_decimals as usize)
}
