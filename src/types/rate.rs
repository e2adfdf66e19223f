//! Fixed-point fee rates and integer ratio helpers.
//!
//! ## Overview
//!
//! Fee rates are stored as `u64` scaled by 10^18: `10^18` is 100%, `10^16`
//! is 1%. All settlement math is integer-only and floors.
//!
//! ## Why Fixed-Point?
//!
//! Floating-point arithmetic can produce different results on different
//! hardware, breaking determinism. Fixed-point ensures identical results
//! everywhere.
//!
//! ## Examples
//!
//! ```
//! use dark_exchange::types::rate::{parse_rate, format_rate, FEE_SCALE};
//!
//! // 1% fee
//! let rate = parse_rate("0.01").unwrap();
//! assert_eq!(rate, 10_000_000_000_000_000);
//! assert_eq!(format_rate(rate), "0.01");
//! assert_eq!(parse_rate("1"), Some(FEE_SCALE));
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor for fee rates: 10^18 (= 100%)
pub const FEE_SCALE: u64 = 1_000_000_000_000_000_000;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Parse a decimal fraction ("0.01") into a fixed-point rate
///
/// # Returns
///
/// * `Some(u64)` - The rate scaled by 10^18, floored
/// * `None` - If parsing fails, the value is negative, or exceeds 100%
///
/// # Example
///
/// ```
/// use dark_exchange::types::rate::parse_rate;
///
/// assert_eq!(parse_rate("0.1"), Some(100_000_000_000_000_000));
/// assert_eq!(parse_rate("1.5"), None);
/// ```
pub fn parse_rate(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s.trim()).ok()?;
    decimal_to_rate(decimal)
}

/// Convert a Decimal fraction to a fixed-point rate
///
/// Returns `None` if the value is negative or above 1.
pub fn decimal_to_rate(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() || d > Decimal::ONE {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(FEE_SCALE))?;
    scaled.floor().to_u64()
}

/// Convert a fixed-point rate back to a Decimal fraction
pub fn rate_to_decimal(rate: u64) -> Decimal {
    Decimal::from(rate) / Decimal::from(FEE_SCALE)
}

/// Human-readable rate with trailing zeros trimmed
///
/// # Example
///
/// ```
/// use dark_exchange::types::rate::format_rate;
///
/// assert_eq!(format_rate(2_500_000_000_000_000), "0.0025");
/// assert_eq!(format_rate(0), "0");
/// ```
pub fn format_rate(rate: u64) -> String {
    format!("{}", rate_to_decimal(rate).normalize())
}

// ============================================================================
// Integer ratio helpers
// ============================================================================

/// `floor(a * b / d)` computed in u128
///
/// # Returns
///
/// * `Some(u64)` - The floored quotient
/// * `None` - If `d == 0` or the result does not fit in u64
///
/// # Example
///
/// ```
/// use dark_exchange::types::rate::mul_div_floor;
///
/// assert_eq!(mul_div_floor(10_000, 15_000, 20_000), Some(7_500));
/// assert_eq!(mul_div_floor(1, 1, 3), Some(0));
/// assert_eq!(mul_div_floor(1, 1, 0), None);
/// ```
pub fn mul_div_floor(a: u64, b: u64, d: u64) -> Option<u64> {
    if d == 0 {
        return None;
    }
    let product = (a as u128) * (b as u128);
    u64::try_from(product / (d as u128)).ok()
}

// ============================================================================
// Unit Tests
// ============================================================================
