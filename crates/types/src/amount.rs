//! Decimal-string quantity helpers
//!
//! Amounts and fees travel as decimal strings. They are parsed into 256-bit
//! unsigned integers so arithmetic never goes through floating point.

use alloy::primitives::U256;

/// Parse a decimal string into a U256.
///
/// Only ASCII digits are accepted: no sign, no `0x` prefix, no whitespace or separators.
pub fn parse_decimal(s: &str) -> Result<U256, String> {
    if s.is_empty() {
        return Err("empty string".to_string());
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{}' is not a decimal integer", s));
    }
    U256::from_str_radix(s, 10).map_err(|e| format!("Failed to parse '{}': {}", s, e))
}

/// Render a U256 as a plain decimal string
pub fn to_decimal(value: &U256) -> String {
    value.to_string()
}
