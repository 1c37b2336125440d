//! Conversion between raw token units and decimal strings, on top of
//! `alloy_primitives::utils`.

use alloy_primitives::{
    utils::{ParseUnits, Unit},
    U256,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,

    #[error("Invalid amount: {0}")]
    Invalid(String),

    #[error("Amount too large: {0}")]
    Overflow(String),

    #[error("Unsupported token decimals: {0}")]
    Decimals(u8),
}

fn unit(decimals: u8) -> Result<Unit, AmountError> {
    Unit::new(decimals).ok_or(AmountError::Decimals(decimals))
}

/// Render `raw / 10^decimals` with exactly `decimals` fractional digits.
pub fn format_units(raw: U256, decimals: u8) -> Result<String, AmountError> {
    // alloy renders a zero-digit fraction as ".0"
    if decimals == 0 {
        return Ok(raw.to_string());
    }
    Ok(ParseUnits::U256(raw).format_units(unit(decimals)?))
}

/// Parse a non-negative decimal string into raw units.
///
/// Fractional digits beyond `decimals` are truncated.
pub fn parse_units(input: &str, decimals: u8) -> Result<U256, AmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AmountError::Empty);
    }

    // alloy accepts signs and digit separators; amounts here are plain decimals
    let (whole, fraction) = input.split_once('.').unwrap_or((input, ""));
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(AmountError::Invalid(input.to_string()));
    }

    match ParseUnits::parse_units(input, unit(decimals)?) {
        Ok(ParseUnits::U256(raw)) => Ok(raw),
        Ok(ParseUnits::I256(_)) => Err(AmountError::Invalid(input.to_string())),
        Err(_) => Err(AmountError::Overflow(input.to_string())),
    }
}
