//! Reward amount parsing and display.
//!
//! Rewards travel as `i128` in the token's smallest unit (7 decimals for
//! Stellar assets). Users type decimal strings; lists show two fractional
//! digits followed by the token symbol.

use crate::config::TokenInfo;
use thiserror::Error;

/// Fractional digits shown when displaying a reward.
pub const DISPLAY_DECIMALS: u32 = 2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount must not be negative")]
    Negative,
    #[error("amount must be greater than zero")]
    NotPositive,
    #[error("\"{0}\" is not a decimal number")]
    Invalid(String),
    #[error("at most {decimals} fractional digits are allowed")]
    TooPrecise { decimals: u32 },
    #[error("amount is too large")]
    Overflow,
}

/// Convert a whole-token amount to the token's smallest unit.
///
/// E.g. `to_base_units(100, 7)` → `1_000_000_000`.
/// Returns `None` on overflow.
pub fn to_base_units(amount: i128, decimals: u32) -> Option<i128> {
    let factor = 10_i128.checked_pow(decimals)?;
    amount.checked_mul(factor)
}

/// Parse a user-entered decimal string into smallest units.
///
/// Accepts `"10"`, `"10.5"`, `"0.0000001"` and `".5"`; rejects signs,
/// exponents, separators and more fractional digits than the token carries.
pub fn parse_amount(input: &str, decimals: u32) -> Result<i128, AmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    if trimmed.starts_with('-') {
        return Err(AmountError::Negative);
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(AmountError::Invalid(trimmed.to_owned()));
    }
    if fraction.len() as u32 > decimals {
        return Err(AmountError::TooPrecise { decimals });
    }

    let whole_units = if whole.is_empty() {
        0
    } else {
        let value: i128 = whole.parse().map_err(|_| AmountError::Overflow)?;
        to_base_units(value, decimals).ok_or(AmountError::Overflow)?
    };

    let fraction_units = if fraction.is_empty() {
        0
    } else {
        let value: i128 = fraction.parse().map_err(|_| AmountError::Overflow)?;
        let padding = decimals - fraction.len() as u32;
        to_base_units(value, padding).ok_or(AmountError::Overflow)?
    };

    whole_units
        .checked_add(fraction_units)
        .ok_or(AmountError::Overflow)
}

/// Format smallest units with two fractional digits, rounding half up.
pub fn format_amount(units: i128, decimals: u32) -> String {
    let sign = if units < 0 { "-" } else { "" };
    let magnitude = units.unsigned_abs();
    let Some(scale) = 10_u128.checked_pow(decimals) else {
        return format!("{sign}0.00");
    };

    let mut whole = magnitude / scale;
    let remainder = magnitude % scale;
    let hundredths = 10_u128.pow(DISPLAY_DECIMALS);
    let mut cents = if decimals <= DISPLAY_DECIMALS {
        remainder * 10_u128.pow(DISPLAY_DECIMALS - decimals)
    } else {
        // one cent in smallest units; `rest` is what is left below it
        let unit = scale / hundredths;
        let (cents, rest) = (remainder / unit, remainder % unit);
        if rest >= unit - rest {
            cents + 1
        } else {
            cents
        }
    };
    if cents == hundredths {
        whole += 1;
        cents = 0;
    }
    format!("{sign}{whole}.{cents:02}")
}

/// `"10.00 XLM"`-style display of a reward.
pub fn display_reward(units: i128, token: &TokenInfo) -> String {
    format!("{} {}", format_amount(units, token.decimals), token.symbol)
}
