use alloy_primitives::{Address, U256};
use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

// Validate a human-entered amount string (unsigned decimal)
pub fn is_valid_amount_input(input: &str) -> bool {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^\d+(?:\.\d+)?$").unwrap();
    }

    RE.is_match(input)
}

/// Converts a human decimal string to smallest units. Exact: rejects more
/// fractional digits than the token carries instead of rounding.
pub fn parse_units(input: &str, decimals: u32) -> Result<U256> {
    if !is_valid_amount_input(input) {
        return Err(anyhow!("Invalid amount format"));
    }

    let value = Decimal::from_str(input)
        .map_err(|_| anyhow!("Invalid amount format"))?
        .normalize();

    let scale = value.scale();
    if scale > decimals {
        return Err(anyhow!(
            "Amount has more than {} decimal places",
            decimals
        ));
    }

    let mantissa: u128 = value
        .mantissa()
        .try_into()
        .map_err(|_| anyhow!("Amount must not be negative"))?;

    Ok(U256::from(mantissa) * U256::from(10u64).pow(U256::from(decimals - scale)))
}

/// Formats smallest units back to a human decimal string, trimming trailing
/// zeros. Exact inverse of [`parse_units`] for any in-range value.
pub fn format_units(value: U256, decimals: u32) -> String {
    let scale = U256::from(10u64).pow(U256::from(decimals));
    let whole = value / scale;
    let frac = value % scale;

    if frac.is_zero() {
        return whole.to_string();
    }

    let frac_str = format!("{:0>width$}", frac, width = decimals as usize);
    let frac_str = frac_str.trim_end_matches('0');
    format!("{}.{}", whole, frac_str)
}

// Shorten address for display
pub fn shorten_address(address: &Address) -> String {
    let s = address.to_string();
    format!("{}...{}", &s[..6], &s[s.len() - 4..])
}
