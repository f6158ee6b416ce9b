//! Text quantity parsing.
//!
//! Conversion settings such as the standard conditions are written by hand
//! (`"1 atm"`, `"288.71 K"`, `"15.56 C"`). This module turns that text into a
//! canonical SI value for the quantity family being configured.

use std::fmt;
use thiserror::Error;

/// Dimension/quantity family for a text value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Absolute temperature (canonical: K)
    Temperature,
    /// Absolute pressure (canonical: Pa)
    Pressure,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature => write!(f, "Temperature"),
            Self::Pressure => write!(f, "Absolute Pressure"),
        }
    }
}

/// Error in unit parsing or conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unknown unit '{unit}' for {quantity}")]
    UnknownUnit { unit: String, quantity: Quantity },

    #[error("Ambiguous unit '{unit}': {reason}")]
    AmbiguousUnit { unit: String, reason: &'static str },

    #[error("Value {value} out of range: {reason}")]
    OutOfRange { value: f64, reason: &'static str },
}

/// Parse `raw_text` as a value of `quantity`, returning canonical SI.
///
/// A bare number is taken to already be in the canonical unit.
pub fn parse_quantity(raw_text: &str, quantity: Quantity) -> Result<f64, UnitError> {
    let trimmed = raw_text.trim();
    match quantity {
        Quantity::Temperature => parse_temperature(trimmed),
        Quantity::Pressure => parse_pressure(trimmed),
    }
}

fn parse_temperature(input: &str) -> Result<f64, UnitError> {
    let (value, unit) = split_value_and_unit(input)?;

    let kelvin = match unit.to_lowercase().as_str() {
        "" | "k" | "kelvin" => value,
        "c" | "°c" | "degc" | "celsius" => value + crate::units::KELVIN_OFFSET,
        "f" | "°f" | "degf" | "fahrenheit" => (value + 459.67) * 5.0 / 9.0,
        "r" | "°r" | "rankine" => value * 5.0 / 9.0,
        _ => {
            return Err(UnitError::UnknownUnit {
                unit,
                quantity: Quantity::Temperature,
            });
        }
    };

    if kelvin <= 0.0 {
        return Err(UnitError::OutOfRange {
            value: kelvin,
            reason: "Absolute temperature must be > 0 K",
        });
    }
    Ok(kelvin)
}

fn parse_pressure(input: &str) -> Result<f64, UnitError> {
    let (value, unit) = split_value_and_unit(input)?;

    let pa = match unit.to_lowercase().as_str() {
        "" | "pa" | "pascal" => value,
        "kpa" => value * 1e3,
        "mpa" => value * 1e6,
        "bar" => value * 1e5,
        "atm" => value * 101_325.0,
        "psia" => value * 6_894.757_293_168,
        "kgf/cm2" => value * 98_066.5,
        "psi" => {
            return Err(UnitError::AmbiguousUnit {
                unit,
                reason: "Use 'psia' (absolute)",
            });
        }
        _ => {
            return Err(UnitError::UnknownUnit {
                unit,
                quantity: Quantity::Pressure,
            });
        }
    };

    if pa < 0.0 {
        return Err(UnitError::OutOfRange {
            value: pa,
            reason: "Absolute pressure cannot be negative",
        });
    }
    Ok(pa)
}

/// Split `"14.7 psia"` into `(14.7, "psia")`; a bare number yields an empty unit.
fn split_value_and_unit(input: &str) -> Result<(f64, String), UnitError> {
    let trimmed = input.trim();

    // exponent markers only count when followed by a digit or sign, so "1e5" parses but "1 erg" does not
    let bytes = trimmed.as_bytes();
    let mut split_idx = trimmed.len();
    for (i, c) in trimmed.char_indices() {
        let numeric = c.is_ascii_digit() || c == '.' || c == '-' || c == '+';
        let exponent = (c == 'e' || c == 'E')
            && i > 0
            && bytes
                .get(i + 1)
                .is_some_and(|b| b.is_ascii_digit() || *b == b'-' || *b == b'+');
        if !numeric && !exponent {
            split_idx = i;
            break;
        }
    }

    let (num_part, unit_part) = trimmed.split_at(split_idx);
    let value: f64 = num_part.trim().parse().map_err(|_| {
        UnitError::ParseError(format!("Could not parse numeric value from '{}'", input))
    })?;

    Ok((value, unit_part.trim().to_string()))
}
