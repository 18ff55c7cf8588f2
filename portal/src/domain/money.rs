//! Currency amounts parsed from form input and backend payloads.
//!
//! Amounts are held as integer minor units (cents) so validation never
//! touches floating point. Backend payloads are read leniently through
//! [`Amount`], which keeps the original text and parses on demand.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use thiserror::Error;

/// Reasons a decimal string is not a valid amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyParseError {
    /// Nothing was entered.
    #[error("amount is required")]
    Empty,
    /// The text is not a plain decimal number.
    #[error("amount must be a number")]
    NotANumber,
    /// More than two digits after the decimal point.
    #[error("amount must have at most two decimal places")]
    TooPrecise,
    /// The value does not fit the supported range.
    #[error("amount is too large")]
    OutOfRange,
}

/// Signed amount in minor units.
///
/// # Examples
/// ```
/// use portal::domain::Money;
///
/// let amount = Money::parse("12.5").expect("valid amount");
/// assert_eq!(amount.minor_units(), 1250);
/// assert_eq!(amount.to_string(), "12.50");
/// assert!(Money::parse("1.234").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Build from minor units.
    pub const fn from_minor_units(minor: i64) -> Self {
        Self(minor)
    }

    /// Parse a decimal such as `"-1"`, `"0"`, `"12.5"` or `"1,000.25"`.
    ///
    /// Thousands separators are ignored.
    pub fn parse(raw: &str) -> Result<Self, MoneyParseError> {
        let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
        if cleaned.is_empty() {
            return Err(MoneyParseError::Empty);
        }
        let (negative, unsigned) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(MoneyParseError::NotANumber);
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(MoneyParseError::NotANumber);
        }
        if fraction.len() > 2 {
            return Err(MoneyParseError::TooPrecise);
        }
        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| MoneyParseError::OutOfRange)?
        };
        let fraction_value: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| MoneyParseError::NotANumber)? * 10,
            _ => fraction.parse().map_err(|_| MoneyParseError::NotANumber)?,
        };
        let minor = whole_value
            .checked_mul(100)
            .and_then(|value| value.checked_add(fraction_value))
            .ok_or(MoneyParseError::OutOfRange)?;
        Ok(Self(if negative { -minor } else { minor }))
    }

    /// Value in minor units.
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Whether the amount is below zero.
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Whether the amount is strictly above zero.
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// JSON number suitable for a backend request body.
    pub fn to_json(self) -> Value {
        if self.0 % 100 == 0 {
            Value::from(self.0 / 100)
        } else {
            self.to_string()
                .parse::<Number>()
                .map_or_else(|_| Value::String(self.to_string()), Value::Number)
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", magnitude / 100, magnitude % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Amount as the backend sent it: a JSON number or a numeric string.
///
/// The original text is kept for display and search; [`Amount::money`]
/// parses it when a screen needs to compare or total values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Amount(String);

impl Amount {
    /// Text as received.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Parsed value, if the text is a valid decimal.
    pub fn money(&self) -> Option<Money> {
        Money::parse(&self.0).ok()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Money> for Amount {
    fn from(value: Money) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Number(number) => Ok(Self(number.to_string())),
            Value::String(text) => Ok(Self(text.trim().to_owned())),
            other => Err(de::Error::custom(format!(
                "expected a number or numeric string, got {other}"
            ))),
        }
    }
}
