//! Fixed-point decimal with a scale of two.
//!
//! # Responsibility
//! - Represent hour and cost amounts without binary floating-point drift.
//! - Own text parsing/formatting and SQLite value conversion for amounts.
//!
//! # Invariants
//! - Values are stored as a whole number of hundredths.
//! - Parsing never rounds: more than two fractional digits is an error.
//! - Display always renders exactly two fractional digits.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::de::{self, Deserializer, Visitor};
use serde::{Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const SCALE: i64 = 100;

/// Decimal amount with exactly two fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Decimal2 {
    hundredths: i64,
}

/// Error returned when decimal text cannot be parsed without rounding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalParseError {
    input: String,
}

impl Display for DecimalParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "`{}` is not a valid decimal number", self.input)
    }
}

impl Error for DecimalParseError {}

impl Decimal2 {
    /// Creates a value from a whole number of hundredths (`1250` is `12.50`).
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self { hundredths }
    }

    /// Creates a value from whole units (`12` is `12.00`).
    ///
    /// Returns `None` when `units` has no representation in hundredths.
    pub const fn from_units(units: i64) -> Option<Self> {
        match units.checked_mul(SCALE) {
            Some(hundredths) => Some(Self { hundredths }),
            None => None,
        }
    }

    /// Returns the raw number of hundredths.
    pub const fn hundredths(self) -> i64 {
        self.hundredths
    }

    fn from_f64(value: f64) -> Option<Self> {
        let scaled = (value * SCALE as f64).round();
        if !scaled.is_finite() || scaled.abs() > i64::MAX as f64 {
            return None;
        }
        Some(Self {
            hundredths: scaled as i64,
        })
    }
}

impl FromStr for Decimal2 {
    type Err = DecimalParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || DecimalParseError {
            input: value.to_string(),
        };

        let trimmed = value.trim();
        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if fraction.len() > 2 {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        let magnitude = units
            .checked_mul(SCALE)
            .and_then(|value| value.checked_add(cents))
            .ok_or_else(invalid)?;

        Ok(Self {
            hundredths: if negative { -magnitude } else { magnitude },
        })
    }
}

impl Display for Decimal2 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.hundredths < 0 { "-" } else { "" };
        let magnitude = self.hundredths.unsigned_abs();
        let scale = SCALE as u64;
        write!(f, "{sign}{}.{:02}", magnitude / scale, magnitude % scale)
    }
}

impl ToSql for Decimal2 {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for Decimal2 {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(units) => {
                Self::from_units(units).ok_or(FromSqlError::OutOfRange(units))
            }
            ValueRef::Real(real) => Self::from_f64(real).ok_or(FromSqlError::InvalidType),
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .map_err(|err| FromSqlError::Other(Box::new(err)))?
                .parse()
                .map_err(|err| FromSqlError::Other(Box::new(err))),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

impl Serialize for Decimal2 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Decimal2 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DecimalVisitor;

        impl Visitor<'_> for DecimalVisitor {
            type Value = Decimal2;

            fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str("a decimal string with at most two fractional digits")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(DecimalVisitor)
    }
}
