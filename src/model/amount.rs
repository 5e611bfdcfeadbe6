//! Amount type for handling monetary values persisted as decimal strings.
//!
//! The registration form persisted whatever the user typed, so an amount may arrive as a JSON
//! string (`"100"`, `" 12.50 "`) or, in older payloads, as a JSON number. Either way the value is
//! held as an exact `Decimal`.
//!
//! Parsed amounts are limited to `MAX_MAGNITUDE` so that adding up any list of transactions stays
//! well inside the range of `Decimal`.

use crate::format;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Represents an amount of money.
///
/// `Display` renders the amount as Brazilian currency, while serialization writes the plain
/// decimal string so that records round-trip through the store unchanged.
///
/// ```
/// # use gofinances::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("1234.5").unwrap();
/// assert_eq!(amount.to_string(), "R$ 1.234,50");
/// ```
/// The largest absolute value a parsed amount may have: one quadrillion.
pub const MAX_MAGNITUDE: i64 = 1_000_000_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    pub const ZERO: Amount = Amount::new(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Wraps `value`, rejecting it if its magnitude exceeds `MAX_MAGNITUDE`.
    fn bounded(value: Decimal, input: impl Display) -> Result<Self, AmountError> {
        if value.abs() > Decimal::from(MAX_MAGNITUDE) {
            return Err(AmountError {
                input: input.to_string(),
                reason: Reason::OutOfRange,
            });
        }
        Ok(Amount::new(value))
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError {
    input: String,
    reason: Reason,
}

enum Reason {
    Invalid(rust_decimal::Error),
    OutOfRange,
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Reason::Invalid(e) => write!(f, "AmountError({:?}, {:?})", self.input, e),
            Reason::OutOfRange => write!(f, "AmountError({:?}, OutOfRange)", self.input),
        }
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Reason::Invalid(e) => write!(f, "invalid amount '{}': {}", self.input, e),
            Reason::OutOfRange => write!(
                f,
                "invalid amount '{}': the magnitude may not exceed {MAX_MAGNITUDE}",
                self.input
            ),
        }
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.reason {
            Reason::Invalid(e) => Some(e),
            Reason::OutOfRange => None,
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = Decimal::from_str(trimmed).map_err(|e| AmountError {
            input: s.to_string(),
            reason: Reason::Invalid(e),
        })?;
        Amount::bounded(value, s)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&format::currency(self.value))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.value.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount as a string or a number")
    }

    fn visit_str<E>(self, v: &str) -> Result<Amount, E>
    where
        E: de::Error,
    {
        Amount::from_str(v).map_err(E::custom)
    }

    fn visit_i64<E>(self, v: i64) -> Result<Amount, E>
    where
        E: de::Error,
    {
        Amount::bounded(Decimal::from(v), v).map_err(E::custom)
    }

    fn visit_u64<E>(self, v: u64) -> Result<Amount, E>
    where
        E: de::Error,
    {
        Amount::bounded(Decimal::from(v), v).map_err(E::custom)
    }

    fn visit_f64<E>(self, v: f64) -> Result<Amount, E>
    where
        E: de::Error,
    {
        let value = Decimal::from_f64(v)
            .ok_or_else(|| E::custom(format!("amount {v} cannot be represented as a decimal")))?;
        Amount::bounded(value, v).map_err(E::custom)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount::new(self.value + rhs.value)
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount::new(self.value - rhs.value)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, |acc, a| acc + *a)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
