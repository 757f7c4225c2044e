//! Fixed-point monetary amounts.
//!
//! Prices, balances and auto-purchase limits are compared at exact cent
//! boundaries, so they are stored as whole hundredths instead of floats.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::{ModelError, Result};

/// A non-negative amount of credits with two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Credits(i64);

impl Credits {
    pub const ZERO: Credits = Credits(0);

    /// Build an amount from hundredths. Negative input is rejected.
    pub fn from_cents(cents: i64) -> Result<Self> {
        if cents < 0 {
            return Err(ModelError::NegativeAmount(cents));
        }
        Ok(Credits(cents))
    }

    /// Whole credits, e.g. `Credits::whole(10)` is `10.00`.
    pub const fn whole(units: u32) -> Self {
        Credits(units as i64 * 100)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    /// `None` when the result would go below zero.
    pub fn checked_sub(self, rhs: Credits) -> Option<Credits> {
        let cents = self.0.checked_sub(rhs.0)?;
        (cents >= 0).then_some(Credits(cents))
    }

    pub fn saturating_sub(self, rhs: Credits) -> Credits {
        Credits((self.0 - rhs.0).max(0))
    }
}

impl Add for Credits {
    type Output = Credits;

    fn add(self, rhs: Credits) -> Credits {
        Credits(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Credits {
    type Output = Credits;

    fn sub(self, rhs: Credits) -> Credits {
        self.saturating_sub(rhs)
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Credits {
    type Err = ModelError;

    /// Accepts `"10"`, `"10.5"` and `"10.05"`. More than two decimals is an
    /// error rather than a silent rounding.
    fn from_str(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let invalid = || ModelError::InvalidAmount(raw.to_string());

        if trimmed.starts_with('-') {
            return Err(invalid());
        }

        let (whole, fraction) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (trimmed, ""),
        };
        if whole.is_empty() || fraction.len() > 2 {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let units: i64 = whole.parse().map_err(|_| invalid())?;
        let hundredths: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        units
            .checked_mul(100)
            .and_then(|c| c.checked_add(hundredths))
            .map(Credits)
            .ok_or_else(invalid)
    }
}
