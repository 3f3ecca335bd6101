//! Monetary amounts in the smallest currency unit.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Non-negative amount of money in the smallest currency unit (e.g., cents).
///
/// All arithmetic is exact integer arithmetic and checked: a result that does
/// not fit is reported, never clamped. Rounding happens only when a percentage
/// is taken ([`Money::checked_percent`]) or when a caller formats the value.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Parse a decimal amount such as `"2.50"`, `"3"` or `"0.5"`.
    ///
    /// Negative amounts and more than two fractional digits are rejected.
    pub fn parse(input: &str) -> DomainResult<Self> {
        let s = input.trim();
        if s.is_empty() {
            return Err(DomainError::validation("amount cannot be empty"));
        }

        let (whole, fraction) = match s.split_once('.') {
            Some((_, "")) => {
                return Err(DomainError::validation(format!("invalid amount: {input}")));
            }
            Some((w, f)) => (w, f),
            None => (s, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::validation(format!("invalid amount: {input}")));
        }
        if fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::validation(format!(
                "amount must have at most two decimal places: {input}"
            )));
        }

        let whole: u64 = whole
            .parse()
            .map_err(|_| DomainError::validation(format!("amount out of range: {input}")))?;
        let fraction: u64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().unwrap_or(0) * 10,
            _ => fraction.parse::<u64>().unwrap_or(0),
        };

        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction))
            .map(Self)
            .ok_or_else(|| DomainError::validation(format!("amount out of range: {input}")))
    }

    /// Unit price × quantity, `None` on overflow.
    pub fn checked_times(self, quantity: u64) -> Option<Money> {
        self.0.checked_mul(quantity).map(Self)
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Percentage of this amount expressed in basis points (`2100` = 21%),
    /// rounded half up to the nearest cent. `None` if the result does not fit.
    pub fn checked_percent(self, basis_points: u32) -> Option<Money> {
        let scaled = u128::from(self.0) * u128::from(basis_points);
        let rounded = (scaled + 5_000) / 10_000;
        u64::try_from(rounded).ok().map(Self)
    }

    /// Exact sum of `amounts`.
    pub fn try_sum<I>(amounts: I) -> DomainResult<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts.into_iter().try_fold(Money::ZERO, |acc, amount| {
            acc.checked_add(amount).ok_or_else(DomainError::amount_overflow)
        })
    }

    /// Render for display with a currency symbol, e.g. `$7.50`.
    pub fn format_with(self, symbol: &str) -> String {
        format!("{symbol}{self}")
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
