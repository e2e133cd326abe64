//! Money type for cart totals.
//!
//! Uses cents-based integer representation so that summing line subtotals
//! does not accumulate floating-point error. The catalog reports prices as
//! decimal numbers; they are converted once with [`Money::from_decimal`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};

/// An amount in Brazilian reais, stored in centavos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in centavos.
    pub amount_cents: i64,
}

impl Money {
    /// Create a new Money value from cents.
    pub const fn new(amount_cents: i64) -> Self {
        Self { amount_cents }
    }

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use rocketshoes_commerce::money::Money;
    /// let price = Money::from_decimal(179.9);
    /// assert_eq!(price.amount_cents, 17990);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        Self::new((amount * 100.0).round() as i64)
    }

    pub const fn zero() -> Self {
        Self::new(0)
    }

    /// Format the way the storefront shows prices, e.g. `R$ 1.234,56`.
    pub fn display(&self) -> String {
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let cents = self.amount_cents.unsigned_abs();
        let reais = group_thousands(cents / 100);
        format!("{sign}R$ {reais},{:02}", cents % 100)
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::new(self.amount_cents.saturating_add(other.amount_cents))
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, factor: u32) -> Money {
        Money::new(self.amount_cents.saturating_mul(i64::from(factor)))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}
