//! Value Objects for the storefront

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

/// Money value object.
///
/// The store sells in a single currency, so only the amount is carried. Amounts
/// are held at two fraction digits and travel as strings (`"10.00"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub fn new(amount: Decimal) -> Self {
        let mut amount = amount.round_dp(2);
        amount.rescale(2);
        Self(amount)
    }
    pub fn zero() -> Self { Self::new(Decimal::ZERO) }
    pub fn amount(&self) -> Decimal { self.0 }
    pub fn is_negative(&self) -> bool { self.0.is_sign_negative() && !self.0.is_zero() }
    pub fn add(&self, other: &Money) -> Money { Money::new(self.0 + other.0) }
    pub fn multiply(&self, qty: u32) -> Money { Money::new(self.0 * Decimal::from(qty)) }
    /// Divides by a count, yielding zero for a zero divisor.
    pub fn average_over(&self, count: i64) -> Money {
        if count <= 0 { return Money::zero(); }
        Money::new(self.0 / Decimal::from(count))
    }
}

impl Default for Money { fn default() -> Self { Self::zero() } }

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self { Self::new(amount) }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self { money.0 }
}

impl FromStr for Money {
    type Err = MoneyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money::new).map_err(|_| MoneyError::Unparseable(s.to_string()))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self { iter.fold(Money::zero(), |acc, m| acc.add(&m)) }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum MoneyError { Unparseable(String) }
impl std::error::Error for MoneyError {}
impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::Unparseable(s) => write!(f, "'{s}' is not a decimal amount") }
    }
}

/// Quantity value object.
///
/// Bounded to `0..=Quantity::MAX` so every cart line fits the `INTEGER`
/// quantity column unchanged. Values outside that range are rejected when
/// deserialized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub const MAX: u32 = i32::MAX as u32;

    /// Saturates at [`Quantity::MAX`].
    pub fn new(value: u32) -> Self { Self(value.min(Self::MAX)) }
    /// Clamps a signed request value into range, negatives become zero.
    pub fn clamped(value: i64) -> Self { Self(value.clamp(0, i64::from(Self::MAX)) as u32) }
    pub fn value(&self) -> u32 { self.0 }
    /// Lossless by construction.
    pub fn as_i32(&self) -> i32 { self.0 as i32 }
    pub fn add(&self, other: Quantity) -> Self { Self::new(self.0.saturating_add(other.0)) }
    pub fn is_zero(&self) -> bool { self.0 == 0 }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value > Self::MAX { return Err(QuantityError::TooLarge(value)); }
        Ok(Self(value))
    }
}

impl From<Quantity> for u32 { fn from(q: Quantity) -> Self { q.0 } }

#[derive(Debug, Clone, PartialEq, Eq)] pub enum QuantityError { TooLarge(u32) }
impl std::error::Error for QuantityError {}
impl fmt::Display for QuantityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::TooLarge(v) => write!(f, "quantity {v} exceeds {}", Quantity::MAX) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_money_keeps_two_fraction_digits() {
        assert_eq!(Money::new(Decimal::new(10, 0)).to_string(), "10.00");
        assert_eq!("45".parse::<Money>().unwrap().to_string(), "45.00");
        assert_eq!("19.999".parse::<Money>().unwrap().to_string(), "20.00");
    }
    #[test]
    fn test_money_serializes_as_string() {
        let m: Money = serde_json::from_str("\"25.5\"").unwrap();
        assert_eq!(serde_json::to_string(&m).unwrap(), "\"25.50\"");
    }
    #[test]
    fn test_money_sum_and_average() {
        let total: Money = ["10.00", "25.00"].iter().map(|s| s.parse::<Money>().unwrap()).sum();
        assert_eq!(total.to_string(), "35.00");
        assert_eq!(total.average_over(2).to_string(), "17.50");
        assert_eq!(total.average_over(0), Money::zero());
    }
    #[test]
    fn test_money_rejects_garbage() { assert!("ten".parse::<Money>().is_err()); }
    #[test]
    fn test_quantity_clamps() {
        assert_eq!(Quantity::clamped(-4).value(), 0);
        assert_eq!(Quantity::clamped(7).value(), 7);
        assert_eq!(Quantity::clamped(i64::MAX).value(), Quantity::MAX);
        assert_eq!(Quantity::new(Quantity::MAX).add(Quantity::new(1)).value(), Quantity::MAX);
        assert_eq!(Quantity::new(u32::MAX).as_i32(), i32::MAX);
    }
    #[test]
    fn test_quantity_rejects_values_beyond_integer_column() {
        assert!(serde_json::from_str::<Quantity>("3000000000").is_err());
        assert!(serde_json::from_str::<Quantity>("-1").is_err());
        assert_eq!(serde_json::from_str::<Quantity>("2147483647").unwrap().value(), Quantity::MAX);
        assert_eq!(serde_json::to_string(&Quantity::new(3)).unwrap(), "3");
    }
}
