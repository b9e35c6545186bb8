//! Prices

use rust_decimal::{RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors that can occur while calculating total price.
#[derive(Debug, Error, PartialEq)]
pub enum TotalPriceError {
    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Errors that can occur while splitting a price across units.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitPriceError {
    /// A price cannot be split across zero units.
    #[error("cannot split a price across zero units")]
    ZeroParts,

    /// The number of units does not fit in minor unit arithmetic.
    #[error("cannot split a price across {0} units")]
    TooManyParts(usize),
}

/// Calculates the sum of a sequence of prices in the given currency.
///
/// # Errors
///
/// Returns [`TotalPriceError::Money`] if a price is in a different currency.
pub fn total_price<'a, I>(
    currency: &'a Currency,
    prices: I,
) -> Result<Money<'a, Currency>, TotalPriceError>
where
    I: IntoIterator<Item = Money<'a, Currency>>,
{
    let total = prices
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, price| acc.add(price))?;

    Ok(total)
}

/// A price split evenly across a number of units.
///
/// Each unit gets the integer share in minor units, and the remainder is handed out
/// one minor unit at a time from the first unit, so the parts always sum to the price.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EvenSplit<'a> {
    currency: &'a Currency,
    share: i64,
    remainder: i64,
}

impl<'a> EvenSplit<'a> {
    /// Price of the unit at position `idx` within the bundle.
    pub fn part(&self, idx: usize) -> Money<'a, Currency> {
        let extra = i64::try_from(idx).is_ok_and(|idx| idx < self.remainder);

        Money::from_minor(self.share + i64::from(extra), self.currency)
    }

    /// Prices of the first `count` units.
    pub fn parts(&self, count: usize) -> impl Iterator<Item = Money<'a, Currency>> {
        let split = *self;

        (0..count).map(move |idx| split.part(idx))
    }
}

/// Splits a price evenly across `parts` units.
///
/// # Errors
///
/// - [`SplitPriceError::ZeroParts`]: `parts` is zero.
/// - [`SplitPriceError::TooManyParts`]: `parts` does not fit in an `i64`.
pub fn split_evenly(
    price: Money<'_, Currency>,
    parts: usize,
) -> Result<EvenSplit<'_>, SplitPriceError> {
    if parts == 0 {
        return Err(SplitPriceError::ZeroParts);
    }

    let count = i64::try_from(parts).map_err(|_err| SplitPriceError::TooManyParts(parts))?;
    let minor = price.to_minor_units();

    Ok(EvenSplit {
        currency: price.currency(),
        share: minor / count,
        remainder: minor % count,
    })
}

/// Rounds a price to whole major units, midpoint away from zero.
pub fn round_to_major_units(price: &Money<'_, Currency>) -> Option<i64> {
    price
        .amount()
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}
