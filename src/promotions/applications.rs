//! Promotion Applications

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};

use crate::{
    items::{ClaimRole, Item},
    promotions::PromotionKey,
};

/// Result of applying a promotion to an item
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionApplication<'a> {
    /// Key of the promotion that was applied
    pub promotion_key: PromotionKey,

    /// Index of the item in the basket
    pub item_idx: usize,

    /// ID assigned to a bundle of items in the same promotion
    pub bundle_id: usize,

    /// Role the item played in the promotion
    pub role: ClaimRole,

    /// Original price of the item
    pub original_price: Money<'a, Currency>,

    /// Final price after discount
    pub final_price: Money<'a, Currency>,
}

impl<'a> PromotionApplication<'a> {
    /// Build the application record for a claimed basket item.
    ///
    /// Returns `None` if the item is unclaimed.
    pub fn from_item(item_idx: usize, item: &Item<'a>) -> Option<Self> {
        item.claim().map(|claim| PromotionApplication {
            promotion_key: claim.promotion_key,
            item_idx,
            bundle_id: claim.bundle_id,
            role: claim.role,
            original_price: *item.original_price(),
            final_price: *item.price(),
        })
    }

    /// Calculate the item savings from this promotion application
    ///
    /// # Errors
    ///
    /// Returns an error if the original price or final price cannot be subtracted.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.original_price.sub(self.final_price)
    }

    /// Calculates the savings made by applying the promotions as a percentage
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let savings = self.savings()?;

        // Avoid integer division truncation by doing the ratio in decimal space.
        let savings_minor = savings.to_minor_units();
        let original_minor = self.original_price.to_minor_units();

        if original_minor == 0 {
            return Ok(Percentage::from(0.0));
        }

        let savings_dec = Decimal::from_i64(savings_minor).unwrap_or(Decimal::ZERO);
        let original_dec = Decimal::from_i64(original_minor).unwrap_or(Decimal::ZERO);

        Ok(Percentage::from(savings_dec / original_dec))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use crate::{items::Claim, test_support::product_ref};

    use super::*;

    fn app(
        original: Money<'static, Currency>,
        final_price: Money<'static, Currency>,
    ) -> PromotionApplication<'static> {
        PromotionApplication {
            promotion_key: PromotionKey::default(),
            item_idx: 0,
            bundle_id: 0,
            role: ClaimRole::Discounted,
            original_price: original,
            final_price,
        }
    }

    #[test]
    fn from_item_reads_the_claim() -> TestResult {
        let mut item = Item::new(product_ref('B', 3000)?);

        assert_eq!(PromotionApplication::from_item(4, &item), None);

        item.claim_at(
            Claim::new(PromotionKey::default(), 2, ClaimRole::Free),
            Money::from_minor(0, GBP),
        );

        let application = PromotionApplication::from_item(4, &item);

        assert_eq!(
            application,
            Some(PromotionApplication {
                promotion_key: PromotionKey::default(),
                item_idx: 4,
                bundle_id: 2,
                role: ClaimRole::Free,
                original_price: Money::from_minor(3000, GBP),
                final_price: Money::from_minor(0, GBP),
            })
        );

        Ok(())
    }

    #[test]
    fn savings_returns_difference_between_original_and_final() {
        let app = app(Money::from_minor(200, GBP), Money::from_minor(150, GBP));

        assert_eq!(app.savings(), Ok(Money::from_minor(50, GBP)));
    }

    #[test]
    fn savings_errors_on_currency_mismatch() {
        let app = app(Money::from_minor(200, USD), Money::from_minor(150, GBP));

        assert_eq!(
            app.savings(),
            Err(MoneyError::CurrencyMismatch {
                expected: USD.iso_alpha_code,
                actual: GBP.iso_alpha_code,
            })
        );
    }

    #[test]
    fn savings_percent_is_zero_when_original_price_is_zero() {
        let app = app(Money::from_minor(0, GBP), Money::from_minor(0, GBP));

        assert_eq!(app.savings_percent(), Ok(Percentage::from(0.0)));
    }

    #[test]
    fn savings_percent_is_correct_for_nonzero_original_price() -> TestResult {
        let app = app(Money::from_minor(200, GBP), Money::from_minor(150, GBP));

        let percent = app.savings_percent()?;
        let percent_points = ((percent * Decimal::ONE) * Decimal::from(100)).round_dp(2);

        assert_eq!(percent_points, Decimal::from(25));

        Ok(())
    }
}
