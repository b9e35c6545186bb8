//! Bulk Price
//!
//! A fixed price for a quantity of a single product, e.g. "3A for 130".

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::{
    basket::Basket,
    items::{Claim, ClaimRole},
    pricing::{EvenSplit, split_evenly},
    products::ProductRef,
    promotions::{
        PromotionError, PromotionKey,
        types::{validate_price, validate_quantity},
    },
};

/// Bulk Price Promotion
#[derive(Debug, Clone)]
pub struct BulkPricePromotion<'a> {
    key: PromotionKey,
    product: ProductRef<'a>,
    quantity: usize,
    bundle_price: Money<'a, Currency>,
    split: EvenSplit<'a>,
    magnitude: Decimal,
}

impl<'a> BulkPricePromotion<'a> {
    /// Create a new bulk price promotion.
    ///
    /// # Errors
    ///
    /// Returns a [`PromotionError`] if the quantity is zero, or the bundle price is negative
    /// or in another currency than the product, or the quantity is too large to price.
    pub fn new(
        key: PromotionKey,
        product: ProductRef<'a>,
        quantity: usize,
        bundle_price: Money<'a, Currency>,
    ) -> Result<Self, PromotionError> {
        validate_quantity(quantity)?;
        validate_price(&bundle_price, &product)?;

        let split = split_evenly(bundle_price, quantity)?;

        let magnitude = Decimal::from(product.price.to_minor_units())
            .checked_mul(Decimal::from(quantity))
            .and_then(|full| full.checked_sub(Decimal::from(bundle_price.to_minor_units())))
            .ok_or(PromotionError::MagnitudeOverflow(quantity))?;

        Ok(Self {
            key,
            product,
            quantity,
            bundle_price,
            split,
            magnitude,
        })
    }

    /// Return the promotion key
    pub fn key(&self) -> PromotionKey {
        self.key
    }

    /// Return the product this promotion prices
    pub fn product(&self) -> &ProductRef<'a> {
        &self.product
    }

    /// Return the number of units in one bundle
    pub fn quantity(&self) -> usize {
        self.quantity
    }

    /// Return the price of one bundle
    pub fn bundle_price(&self) -> &Money<'a, Currency> {
        &self.bundle_price
    }

    /// Savings per bundle, in minor units
    pub fn magnitude(&self) -> Decimal {
        self.magnitude
    }

    /// Count the unclaimed units of the product in the basket.
    pub fn matching_count(&self, basket: &Basket<'a>) -> usize {
        basket.count_unclaimed(|item| item.sku() == self.product.sku)
    }

    /// Whether the basket holds a full bundle of unclaimed units.
    pub fn is_applicable(&self, basket: &Basket<'a>) -> bool {
        self.matching_count(basket) >= self.quantity
    }

    /// Claim the first `quantity` unclaimed units in basket order at the split bundle price.
    pub fn apply(&self, basket: &mut Basket<'a>) -> bool {
        if !self.is_applicable(basket) {
            return false;
        }

        let claim = Claim::new(self.key, basket.next_bundle(), ClaimRole::Discounted);
        let sku = self.product.sku;

        for (item, price) in basket
            .unclaimed_mut(|item| item.sku() == sku)
            .zip(self.split.parts(self.quantity))
        {
            item.claim_at(claim, price);
        }

        true
    }
}
