//! Free Item
//!
//! Buy a quantity of one product and get one unit of another product free,
//! e.g. "2E get one B free". Trigger and free product may be the same.

use rust_decimal::Decimal;
use rusty_money::Money;

use crate::{
    basket::Basket,
    items::{Claim, ClaimRole},
    products::ProductRef,
    promotions::{PromotionError, PromotionKey, types::validate_quantity},
};

/// Free Item Promotion
#[derive(Debug, Clone)]
pub struct FreeItemPromotion<'a> {
    key: PromotionKey,
    trigger: ProductRef<'a>,
    quantity: usize,
    free: ProductRef<'a>,
    magnitude: Decimal,
}

impl<'a> FreeItemPromotion<'a> {
    /// Create a new free item promotion.
    ///
    /// # Errors
    ///
    /// Returns a [`PromotionError`] if the quantity is zero or the products are priced in
    /// different currencies.
    pub fn new(
        key: PromotionKey,
        trigger: ProductRef<'a>,
        quantity: usize,
        free: ProductRef<'a>,
    ) -> Result<Self, PromotionError> {
        validate_quantity(quantity)?;

        let trigger_currency = trigger.price.currency();
        let free_currency = free.price.currency();

        if trigger_currency != free_currency {
            return Err(PromotionError::CurrencyMismatch(
                free.sku,
                trigger_currency.iso_alpha_code,
                free_currency.iso_alpha_code,
            ));
        }

        Ok(Self {
            key,
            trigger,
            quantity,
            free,
            magnitude: Decimal::from(free.price.to_minor_units()),
        })
    }

    /// Return the promotion key
    pub fn key(&self) -> PromotionKey {
        self.key
    }

    /// Return the product that triggers the promotion
    pub fn trigger(&self) -> &ProductRef<'a> {
        &self.trigger
    }

    /// Return the number of trigger units needed for one free unit
    pub fn quantity(&self) -> usize {
        self.quantity
    }

    /// Return the product given away
    pub fn free(&self) -> &ProductRef<'a> {
        &self.free
    }

    /// Value of the free unit, in minor units
    pub fn magnitude(&self) -> Decimal {
        self.magnitude
    }

    /// Count the unclaimed trigger units in the basket.
    pub fn matching_count(&self, basket: &Basket<'a>) -> usize {
        basket.count_unclaimed(|item| item.sku() == self.trigger.sku)
    }

    /// Whether the basket holds enough unclaimed trigger units.
    pub fn is_applicable(&self, basket: &Basket<'a>) -> bool {
        self.matching_count(basket) >= self.quantity
    }

    /// Consume `quantity` trigger units, then make one unit of the free product free.
    ///
    /// The first unclaimed unit of the free product in the basket is repriced to zero.
    /// When there is none, a zero priced unit is added to the basket. Trigger units are
    /// claimed first, so a self-referential promotion ("2F get one F free") never gives
    /// away one of its own triggers, and with exactly `quantity` units in the basket adds
    /// an extra free unit.
    ///
    /// Nothing is claimed if the free product is priced in another currency than the basket.
    pub fn apply(&self, basket: &mut Basket<'a>) -> bool {
        if !self.is_applicable(basket) || self.free.price.currency() != basket.currency() {
            return false;
        }

        let bundle_id = basket.next_bundle();
        let trigger_claim = Claim::new(self.key, bundle_id, ClaimRole::Trigger);
        let trigger_sku = self.trigger.sku;

        for item in basket
            .unclaimed_mut(|item| item.sku() == trigger_sku)
            .take(self.quantity)
        {
            let price = *item.price();
            item.claim_at(trigger_claim, price);
        }

        let free_claim = Claim::new(self.key, bundle_id, ClaimRole::Free);
        let zero = Money::from_minor(0, self.free.price.currency());
        let free_sku = self.free.sku;

        match basket.first_unclaimed(|item| item.sku() == free_sku) {
            Some(idx) => {
                if let Some(item) = basket.get_item_mut(idx) {
                    item.claim_at(free_claim, zero);
                }

                true
            }
            None => basket.push_claimed(self.free, free_claim, zero).is_ok(),
        }
    }
}
