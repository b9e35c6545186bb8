//! Combo
//!
//! A fixed price for any mix of a set of products, e.g. "any 3 of (S,T,X,Y,Z) for 45".

use std::cmp::Reverse;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::{
    basket::Basket,
    items::{Claim, ClaimRole},
    pricing::{EvenSplit, split_evenly},
    products::{ProductRef, Sku},
    promotions::{
        PromotionError, PromotionKey,
        types::{validate_price, validate_quantity},
    },
};

/// Combo Promotion
#[derive(Debug, Clone)]
pub struct ComboPromotion<'a> {
    key: PromotionKey,
    products: SmallVec<[ProductRef<'a>; 5]>,
    quantity: usize,
    bundle_price: Money<'a, Currency>,
    split: EvenSplit<'a>,
    magnitude: Decimal,
}

impl<'a> ComboPromotion<'a> {
    /// Create a new combo promotion.
    ///
    /// # Errors
    ///
    /// Returns a [`PromotionError`] if the product set is empty or repeats a product, the
    /// quantity is zero or too large to price, or the bundle price is negative or in another
    /// currency.
    pub fn new(
        key: PromotionKey,
        products: impl IntoIterator<Item = ProductRef<'a>>,
        quantity: usize,
        bundle_price: Money<'a, Currency>,
    ) -> Result<Self, PromotionError> {
        validate_quantity(quantity)?;

        let mut set: SmallVec<[ProductRef<'a>; 5]> = SmallVec::new();

        for product in products {
            if set.iter().any(|existing| existing.sku == product.sku) {
                return Err(PromotionError::DuplicateComboProduct(product.sku));
            }

            validate_price(&bundle_price, &product)?;

            set.push(product);
        }

        if set.is_empty() {
            return Err(PromotionError::EmptyCombo);
        }

        let split = split_evenly(bundle_price, quantity)?;
        let magnitude = Self::average_savings(&set, quantity, &bundle_price)
            .ok_or(PromotionError::MagnitudeOverflow(quantity))?;

        Ok(Self {
            key,
            products: set,
            quantity,
            bundle_price,
            split,
            magnitude,
        })
    }

    /// `(average set price - bundle price / quantity) * quantity`, or `None` on overflow.
    fn average_savings(
        set: &[ProductRef<'a>],
        quantity: usize,
        bundle_price: &Money<'a, Currency>,
    ) -> Option<Decimal> {
        let price_sum = set.iter().try_fold(Decimal::ZERO, |sum, product| {
            sum.checked_add(Decimal::from(product.price.to_minor_units()))
        })?;

        let average_price = price_sum.checked_div(Decimal::from(set.len()))?;
        let quantity = Decimal::from(quantity);
        let bundle_unit_price =
            Decimal::from(bundle_price.to_minor_units()).checked_div(quantity)?;

        average_price
            .checked_sub(bundle_unit_price)?
            .checked_mul(quantity)
    }

    /// Return the promotion key
    pub fn key(&self) -> PromotionKey {
        self.key
    }

    /// Return the products that take part in the combo
    pub fn products(&self) -> &[ProductRef<'a>] {
        &self.products
    }

    /// Return the number of units in one bundle
    pub fn quantity(&self) -> usize {
        self.quantity
    }

    /// Return the price of one bundle
    pub fn bundle_price(&self) -> &Money<'a, Currency> {
        &self.bundle_price
    }

    /// Average savings per bundle over the combo products, in minor units
    pub fn magnitude(&self) -> Decimal {
        self.magnitude
    }

    fn contains(&self, sku: Sku) -> bool {
        self.products.iter().any(|product| product.sku == sku)
    }

    /// Count the unclaimed units of any combo product in the basket.
    pub fn matching_count(&self, basket: &Basket<'a>) -> usize {
        basket.count_unclaimed(|item| self.contains(item.sku()))
    }

    /// Whether the basket holds a full bundle of unclaimed combo units.
    pub fn is_applicable(&self, basket: &Basket<'a>) -> bool {
        self.matching_count(basket) >= self.quantity
    }

    /// Claim the `quantity` most expensive unclaimed combo units at the split bundle price.
    ///
    /// Units of equal price are taken in basket order.
    pub fn apply(&self, basket: &mut Basket<'a>) -> bool {
        if !self.is_applicable(basket) {
            return false;
        }

        let mut eligible: SmallVec<[(usize, i64); 16]> = basket
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_discounted() && self.contains(item.sku()))
            .map(|(idx, item)| (idx, item.original_price().to_minor_units()))
            .collect();

        eligible.sort_by_key(|&(_, minor)| Reverse(minor));

        let claim = Claim::new(self.key, basket.next_bundle(), ClaimRole::Discounted);

        for (&(idx, _), price) in eligible.iter().zip(self.split.parts(self.quantity)) {
            if let Some(item) = basket.get_item_mut(idx) {
                item.claim_at(claim, price);
            }
        }

        true
    }
}
