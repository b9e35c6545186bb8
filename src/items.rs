//! Items

use rusty_money::{Money, iso::Currency};

use crate::{
    products::{ProductKey, ProductRef, Sku},
    promotions::PromotionKey,
};

/// How a claimed item took part in its promotion.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClaimRole {
    /// Repriced as part of a bundle.
    Discounted,

    /// Consumed to trigger a free item; keeps its price.
    Trigger,

    /// Given away at zero price.
    Free,
}

/// Record of the promotion application that claimed an item.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Claim {
    /// Key of the promotion that claimed the item
    pub promotion_key: PromotionKey,

    /// ID shared by all items claimed in the same application
    pub bundle_id: usize,

    /// Role of the item in the application
    pub role: ClaimRole,
}

impl Claim {
    /// Create a new claim.
    pub fn new(promotion_key: PromotionKey, bundle_id: usize, role: ClaimRole) -> Self {
        Self {
            promotion_key,
            bundle_id,
            role,
        }
    }
}

/// One physical unit of a product in a basket.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Item<'a> {
    product: ProductKey,
    sku: Sku,
    original_price: Money<'a, Currency>,
    price: Money<'a, Currency>,
    claim: Option<Claim>,
}

impl<'a> Item<'a> {
    /// Creates a new, unclaimed item at the product's unit price.
    #[must_use]
    pub fn new(product: ProductRef<'a>) -> Self {
        Self {
            product: product.key,
            sku: product.sku,
            original_price: product.price,
            price: product.price,
            claim: None,
        }
    }

    /// Returns the product of the item
    pub fn product(&self) -> ProductKey {
        self.product
    }

    /// Returns the SKU of the item
    pub fn sku(&self) -> Sku {
        self.sku
    }

    /// Returns the catalog price of the item
    pub fn original_price(&self) -> &Money<'a, Currency> {
        &self.original_price
    }

    /// Returns the current price of the item
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Returns the claim on this item, if a promotion has claimed it.
    pub fn claim(&self) -> Option<&Claim> {
        self.claim.as_ref()
    }

    /// Whether a promotion has claimed this item.
    pub fn is_discounted(&self) -> bool {
        self.claim.is_some()
    }

    /// Claim the item for a promotion at the given price.
    ///
    /// Returns `false`, leaving the item untouched, if it was already claimed.
    pub fn claim_at(&mut self, claim: Claim, price: Money<'a, Currency>) -> bool {
        if self.claim.is_some() {
            return false;
        }

        self.claim = Some(claim);
        self.price = price;

        true
    }
}
