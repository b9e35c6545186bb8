//! Promotions

use rust_decimal::Decimal;
use slotmap::new_key_type;
use smallvec::{SmallVec, smallvec};
use thiserror::Error;

use crate::{
    basket::Basket,
    catalog::{Catalog, CatalogError},
    pricing::SplitPriceError,
    products::{ProductRef, Sku},
    promotions::types::{BulkPricePromotion, ComboPromotion, FreeItemPromotion},
};

pub mod applications;
pub mod types;

new_key_type! {
    /// Promotion Key
    pub struct PromotionKey;
}

/// Promotion metadata
#[derive(Debug, Default, Clone)]
pub struct PromotionMeta {
    /// Promotion name
    pub name: String,
}

/// Errors raised while constructing a promotion.
#[derive(Debug, Error, PartialEq)]
pub enum PromotionError {
    /// A promotion can never be satisfied by zero items.
    #[error("trigger quantity must be at least 1")]
    ZeroQuantity,

    /// A bundle price below zero would add to the basket total.
    #[error("promotion price of {0} minor units is negative")]
    NegativePrice(i64),

    /// The promotion price and the product are priced in different currencies
    /// (sku, promotion currency, product currency).
    #[error("promotion price has currency {1}, but product {0} has currency {2}")]
    CurrencyMismatch(Sku, &'static str, &'static str),

    /// A combo must name at least one product.
    #[error("combo promotion has no products")]
    EmptyCombo,

    /// A combo names the same product more than once.
    #[error("product {0} appears more than once in combo")]
    DuplicateComboProduct(Sku),

    /// The bundle price could not be split across the trigger quantity.
    #[error(transparent)]
    Split(#[from] SplitPriceError),

    /// Savings per bundle are too large to compare with other promotions.
    #[error("promotion savings overflow for a quantity of {0}")]
    MagnitudeOverflow(usize),

    /// A promotion product is not in the catalog it is used with.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A promotion product was resolved from another catalog.
    #[error("product {0} does not match the catalog product with that SKU")]
    ForeignProduct(Sku),
}

/// Promotion enum
#[derive(Debug, Clone)]
pub enum Promotion<'a> {
    /// Fixed price for a quantity of one product
    BulkPrice(BulkPricePromotion<'a>),

    /// A quantity of one product earns a free unit of another
    FreeItem(FreeItemPromotion<'a>),

    /// Fixed price for any mix of a set of products
    Combo(ComboPromotion<'a>),
}

impl<'a> Promotion<'a> {
    /// Return the promotion key.
    pub fn key(&self) -> PromotionKey {
        match self {
            Promotion::BulkPrice(bulk) => bulk.key(),
            Promotion::FreeItem(free) => free.key(),
            Promotion::Combo(combo) => combo.key(),
        }
    }

    /// Number of unclaimed items needed for one application.
    pub fn trigger_quantity(&self) -> usize {
        match self {
            Promotion::BulkPrice(bulk) => bulk.quantity(),
            Promotion::FreeItem(free) => free.quantity(),
            Promotion::Combo(combo) => combo.quantity(),
        }
    }

    /// Savings per application in minor units, used to order promotions.
    pub fn magnitude(&self) -> Decimal {
        match self {
            Promotion::BulkPrice(bulk) => bulk.magnitude(),
            Promotion::FreeItem(free) => free.magnitude(),
            Promotion::Combo(combo) => combo.magnitude(),
        }
    }

    /// Count the unclaimed items that can trigger this promotion.
    pub fn matching_count(&self, basket: &Basket<'a>) -> usize {
        match self {
            Promotion::BulkPrice(bulk) => bulk.matching_count(basket),
            Promotion::FreeItem(free) => free.matching_count(basket),
            Promotion::Combo(combo) => combo.matching_count(basket),
        }
    }

    /// Return whether the basket holds enough unclaimed items to apply this promotion once.
    pub fn is_applicable(&self, basket: &Basket<'a>) -> bool {
        self.matching_count(basket) >= self.trigger_quantity()
    }

    /// Products the promotion refers to.
    pub fn products(&self) -> SmallVec<[ProductRef<'a>; 5]> {
        match self {
            Promotion::BulkPrice(bulk) => smallvec![*bulk.product()],
            Promotion::FreeItem(free) => smallvec![*free.trigger(), *free.free()],
            Promotion::Combo(combo) => combo.products().iter().copied().collect(),
        }
    }

    /// Check that every product of the promotion is the product `catalog` holds for its SKU.
    ///
    /// # Errors
    ///
    /// - [`PromotionError::Catalog`]: a product SKU is not in the catalog.
    /// - [`PromotionError::ForeignProduct`]: a product was resolved from another catalog, or
    ///   is priced differently.
    pub fn validate_against(&self, catalog: &Catalog<'a>) -> Result<(), PromotionError> {
        for product in self.products() {
            if catalog.resolve(product.sku)? != product {
                return Err(PromotionError::ForeignProduct(product.sku));
            }
        }

        Ok(())
    }

    /// Apply one round of the promotion, returning whether it fired.
    ///
    /// Does nothing when the promotion is not applicable.
    pub fn apply(&self, basket: &mut Basket<'a>) -> bool {
        match self {
            Promotion::BulkPrice(bulk) => bulk.apply(basket),
            Promotion::FreeItem(free) => free.apply(basket),
            Promotion::Combo(combo) => combo.apply(basket),
        }
    }
}

impl<'a> From<BulkPricePromotion<'a>> for Promotion<'a> {
    fn from(promotion: BulkPricePromotion<'a>) -> Self {
        Promotion::BulkPrice(promotion)
    }
}

impl<'a> From<FreeItemPromotion<'a>> for Promotion<'a> {
    fn from(promotion: FreeItemPromotion<'a>) -> Self {
        Promotion::FreeItem(promotion)
    }
}

impl<'a> From<ComboPromotion<'a>> for Promotion<'a> {
    fn from(promotion: ComboPromotion<'a>) -> Self {
        Promotion::Combo(promotion)
    }
}
