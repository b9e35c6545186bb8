//! Checkout
//!
//! Prices SKU strings against a catalog and a promotion list.

use std::sync::OnceLock;

use slotmap::SlotMap;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::{
    basket::{Basket, BasketError},
    catalog::Catalog,
    fixtures::{Fixture, FixtureError},
    pricing::round_to_major_units,
    products::Sku,
    promotions::{Promotion, PromotionError, PromotionKey, PromotionMeta},
    receipt::{Receipt, ReceiptError},
    solvers::{Solver, SolverResult, greedy::GreedySolver},
};

/// Total returned for input that contains an unknown SKU.
pub const INVALID_INPUT: i64 = -1;

static SUPERMARKET: OnceLock<Option<Checkout<'static>>> = OnceLock::new();

/// Errors that can occur while pricing a SKU string.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A character of the input is not a SKU in the catalog.
    #[error("Unknown SKU {sku:?} at position {position}")]
    UnknownSku {
        /// Character offset in the input
        position: usize,

        /// Offending character
        sku: char,
    },

    /// Basket rejected an item.
    #[error(transparent)]
    Basket(#[from] BasketError),

    /// Receipt could not be built.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),
}

/// Catalog and promotions used to price baskets.
#[derive(Debug)]
pub struct Checkout<'a> {
    catalog: Catalog<'a>,
    promotions: Vec<Promotion<'a>>,
    promotion_meta: SlotMap<PromotionKey, PromotionMeta>,
}

impl<'a> Checkout<'a> {
    /// Create a checkout.
    ///
    /// Promotions of equal magnitude are tried in the order given here.
    ///
    /// # Errors
    ///
    /// Returns a [`PromotionError`] if a promotion refers to a product that is not the
    /// catalog's product for that SKU.
    pub fn new(
        catalog: Catalog<'a>,
        promotions: Vec<Promotion<'a>>,
        promotion_meta: SlotMap<PromotionKey, PromotionMeta>,
    ) -> Result<Self, PromotionError> {
        promotions
            .iter()
            .try_for_each(|promotion| promotion.validate_against(&catalog))?;

        Ok(Self {
            catalog,
            promotions,
            promotion_meta,
        })
    }

    /// Build a checkout from a loaded fixture.
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture has no products, or a promotion does not match the
    /// fixture catalog.
    pub fn from_fixture(fixture: Fixture<'a>) -> Result<Self, FixtureError> {
        let (catalog, promotions, promotion_meta) = fixture.into_parts()?;

        Ok(Self::new(catalog, promotions, promotion_meta)?)
    }

    /// Build an unpriced basket with one item per character of `skus`.
    ///
    /// The whole input is rejected if any character is not a known SKU.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::UnknownSku`] for the first unknown character.
    pub fn basket(&self, skus: &str) -> Result<Basket<'a>, CheckoutError> {
        let mut basket = Basket::new(self.catalog.currency());

        for (position, code) in skus.chars().enumerate() {
            let product = Sku::new(code)
                .ok()
                .and_then(|sku| self.catalog.resolve(sku).ok())
                .ok_or_else(|| {
                    debug!(position, sku = ?code, "unknown SKU");

                    CheckoutError::UnknownSku {
                        position,
                        sku: code,
                    }
                })?;

            basket.add(product)?;
        }

        Ok(basket)
    }

    /// Apply the promotions to `basket`.
    pub fn solve(&self, basket: &mut Basket<'a>) -> SolverResult {
        GreedySolver::solve(&self.promotions, basket)
    }

    /// Price `skus` and return the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the input contains an unknown SKU, or the totals overflow.
    #[tracing::instrument(name = "checkout.price", skip(self), fields(items = skus.len()))]
    pub fn price(&self, skus: &str) -> Result<Receipt<'a>, CheckoutError> {
        let mut basket = self.basket(skus)?;

        self.solve(&mut basket);

        Ok(Receipt::from_basket(&basket)?)
    }

    /// Total for `skus` in whole major units, or [`INVALID_INPUT`].
    pub fn total(&self, skus: &str) -> i64 {
        let receipt = match self.price(skus) {
            Ok(receipt) => receipt,
            Err(CheckoutError::UnknownSku { .. }) => return INVALID_INPUT,
            Err(err) => {
                warn!(error = %err, "checkout failed");

                return INVALID_INPUT;
            }
        };

        round_to_major_units(&receipt.total()).unwrap_or_else(|| {
            warn!(total = %receipt.total(), "total does not fit in major units");

            INVALID_INPUT
        })
    }

    /// Catalog used to resolve SKUs
    pub fn catalog(&self) -> &Catalog<'a> {
        &self.catalog
    }

    /// Promotions, in input order
    pub fn promotions(&self) -> &[Promotion<'a>] {
        &self.promotions
    }

    /// Promotion metadata
    pub fn promotion_meta(&self) -> &SlotMap<PromotionKey, PromotionMeta> {
        &self.promotion_meta
    }
}

/// The checkout for the built-in `supermarket` set, built on first use.
pub fn supermarket() -> Option<&'static Checkout<'static>> {
    SUPERMARKET
        .get_or_init(|| match Fixture::supermarket().and_then(Checkout::from_fixture) {
            Ok(checkout) => Some(checkout),
            Err(err) => {
                error!(error = %err, "failed to load the supermarket fixtures");

                None
            }
        })
        .as_ref()
}

/// Price `skus` against the `supermarket` set.
///
/// Returns the total in whole pounds, or [`INVALID_INPUT`] if any character is not a
/// known SKU.
pub fn checkout(skus: &str) -> i64 {
    supermarket().map_or(INVALID_INPUT, |checkout| checkout.total(skus))
}
