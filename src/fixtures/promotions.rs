//! Promotion Fixtures

use rusty_money::Money;
use serde::Deserialize;

use crate::{
    catalog::Catalog,
    fixtures::{FixtureError, products::parse_price},
    products::{ProductRef, Sku},
    promotions::{
        Promotion, PromotionKey, PromotionMeta,
        types::{BulkPricePromotion, ComboPromotion, FreeItemPromotion},
    },
};

/// Wrapper for promotions in YAML
#[derive(Debug, Deserialize)]
pub struct PromotionsFixture {
    /// Promotions in declaration order
    pub promotions: Vec<PromotionFixture>,
}

/// Promotion fixture from YAML
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromotionFixture {
    /// Bulk price promotion
    BulkPrice {
        /// Promotion name
        name: String,

        /// Product SKU
        sku: String,

        /// Units per bundle
        quantity: usize,

        /// Bundle price (e.g., "1.30 GBP")
        price: String,
    },

    /// Free item promotion
    FreeItem {
        /// Promotion name
        name: String,

        /// Trigger product SKU
        trigger: String,

        /// Trigger units required
        quantity: usize,

        /// Free product SKU
        free: String,
    },

    /// Combo promotion
    Combo {
        /// Promotion name
        name: String,

        /// Product SKUs that take part in the combo
        skus: Vec<String>,

        /// Units per bundle
        quantity: usize,

        /// Bundle price (e.g., "0.45 GBP")
        price: String,
    },
}

impl PromotionFixture {
    /// Promotion name
    pub fn name(&self) -> &str {
        match self {
            PromotionFixture::BulkPrice { name, .. }
            | PromotionFixture::FreeItem { name, .. }
            | PromotionFixture::Combo { name, .. } => name,
        }
    }

    /// Convert to `PromotionMeta` and `Promotion`, resolving SKUs against `catalog`.
    ///
    /// # Errors
    ///
    /// Returns an error if a SKU is malformed or missing from the catalog, a price cannot
    /// be parsed, or the promotion itself is invalid.
    pub fn try_into_promotion<'a>(
        self,
        key: PromotionKey,
        catalog: &Catalog<'a>,
    ) -> Result<(PromotionMeta, Promotion<'a>), FixtureError> {
        match self {
            PromotionFixture::BulkPrice {
                name,
                sku,
                quantity,
                price,
            } => {
                let product = resolve(catalog, &sku)?;
                let bundle_price = money(&price)?;
                let promotion = BulkPricePromotion::new(key, product, quantity, bundle_price)?;

                Ok((PromotionMeta { name }, promotion.into()))
            }
            PromotionFixture::FreeItem {
                name,
                trigger,
                quantity,
                free,
            } => {
                let trigger = resolve(catalog, &trigger)?;
                let free = resolve(catalog, &free)?;
                let promotion = FreeItemPromotion::new(key, trigger, quantity, free)?;

                Ok((PromotionMeta { name }, promotion.into()))
            }
            PromotionFixture::Combo {
                name,
                skus,
                quantity,
                price,
            } => {
                let products = skus
                    .iter()
                    .map(|sku| resolve(catalog, sku))
                    .collect::<Result<Vec<_>, _>>()?;

                let bundle_price = money(&price)?;
                let promotion = ComboPromotion::new(key, products, quantity, bundle_price)?;

                Ok((PromotionMeta { name }, promotion.into()))
            }
        }
    }
}

fn resolve<'a>(catalog: &Catalog<'a>, sku: &str) -> Result<ProductRef<'a>, FixtureError> {
    Ok(catalog.resolve(sku.parse::<Sku>()?)?)
}

fn money<'a>(price: &str) -> Result<Money<'a, rusty_money::iso::Currency>, FixtureError> {
    let (minor_units, currency) = parse_price(price)?;

    Ok(Money::from_minor(minor_units, currency))
}
