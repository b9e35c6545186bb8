//! Catalog

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use slotmap::SlotMap;
use thiserror::Error;

use crate::products::{Product, ProductKey, ProductRef, Sku};

/// Errors related to catalog construction or lookups.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// A product was defined twice for the same SKU.
    #[error("Product {0} is already in the catalog")]
    DuplicateSku(Sku),

    /// A product's currency differs from the catalog currency
    /// (sku, product currency, catalog currency).
    #[error("Product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(Sku, &'static str, &'static str),

    /// No product is defined for the SKU.
    #[error("Unknown SKU {0}")]
    UnknownSku(Sku),
}

/// Static product catalog, priced in a single currency.
#[derive(Debug)]
pub struct Catalog<'a> {
    products: SlotMap<ProductKey, Product<'a>>,
    skus: FxHashMap<Sku, ProductKey>,
    currency: &'static Currency,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            products: SlotMap::with_key(),
            skus: FxHashMap::default(),
            currency,
        }
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::DuplicateSku`]: a product with the same SKU already exists.
    /// - [`CatalogError::CurrencyMismatch`]: the product is priced in another currency.
    pub fn insert(&mut self, product: Product<'a>) -> Result<ProductKey, CatalogError> {
        if self.skus.contains_key(&product.sku) {
            return Err(CatalogError::DuplicateSku(product.sku));
        }

        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(CatalogError::CurrencyMismatch(
                product.sku,
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        let sku = product.sku;
        let key = self.products.insert(product);

        self.skus.insert(sku, key);

        Ok(key)
    }

    /// Resolve a SKU to a product reference.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownSku`] if no product has this SKU.
    pub fn resolve(&self, sku: Sku) -> Result<ProductRef<'a>, CatalogError> {
        self.skus
            .get(&sku)
            .and_then(|&key| {
                self.products.get(key).map(|product| ProductRef {
                    key,
                    sku: product.sku,
                    price: product.price,
                })
            })
            .ok_or(CatalogError::UnknownSku(sku))
    }

    /// Get a product by its key.
    pub fn get(&self, key: ProductKey) -> Option<&Product<'a>> {
        self.products.get(key)
    }

    /// Whether the catalog defines a product for the SKU.
    pub fn contains(&self, sku: Sku) -> bool {
        self.skus.contains_key(&sku)
    }

    /// Iterate over the products in the catalog.
    pub fn iter(&self) -> impl Iterator<Item = (ProductKey, &Product<'a>)> {
        self.products.iter()
    }

    /// Get the number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Get the currency of the catalog.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
