//! Fixtures

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    fixtures::{products::ProductsFixture, promotions::PromotionsFixture},
    products::{Product, Sku, SkuError},
    promotions::{Promotion, PromotionError, PromotionKey, PromotionMeta},
};

pub mod products;
pub mod promotions;

const SUPERMARKET_PRODUCTS_YAML: &str = include_str!("../../fixtures/products/supermarket.yml");
const SUPERMARKET_PROMOTIONS_YAML: &str =
    include_str!("../../fixtures/promotions/supermarket.yml");

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Malformed SKU
    #[error(transparent)]
    InvalidSku(#[from] SkuError),

    /// Catalog rejected a product or could not resolve a SKU
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Promotion not found
    #[error("Promotion not found: {0}")]
    PromotionNotFound(String),

    /// Invalid promotion data
    #[error("Invalid promotion data: {0}")]
    InvalidPromotionData(String),

    /// Promotion rejected its configuration
    #[error(transparent)]
    Promotion(#[from] PromotionError),

    /// No products loaded yet
    #[error("No products loaded yet; catalog unknown")]
    NoCatalog,
}

/// Catalog, promotions and promotion metadata of a loaded fixture
pub type FixtureParts<'a> = (
    Catalog<'a>,
    Vec<Promotion<'a>>,
    SlotMap<PromotionKey, PromotionMeta>,
);

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Catalog built from the loaded products
    catalog: Option<Catalog<'a>>,

    /// Promotion metadata with generated keys
    promotion_meta: SlotMap<PromotionKey, PromotionMeta>,

    /// Promotion name -> `SlotMap` key
    promotion_keys: FxHashMap<String, PromotionKey>,

    /// Pre-built promotions, in declaration order
    promotions: Vec<Promotion<'a>>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: None,
            promotion_meta: SlotMap::with_key(),
            promotion_keys: FxHashMap::default(),
            promotions: Vec::new(),
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the catalog rejects a product.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        self.load_products_yaml(&contents)
    }

    /// Load products from YAML source
    ///
    /// Products are added to the catalog in SKU order. The first product fixes the
    /// catalog currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed, a SKU or price is malformed, or the
    /// catalog rejects a product.
    pub fn load_products_yaml(&mut self, yaml: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ProductsFixture = serde_norway::from_str(yaml)?;

        let mut products = fixture
            .products
            .into_iter()
            .map(|(sku, product_fixture)| product_fixture.into_product(sku.parse::<Sku>()?))
            .collect::<Result<Vec<Product<'static>>, FixtureError>>()?;

        products.sort_by_key(|product| product.sku);

        for product in products {
            let catalog = self
                .catalog
                .get_or_insert_with(|| Catalog::new(product.price.currency()));

            catalog.insert(product)?;
        }

        Ok(self)
    }

    /// Load promotions from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a promotion is invalid.
    pub fn load_promotions(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self
            .base_path
            .join("promotions")
            .join(format!("{name}.yml"));

        let contents = fs::read_to_string(&file_path)?;

        self.load_promotions_yaml(&contents)
    }

    /// Load promotions from YAML source, resolving their SKUs against the loaded catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if no products are loaded, the YAML cannot be parsed, a promotion
    /// name repeats, or a promotion is invalid.
    pub fn load_promotions_yaml(&mut self, yaml: &str) -> Result<&mut Self, FixtureError> {
        let catalog = self.catalog.as_ref().ok_or(FixtureError::NoCatalog)?;
        let fixture: PromotionsFixture = serde_norway::from_str(yaml)?;

        for promotion_fixture in fixture.promotions {
            let name = promotion_fixture.name().to_string();

            if self.promotion_keys.contains_key(&name) {
                return Err(FixtureError::InvalidPromotionData(format!(
                    "duplicate promotion name: {name}"
                )));
            }

            let promotion_key = self.promotion_meta.insert(PromotionMeta::default());

            let (meta, promotion) = promotion_fixture
                .try_into_promotion(promotion_key, catalog)
                .inspect_err(|_err| {
                    self.promotion_meta.remove(promotion_key);
                })?;

            if let Some(meta_slot) = self.promotion_meta.get_mut(promotion_key) {
                *meta_slot = meta;
            }

            self.promotions.push(promotion);
            self.promotion_keys.insert(name, promotion_key);
        }

        Ok(self)
    }

    /// Load the products and promotions files sharing `name`
    ///
    /// # Errors
    ///
    /// Returns an error if either fixture file cannot be loaded.
    pub fn load_set(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        self.load_products(name)?.load_promotions(name)
    }

    /// Load a complete fixture set (products and promotions with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_set(name)?;

        Ok(fixture)
    }

    /// Build a fixture from products and promotions YAML sources
    ///
    /// # Errors
    ///
    /// Returns an error if either source cannot be loaded.
    pub fn from_yaml(products_yaml: &str, promotions_yaml: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture
            .load_products_yaml(products_yaml)?
            .load_promotions_yaml(promotions_yaml)?;

        Ok(fixture)
    }

    /// The built-in `supermarket` set, A to Z with its standard offers.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded fixtures fail to load.
    pub fn supermarket() -> Result<Self, FixtureError> {
        Self::from_yaml(SUPERMARKET_PRODUCTS_YAML, SUPERMARKET_PROMOTIONS_YAML)
    }

    /// Get the catalog
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn catalog(&self) -> Result<&Catalog<'a>, FixtureError> {
        self.catalog.as_ref().ok_or(FixtureError::NoCatalog)
    }

    /// Get a product by its SKU
    ///
    /// # Errors
    ///
    /// Returns an error if the SKU is malformed, or no product has this SKU.
    pub fn product(&self, sku: &str) -> Result<&Product<'a>, FixtureError> {
        let catalog = self.catalog()?;
        let product = catalog.resolve(sku.parse::<Sku>()?)?;

        catalog
            .get(product.key)
            .ok_or(FixtureError::Catalog(CatalogError::UnknownSku(product.sku)))
    }

    /// Get a promotion key by the promotion name
    ///
    /// # Errors
    ///
    /// Returns an error if the promotion is not found.
    pub fn promotion_key(&self, name: &str) -> Result<PromotionKey, FixtureError> {
        self.promotion_keys
            .get(name)
            .copied()
            .ok_or_else(|| FixtureError::PromotionNotFound(name.to_string()))
    }

    /// Get a promotion by its name
    ///
    /// # Errors
    ///
    /// Returns an error if the promotion is not found.
    pub fn promotion(&self, name: &str) -> Result<&Promotion<'a>, FixtureError> {
        let promotion_key = self.promotion_key(name)?;

        self.promotions
            .iter()
            .find(|p| p.key() == promotion_key)
            .ok_or_else(|| FixtureError::PromotionNotFound(name.to_string()))
    }

    /// Get all promotions, in declaration order
    pub fn promotions(&self) -> &[Promotion<'a>] {
        &self.promotions
    }

    /// Get the promotion metadata `SlotMap`
    pub fn promotion_meta_map(&self) -> &SlotMap<PromotionKey, PromotionMeta> {
        &self.promotion_meta
    }

    /// Split the fixture into its catalog, promotions and promotion metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded.
    pub fn into_parts(self) -> Result<FixtureParts<'a>, FixtureError> {
        let catalog = self.catalog.ok_or(FixtureError::NoCatalog)?;

        Ok((catalog, self.promotions, self.promotion_meta))
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}
