//! Shared helpers for unit tests.

use rusty_money::{Money, iso::GBP};
use testresult::TestResult;

use crate::{
    basket::Basket,
    catalog::Catalog,
    products::{Product, ProductRef, Sku},
};

/// A catalog product reference priced in GBP minor units.
pub(crate) fn product_ref(code: char, minor: i64) -> TestResult<ProductRef<'static>> {
    let mut catalog = Catalog::new(GBP);

    single_product(&mut catalog, code, minor)?;

    Ok(catalog.resolve(Sku::new(code)?)?)
}

/// Build a GBP catalog from `(sku, minor units)` pairs.
pub(crate) fn catalog(products: &[(char, i64)]) -> TestResult<Catalog<'static>> {
    let mut catalog = Catalog::new(GBP);

    for &(code, minor) in products {
        single_product(&mut catalog, code, minor)?;
    }

    Ok(catalog)
}

/// Build a basket by resolving each character of `skus` against `catalog`.
pub(crate) fn basket(catalog: &Catalog<'static>, skus: &str) -> TestResult<Basket<'static>> {
    let mut basket = Basket::new(catalog.currency());

    for code in skus.chars() {
        basket.add(catalog.resolve(Sku::new(code)?)?)?;
    }

    Ok(basket)
}

/// Resolve a single SKU against `catalog`.
pub(crate) fn resolve(catalog: &Catalog<'static>, code: char) -> TestResult<ProductRef<'static>> {
    Ok(catalog.resolve(Sku::new(code)?)?)
}

fn single_product(catalog: &mut Catalog<'static>, code: char, minor: i64) -> TestResult {
    catalog.insert(Product {
        sku: Sku::new(code)?,
        name: format!("Item {code}"),
        price: Money::from_minor(minor, GBP),
    })?;

    Ok(())
}
