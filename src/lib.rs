//! Basket Pricing
//!
//! Prices a basket of SKU-identified items against bulk-price, free-item and combo
//! promotions. Promotions are tried in descending order of the value they remove,
//! each firing as often as it can, and every item is claimed by at most one promotion.

pub mod basket;
pub mod catalog;
pub mod checkout;
pub mod fixtures;
pub mod items;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod receipt;
pub mod solvers;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;
