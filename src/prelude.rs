//! Basket Pricing prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{Basket, BasketError},
    catalog::{Catalog, CatalogError},
    checkout::{Checkout, CheckoutError, INVALID_INPUT, checkout},
    fixtures::{Fixture, FixtureError},
    items::{Claim, ClaimRole, Item},
    pricing::{EvenSplit, SplitPriceError, TotalPriceError, round_to_major_units, split_evenly},
    products::{Product, ProductKey, ProductRef, Sku, SkuError},
    promotions::{
        Promotion, PromotionError, PromotionKey, PromotionMeta,
        applications::PromotionApplication,
        types::{BulkPricePromotion, ComboPromotion, FreeItemPromotion},
    },
    receipt::{Receipt, ReceiptError},
    solvers::{PromotionFiring, Solver, SolverResult, greedy::GreedySolver},
};
