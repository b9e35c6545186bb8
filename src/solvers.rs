//! Solvers for Promotions

use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::{
    basket::Basket,
    promotions::{Promotion, PromotionKey},
};

pub mod greedy;

/// How often a promotion fired during a solve.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PromotionFiring {
    /// Key of the promotion
    pub promotion_key: PromotionKey,

    /// Savings per application used to order the promotion, in minor units
    pub magnitude: Decimal,

    /// Number of times the promotion was applied
    pub applications: usize,
}

/// Result of solving promotions for a basket
#[derive(Debug, Clone, Default)]
pub struct SolverResult {
    /// Keys of the promotions in the order they were tried
    pub evaluation_order: SmallVec<[PromotionKey; 16]>,

    /// Promotions that fired, in the order they fired
    pub firings: SmallVec<[PromotionFiring; 16]>,
}

impl SolverResult {
    /// Number of times the promotion with `key` was applied.
    pub fn applications(&self, key: PromotionKey) -> usize {
        self.firings
            .iter()
            .find(|firing| firing.promotion_key == key)
            .map_or(0, |firing| firing.applications)
    }
}

/// Trait for solving promotion problems on a basket
pub trait Solver {
    /// Apply the promotions to the basket's items, claiming and repricing them in place.
    fn solve<'a>(promotions: &[Promotion<'a>], basket: &mut Basket<'a>) -> SolverResult;
}
