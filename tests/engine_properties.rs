//! Property tests for the greedy promotion engine

use proptest::{prelude::*, test_runner::TestCaseError};
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};

use basket_pricing::{
    basket::Basket,
    checkout::{Checkout, supermarket},
    items::ClaimRole,
    promotions::{Promotion, PromotionKey},
    solvers::{
        Solver,
        greedy::{GreedySolver, order_by_magnitude},
    },
};

fn shop() -> Result<&'static Checkout<'static>, TestCaseError> {
    supermarket().ok_or_else(|| TestCaseError::fail("supermarket fixtures failed to load"))
}

fn basket(checkout: &Checkout<'static>, skus: &str) -> Result<Basket<'static>, TestCaseError> {
    checkout
        .basket(skus)
        .map_err(|err| TestCaseError::fail(err.to_string()))
}

fn promotion<'c>(
    checkout: &'c Checkout<'static>,
    key: PromotionKey,
) -> Result<&'c Promotion<'static>, TestCaseError> {
    checkout
        .promotions()
        .iter()
        .find(|promotion| promotion.key() == key)
        .ok_or_else(|| TestCaseError::fail("claim names an unknown promotion"))
}

fn minor(price: &Money<'_, Currency>) -> i64 {
    price.to_minor_units()
}

proptest! {
    #[test]
    fn solving_is_deterministic(skus in "[A-Z]{0,40}") {
        let checkout = shop()?;

        let mut first = basket(checkout, &skus)?;
        let mut second = basket(checkout, &skus)?;

        let first_result = GreedySolver::solve(checkout.promotions(), &mut first);
        let second_result = GreedySolver::solve(checkout.promotions(), &mut second);

        prop_assert!(first.iter().eq(second.iter()));
        prop_assert_eq!(first_result.firings, second_result.firings);
        prop_assert_eq!(checkout.total(&skus), checkout.total(&skus));
    }

    #[test]
    fn claims_are_never_reopened(skus in "[A-Z]{0,40}") {
        let checkout = shop()?;
        let mut basket = basket(checkout, &skus)?;

        for promotion in order_by_magnitude(checkout.promotions()) {
            while promotion.is_applicable(&basket) {
                let before = basket.clone();

                prop_assert!(promotion.apply(&mut basket));

                for (old, new) in before.iter().zip(basket.iter()) {
                    if old.is_discounted() {
                        prop_assert_eq!(old, new);
                    }
                }

                prop_assert!(basket.iter().filter(|item| item.is_discounted()).count()
                    > before.iter().filter(|item| item.is_discounted()).count());
            }
        }
    }

    #[test]
    fn bundles_conserve_their_price(skus in "[A-Z]{0,40}") {
        let checkout = shop()?;
        let mut basket = basket(checkout, &skus)?;

        GreedySolver::solve(checkout.promotions(), &mut basket);

        let mut bundles: FxHashMap<usize, (PromotionKey, i64, usize, usize)> = FxHashMap::default();

        for item in basket.iter() {
            let Some(claim) = item.claim() else {
                prop_assert_eq!(item.price(), item.original_price());
                continue;
            };

            let entry = bundles
                .entry(claim.bundle_id)
                .or_insert((claim.promotion_key, 0, 0, 0));

            prop_assert_eq!(entry.0, claim.promotion_key);

            match claim.role {
                ClaimRole::Discounted => entry.1 += minor(item.price()),
                ClaimRole::Trigger => {
                    prop_assert_eq!(item.price(), item.original_price());
                    entry.2 += 1;
                }
                ClaimRole::Free => {
                    prop_assert_eq!(minor(item.price()), 0);
                    entry.3 += 1;
                }
            }
        }

        for (key, discounted_sum, triggers, free) in bundles.into_values() {
            match promotion(checkout, key)? {
                Promotion::BulkPrice(bulk) => {
                    prop_assert_eq!(discounted_sum, minor(bulk.bundle_price()));
                }
                Promotion::Combo(combo) => {
                    prop_assert_eq!(discounted_sum, minor(combo.bundle_price()));
                }
                Promotion::FreeItem(free_item) => {
                    prop_assert_eq!(triggers, free_item.quantity());
                    prop_assert_eq!(free, 1);
                }
            }
        }
    }

    #[test]
    fn input_items_keep_their_order(skus in "[A-Z]{0,40}") {
        let checkout = shop()?;
        let mut basket = basket(checkout, &skus)?;

        GreedySolver::solve(checkout.promotions(), &mut basket);

        let priced: String = basket.iter().take(skus.len()).map(|item| item.sku().code()).collect();

        prop_assert_eq!(priced, skus.clone());

        // Anything past the input is a granted free unit.
        for item in basket.iter().skip(skus.len()) {
            prop_assert_eq!(item.claim().map(|claim| claim.role), Some(ClaimRole::Free));
        }
    }

    #[test]
    fn baskets_without_offers_are_untouched(skus in "[CDGIJLOW]{0,20}") {
        let checkout = shop()?;
        let mut basket = basket(checkout, &skus)?;
        let before = basket.clone();

        let result = GreedySolver::solve(checkout.promotions(), &mut basket);

        prop_assert!(result.firings.is_empty());
        prop_assert!(basket.iter().eq(before.iter()));

        for promotion in checkout.promotions() {
            prop_assert!(!promotion.apply(&mut basket));
        }

        prop_assert!(basket.iter().eq(before.iter()));
    }

    #[test]
    fn firings_are_bounded_by_matching_items(skus in "[A-Z]{0,40}") {
        let checkout = shop()?;
        let mut basket = basket(checkout, &skus)?;
        let mut solved = basket.clone();

        let result = GreedySolver::solve(checkout.promotions(), &mut solved);

        for promotion in order_by_magnitude(checkout.promotions()) {
            let matching = promotion.matching_count(&basket);
            let mut applications = 0;

            while promotion.is_applicable(&basket) && promotion.apply(&mut basket) {
                applications += 1;
            }

            prop_assert!(applications <= matching / promotion.trigger_quantity());
            prop_assert_eq!(applications, result.applications(promotion.key()));
        }

        prop_assert!(basket.iter().eq(solved.iter()));
    }

    #[test]
    fn promotions_never_raise_the_total(skus in "[A-Z]{0,40}") {
        let checkout = shop()?;
        let receipt = checkout
            .price(&skus)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        prop_assert!(minor(&receipt.total()) <= minor(&receipt.subtotal()));
        prop_assert!(checkout.total(&skus) >= 0);
    }
}
