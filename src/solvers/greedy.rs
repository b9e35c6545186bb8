//! Greedy Solver
//!
//! Promotions are tried once each, highest magnitude first, and every promotion is
//! applied for as long as it stays applicable before the next one is tried.

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
    basket::Basket,
    promotions::Promotion,
    solvers::{PromotionFiring, Solver, SolverResult},
};

/// Magnitude-ordered greedy solver
#[derive(Debug)]
pub struct GreedySolver;

/// Order promotions by descending magnitude.
///
/// The sort is stable, so promotions of equal magnitude keep their input order.
pub fn order_by_magnitude<'p, 'a>(
    promotions: &'p [Promotion<'a>],
) -> SmallVec<[&'p Promotion<'a>; 16]> {
    let mut ordered: SmallVec<[&'p Promotion<'a>; 16]> = promotions.iter().collect();

    ordered.sort_by(|a, b| b.magnitude().cmp(&a.magnitude()));

    ordered
}

impl Solver for GreedySolver {
    #[tracing::instrument(
        name = "greedy.solve",
        skip_all,
        fields(items = basket.len(), promotions = promotions.len())
    )]
    fn solve<'a>(promotions: &[Promotion<'a>], basket: &mut Basket<'a>) -> SolverResult {
        let mut result = SolverResult::default();

        for promotion in order_by_magnitude(promotions) {
            let key = promotion.key();
            let mut applications = 0usize;

            result.evaluation_order.push(key);

            // Every application claims at least one unclaimed matching item, so this loop
            // runs at most `matching items / trigger quantity` times.
            while promotion.is_applicable(basket) {
                if !promotion.apply(basket) {
                    break;
                }

                applications += 1;

                trace!(promotion = ?key, application = applications, "promotion applied");
            }

            if applications > 0 {
                debug!(
                    promotion = ?key,
                    magnitude = %promotion.magnitude(),
                    applications,
                    "promotion fired"
                );

                result.firings.push(PromotionFiring {
                    promotion_key: key,
                    magnitude: promotion.magnitude(),
                    applications,
                });
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::GBP};
    use slotmap::SlotMap;
    use testresult::TestResult;

    use crate::{
        promotions::{
            PromotionKey,
            types::{BulkPricePromotion, ComboPromotion, FreeItemPromotion},
        },
        test_support::{basket, catalog, resolve},
    };

    use super::*;

    #[test]
    fn order_by_magnitude_sorts_descending_and_keeps_ties_in_input_order() -> TestResult {
        let catalog = catalog(&[('A', 5000), ('P', 5000), ('V', 5000)])?;
        let mut keys = SlotMap::<PromotionKey, ()>::with_key();

        let v2 = keys.insert(());
        let a5 = keys.insert(());
        let p5 = keys.insert(());

        let promotions: Vec<Promotion<'_>> = vec![
            BulkPricePromotion::new(v2, resolve(&catalog, 'V')?, 2, Money::from_minor(9000, GBP))?
                .into(),
            BulkPricePromotion::new(a5, resolve(&catalog, 'A')?, 5, Money::from_minor(20000, GBP))?
                .into(),
            BulkPricePromotion::new(p5, resolve(&catalog, 'P')?, 5, Money::from_minor(20000, GBP))?
                .into(),
        ];

        let ordered: Vec<PromotionKey> = order_by_magnitude(&promotions)
            .iter()
            .map(|promotion| promotion.key())
            .collect();

        assert_eq!(ordered, vec![a5, p5, v2]);

        Ok(())
    }

    #[test]
    fn higher_magnitude_bulk_price_is_tried_first() -> TestResult {
        let catalog = catalog(&[('V', 5000)])?;
        let v = resolve(&catalog, 'V')?;
        let mut keys = SlotMap::<PromotionKey, ()>::with_key();

        let two_for_90 = keys.insert(());
        let three_for_130 = keys.insert(());

        let promotions: Vec<Promotion<'_>> = vec![
            BulkPricePromotion::new(two_for_90, v, 2, Money::from_minor(9000, GBP))?.into(),
            BulkPricePromotion::new(three_for_130, v, 3, Money::from_minor(13000, GBP))?.into(),
        ];

        let mut basket = basket(&catalog, "VVV")?;
        let result = GreedySolver::solve(&promotions, &mut basket);

        assert_eq!(basket.total()?, Money::from_minor(13000, GBP));
        assert_eq!(result.evaluation_order.as_slice(), &[three_for_130, two_for_90]);
        assert_eq!(result.applications(three_for_130), 1);
        assert_eq!(result.applications(two_for_90), 0);

        Ok(())
    }

    #[test]
    fn promotion_fires_repeatedly_while_applicable() -> TestResult {
        let catalog = catalog(&[('A', 5000)])?;
        let key = PromotionKey::default();

        let promotions: Vec<Promotion<'_>> = vec![
            BulkPricePromotion::new(key, resolve(&catalog, 'A')?, 3, Money::from_minor(13000, GBP))?
                .into(),
        ];

        let mut basket = basket(&catalog, "AAAAAAA")?;
        let result = GreedySolver::solve(&promotions, &mut basket);

        assert_eq!(result.applications(key), 2);
        assert_eq!(basket.total()?, Money::from_minor(13000 * 2 + 5000, GBP));
        assert_eq!(basket.iter().filter(|item| !item.is_discounted()).count(), 1);

        Ok(())
    }

    #[test]
    fn claimed_items_are_not_available_to_later_promotions() -> TestResult {
        let catalog = catalog(&[('E', 4000), ('B', 3000)])?;
        let mut keys = SlotMap::<PromotionKey, ()>::with_key();

        let two_b = keys.insert(());
        let e_gets_b = keys.insert(());

        let promotions: Vec<Promotion<'_>> = vec![
            BulkPricePromotion::new(
                two_b,
                resolve(&catalog, 'B')?,
                2,
                Money::from_minor(4500, GBP),
            )?
            .into(),
            FreeItemPromotion::new(e_gets_b, resolve(&catalog, 'E')?, 2, resolve(&catalog, 'B')?)?
                .into(),
        ];

        let mut basket = basket(&catalog, "EEBB")?;
        let result = GreedySolver::solve(&promotions, &mut basket);

        // E/B (30) outranks 2B for 45 (15): one B goes free and the other cannot form a pair.
        assert_eq!(result.applications(e_gets_b), 1);
        assert_eq!(result.applications(two_b), 0);
        assert_eq!(basket.total()?, Money::from_minor(8000 + 3000, GBP));

        Ok(())
    }

    #[test]
    fn combo_spans_skus_in_one_pass() -> TestResult {
        let catalog = catalog(&[('S', 2000), ('T', 2000), ('X', 1700), ('Y', 2000), ('Z', 2100)])?;

        let products = ['S', 'T', 'X', 'Y', 'Z']
            .into_iter()
            .map(|code| resolve(&catalog, code))
            .collect::<Result<Vec<_>, _>>()?;

        let promotions: Vec<Promotion<'_>> = vec![
            ComboPromotion::new(PromotionKey::default(), products, 3, Money::from_minor(4500, GBP))?
                .into(),
        ];

        let mut basket = basket(&catalog, "STXYZZ")?;
        GreedySolver::solve(&promotions, &mut basket);

        // Z, Z, S then T, Y, X: two bundles.
        assert_eq!(basket.total()?, Money::from_minor(9000, GBP));

        Ok(())
    }

    #[test]
    fn empty_inputs_leave_basket_untouched() -> TestResult {
        let catalog = catalog(&[('A', 5000)])?;
        let mut basket = basket(&catalog, "AA")?;

        let result = GreedySolver::solve(&[], &mut basket);

        assert!(result.firings.is_empty());
        assert_eq!(basket.total()?, Money::from_minor(10000, GBP));

        Ok(())
    }
}
