//! Receipt

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{Money, MoneyError, iso::Currency};
use slotmap::SlotMap;
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    basket::Basket,
    catalog::Catalog,
    items::ClaimRole,
    pricing::TotalPriceError,
    products::ProductKey,
    promotions::{PromotionKey, PromotionMeta, applications::PromotionApplication},
};

/// Errors that can occur when building a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating total price from basket items.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Error finding a product in the product catalog.
    #[error("Missing product")]
    MissingProduct(ProductKey),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Final receipt for a processed basket.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    /// Indexes of items in the basket that were purchased at full price, not in any promotion
    full_price_items: SmallVec<[usize; 10]>,

    /// Promotion application details keyed by basket item index.
    promotion_applications: FxHashMap<usize, PromotionApplication<'a>>,

    /// Total cost before any promotion applications
    subtotal: Money<'a, Currency>,

    /// Total amount paid for all items after any promotion applications
    total: Money<'a, Currency>,

    /// Currency used for all monetary values
    currency: &'static Currency,
}

impl<'a> Receipt<'a> {
    /// Build a receipt from a basket whose promotions have been solved.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the basket subtotal or total cannot be calculated.
    pub fn from_basket(basket: &Basket<'a>) -> Result<Self, ReceiptError> {
        let mut full_price_items = SmallVec::new();
        let mut promotion_applications = FxHashMap::default();

        for (item_idx, item) in basket.iter().enumerate() {
            match PromotionApplication::from_item(item_idx, item) {
                Some(app) => {
                    promotion_applications.insert(item_idx, app);
                }
                None => full_price_items.push(item_idx),
            }
        }

        Ok(Receipt {
            full_price_items,
            promotion_applications,
            subtotal: basket.subtotal()?,
            total: basket.total()?,
            currency: basket.currency(),
        })
    }

    /// Total cost before any promotion applications
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Total amount paid for all items
    #[must_use]
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Calculate the savings made by applying promotions.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.subtotal.sub(self.total)
    }

    /// Calculates the savings made by applying the promotions as a percentage
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let savings = self.savings()?;

        // Percent savings is relative to the original (pre-discount) subtotal.
        let savings_minor = savings.to_minor_units();
        let subtotal_minor = self.subtotal.to_minor_units();

        if subtotal_minor == 0 {
            return Ok(Percentage::from(0.0));
        }

        let savings_dec = Decimal::from_i64(savings_minor).unwrap_or(Decimal::ZERO);
        let subtotal_dec = Decimal::from_i64(subtotal_minor).unwrap_or(Decimal::ZERO);

        Ok(Percentage::from(savings_dec / subtotal_dec))
    }

    /// Indexes of items purchased at full price (not in any promotion).
    #[must_use]
    pub fn full_price_items(&self) -> &[usize] {
        &self.full_price_items
    }

    /// Promotion application details keyed by basket item index.
    #[must_use]
    pub fn promotion_applications(&self) -> &FxHashMap<usize, PromotionApplication<'a>> {
        &self.promotion_applications
    }

    /// Lookup the promotion application for a given basket item index.
    pub fn promotion_application_for_item(
        &self,
        item_idx: usize,
    ) -> Option<&PromotionApplication<'a>> {
        self.promotion_applications.get(&item_idx)
    }

    /// Currency used for all monetary values.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Writes the receipt as a table followed by a summary.
    ///
    /// # Errors
    ///
    /// Returns an error if an item's product is missing from the catalog, or the receipt
    /// cannot be written.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        basket: &Basket<'_>,
        catalog: &Catalog<'_>,
        promotion_meta: &SlotMap<PromotionKey, PromotionMeta>,
    ) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record([
            "",
            "SKU",
            "Item",
            "Base Price",
            "Final Price",
            "Savings",
            "Promotion",
        ]);

        for (item_idx, item) in basket.iter().enumerate() {
            let product = catalog
                .get(item.product())
                .ok_or(ReceiptError::MissingProduct(item.product()))?;

            let (final_price, savings, promotion) =
                match self.promotion_application_for_item(item_idx) {
                    Some(app) => application_cells(app, promotion_meta)?,
                    None => (String::new(), String::new(), String::new()),
                };

            builder.push_record([
                format!("#{:<3}", item_idx + 1),
                item.sku().to_string(),
                product.name.clone(),
                format!("{}", item.original_price()),
                final_price,
                savings,
                promotion,
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(3..6), Alignment::right());

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        let savings = self.savings()?;
        let savings_percent_points =
            percent_points_from_fractional_percentage(self.savings_percent()?);

        writeln!(out, "{:>10}  {}", "Subtotal:", self.subtotal).map_err(|_err| ReceiptError::IO)?;
        writeln!(out, "{:>10}  {}", "Total:", self.total).map_err(|_err| ReceiptError::IO)?;
        writeln!(
            out,
            "{:>10}  {savings} ({savings_percent_points:.2}%)",
            "Savings:"
        )
        .map_err(|_err| ReceiptError::IO)
    }
}

/// Build the final price, savings and promotion cells for one claimed item.
fn application_cells(
    app: &PromotionApplication<'_>,
    promotion_meta: &SlotMap<PromotionKey, PromotionMeta>,
) -> Result<(String, String, String), ReceiptError> {
    let promo_name = promotion_meta
        .get(app.promotion_key)
        .map_or("<unknown>", |meta| meta.name.as_str());

    let role = match app.role {
        ClaimRole::Discounted => "",
        ClaimRole::Trigger => " (trigger)",
        ClaimRole::Free => " (free)",
    };

    let promotion = format!("#{:<3} {promo_name}{role}", app.bundle_id + 1);

    if app.final_price == app.original_price {
        return Ok((String::new(), String::new(), promotion));
    }

    let savings_percent_points = percent_points_from_fractional_percentage(app.savings_percent()?);

    Ok((
        format!("{}", app.final_price),
        format!("({savings_percent_points}%) -{}", app.savings()?),
        promotion,
    ))
}

/// Converts a fractional percentage to percent points for display.
fn percent_points_from_fractional_percentage(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.25), so multiply by 100 to print percent points.
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
}
