//! Basket

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    items::{Claim, Item},
    pricing::{TotalPriceError, total_price},
    products::ProductRef,
};

/// Errors related to basket construction or totals.
#[derive(Debug, Error, PartialEq)]
pub enum BasketError {
    /// An item's currency differs from the basket currency (index, item currency, basket currency).
    #[error("Item {0} has currency {1}, but basket has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// An item was not found in the basket.
    #[error("Item {0} not found")]
    ItemNotFound(usize),

    /// A claimed item cannot be removed without corrupting its promotion bundle.
    #[error("Item {0} has been claimed by a promotion")]
    ItemClaimed(usize),
}

/// Basket
#[derive(Debug, Clone)]
pub struct Basket<'a> {
    items: Vec<Item<'a>>,
    currency: &'static Currency,
    bundles: usize,
}

impl<'a> Basket<'a> {
    /// Create a new, empty basket.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Basket {
            items: Vec::new(),
            currency,
            bundles: 0,
        }
    }

    /// Create a new basket with the given items.
    ///
    /// # Errors
    ///
    /// Returns a `BasketError` if there was a currency mismatch error.
    pub fn with_items(
        items: impl Into<Vec<Item<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, BasketError> {
        let items = items.into();

        items.iter().enumerate().try_for_each(|(i, item)| {
            let item_currency = item.original_price().currency();

            if item_currency == currency {
                Ok(())
            } else {
                Err(BasketError::CurrencyMismatch(
                    i,
                    item_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ))
            }
        })?;

        Ok(Basket {
            items,
            currency,
            bundles: 0,
        })
    }

    /// Add a fresh, unclaimed unit of a product, returning its index.
    ///
    /// # Errors
    ///
    /// Returns a `BasketError::CurrencyMismatch` if the product is priced in another currency.
    pub fn add(&mut self, product: ProductRef<'a>) -> Result<usize, BasketError> {
        let idx = self.items.len();
        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(BasketError::CurrencyMismatch(
                idx,
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        self.items.push(Item::new(product));

        Ok(idx)
    }

    /// Remove an unclaimed item from the basket.
    ///
    /// # Errors
    ///
    /// - [`BasketError::ItemNotFound`]: there is no item at `item`.
    /// - [`BasketError::ItemClaimed`]: the item has been claimed by a promotion.
    pub fn remove_item(&mut self, item: usize) -> Result<Item<'a>, BasketError> {
        match self.items.get(item) {
            None => Err(BasketError::ItemNotFound(item)),
            Some(found) if found.is_discounted() => Err(BasketError::ItemClaimed(item)),
            Some(_) => Ok(self.items.remove(item)),
        }
    }

    /// Sort the items by SKU, keeping insertion order between equal SKUs.
    pub fn sort(&mut self) {
        self.items.sort_by_key(Item::sku);
    }

    /// Calculate the subtotal of the basket, before any promotions.
    ///
    /// # Errors
    ///
    /// Returns a `TotalPriceError` if there was a money arithmetic or currency mismatch error.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, TotalPriceError> {
        total_price(self.currency, self.items.iter().map(|item| *item.original_price()))
    }

    /// Calculate the total of the basket at current item prices.
    ///
    /// # Errors
    ///
    /// Returns a `TotalPriceError` if there was a money arithmetic or currency mismatch error.
    pub fn total(&self) -> Result<Money<'a, Currency>, TotalPriceError> {
        total_price(self.currency, self.items.iter().map(|item| *item.price()))
    }

    /// Get an item from the basket.
    ///
    /// # Errors
    ///
    /// Returns a `BasketError::ItemNotFound` if the item is not found.
    pub fn get_item(&self, item: usize) -> Result<&Item<'a>, BasketError> {
        self.items.get(item).ok_or(BasketError::ItemNotFound(item))
    }

    /// Iterate over the items in the basket.
    pub fn iter(&self) -> impl Iterator<Item = &Item<'a>> {
        self.items.iter()
    }

    /// Count the unclaimed items matching `predicate`.
    pub fn count_unclaimed(&self, predicate: impl Fn(&Item<'a>) -> bool) -> usize {
        self.items
            .iter()
            .filter(|item| !item.is_discounted() && predicate(item))
            .count()
    }

    /// Index of the first unclaimed item matching `predicate`.
    pub fn first_unclaimed(&self, predicate: impl Fn(&Item<'a>) -> bool) -> Option<usize> {
        self.items
            .iter()
            .position(|item| !item.is_discounted() && predicate(item))
    }

    /// Iterate mutably over the unclaimed items matching `predicate`, in basket order.
    pub(crate) fn unclaimed_mut<P>(&mut self, predicate: P) -> impl Iterator<Item = &mut Item<'a>>
    where
        P: Fn(&Item<'a>) -> bool,
    {
        self.items
            .iter_mut()
            .filter(move |item| !item.is_discounted() && predicate(item))
    }

    pub(crate) fn get_item_mut(&mut self, item: usize) -> Option<&mut Item<'a>> {
        self.items.get_mut(item)
    }

    /// Append an item that is already claimed, such as a granted free unit.
    ///
    /// The product must be priced in the basket currency, as for [`Basket::add`].
    pub(crate) fn push_claimed(
        &mut self,
        product: ProductRef<'a>,
        claim: Claim,
        price: Money<'a, Currency>,
    ) -> Result<usize, BasketError> {
        let idx = self.add(product)?;

        if let Some(item) = self.items.get_mut(idx) {
            item.claim_at(claim, price);
        }

        Ok(idx)
    }

    /// Allocate the ID for the next promotion application.
    pub(crate) fn next_bundle(&mut self) -> usize {
        let bundle = self.bundles;
        self.bundles += 1;

        bundle
    }

    /// Get the number of items in the basket.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the basket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the basket.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
