//! Promotion Types

use rusty_money::{Money, iso::Currency};

use crate::{products::ProductRef, promotions::PromotionError};

mod bulk_price;
mod combo;
mod free_item;

pub use bulk_price::BulkPricePromotion;
pub use combo::ComboPromotion;
pub use free_item::FreeItemPromotion;

/// Reject a promotion price that is negative or priced in another currency than `product`.
fn validate_price(
    price: &Money<'_, Currency>,
    product: &ProductRef<'_>,
) -> Result<(), PromotionError> {
    let minor = price.to_minor_units();

    if minor < 0 {
        return Err(PromotionError::NegativePrice(minor));
    }

    let price_currency = price.currency();
    let product_currency = product.price.currency();

    if price_currency != product_currency {
        return Err(PromotionError::CurrencyMismatch(
            product.sku,
            price_currency.iso_alpha_code,
            product_currency.iso_alpha_code,
        ));
    }

    Ok(())
}

/// Reject a zero trigger quantity, which would be satisfied by any basket forever.
fn validate_quantity(quantity: usize) -> Result<(), PromotionError> {
    if quantity == 0 {
        Err(PromotionError::ZeroQuantity)
    } else {
        Ok(())
    }
}
