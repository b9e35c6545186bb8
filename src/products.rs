//! Products

use std::{fmt, str::FromStr};

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;
use thiserror::Error;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Errors raised when parsing a stock-keeping unit code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SkuError {
    /// Whitespace and control characters cannot identify a product.
    #[error("{0:?} is not a valid SKU character")]
    InvalidCharacter(char),

    /// A SKU is exactly one character.
    #[error("expected a single character SKU, got {0:?}")]
    NotSingleCharacter(String),
}

/// Single character stock-keeping unit code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sku(char);

impl Sku {
    /// Create a SKU from a character.
    ///
    /// # Errors
    ///
    /// Returns [`SkuError::InvalidCharacter`] for whitespace or control characters.
    pub fn new(code: char) -> Result<Self, SkuError> {
        if code.is_whitespace() || code.is_control() {
            Err(SkuError::InvalidCharacter(code))
        } else {
            Ok(Self(code))
        }
    }

    /// Returns the SKU character.
    pub fn code(self) -> char {
        self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Sku {
    type Err = SkuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();

        match (chars.next(), chars.next()) {
            (Some(code), None) => Sku::new(code),
            _ => Err(SkuError::NotSingleCharacter(s.to_string())),
        }
    }
}

/// Product
#[derive(Debug, Clone)]
pub struct Product<'a> {
    /// Product SKU
    pub sku: Sku,

    /// Product name
    pub name: String,

    /// Product unit price
    pub price: Money<'a, Currency>,
}

/// A resolved catalog product, as held by basket items and promotions.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProductRef<'a> {
    /// Catalog key
    pub key: ProductKey,

    /// Product SKU
    pub sku: Sku,

    /// Product unit price
    pub price: Money<'a, Currency>,
}
