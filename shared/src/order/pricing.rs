//! Flat per-tile pricing

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default price of one tile, in the default currency
pub const DEFAULT_TILE_PRICE: i64 = 200;

/// Default currency (ISO 4217)
pub const DEFAULT_CURRENCY: &str = "THB";

/// Price list: every tile costs the same, shipping is free
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub currency: String,
}

impl Pricing {
    pub fn new(unit_price: Decimal, currency: impl Into<String>) -> Self {
        Self {
            unit_price,
            currency: currency.into(),
        }
    }

    /// Total for `tiles` tiles
    pub fn total_for(&self, tiles: usize) -> Decimal {
        self.unit_price * Decimal::from(tiles as u64)
    }
}

impl Default for Pricing {
    fn default() -> Self {
        Self::new(Decimal::from(DEFAULT_TILE_PRICE), DEFAULT_CURRENCY)
    }
}
