use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::shipping::ShippingDetails;
use super::tile::TileItem;
use crate::order::OrderStatus;
use crate::order::pricing::DEFAULT_CURRENCY;

/// A customer order
///
/// JSON field names follow the storefront's stored document
/// (`createdAt`, `customerId`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// `ORD-NNNN-XX`
    pub id: String,
    /// Owner; empty for orders that did not come through checkout
    #[serde(default)]
    pub customer_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<TileItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub shipping: ShippingDetails,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Order {
    pub fn tiles_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_owned_by(&self, customer_id: &str) -> bool {
        self.customer_id == customer_id
    }
}
