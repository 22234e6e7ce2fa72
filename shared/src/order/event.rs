//! Store change notifications
//!
//! Broadcast after every committed mutation of the order collection.
//! Subscribers treat any event as "re-read the orders you care about".

use super::status::OrderStatus;
use serde::{Deserialize, Serialize};

/// Order store change event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreEvent {
    /// Monotonic per-process sequence number
    pub sequence: u64,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// Order this event belongs to
    pub order_id: String,
    /// Owner of the order (empty for seeded demo orders)
    pub customer_id: String,
    pub kind: StoreEventKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEventKind {
    Created {
        tiles_count: usize,
    },
    ItemsUpdated {
        tiles_count: usize,
    },
    StatusChanged {
        from: OrderStatus,
        to: OrderStatus,
    },
}

impl StoreEvent {
    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self.kind {
            StoreEventKind::Created { .. } => "order_created",
            StoreEventKind::ItemsUpdated { .. } => "order_items_updated",
            StoreEventKind::StatusChanged { .. } => "order_status_changed",
        }
    }
}
