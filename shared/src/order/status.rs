//! Order status vocabulary
//!
//! [`OrderStatus`] is the one canonical lifecycle used by storage and the
//! admin console. The customer-facing labels ([`CustomerStatus`]) are a
//! projection of it and are never stored.
//!
//! | canonical | customer | customer tab |
//! |-----------|----------|--------------|
//! | `new` | `Printing` | active |
//! | `printed` | `Printing` | active |
//! | `shipping` | `Shipped` | active |
//! | `finished` | `Delivered` | past |
//! | `cancelled` | `Cancelled` | past |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical order status
///
/// Legacy customer-view strings are accepted on read so that documents
/// written by the old storefront still load.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Just checked out, still editable by the customer
    #[default]
    #[serde(alias = "Printing", alias = "printing")]
    New,
    /// Tiles printed, waiting for dispatch
    Printed,
    /// Handed to the courier
    #[serde(alias = "Shipped", alias = "shipped")]
    Shipping,
    /// Delivered to the customer
    #[serde(alias = "Delivered", alias = "delivered")]
    Finished,
    /// Cancelled by the customer
    #[serde(alias = "Cancelled", alias = "canceled")]
    Cancelled,
}

impl OrderStatus {
    /// All statuses in lifecycle order
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::New,
        OrderStatus::Printed,
        OrderStatus::Shipping,
        OrderStatus::Finished,
        OrderStatus::Cancelled,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Printed => "printed",
            OrderStatus::Shipping => "shipping",
            OrderStatus::Finished => "finished",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Admin console tab label
    pub const fn label(&self) -> &'static str {
        match self {
            OrderStatus::New => "New",
            OrderStatus::Printed => "Printed",
            OrderStatus::Shipping => "Shipping",
            OrderStatus::Finished => "Finished",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Project onto the customer-facing vocabulary
    pub const fn customer_status(&self) -> CustomerStatus {
        match self {
            OrderStatus::New | OrderStatus::Printed => CustomerStatus::Printing,
            OrderStatus::Shipping => CustomerStatus::Shipped,
            OrderStatus::Finished => CustomerStatus::Delivered,
            OrderStatus::Cancelled => CustomerStatus::Cancelled,
        }
    }

    /// Which "My Orders" tab this order is listed under
    pub const fn customer_tab(&self) -> CustomerTab {
        match self {
            OrderStatus::Finished | OrderStatus::Cancelled => CustomerTab::Past,
            _ => CustomerTab::Active,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" | "printing" => Ok(OrderStatus::New),
            "printed" => Ok(OrderStatus::Printed),
            "shipping" | "shipped" => Ok(OrderStatus::Shipping),
            "finished" | "delivered" => Ok(OrderStatus::Finished),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// Customer-facing status label
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CustomerStatus {
    Printing,
    Shipped,
    Delivered,
    Cancelled,
}

impl CustomerStatus {
    /// Position on the Printing → Shipped → Delivered tracker
    ///
    /// Cancelled orders are not on the tracker.
    pub const fn progress_step(&self) -> Option<u8> {
        match self {
            CustomerStatus::Printing => Some(0),
            CustomerStatus::Shipped => Some(1),
            CustomerStatus::Delivered => Some(2),
            CustomerStatus::Cancelled => None,
        }
    }
}

/// "My Orders" tabs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum CustomerTab {
    #[default]
    Active,
    Past,
}
