//! Admin list filtering

use serde::{Deserialize, Serialize};
use shared::models::Order;
use shared::order::OrderStatus;

/// `?tab=<status>&q=<text>`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminQuery {
    #[serde(default)]
    pub tab: OrderStatus,
    #[serde(default)]
    pub q: Option<String>,
}

impl AdminQuery {
    pub fn new(tab: OrderStatus, q: impl Into<String>) -> Self {
        Self {
            tab,
            q: Some(q.into()),
        }
    }

    /// Lowercased, trimmed search text; `None` matches everything
    fn needle(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    pub fn matches(&self, order: &Order) -> bool {
        if order.status != self.tab {
            return false;
        }
        match self.needle() {
            None => true,
            Some(needle) => {
                order.id.to_lowercase().contains(&needle) || order.shipping.matches(&needle)
            }
        }
    }

    pub fn apply(&self, orders: Vec<Order>) -> Vec<Order> {
        orders.into_iter().filter(|o| self.matches(o)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabCount {
    pub status: OrderStatus,
    pub label: &'static str,
    pub count: usize,
}

/// Orders per status, in lifecycle order, ignoring any search text
pub fn tab_counts(orders: &[Order]) -> Vec<TabCount> {
    OrderStatus::ALL
        .iter()
        .map(|&status| TabCount {
            status,
            label: status.label(),
            count: orders.iter().filter(|o| o.status == status).count(),
        })
        .collect()
}
