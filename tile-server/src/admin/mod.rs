//! Admin console
//!
//! Unconstrained view over the whole store: any status can be set on any
//! order at any time. The customer edit-lock does not apply here.

pub mod demo;
pub mod query;

pub use query::{AdminQuery, TabCount, tab_counts};

use crate::orders::OrderStore;
use serde::Serialize;
use shared::error::AppResult;
use shared::models::Order;
use shared::order::OrderStatus;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrderRow {
    #[serde(flatten)]
    pub order: Order,
    pub tiles_count: usize,
}

impl From<Order> for AdminOrderRow {
    fn from(order: Order) -> Self {
        Self {
            tiles_count: order.tiles_count(),
            order,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminOrderList {
    pub tab: OrderStatus,
    pub orders: Vec<AdminOrderRow>,
    pub tabs: Vec<TabCount>,
}

#[derive(Debug, Clone)]
pub struct AdminService {
    store: Arc<OrderStore>,
}

impl AdminService {
    pub fn new(store: Arc<OrderStore>) -> Self {
        Self { store }
    }

    pub fn list(&self, query: &AdminQuery) -> AdminOrderList {
        let all = self.store.list();
        let tabs = tab_counts(&all);
        let orders = query.apply(all).into_iter().map(AdminOrderRow::from).collect();
        AdminOrderList {
            tab: query.tab,
            orders,
            tabs,
        }
    }

    pub fn get(&self, order_id: &str) -> AppResult<AdminOrderRow> {
        self.store.get(order_id).map(AdminOrderRow::from)
    }

    pub fn set_status(&self, order_id: &str, status: OrderStatus) -> AppResult<AdminOrderRow> {
        self.store.set_status(order_id, status).map(AdminOrderRow::from)
    }
}
