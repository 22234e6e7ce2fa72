//! 顾客侧订单操作
//!
//! 所有权与编辑锁在这里检查，store 本身不做限制。他人的订单一律报告为不存在。
//! 修改类操作把检查交给 store 在写锁内执行，检查与写入之间不会插入别的变更。

use super::store::OrderStore;
use serde::Serialize;
use shared::error::{AppError, AppResult};
use shared::models::{Order, TileItem};
use shared::order::{CustomerStatus, CustomerTab, OrderStatus, can_edit, lock_reason};
use std::sync::Arc;

/// 顾客看到的订单
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub tiles_count: usize,
    pub customer_status: CustomerStatus,
    pub can_edit: bool,
    /// 进度: 0 印制中, 1 已发货, 2 已送达; 取消时不存在
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_step: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_message: Option<&'static str>,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        let customer_status = order.status.customer_status();
        Self {
            tiles_count: order.tiles_count(),
            customer_status,
            can_edit: can_edit(&order),
            progress_step: customer_status.progress_step(),
            lock_message: lock_reason(order.status),
            order,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CustomerOrderService {
    store: Arc<OrderStore>,
}

impl CustomerOrderService {
    pub fn new(store: Arc<OrderStore>) -> Self {
        Self { store }
    }

    pub fn list(&self, customer_id: &str, tab: CustomerTab) -> Vec<OrderView> {
        self.store
            .list_for(customer_id)
            .into_iter()
            .filter(|o| o.status.customer_tab() == tab)
            .map(OrderView::from)
            .collect()
    }

    pub fn get(&self, customer_id: &str, order_id: &str) -> AppResult<OrderView> {
        self.owned(customer_id, order_id).map(OrderView::from)
    }

    /// 替换可编辑订单的明细
    pub fn edit(
        &self,
        customer_id: &str,
        order_id: &str,
        items: Vec<TileItem>,
    ) -> AppResult<OrderView> {
        let updated = self
            .store
            .update_items_checked(order_id, items, |order| ensure_editable(customer_id, order))?;
        Ok(updated.into())
    }

    /// 取消可编辑订单；已取消的订单原样返回
    pub fn cancel(&self, customer_id: &str, order_id: &str) -> AppResult<OrderView> {
        let mut changed = false;
        let order = self
            .store
            .set_status_checked(order_id, OrderStatus::Cancelled, |order| {
                if !order.is_owned_by(customer_id) {
                    return Err(AppError::order_not_found(&order.id));
                }
                if order.status == OrderStatus::Cancelled {
                    return Ok(());
                }
                ensure_editable(customer_id, order)?;
                changed = true;
                Ok(())
            })?;
        if changed {
            tracing::info!(order_id = %order.id, customer_id, "Order cancelled by customer");
        }
        Ok(order.into())
    }

    /// 读取自己的订单并检查编辑锁
    pub fn editable(&self, customer_id: &str, order_id: &str) -> AppResult<Order> {
        let order = self.store.get(order_id)?;
        ensure_editable(customer_id, &order)?;
        Ok(order)
    }

    fn owned(&self, customer_id: &str, order_id: &str) -> AppResult<Order> {
        let order = self.store.get(order_id)?;
        if !order.is_owned_by(customer_id) {
            return Err(AppError::order_not_found(order_id));
        }
        Ok(order)
    }
}

/// 所有权 + 编辑锁
fn ensure_editable(customer_id: &str, order: &Order) -> AppResult<()> {
    if !order.is_owned_by(customer_id) {
        return Err(AppError::order_not_found(&order.id));
    }
    if !can_edit(order) {
        return Err(AppError::order_not_editable(&order.id, order.status.as_str()));
    }
    Ok(())
}
