//! Edit-lock policy
//!
//! A customer may change or cancel an order only while it is in the
//! earliest lifecycle state. The admin console does not go through this
//! policy.

use super::status::OrderStatus;
use crate::models::Order;

/// Statuses in which customer edits and cancels are allowed
pub const EDITABLE_STATUSES: &[OrderStatus] = &[OrderStatus::New];

/// Whether a status permits customer edit/cancel
pub fn is_editable(status: OrderStatus) -> bool {
    EDITABLE_STATUSES.contains(&status)
}

/// Whether the customer may edit or cancel this order
pub fn can_edit(order: &Order) -> bool {
    is_editable(order.status)
}

/// Message shown in place of the edit/cancel actions
///
/// `None` while the order is still editable.
pub fn lock_reason(status: OrderStatus) -> Option<&'static str> {
    match status {
        s if is_editable(s) => None,
        OrderStatus::Cancelled => Some("This order has been cancelled."),
        OrderStatus::Finished => Some("This order has been delivered and can no longer be changed."),
        _ => Some("This order is already being processed and can no longer be changed."),
    }
}
