//! Checkout API Handlers

use axum::{Json, extract::State};

use crate::auth::CurrentCustomer;
use crate::checkout::CheckoutRequest;
use crate::core::ServerState;
use crate::orders::OrderView;
use crate::utils::{ApiResponse, AppResult};

/// Place an order from the caller's cropped uploads
pub async fn checkout(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
    Json(req): Json<CheckoutRequest>,
) -> AppResult<ApiResponse<OrderView>> {
    let view = state.checkout.checkout(&customer.customer_id, req.shipping)?;
    Ok(ApiResponse::success_with_message("Order placed", view))
}
