//! Session API Handlers

use axum::{Json, extract::State};

use crate::auth::{CurrentCustomer, LoginRequest};
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

/// Log in, returning the bearer token and customer id
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<CurrentCustomer>> {
    let customer = state.sessions.login(req)?;
    tracing::info!(customer_id = %customer.customer_id, "Customer logged in");
    Ok(ApiResponse::success(customer))
}

/// Who am I
pub async fn current(customer: CurrentCustomer) -> ApiResponse<CurrentCustomer> {
    ApiResponse::success(customer)
}

/// Log out and drop the editor session
pub async fn logout(State(state): State<ServerState>, customer: CurrentCustomer) -> ApiResponse<()> {
    state.sessions.logout(&customer.token);
    state.editor.reset(&customer.customer_id);
    tracing::info!(customer_id = %customer.customer_id, "Customer logged out");
    ApiResponse::ok()
}
