//! Admin API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::order::OrderStatus;

use crate::admin::{AdminOrderList, AdminOrderRow, AdminQuery};
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: OrderStatus,
}

/// Orders in one status tab, optionally searched, plus per-tab counts
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<AdminQuery>,
) -> ApiResponse<AdminOrderList> {
    ApiResponse::success(state.admin.list(&query))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<AdminOrderRow>> {
    Ok(ApiResponse::success(state.admin.get(&id)?))
}

/// Any status, any time
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> AppResult<ApiResponse<AdminOrderRow>> {
    let row = state.admin.set_status(&id, req.status)?;
    tracing::info!(order_id = %id, status = %req.status, "Admin changed order status");
    Ok(ApiResponse::success(row))
}
