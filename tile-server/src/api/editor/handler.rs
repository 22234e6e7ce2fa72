//! Editor API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use shared::models::Filter;

use crate::auth::CurrentCustomer;
use crate::core::ServerState;
use crate::editor::{ControlAction, EditorView};
use crate::orders::OrderView;
use crate::utils::{ApiResponse, AppResult};

#[derive(Debug, Serialize)]
pub struct FilterInfo {
    name: &'static str,
    css: &'static str,
}

pub async fn filters() -> ApiResponse<Vec<FilterInfo>> {
    let filters = Filter::ALL
        .iter()
        .map(|f| FilterInfo {
            name: f.name(),
            css: f.css(),
        })
        .collect();
    ApiResponse::success(filters)
}

pub async fn view(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
) -> ApiResponse<EditorView> {
    ApiResponse::success(state.editor.view(&customer.customer_id))
}

pub async fn reset(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
) -> ApiResponse<EditorView> {
    state.editor.reset(&customer.customer_id);
    ApiResponse::success(state.editor.view(&customer.customer_id))
}

/// Add one upload; a full session is returned unchanged
pub async fn add_upload(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
) -> ApiResponse<EditorView> {
    ApiResponse::success(state.editor.add_upload(&customer.customer_id))
}

pub async fn select(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
    Path(upload_id): Path<u64>,
) -> AppResult<ApiResponse<EditorView>> {
    let view = state.editor.select(&customer.customer_id, upload_id)?;
    Ok(ApiResponse::success(view))
}

pub async fn controls(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
    Json(action): Json<ControlAction>,
) -> ApiResponse<EditorView> {
    ApiResponse::success(state.editor.apply(&customer.customer_id, action))
}

pub async fn save_crop(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
) -> AppResult<ApiResponse<EditorView>> {
    let view = state.editor.save_crop(&customer.customer_id)?;
    Ok(ApiResponse::success(view))
}

/// Enter edit mode for one of the caller's editable orders
pub async fn load_order(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
    Path(order_id): Path<String>,
) -> AppResult<ApiResponse<EditorView>> {
    let view = state.editor.load_order(&customer.customer_id, &order_id)?;
    Ok(ApiResponse::success(view))
}

pub async fn update_order(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
) -> AppResult<ApiResponse<OrderView>> {
    let view = state.editor.update_order(&customer.customer_id)?;
    Ok(ApiResponse::success_with_message("Order updated", view))
}
