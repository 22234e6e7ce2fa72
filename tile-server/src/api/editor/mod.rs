//! Editor API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Editor router (requires a session)
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/editor", routes())
}

/// Filter catalog, no session needed
pub fn public_router() -> Router<ServerState> {
    Router::new().route("/api/editor/filters", get(handler::filters))
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::view))
        .route("/reset", post(handler::reset))
        .route("/uploads", post(handler::add_upload))
        .route("/select/{upload_id}", post(handler::select))
        .route("/controls", post(handler::controls))
        .route("/save", post(handler::save_crop))
        .route("/load/{order_id}", post(handler::load_order))
        .route("/update-order", post(handler::update_order))
}
