//! Order API Module
//!
//! The caller's own orders. Edits and cancellation go through the
//! edit-lock; `/events` streams store changes for the caller's orders.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/events", get(handler::events))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/items", put(handler::update_items))
        .route("/{id}/cancel", post(handler::cancel))
}
