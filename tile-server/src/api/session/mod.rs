//! Session API Module
//!
//! Mock login: no password, just a name and optional contact details.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/session",
        post(handler::login)
            .get(handler::current)
            .delete(handler::logout),
    )
}
