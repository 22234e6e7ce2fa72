//! Shared types for the tile shop
//!
//! Domain types used by tile-server and its API clients: order and tile
//! models, the order status vocabulary, the edit-lock policy, and the
//! unified error/response types.

pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use models::{Order, ShippingDetails, TileItem, UploadItem};
pub use order::{OrderStatus, can_edit};
