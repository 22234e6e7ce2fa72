//! Data models
//!
//! Shared between tile-server and the storefront frontend (via API).

pub mod order;
pub mod shipping;
pub mod tile;

// Re-exports
pub use order::Order;
pub use shipping::ShippingDetails;
pub use tile::{Filter, MAX_TILES, Rotation, TileItem, UploadItem, UploadStatus, Zoom};
