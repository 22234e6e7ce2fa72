//! Order lifecycle
//!
//! - [`status`]: canonical status enum and the customer-facing projection
//! - [`policy`]: edit-lock predicate
//! - [`pricing`]: flat per-tile pricing
//! - [`event`]: store change notifications

pub mod event;
pub mod policy;
pub mod pricing;
pub mod status;

// Re-exports
pub use event::{StoreEvent, StoreEventKind};
pub use policy::{EDITABLE_STATUSES, can_edit, is_editable, lock_reason};
pub use pricing::Pricing;
pub use status::{CustomerStatus, CustomerTab, OrderStatus, UnknownStatus};
