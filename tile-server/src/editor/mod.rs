//! Tile editor
//!
//! - [`session`]: the per-customer state machine (uploads, selection, crop controls)
//! - [`service`]: session registry and edit-mode bridge to the customer order service

pub mod service;
pub mod session;

pub use service::{EditorService, EditorView};
pub use session::{ControlAction, Controls, EditorSession, EditorSummary, MAX_UPLOADS};
