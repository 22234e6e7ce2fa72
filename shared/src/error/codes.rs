//! Error codes for the tile shop
//!
//! | Range | Area |
//! |-------|------|
//! | 0xxx | General |
//! | 1xxx | Session |
//! | 2xxx | Permission |
//! | 4xxx | Order |
//! | 5xxx | Editor |
//! | 9xxx | System |
//!
//! Codes are stable wire values; never renumber an existing variant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code, serialized as its `u16` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    Success = 0,
    ValidationFailed = 2,
    InvalidRequest = 5,

    // ==================== 1xxx: Session ====================
    /// No `Authorization` header
    NotAuthenticated = 1001,
    /// Token unknown, logged out or malformed
    SessionInvalid = 1002,

    // ==================== 2xxx: Permission ====================
    /// Admin console guarded by `ADMIN_TOKEN`
    AdminRequired = 2003,

    // ==================== 4xxx: Order ====================
    OrderNotFound = 4001,
    /// Edit-lock: the order has left the editable stage
    OrderNotEditable = 4002,
    OrderEmpty = 4007,

    // ==================== 5xxx: Editor ====================
    UploadNotFound = 5001,
    NoUploadSelected = 5002,
    NoCroppedItems = 5003,
    NotInEditMode = 5004,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    StorageError = 9002,
}

impl ErrorCode {
    /// Every code, in numeric order
    pub const ALL: [ErrorCode; 15] = [
        ErrorCode::Success,
        ErrorCode::ValidationFailed,
        ErrorCode::InvalidRequest,
        ErrorCode::NotAuthenticated,
        ErrorCode::SessionInvalid,
        ErrorCode::AdminRequired,
        ErrorCode::OrderNotFound,
        ErrorCode::OrderNotEditable,
        ErrorCode::OrderEmpty,
        ErrorCode::UploadNotFound,
        ErrorCode::NoUploadSelected,
        ErrorCode::NoCroppedItems,
        ErrorCode::NotInEditMode,
        ErrorCode::InternalError,
        ErrorCode::StorageError,
    ];

    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default message, shown to the customer unless the error overrides it
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::InvalidRequest => "Invalid request",

            ErrorCode::NotAuthenticated => "Please log in first",
            ErrorCode::SessionInvalid => "Session is invalid or has expired",

            ErrorCode::AdminRequired => "Admin token is required",

            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderNotEditable => "This order cannot be edited anymore",
            ErrorCode::OrderEmpty => "Order is empty",

            ErrorCode::UploadNotFound => "Upload not found",
            ErrorCode::NoUploadSelected => "No photo selected",
            ErrorCode::NoCroppedItems => "Crop at least one photo first",
            ErrorCode::NotInEditMode => "Editor is not editing an order",

            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StorageError => "Storage error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A `u16` that is not an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|c| c.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
