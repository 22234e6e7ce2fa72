//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::ValidationFailed | Self::InvalidRequest => StatusCode::BAD_REQUEST,

            Self::NotAuthenticated | Self::SessionInvalid => StatusCode::UNAUTHORIZED,

            Self::AdminRequired => StatusCode::FORBIDDEN,

            Self::OrderNotFound | Self::UploadNotFound => StatusCode::NOT_FOUND,

            // Edit-lock
            Self::OrderNotEditable => StatusCode::CONFLICT,

            // Well-formed request the current state cannot satisfy
            Self::OrderEmpty | Self::NoUploadSelected | Self::NoCroppedItems | Self::NotInEditMode => {
                StatusCode::UNPROCESSABLE_ENTITY
            }

            Self::InternalError | Self::StorageError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
