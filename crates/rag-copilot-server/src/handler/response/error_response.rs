use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use schemars::JsonSchema;
use serde::Serialize;

/// JSON body written for every error response.
///
/// The status code travels alongside the body but is never serialized.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ErrorResponse<'a> {
    /// Short error title, e.g. `Not found`.
    pub error: Cow<'a, str>,
    /// Message safe for client display.
    pub message: Cow<'a, str>,
    /// HTTP status code (not serialized in JSON).
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "Internal server error",
        "An unexpected error occurred",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const NOT_FOUND: Self = Self::new(
        "Not found",
        "The requested resource was not found",
        StatusCode::NOT_FOUND,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(error: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            error: Cow::Borrowed(error),
            message: Cow::Borrowed(message),
            status,
        }
    }

    /// Replaces the client-facing message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Converts this response into an owned version.
    pub fn into_static(self) -> ErrorResponse<'static> {
        ErrorResponse {
            error: Cow::Owned(self.error.into_owned()),
            message: Cow::Owned(self.message.into_owned()),
            status: self.status,
        }
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    #[inline]
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
