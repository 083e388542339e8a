//! Error pages.

use crate::render;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use notecraft_error::{ConfigError, NotecraftError};

/// A failed request, rendered as an HTML error page.
///
/// Configuration errors (bad form input, unknown providers) are the
/// caller's fault and answer 400; everything else answers 500.
#[derive(Debug)]
pub struct WebError(NotecraftError);

impl WebError {
    /// Rejects form input.
    #[track_caller]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self(ConfigError::new(message).into())
    }

    /// Status code the error is answered with.
    pub fn status(&self) -> StatusCode {
        if self.0.is_config() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl<E: Into<NotecraftError>> From<E> for WebError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::warn!(error = %self.0, "Request rejected");
        }
        (status, Html(render::error_page(status, &self.0.to_string()))).into_response()
    }
}
