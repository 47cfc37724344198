use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::preferences::PreferencesError;
use crate::tracker::TrackerError;

/// Errors which reach the HTTP boundary of a request.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error(transparent)]
    Preferences(#[from] PreferencesError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            Self::Tracker(e) if e.is_timeout() => {
                tracing::warn!("tracker request timed out: {e}");
                (StatusCode::GATEWAY_TIMEOUT, "Device tracker timed out").into_response()
            }
            Self::Tracker(e) => {
                tracing::error!("tracker request failed: {e:?}");
                (StatusCode::BAD_GATEWAY, "Device tracker unavailable").into_response()
            }
            Self::Preferences(e) => {
                tracing::error!("preferences storage error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Preferences unavailable").into_response()
            }
        }
    }
}
