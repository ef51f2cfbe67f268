//! Error taxonomy shared by the storage gateway, domain operations, and routes.
//!
//! Every use case either succeeds with a fully-populated result or fails with
//! one of the variants below. The HTTP mapping lives here too so route
//! handlers can simply return `Result<Json<_>, Error>`.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

// ---

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    // ---
    /// A referenced sensor or alert does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Malformed input, rejected before any storage call.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Connectivity, timeout, or query failure in the backing store.
    #[error("storage error")]
    Storage(#[from] sqlx::Error),
}

impl Error {
    // ---
    pub fn sensor_not_found(sensor_id: i32) -> Self {
        Error::NotFound(format!("sensor {sensor_id}"))
    }

    pub fn alert_not_found(alert_id: i32) -> Self {
        Error::NotFound(format!("alert {alert_id}"))
    }

    fn kind(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "not_found",
            Error::Validation(_) => "validation_error",
            Error::Storage(_) => "storage_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // ---
        // Storage details stay in the logs, not in the response body.
        let detail = match &self {
            Error::Storage(e) => {
                tracing::error!("Storage failure: {}", e);
                self.to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({ "error": self.kind(), "detail": detail }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_status_mapping() {
        // ---
        assert_eq!(Error::sensor_not_found(9).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::Validation("limit".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            Error::Storage(sqlx::Error::PoolTimedOut).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_messages() {
        // ---
        assert_eq!(Error::sensor_not_found(999).to_string(), "sensor 999 not found");
        assert_eq!(Error::alert_not_found(3).to_string(), "alert 3 not found");
    }
}
