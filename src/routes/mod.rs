//! Route gateway: merges one sub-router per resource and attaches the shared
//! [`Telemetry`] state once, so `main.rs` never sees individual endpoints.

use axum::Router;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::service::Telemetry;

mod alerts;
mod health;
mod readings;
mod sensors;


// ---

pub fn router(telemetry: Telemetry) -> Router {
    // ---
    Router::new()
        .merge(sensors::router())
        .merge(readings::router())
        .merge(alerts::router())
        .merge(health::router())
        .with_state(telemetry)
}

/// `?limit=` query parameter shared by the list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    limit: Option<i64>,
}

impl LimitQuery {
    /// The requested limit, or `default` when absent. Must be at least 1.
    pub fn resolve(&self, default: i64) -> Result<i64> {
        // ---
        match self.limit {
            None => Ok(default),
            Some(n) if n >= 1 => Ok(n),
            Some(n) => Err(Error::Validation(format!("limit must be at least 1, got {n}"))),
        }
    }
}
