//! `/alerts` endpoints: recent alerts, active alerts, resolve.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;

use super::LimitQuery;
use crate::error::Result;
use crate::models::{Alert, AlertDetail};
use crate::service::Telemetry;

// ---

const ALERTS_LIMIT: i64 = 20;

pub fn router() -> Router<Telemetry> {
    // ---
    Router::new()
        .route("/alerts", get(list))
        .route("/alerts/active", get(list_active))
        .route("/alerts/{id}/resolve", put(resolve))
}

#[derive(Serialize)]
struct AlertList {
    alerts: Vec<AlertDetail>,
}

#[derive(Serialize)]
struct AlertResolved {
    message: &'static str,
    alert: Alert,
}

async fn list(
    State(telemetry): State<Telemetry>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Result<Json<AlertList>> {
    // ---
    let Query(query) = query?;
    let alerts = telemetry.fetch_alerts(query.resolve(ALERTS_LIMIT)?).await?;
    Ok(Json(AlertList { alerts }))
}

async fn list_active(State(telemetry): State<Telemetry>) -> Result<Json<AlertList>> {
    // ---
    let alerts = telemetry.fetch_active_alerts().await?;
    Ok(Json(AlertList { alerts }))
}

async fn resolve(
    State(telemetry): State<Telemetry>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<AlertResolved>> {
    // ---
    let Path(id) = id?;
    let alert = telemetry.resolve_alert(id).await?;
    Ok(Json(AlertResolved {
        message: "Alert resolved",
        alert,
    }))
}
