//! `/readings` endpoints: ingest a reading, list readings per sensor or overall.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::debug;

use super::LimitQuery;
use crate::error::Result;
use crate::models::{Alert, NewReading, Reading};
use crate::service::Telemetry;

// ---

const SENSOR_READINGS_LIMIT: i64 = 10;
const ALL_READINGS_LIMIT: i64 = 50;

pub fn router() -> Router<Telemetry> {
    // ---
    Router::new()
        .route("/readings", get(list_all).post(create))
        .route("/readings/{sensor_id}", get(list_for_sensor))
}

#[derive(Serialize)]
struct ReadingCreated {
    message: &'static str,
    reading: Reading,
    alert: Option<Alert>,
}

#[derive(Serialize)]
struct SensorReadings {
    sensor_id: i32,
    readings: Vec<Reading>,
}

#[derive(Serialize)]
struct ReadingList {
    readings: Vec<Reading>,
}

async fn create(
    State(telemetry): State<Telemetry>,
    body: Result<Json<NewReading>, JsonRejection>,
) -> Result<Json<ReadingCreated>> {
    // ---
    let Json(body) = body?;
    debug!("POST /readings sensor={} value={}", body.sensor_id, body.reading_value);

    let recorded = telemetry
        .record_reading(body.sensor_id, body.reading_value)
        .await?;

    let message = if recorded.alert.is_some() {
        "Reading recorded, alert triggered"
    } else {
        "Reading recorded successfully"
    };

    Ok(Json(ReadingCreated {
        message,
        reading: recorded.reading,
        alert: recorded.alert,
    }))
}

async fn list_for_sensor(
    State(telemetry): State<Telemetry>,
    sensor_id: Result<Path<i32>, PathRejection>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Result<Json<SensorReadings>> {
    // ---
    let Path(sensor_id) = sensor_id?;
    let Query(query) = query?;
    let limit = query.resolve(SENSOR_READINGS_LIMIT)?;

    let readings = telemetry.fetch_readings(sensor_id, limit).await?;
    Ok(Json(SensorReadings {
        sensor_id,
        readings,
    }))
}

async fn list_all(
    State(telemetry): State<Telemetry>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Result<Json<ReadingList>> {
    // ---
    let Query(query) = query?;
    let limit = query.resolve(ALL_READINGS_LIMIT)?;

    let readings = telemetry.fetch_all_readings(limit).await?;
    Ok(Json(ReadingList { readings }))
}
