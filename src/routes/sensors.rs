//! `/sensors` endpoints: list, fetch one, register.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::models::{NewSensor, Sensor};
use crate::service::Telemetry;

// ---

pub fn router() -> Router<Telemetry> {
    // ---
    Router::new()
        .route("/sensors", get(list).post(create))
        .route("/sensors/{id}", get(fetch))
}

#[derive(Serialize)]
struct SensorList {
    sensors: Vec<Sensor>,
}

#[derive(Serialize)]
struct SensorBody {
    sensor: Sensor,
}

#[derive(Serialize)]
struct SensorCreated {
    message: &'static str,
    sensor: Sensor,
}

async fn list(State(telemetry): State<Telemetry>) -> Result<Json<SensorList>> {
    // ---
    debug!("GET /sensors");
    let sensors = telemetry.list_sensors().await?;
    Ok(Json(SensorList { sensors }))
}

async fn fetch(
    State(telemetry): State<Telemetry>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<SensorBody>> {
    // ---
    let Path(id) = id?;
    debug!("GET /sensors/{}", id);
    let sensor = telemetry.get_sensor(id).await?;
    Ok(Json(SensorBody { sensor }))
}

async fn create(
    State(telemetry): State<Telemetry>,
    body: Result<Json<NewSensor>, JsonRejection>,
) -> Result<Json<SensorCreated>> {
    // ---
    let Json(body) = body?;
    let sensor = telemetry
        .register_sensor(&body.sensor_type, &body.location)
        .await?;
    Ok(Json(SensorCreated {
        message: "Sensor added successfully",
        sensor,
    }))
}
