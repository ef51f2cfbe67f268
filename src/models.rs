//! Row types for sensors, readings, and alerts.
//!
//! These mirror the three persisted tables one-to-one. No entity holds a
//! collection of its dependents; relationships are plain foreign-key ids and
//! are traversed only through explicit gateway queries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---

/// A registered measurement device.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Sensor {
    // ---
    pub sensor_id: i32,
    pub sensor_type: String,
    pub location: String,
    pub installed_at: DateTime<Utc>,
}

/// One timestamped observation from a sensor.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Reading {
    // ---
    pub data_id: i32,
    pub sensor_id: i32,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub reading_value: Decimal,
    pub reading_time: DateTime<Utc>,
}

/// A persisted threshold violation.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Alert {
    // ---
    pub alert_id: i32,
    pub sensor_id: i32,
    pub alert_message: String,
    pub severity: String,
    pub triggered_at: DateTime<Utc>,
    pub is_resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// An alert joined with the type and location of its sensor.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct AlertDetail {
    // ---
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub alert: Alert,
    pub sensor_type: String,
    pub location: String,
}

/// Request body for `POST /sensors`.
#[derive(Debug, Deserialize)]
pub struct NewSensor {
    // ---
    pub sensor_type: String,
    pub location: String,
}

/// Request body for `POST /readings`.
///
/// The value is parsed from the JSON number's literal text, never via `f64`.
#[derive(Debug, Deserialize)]
pub struct NewReading {
    // ---
    pub sensor_id: i32,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub reading_value: Decimal,
}

/// Result of ingesting one reading: the stored row plus the stored alert, if any.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedReading {
    // ---
    pub reading: Reading,
    pub alert: Option<Alert>,
}
