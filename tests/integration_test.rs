//! End-to-end checks against a running deployment.
//!
//! These need the service and its database up, so they are ignored by default:
//! `BASE_URL=http://localhost:8080 cargo test -- --ignored`

use anyhow::Result;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct Sensor {
    sensor_id: i32,
    sensor_type: String,
    installed_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct SensorCreated {
    sensor: Sensor,
}

#[derive(Debug, Deserialize)]
struct Reading {
    sensor_id: i32,
    reading_value: f64,
}

#[derive(Debug, Deserialize)]
struct Alert {
    alert_id: i32,
    alert_message: String,
    severity: String,
    is_resolved: bool,
    resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ReadingCreated {
    reading: Reading,
    alert: Option<Alert>,
}

#[derive(Debug, Deserialize)]
struct AlertResolved {
    alert: Alert,
}

#[derive(Debug, Deserialize)]
struct AlertList {
    alerts: Vec<Alert>,
}

fn base_url() -> String {
    std::env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:8080".into())
}

async fn add_sensor(client: &Client, base: &str, sensor_type: &str) -> Result<Sensor> {
    // ---
    let created: SensorCreated = client
        .post(format!("{base}/sensors"))
        .json(&json!({ "sensor_type": sensor_type, "location": "Integration Field" }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(created.sensor)
}

#[tokio::test]
#[ignore = "requires a running service"]
async fn reading_pipeline_raises_and_resolves_alert() -> Result<()> {
    // ---
    let base = base_url();
    let client = Client::new();

    let sensor = add_sensor(&client, &base, "soil_moisture").await?;
    assert_eq!(sensor.sensor_type, "soil_moisture");
    assert!(sensor.installed_at > DateTime::from_timestamp(0, 0).unwrap());

    // Low moisture triggers a high-severity alert
    let low: ReadingCreated = client
        .post(format!("{base}/readings"))
        .json(&json!({ "sensor_id": sensor.sensor_id, "reading_value": 15.5 }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    assert_eq!(low.reading.sensor_id, sensor.sensor_id);
    assert_eq!(low.reading.reading_value, 15.5);
    let alert = low.alert.expect("reading below 20 should alert");
    assert_eq!(alert.severity, "high");
    assert!(alert.alert_message.contains("15.5"));
    assert!(!alert.is_resolved);

    // Normal moisture does not
    let normal: ReadingCreated = client
        .post(format!("{base}/readings"))
        .json(&json!({ "sensor_id": sensor.sensor_id, "reading_value": 45 }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    assert!(normal.alert.is_none());

    let resolved: AlertResolved = client
        .put(format!("{base}/alerts/{}/resolve", alert.alert_id))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    assert!(resolved.alert.is_resolved);
    assert!(resolved.alert.resolved_at.is_some());

    let active: AlertList = client
        .get(format!("{base}/alerts/active"))
        .send()
        .await?
        .json()
        .await?;
    assert!(active.alerts.iter().all(|a| !a.is_resolved));
    assert!(active.alerts.iter().all(|a| a.alert_id != alert.alert_id));

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running service"]
async fn unknown_sensor_is_not_found() -> Result<()> {
    // ---
    let base = base_url();
    let client = Client::new();

    let response = client
        .post(format!("{base}/readings"))
        .json(&json!({ "sensor_id": i32::MAX, "reading_value": 10 }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .get(format!("{base}/readings/{}", i32::MAX))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}
