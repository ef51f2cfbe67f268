//! Domain operations: the use cases behind the HTTP routes.
//!
//! Orchestrates the storage gateway and the rule engine. Ingesting a reading
//! walks `Received -> Persisted -> RuleEvaluated -> (AlertCreated | NoAlert)`.
//! The reading and the alert are committed separately: if the alert insert
//! fails the reading stays stored and the error is returned to the caller.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::{Alert, AlertDetail, Reading, RecordedReading, Sensor};
use crate::rules;
use crate::store::SensorStore;

// ---

#[derive(Clone)]
pub struct Telemetry {
    // ---
    store: Arc<dyn SensorStore>,
}

impl Telemetry {
    // ---
    pub fn new(store: Arc<dyn SensorStore>) -> Self {
        Self { store }
    }

    pub async fn list_sensors(&self) -> Result<Vec<Sensor>> {
        self.store.list_sensors().await
    }

    pub async fn get_sensor(&self, sensor_id: i32) -> Result<Sensor> {
        // ---
        self.store
            .get_sensor(sensor_id)
            .await?
            .ok_or_else(|| Error::sensor_not_found(sensor_id))
    }

    pub async fn register_sensor(&self, sensor_type: &str, location: &str) -> Result<Sensor> {
        // ---
        let sensor = self.store.create_sensor(sensor_type, location).await?;
        info!(
            "Registered sensor {} ({}) at {}",
            sensor.sensor_id, sensor.sensor_type, sensor.location
        );
        Ok(sensor)
    }

    /// Store a reading and raise an alert if it violates its sensor's rule.
    ///
    /// Fails with `NotFound` before anything is written if the sensor does not
    /// exist. The returned alert is the persisted row, not just the verdict.
    pub async fn record_reading(&self, sensor_id: i32, value: Decimal) -> Result<RecordedReading> {
        // ---
        let sensor = self.get_sensor(sensor_id).await?;

        let reading = self.store.create_reading(sensor_id, value).await?;
        debug!("Stored reading {} = {} for sensor {}", reading.data_id, value, sensor_id);

        let verdict = rules::classify(&sensor.sensor_type).and_then(|rule| {
            debug!("Sensor {} ({}) uses the {} rule", sensor_id, sensor.sensor_type, rule.name);
            rule.evaluate(value)
        });

        let alert = match verdict {
            Some(verdict) => {
                let alert = self
                    .store
                    .create_alert(sensor_id, &verdict.message, verdict.severity)
                    .await
                    .inspect_err(|_| {
                        warn!(
                            "Reading {} stored but its {} alert was not",
                            reading.data_id, verdict.severity
                        )
                    })?;
                info!(
                    "Alert {} raised for sensor {}: {} ({})",
                    alert.alert_id, sensor_id, alert.alert_message, alert.severity
                );
                Some(alert)
            }
            None => None,
        };

        Ok(RecordedReading { reading, alert })
    }

    pub async fn fetch_readings(&self, sensor_id: i32, limit: i64) -> Result<Vec<Reading>> {
        // ---
        self.get_sensor(sensor_id).await?;
        self.store.list_readings(sensor_id, limit).await
    }

    pub async fn fetch_all_readings(&self, limit: i64) -> Result<Vec<Reading>> {
        self.store.list_all_readings(limit).await
    }

    pub async fn fetch_alerts(&self, limit: i64) -> Result<Vec<AlertDetail>> {
        self.store.list_alerts(limit).await
    }

    pub async fn fetch_active_alerts(&self) -> Result<Vec<AlertDetail>> {
        self.store.list_active_alerts().await
    }

    /// Mark an alert resolved. Resolving twice is accepted and keeps the
    /// first `resolved_at`.
    pub async fn resolve_alert(&self, alert_id: i32) -> Result<Alert> {
        // ---
        let alert = self
            .store
            .resolve_alert(alert_id)
            .await?
            .ok_or_else(|| Error::alert_not_found(alert_id))?;
        info!("Alert {} resolved", alert_id);
        Ok(alert)
    }
}
