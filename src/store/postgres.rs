//! PostgreSQL implementation of the storage gateway.
//!
//! Each method runs one parameterized statement against the pool. sqlx checks
//! a connection out for the duration of the statement and returns it when the
//! future completes or is dropped, including on error, and every write is
//! committed as soon as its statement finishes.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::debug;

use super::SensorStore;
use crate::error::Result;
use crate::models::{Alert, AlertDetail, Reading, Sensor};
use crate::rules::Severity;

// ---

const ALERT_DETAIL_SELECT: &str = r#"
    SELECT a.alert_id, a.sensor_id, a.alert_message, a.severity,
           a.triggered_at, a.is_resolved, a.resolved_at,
           s.sensor_type, s.location
    FROM alerts a
    JOIN sensors s ON a.sensor_id = s.sensor_id
"#;

#[derive(Debug, Clone)]
pub struct PgStore {
    // ---
    pool: PgPool,
}

impl PgStore {
    // ---
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SensorStore for PgStore {
    // ---
    async fn list_sensors(&self) -> Result<Vec<Sensor>> {
        // ---
        let sensors = sqlx::query_as::<_, Sensor>(
            "SELECT sensor_id, sensor_type, location, installed_at FROM sensors",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sensors)
    }

    async fn get_sensor(&self, sensor_id: i32) -> Result<Option<Sensor>> {
        // ---
        let sensor = sqlx::query_as::<_, Sensor>(
            r#"
            SELECT sensor_id, sensor_type, location, installed_at
            FROM sensors
            WHERE sensor_id = $1
            "#,
        )
        .bind(sensor_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sensor)
    }

    async fn create_sensor(&self, sensor_type: &str, location: &str) -> Result<Sensor> {
        // ---
        let sensor = sqlx::query_as::<_, Sensor>(
            r#"
            INSERT INTO sensors (sensor_type, location, installed_at)
            VALUES ($1, $2, NOW())
            RETURNING sensor_id, sensor_type, location, installed_at
            "#,
        )
        .bind(sensor_type)
        .bind(location)
        .fetch_one(&self.pool)
        .await?;

        debug!("Inserted sensor {}", sensor.sensor_id);
        Ok(sensor)
    }

    async fn list_readings(&self, sensor_id: i32, limit: i64) -> Result<Vec<Reading>> {
        // ---
        let readings = sqlx::query_as::<_, Reading>(
            r#"
            SELECT data_id, sensor_id, reading_value, reading_time
            FROM sensor_data
            WHERE sensor_id = $1
            ORDER BY reading_time DESC
            LIMIT $2
            "#,
        )
        .bind(sensor_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(readings)
    }

    async fn list_all_readings(&self, limit: i64) -> Result<Vec<Reading>> {
        // ---
        let readings = sqlx::query_as::<_, Reading>(
            r#"
            SELECT data_id, sensor_id, reading_value, reading_time
            FROM sensor_data
            ORDER BY reading_time DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(readings)
    }

    async fn create_reading(&self, sensor_id: i32, value: Decimal) -> Result<Reading> {
        // ---
        let reading = sqlx::query_as::<_, Reading>(
            r#"
            INSERT INTO sensor_data (sensor_id, reading_value, reading_time)
            VALUES ($1, $2, NOW())
            RETURNING data_id, sensor_id, reading_value, reading_time
            "#,
        )
        .bind(sensor_id)
        .bind(value)
        .fetch_one(&self.pool)
        .await?;

        debug!("Inserted reading {} for sensor {}", reading.data_id, sensor_id);
        Ok(reading)
    }

    async fn create_alert(
        &self,
        sensor_id: i32,
        message: &str,
        severity: Severity,
    ) -> Result<Alert> {
        // ---
        let alert = sqlx::query_as::<_, Alert>(
            r#"
            INSERT INTO alerts (sensor_id, alert_message, severity, triggered_at, is_resolved)
            VALUES ($1, $2, $3, NOW(), FALSE)
            RETURNING alert_id, sensor_id, alert_message, severity,
                      triggered_at, is_resolved, resolved_at
            "#,
        )
        .bind(sensor_id)
        .bind(message)
        .bind(severity.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(alert)
    }

    async fn list_alerts(&self, limit: i64) -> Result<Vec<AlertDetail>> {
        // ---
        let sql = format!("{ALERT_DETAIL_SELECT} ORDER BY a.triggered_at DESC LIMIT $1");
        let alerts = sqlx::query_as::<_, AlertDetail>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(alerts)
    }

    async fn list_active_alerts(&self) -> Result<Vec<AlertDetail>> {
        // ---
        let sql = format!(
            "{ALERT_DETAIL_SELECT} WHERE a.is_resolved = FALSE ORDER BY a.triggered_at DESC"
        );
        let alerts = sqlx::query_as::<_, AlertDetail>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(alerts)
    }

    async fn resolve_alert(&self, alert_id: i32) -> Result<Option<Alert>> {
        // ---
        let alert = sqlx::query_as::<_, Alert>(
            r#"
            UPDATE alerts
            SET is_resolved = TRUE,
                resolved_at = COALESCE(resolved_at, NOW())
            WHERE alert_id = $1
            RETURNING alert_id, sensor_id, alert_message, severity,
                      triggered_at, is_resolved, resolved_at
            "#,
        )
        .bind(alert_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(alert)
    }
}
