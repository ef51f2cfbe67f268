//! Storage gateway: the only component that talks to the backing store.
//!
//! The trait is the contract; `postgres` is the production implementation and
//! `memory` is an in-process stand-in used by the unit and router tests.
//! Implementations hold no per-request state and every call acquires and
//! releases its own connection, so a single instance is shared freely across
//! concurrent requests.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::models::{Alert, AlertDetail, Reading, Sensor};
use crate::rules::Severity;

#[cfg(test)]
pub mod memory;
mod postgres;

pub use postgres::PgStore;

// ---

#[async_trait]
pub trait SensorStore: Send + Sync {
    // ---
    /// All sensors, in no particular order.
    async fn list_sensors(&self) -> Result<Vec<Sensor>>;

    async fn get_sensor(&self, sensor_id: i32) -> Result<Option<Sensor>>;

    /// Insert a sensor with a store-assigned id and `installed_at = now`.
    async fn create_sensor(&self, sensor_type: &str, location: &str) -> Result<Sensor>;

    /// Most recent `limit` readings for one sensor, newest first.
    async fn list_readings(&self, sensor_id: i32, limit: i64) -> Result<Vec<Reading>>;

    /// Most recent `limit` readings across all sensors, newest first.
    async fn list_all_readings(&self, limit: i64) -> Result<Vec<Reading>>;

    /// Insert a reading stamped with the store's clock.
    ///
    /// Does not check that the sensor exists; callers must.
    async fn create_reading(&self, sensor_id: i32, value: Decimal) -> Result<Reading>;

    /// Insert an unresolved alert.
    async fn create_alert(
        &self,
        sensor_id: i32,
        message: &str,
        severity: Severity,
    ) -> Result<Alert>;

    /// Most recent `limit` alerts joined with their sensor, newest first.
    async fn list_alerts(&self, limit: i64) -> Result<Vec<AlertDetail>>;

    /// Every unresolved alert joined with its sensor, newest first.
    async fn list_active_alerts(&self) -> Result<Vec<AlertDetail>>;

    /// Mark an alert resolved. `resolved_at` is only set on the first call;
    /// resolving again returns the row unchanged. `None` if the id is unknown.
    async fn resolve_alert(&self, alert_id: i32) -> Result<Option<Alert>>;
}
