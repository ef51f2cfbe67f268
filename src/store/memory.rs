//! In-memory storage gateway for tests.
//!
//! Mirrors the PostgreSQL queries closely enough to exercise the domain
//! operations and routes: sequential ids, newest-first ordering, and the
//! join that enriches alerts with sensor details.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, MutexGuard,
};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use super::SensorStore;
use crate::error::{Error, Result};
use crate::models::{Alert, AlertDetail, Reading, Sensor};
use crate::rules::Severity;

// ---

#[derive(Default)]
struct Tables {
    sensors: Vec<Sensor>,
    readings: Vec<Reading>,
    alerts: Vec<Alert>,
    // Monotonic clock so ordering by time is deterministic.
    ticks: i64,
}

impl Tables {
    fn now(&mut self) -> chrono::DateTime<Utc> {
        self.ticks += 1;
        Utc::now() + Duration::milliseconds(self.ticks)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    // ---
    tables: Mutex<Tables>,
    fail_alert_inserts: AtomicBool,
}

impl MemoryStore {
    // ---
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `create_alert` fail with a storage error.
    pub fn fail_alert_inserts(&self) {
        self.fail_alert_inserts.store(true, Ordering::SeqCst);
    }

    pub fn reading_count(&self) -> usize {
        self.lock().readings.len()
    }

    pub fn alert_count(&self) -> usize {
        self.lock().alerts.len()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    fn detail(tables: &Tables, alert: &Alert) -> Option<AlertDetail> {
        tables
            .sensors
            .iter()
            .find(|s| s.sensor_id == alert.sensor_id)
            .map(|s| AlertDetail {
                alert: alert.clone(),
                sensor_type: s.sensor_type.clone(),
                location: s.location.clone(),
            })
    }
}

fn newest_first<T: Clone>(rows: impl Iterator<Item = T>, limit: i64) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.reverse();
    rows.truncate(limit.max(0) as usize);
    rows
}

#[async_trait]
impl SensorStore for MemoryStore {
    // ---
    async fn list_sensors(&self) -> Result<Vec<Sensor>> {
        Ok(self.lock().sensors.clone())
    }

    async fn get_sensor(&self, sensor_id: i32) -> Result<Option<Sensor>> {
        let tables = self.lock();
        Ok(tables.sensors.iter().find(|s| s.sensor_id == sensor_id).cloned())
    }

    async fn create_sensor(&self, sensor_type: &str, location: &str) -> Result<Sensor> {
        // ---
        let mut tables = self.lock();
        let sensor = Sensor {
            sensor_id: tables.sensors.len() as i32 + 1,
            sensor_type: sensor_type.to_string(),
            location: location.to_string(),
            installed_at: tables.now(),
        };
        tables.sensors.push(sensor.clone());
        Ok(sensor)
    }

    async fn list_readings(&self, sensor_id: i32, limit: i64) -> Result<Vec<Reading>> {
        let tables = self.lock();
        let rows = tables.readings.iter().filter(|r| r.sensor_id == sensor_id);
        Ok(newest_first(rows.cloned(), limit))
    }

    async fn list_all_readings(&self, limit: i64) -> Result<Vec<Reading>> {
        let tables = self.lock();
        Ok(newest_first(tables.readings.iter().cloned(), limit))
    }

    async fn create_reading(&self, sensor_id: i32, value: Decimal) -> Result<Reading> {
        // ---
        let mut tables = self.lock();
        let reading = Reading {
            data_id: tables.readings.len() as i32 + 1,
            sensor_id,
            reading_value: value,
            reading_time: tables.now(),
        };
        tables.readings.push(reading.clone());
        Ok(reading)
    }

    async fn create_alert(
        &self,
        sensor_id: i32,
        message: &str,
        severity: Severity,
    ) -> Result<Alert> {
        // ---
        if self.fail_alert_inserts.load(Ordering::SeqCst) {
            return Err(Error::Storage(sqlx::Error::PoolTimedOut));
        }

        let mut tables = self.lock();
        let alert = Alert {
            alert_id: tables.alerts.len() as i32 + 1,
            sensor_id,
            alert_message: message.to_string(),
            severity: severity.as_str().to_string(),
            triggered_at: tables.now(),
            is_resolved: false,
            resolved_at: None,
        };
        tables.alerts.push(alert.clone());
        Ok(alert)
    }

    async fn list_alerts(&self, limit: i64) -> Result<Vec<AlertDetail>> {
        let tables = self.lock();
        let rows = tables.alerts.iter().filter_map(|a| Self::detail(&tables, a));
        Ok(newest_first(rows, limit))
    }

    async fn list_active_alerts(&self) -> Result<Vec<AlertDetail>> {
        // ---
        let tables = self.lock();
        let rows = tables
            .alerts
            .iter()
            .filter(|a| !a.is_resolved)
            .filter_map(|a| Self::detail(&tables, a));
        Ok(newest_first(rows, i64::MAX))
    }

    async fn resolve_alert(&self, alert_id: i32) -> Result<Option<Alert>> {
        // ---
        let mut tables = self.lock();
        let now = tables.now();
        let Some(alert) = tables.alerts.iter_mut().find(|a| a.alert_id == alert_id) else {
            return Ok(None);
        };
        alert.is_resolved = true;
        alert.resolved_at.get_or_insert(now);
        Ok(Some(alert.clone()))
    }
}
