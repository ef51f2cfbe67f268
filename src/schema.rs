//! Database schema management for `agri-telemetry`.
//!
//! Ensures the sensor, reading, and alert tables exist before serving requests.
//! Applied once on startup from `main.rs`.

use anyhow::Result;
use sqlx::PgPool;

// ---

/// Create the database schema if it is missing (idempotent).
///
/// Readings and alerts reference `sensors` with cascading deletes. Safe to call
/// on every startup; no-op if the objects already exist.
///
/// Errors are propagated if any SQL execution fails.
pub async fn create_schema(pool: &PgPool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sensors (
            sensor_id     SERIAL PRIMARY KEY,
            sensor_type   TEXT        NOT NULL,
            location      TEXT        NOT NULL,
            installed_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sensor_data (
            data_id        SERIAL PRIMARY KEY,
            sensor_id      INTEGER     NOT NULL
                           REFERENCES sensors (sensor_id) ON DELETE CASCADE,
            reading_value  NUMERIC     NOT NULL,
            reading_time   TIMESTAMPTZ NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS alerts (
            alert_id       SERIAL PRIMARY KEY,
            sensor_id      INTEGER     NOT NULL
                           REFERENCES sensors (sensor_id) ON DELETE CASCADE,
            alert_message  TEXT        NOT NULL,
            severity       TEXT        NOT NULL
                           CHECK (severity IN ('low', 'medium', 'high')),
            triggered_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            is_resolved    BOOLEAN     NOT NULL DEFAULT FALSE,
            resolved_at    TIMESTAMPTZ
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Indexes for the newest-first listings
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_sensor_data_sensor_time
            ON sensor_data (sensor_id, reading_time DESC);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_alerts_triggered_at
            ON alerts (triggered_at DESC);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
