//! Synthetic sensor client for exercising a running telemetry service.
//!
//! Registers a fixed set of demo sensors and posts random readings to them
//! over HTTP, with an occasional out-of-range value so alerts fire. Talks to
//! the service only through its public API.
//!
//! ```text
//! simulator setup
//! simulator batch --count 10
//! simulator stream --interval 5
//! simulator alerts
//! ```

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

// ---

#[derive(Parser)]
#[command(about = "Send synthetic agricultural sensor readings to the telemetry API")]
struct Args {
    /// Base URL of the telemetry service.
    #[arg(long, env = "SIM_BASE_URL", default_value = "http://localhost:8080")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register the demo sensors (run once against an empty database).
    Setup,
    /// Send a fixed number of reading rounds, one reading per sensor each.
    Batch {
        #[arg(long, default_value_t = 10)]
        count: u32,
    },
    /// Send a round of readings every `interval` seconds until interrupted.
    Stream {
        #[arg(long, default_value_t = 5)]
        interval: u64,
    },
    /// Print the most recent alerts.
    Alerts,
}

/// A demo sensor and the range its normal readings fall in.
struct SimSensor {
    sensor_id: i32,
    sensor_type: &'static str,
    location: &'static str,
    min: f64,
    max: f64,
}

const SENSORS: &[SimSensor] = &[
    SimSensor {
        sensor_id: 1,
        sensor_type: "soil_moisture",
        location: "Field A",
        min: 10.0,
        max: 80.0,
    },
    SimSensor {
        sensor_id: 2,
        sensor_type: "temperature",
        location: "Field A",
        min: 15.0,
        max: 40.0,
    },
    SimSensor {
        sensor_id: 3,
        sensor_type: "humidity",
        location: "Field A",
        min: 25.0,
        max: 95.0,
    },
    SimSensor {
        sensor_id: 4,
        sensor_type: "soil_moisture",
        location: "Field B",
        min: 10.0,
        max: 80.0,
    },
    SimSensor {
        sensor_id: 5,
        sensor_type: "temperature",
        location: "Field B",
        min: 15.0,
        max: 40.0,
    },
];

const ANOMALY_CHANCE: f64 = 0.1;

#[derive(Serialize)]
struct NewSensor<'a> {
    sensor_type: &'a str,
    location: &'a str,
}

#[derive(Serialize)]
struct NewReading {
    sensor_id: i32,
    reading_value: f64,
}

#[derive(Debug, Deserialize)]
struct AlertRow {
    alert_message: String,
    severity: String,
    location: String,
}

#[derive(Debug, Deserialize)]
struct AlertList {
    alerts: Vec<AlertRow>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    tracing_subscriber::fmt().with_target(false).compact().init();

    let args = Args::parse();
    let client = Client::new();
    let base = args.base_url.trim_end_matches('/');

    check_health(&client, base).await?;

    match args.command {
        Command::Setup => create_sensors(&client, base).await,
        Command::Batch { count } => {
            for round in 1..=count {
                info!("Batch {}/{}", round, count);
                send_round(&client, base).await;
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
            info!("Batch simulation complete");
            Ok(())
        }
        Command::Stream { interval } => loop {
            send_round(&client, base).await;
            tokio::time::sleep(Duration::from_secs(interval)).await;
        },
        Command::Alerts => show_alerts(&client, base).await,
    }
}

async fn check_health(client: &Client, base: &str) -> Result<()> {
    // ---
    let response = client
        .get(format!("{base}/health"))
        .send()
        .await
        .with_context(|| format!("Cannot reach telemetry service at {base}"))?;

    if !response.status().is_success() {
        bail!("Telemetry service returned {}", response.status());
    }
    Ok(())
}

async fn create_sensors(client: &Client, base: &str) -> Result<()> {
    // ---
    for sensor in SENSORS {
        let body = NewSensor {
            sensor_type: sensor.sensor_type,
            location: sensor.location,
        };
        let response = client.post(format!("{base}/sensors")).json(&body).send().await?;
        if response.status().is_success() {
            info!("Created sensor {} at {}", sensor.sensor_type, sensor.location);
        } else {
            warn!("Could not create {}: {}", sensor.sensor_type, response.text().await?);
        }
    }
    Ok(())
}

/// A random reading for a sensor; occasionally out of range to trigger an alert.
fn generate_reading(sensor: &SimSensor, rng: &mut impl Rng) -> f64 {
    // ---
    let value = if rng.gen_bool(ANOMALY_CHANCE) {
        match sensor.sensor_type {
            "soil_moisture" => rng.gen_range(5.0..18.0),
            "temperature" => rng.gen_range(36.0..42.0),
            "humidity" => rng.gen_range(15.0..28.0),
            _ => rng.gen_range(sensor.min..sensor.max),
        }
    } else {
        rng.gen_range(sensor.min..sensor.max)
    };
    (value * 100.0).round() / 100.0
}

async fn send_round(client: &Client, base: &str) {
    // ---
    for sensor in SENSORS {
        let value = generate_reading(sensor, &mut rand::thread_rng());
        if let Err(e) = send_reading(client, base, sensor.sensor_id, value).await {
            warn!("Failed to send reading for sensor {}: {:#}", sensor.sensor_id, e);
        }
    }
}

async fn send_reading(client: &Client, base: &str, sensor_id: i32, value: f64) -> Result<()> {
    // ---
    let body = NewReading {
        sensor_id,
        reading_value: value,
    };
    let response = client.post(format!("{base}/readings")).json(&body).send().await?;
    if !response.status().is_success() {
        bail!("{}: {}", response.status(), response.text().await?);
    }

    let body: Value = response.json().await?;
    match body.get("alert").and_then(|a| a.get("alert_message")) {
        Some(message) => warn!("ALERT sensor {}: {} | {}", sensor_id, value, message),
        None => info!("sensor {}: {}", sensor_id, value),
    }
    Ok(())
}

async fn show_alerts(client: &Client, base: &str) -> Result<()> {
    // ---
    let list: AlertList = client
        .get(format!("{base}/alerts?limit=5"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    if list.alerts.is_empty() {
        info!("No alerts found");
    }
    for alert in &list.alerts {
        info!("{} ({}) - {} severity", alert.alert_message, alert.location, alert.severity);
    }
    Ok(())
}
