//! Configuration loader for the `agri-telemetry` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). The resulting [`Config`] is built once in `main`
//! and handed explicitly to the storage gateway and the server; nothing else
//! reads the environment.
//!
//! Defaults exist for local development only.
use std::{env, net::SocketAddr, time::Duration};

use anyhow::{anyhow, Result};
use sqlx::postgres::PgConnectOptions;

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u32 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Read an optional string environment variable, recording when the default
/// was used.
macro_rules! env_or_default {
    ($var_name:expr, $default:expr, $defaulted:expr) => {
        env::var($var_name).unwrap_or_else(|_| {
            $defaulted.push($var_name);
            $default.to_string()
        })
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// PostgreSQL host name.
    pub db_host: String,

    /// PostgreSQL port.
    pub db_port: u16,

    /// PostgreSQL user.
    pub db_user: String,

    /// PostgreSQL password. Never logged.
    pub db_password: String,

    /// Database name.
    pub db_name: String,

    /// Maximum number of database connections in the pool.
    pub db_pool_max: u32,

    /// Upper bound for acquiring a connection and for any single statement.
    pub db_timeout: Duration,

    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,

    /// Variables that fell back to their development default.
    pub defaulted: Vec<&'static str>,
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `DB_HOST` – database host (default: `localhost`)
/// - `DB_PORT` – database port (default: 5432)
/// - `DB_USER` – database user (default: `postgres`)
/// - `DB_PASSWORD` – database password (default: `postgres`)
/// - `DB_NAME` – database name (default: `agri_sensors`)
/// - `DB_POOL_MAX` – max DB connections (default: 5)
/// - `DB_TIMEOUT_SECS` – acquire and statement timeout (default: 5)
/// - `BIND_ADDR` – listen address (default: `0.0.0.0:8080`)
///
/// Returns an error if any variable is present but invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let mut defaulted = Vec::new();

    let db_host = env_or_default!("DB_HOST", "localhost", defaulted);
    let db_user = env_or_default!("DB_USER", "postgres", defaulted);
    let db_password = env_or_default!("DB_PASSWORD", "postgres", defaulted);
    let db_name = env_or_default!("DB_NAME", "agri_sensors", defaulted);

    let db_port = parse_port(env::var("DB_PORT").ok().as_deref(), &mut defaulted)?;
    let db_pool_max = parse_env_u32!("DB_POOL_MAX", 5);
    let db_timeout = parse_timeout(parse_env_u32!("DB_TIMEOUT_SECS", 5))?;

    let bind_addr = env_or_default!("BIND_ADDR", "0.0.0.0:8080", defaulted)
        .parse::<SocketAddr>()
        .map_err(|e| anyhow!("Invalid BIND_ADDR: {}", e))?;

    Ok(Config {
        db_host,
        db_port,
        db_user,
        db_password,
        db_name,
        db_pool_max,
        db_timeout,
        bind_addr,
        defaulted,
    })
}

fn parse_port(value: Option<&str>, defaulted: &mut Vec<&'static str>) -> Result<u16> {
    // ---
    match value {
        None => {
            defaulted.push("DB_PORT");
            Ok(5432)
        }
        Some(v) => v.parse::<u16>().map_err(|e| anyhow!("Invalid DB_PORT: {}", e)),
    }
}

/// Zero would disable `statement_timeout` and fail every pool acquire.
fn parse_timeout(secs: u32) -> Result<Duration> {
    // ---
    if secs == 0 {
        return Err(anyhow!("Invalid DB_TIMEOUT_SECS: must be at least 1"));
    }
    Ok(Duration::from_secs(secs.into()))
}

impl Config {
    /// Connection options for the pool.
    ///
    /// The timeout is also applied server-side as `statement_timeout` so a slow
    /// query surfaces as a storage error instead of hanging a request.
    pub fn connect_options(&self) -> PgConnectOptions {
        // ---
        let statement_timeout = format!("{}ms", self.db_timeout.as_millis());
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name)
            .options([("statement_timeout", statement_timeout.as_str())])
    }

    /// Log the loaded configuration for debugging purposes.
    ///
    /// The password is masked. Variables that fell back to a development
    /// default are called out with a warning.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  DB_HOST         : {}", self.db_host);
        tracing::info!("  DB_PORT         : {}", self.db_port);
        tracing::info!("  DB_USER         : {}", self.db_user);
        tracing::info!("  DB_PASSWORD     : ****");
        tracing::info!("  DB_NAME         : {}", self.db_name);
        tracing::info!("  DB_POOL_MAX     : {}", self.db_pool_max);
        tracing::info!("  DB_TIMEOUT_SECS : {}", self.db_timeout.as_secs());
        tracing::info!("  BIND_ADDR       : {}", self.bind_addr);

        if !self.defaulted.is_empty() {
            tracing::warn!(
                "Using local development defaults for {}; set them explicitly in production",
                self.defaulted.join(", ")
            );
        }
    }
}
