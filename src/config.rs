use std::time::Duration;

use anyhow::{Context, Result};
use chrono::FixedOffset;

use crate::health::{HealthEvaluator, MoistureCalibration};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL telemetry store. Readings are kept in memory when unset.
    pub database_url: Option<String>,
    pub server_host: String,
    pub server_port: u16,
    /// Background evaluation interval in seconds.
    pub monitor_interval_secs: u64,
    /// Number of most recent readings fetched per evaluation.
    pub history_limit: usize,
    /// Offset that defines local time for the 09:00–18:00 daylight window.
    /// Format: `"+HH:MM"` / `"-HH:MM"`.
    pub local_utc_offset: FixedOffset,
    pub moisture_calibration: MoistureCalibration,
    /// How long after composition an advisory should be shown.
    pub advisory_delay: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL").ok().filter(|s| !s.trim().is_empty()),
            server_host: optional("SERVER_HOST", "0.0.0.0"),
            server_port: optional("SERVER_PORT", "8080")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            monitor_interval_secs: parse_positive(
                "MONITOR_INTERVAL_SECS",
                &optional("MONITOR_INTERVAL_SECS", "3600"),
            )?,
            history_limit: usize::try_from(parse_positive(
                "HISTORY_LIMIT",
                &optional("HISTORY_LIMIT", "168"),
            )?)
            .context("HISTORY_LIMIT is too large")?,
            local_utc_offset: parse_utc_offset(&optional("LOCAL_UTC_OFFSET", "+00:00"))?,
            moisture_calibration: parse_moisture_calibration(
                &optional("MOISTURE_OFFSET", "1500"),
                &optional("MOISTURE_SCALE", "1000"),
            )?,
            advisory_delay: Duration::from_secs(
                optional("ADVISORY_DELAY_SECS", "5")
                    .parse()
                    .context("ADVISORY_DELAY_SECS must be a non-negative integer")?,
            ),
        })
    }

    pub fn evaluator(&self) -> HealthEvaluator {
        HealthEvaluator::new(self.moisture_calibration, self.local_utc_offset)
    }
}

/// Parse `"+02:00"`-style offsets.
fn parse_utc_offset(raw: &str) -> Result<FixedOffset> {
    raw.trim()
        .parse::<FixedOffset>()
        .with_context(|| format!("LOCAL_UTC_OFFSET must look like '+02:00', got: {raw:?}"))
}

fn parse_moisture_calibration(offset: &str, scale: &str) -> Result<MoistureCalibration> {
    let offset = offset
        .trim()
        .parse()
        .context("MOISTURE_OFFSET must be an integer")?;
    let scale = scale
        .trim()
        .parse()
        .context("MOISTURE_SCALE must be an integer")?;
    MoistureCalibration::new(offset, scale).context("invalid moisture calibration")
}

fn parse_positive(key: &str, raw: &str) -> Result<u64> {
    let value: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a positive integer, got: {raw:?}"))?;
    anyhow::ensure!(value > 0, "{key} must be a positive integer, got: 0");
    Ok(value)
}

fn optional(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
