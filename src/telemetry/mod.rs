pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::{
    db::models::{NewSensorReading, SensorReading},
    health::HealthEvaluator,
};

pub use memory::MemoryTelemetrySource;
pub use postgres::PgTelemetrySource;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Store of plant sensor readings.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Readings ordered newest first. `limit = None` returns everything.
    async fn recent(&self, limit: Option<usize>) -> Result<Vec<SensorReading>, TelemetryError>;

    /// Persist one reading and return it with its assigned id.
    async fn record(&self, reading: NewSensorReading) -> Result<SensorReading, TelemetryError>;
}

/// The reading with the greatest timestamp, whatever the input order.
pub fn latest(readings: &[SensorReading]) -> Option<&SensorReading> {
    readings.iter().max_by_key(|r| r.timestamp)
}

// ---------------------------------------------------------------------------
// Chart windows
// ---------------------------------------------------------------------------

/// How far back a chart looks, in number of (hourly) readings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DataRange {
    /// Last 6 hours.
    #[default]
    Hours,
    /// Last 24 hours.
    Day,
    /// Last week.
    Week,
    AllTime,
}

impl DataRange {
    pub const fn limit(self) -> Option<usize> {
        match self {
            DataRange::Hours => Some(6),
            DataRange::Day => Some(24),
            DataRange::Week => Some(168),
            DataRange::AllTime => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DataRange::Hours => "Last 6 hours",
            DataRange::Day => "Last 24 hours",
            DataRange::Week => "Last week",
            DataRange::AllTime => "All time",
        }
    }
}

/// Newest `range.limit()` readings from a newest-first slice, returned
/// oldest first for plotting.
pub fn ordered_window(newest_first: &[SensorReading], range: DataRange) -> Vec<SensorReading> {
    let take = range.limit().unwrap_or(newest_first.len());
    newest_first.iter().take(take).rev().cloned().collect()
}

/// One chart sample. Light and moisture are normalised percentages;
/// humidity and temperature are raw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    pub light: i64,
    pub moisture: i64,
    pub humidity: i64,
    pub temperature: i64,
}

pub fn chart_series(readings: &[SensorReading], evaluator: &HealthEvaluator) -> Vec<ChartPoint> {
    readings
        .iter()
        .map(|r| ChartPoint {
            timestamp: r.timestamp,
            light: evaluator.normalize_light_intensity(r.light_intensity),
            moisture: evaluator.normalize_moisture(r.moisture),
            humidity: r.humidity,
            temperature: r.temperature,
        })
        .collect()
}
