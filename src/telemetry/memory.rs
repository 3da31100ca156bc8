use std::{cmp::Reverse, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{TelemetryError, TelemetrySource};
use crate::db::models::{NewSensorReading, SensorReading};

/// Volatile telemetry store used when no database is configured, and in
/// tests.
#[derive(Clone, Default)]
pub struct MemoryTelemetrySource {
    readings: Arc<RwLock<Vec<SensorReading>>>,
}

impl MemoryTelemetrySource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TelemetrySource for MemoryTelemetrySource {
    async fn recent(&self, limit: Option<usize>) -> Result<Vec<SensorReading>, TelemetryError> {
        let mut readings = self.readings.read().await.clone();
        readings.sort_by_key(|r| Reverse(r.timestamp));
        if let Some(limit) = limit {
            readings.truncate(limit);
        }
        Ok(readings)
    }

    async fn record(&self, reading: NewSensorReading) -> Result<SensorReading, TelemetryError> {
        let reading = reading.into_reading(Uuid::new_v4());
        self.readings.write().await.push(reading.clone());
        Ok(reading)
    }
}
