use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One timestamped snapshot of the plant sensor.
///
/// Value conventions (stored as `BIGINT`, no scaling):
/// - `light_intensity`, `moisture`: raw sensor units, may exceed the expected max
/// - `humidity`, `battery`: percent, 0..=100
/// - `temperature`: degrees Celsius
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct SensorReading {
    pub id: Uuid,
    pub light_intensity: i64,
    pub moisture: i64,
    pub humidity: i64,
    pub temperature: i64,
    pub battery: i64,
    pub charging: bool,
    #[sqlx(rename = "recorded_at")]
    pub timestamp: DateTime<Utc>,
}

impl SensorReading {
    /// Placeholder shown before any telemetry has arrived.
    pub fn fallback(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::nil(),
            light_intensity: 800,
            moisture: 30,
            humidity: 36,
            temperature: 20,
            battery: 80,
            charging: false,
            timestamp: now,
        }
    }
}

/// Incoming telemetry document.
///
/// Sensors publish camelCase field names; missing numeric fields read as 0
/// and a missing `charging` flag as `false`. The timestamp is mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewSensorReading {
    #[serde(default, alias = "lightIntensity")]
    pub light_intensity: i64,
    #[serde(default)]
    pub moisture: i64,
    #[serde(default)]
    pub humidity: i64,
    #[serde(default)]
    pub temperature: i64,
    #[serde(default)]
    pub battery: i64,
    #[serde(default)]
    pub charging: bool,
    pub timestamp: DateTime<Utc>,
}

impl NewSensorReading {
    pub fn into_reading(self, id: Uuid) -> SensorReading {
        SensorReading {
            id,
            light_intensity: self.light_intensity,
            moisture: self.moisture,
            humidity: self.humidity,
            temperature: self.temperature,
            battery: self.battery,
            charging: self.charging,
            timestamp: self.timestamp,
        }
    }
}
