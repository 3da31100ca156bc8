use chrono::{FixedOffset, Offset, Timelike, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{
    categories::{Humidity, Lighting, Moisture, Temperature},
    normalize::{normalize_light_intensity, MoistureCalibration},
};
use crate::{db::models::SensorReading, plants::PlantProfile};

/// Daytime window bounds in seconds from local midnight (both exclusive).
const DAYTIME_START_SECS: u32 = 9 * 3600;
const DAYTIME_END_SECS: u32 = 18 * 3600;

/// Outcome of comparing one reading against one plant profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthVerdict {
    pub lighting_ideal: bool,
    pub moisture_ideal: bool,
    pub humidity_ideal: bool,
    pub temperature_ideal: bool,
}

impl HealthVerdict {
    pub fn all_ideal(&self) -> bool {
        self.lighting_ideal && self.moisture_ideal && self.humidity_ideal && self.temperature_ideal
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// `light` is the raw period average (or a single raw reading), not a
/// normalised percentage.
pub fn is_lighting_ideal(light: i64, ideal: Lighting) -> bool {
    match ideal {
        Lighting::BrightLight => light > ideal.level(),
        Lighting::Shade => light <= ideal.level(),
    }
}

/// Ideal means the soil is still wetter than the category's dry threshold.
/// `normalized_moisture` is a percentage.
pub fn is_moisture_ideal(normalized_moisture: i64, ideal: Moisture) -> bool {
    match ideal {
        Moisture::Dry | Moisture::BoneDry => normalized_moisture > ideal.level(),
    }
}

pub fn is_humidity_ideal(humidity: i64, ideal: Humidity) -> bool {
    match ideal {
        Humidity::Dry => humidity <= ideal.level(),
        Humidity::Normal => humidity > Humidity::Dry.level() && humidity <= ideal.level(),
        Humidity::Humid => humidity > ideal.level(),
    }
}

pub fn is_temperature_ideal(temperature: i64, ideal: Temperature) -> bool {
    match ideal {
        Temperature::Cold => temperature <= ideal.level(),
        Temperature::Normal => temperature > Temperature::Cold.level() && temperature <= ideal.level(),
        Temperature::Hot => temperature > ideal.level(),
    }
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

/// Stateless plant-health classifier.
///
/// Holds only configuration (moisture calibration and the UTC offset that
/// defines "local time" for the daytime window). `Copy`, so every task can
/// own one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthEvaluator {
    moisture: MoistureCalibration,
    utc_offset: FixedOffset,
}

impl Default for HealthEvaluator {
    fn default() -> Self {
        Self {
            moisture: MoistureCalibration::default(),
            utc_offset: Utc.fix(),
        }
    }
}

impl HealthEvaluator {
    pub fn new(moisture: MoistureCalibration, utc_offset: FixedOffset) -> Self {
        Self { moisture, utc_offset }
    }

    pub fn normalize_light_intensity(&self, raw: i64) -> i64 {
        normalize_light_intensity(raw)
    }

    pub fn normalize_moisture(&self, raw: i64) -> i64 {
        self.moisture.normalize(raw)
    }

    /// Whether `reading` was taken strictly between 09:00:00 and 18:00:00
    /// local time. Sub-second precision is ignored, so anything within the
    /// boundary seconds is excluded.
    pub fn is_daytime(&self, reading: &SensorReading) -> bool {
        let secs = reading
            .timestamp
            .with_timezone(&self.utc_offset)
            .num_seconds_from_midnight();
        secs > DAYTIME_START_SECS && secs < DAYTIME_END_SECS
    }

    /// Truncating mean of raw light intensity over daytime readings, or
    /// `None` when no reading falls inside the window. Order is irrelevant.
    pub fn daytime_light_average(&self, readings: &[SensorReading]) -> Option<i64> {
        let (sum, count) = readings
            .iter()
            .filter(|r| self.is_daytime(r))
            .fold((0i128, 0i128), |(sum, count), r| {
                (sum + i128::from(r.light_intensity), count + 1)
            });

        (count > 0).then(|| (sum / count) as i64)
    }

    /// Like [`Self::daytime_light_average`] but reports an empty window as 0.
    pub fn average_daytime_light(&self, readings: &[SensorReading]) -> i64 {
        self.daytime_light_average(readings).unwrap_or(0)
    }

    /// Light value the lighting predicate compares: the period average when
    /// one is known, otherwise the latest raw reading.
    pub fn effective_light(&self, latest: &SensorReading, light_average: Option<i64>) -> i64 {
        light_average.unwrap_or(latest.light_intensity)
    }

    pub fn evaluate_all(
        &self,
        latest: &SensorReading,
        plant: &PlantProfile,
        light_average: Option<i64>,
    ) -> HealthVerdict {
        HealthVerdict {
            lighting_ideal: is_lighting_ideal(self.effective_light(latest, light_average), plant.lighting),
            moisture_ideal: is_moisture_ideal(self.normalize_moisture(latest.moisture), plant.moisture),
            humidity_ideal: is_humidity_ideal(latest.humidity, plant.humidity),
            temperature_ideal: is_temperature_ideal(latest.temperature, plant.temperature),
        }
    }
}
