//! Turns health verdicts into the human-readable lines shown next to charts
//! and sent as notifications.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    db::models::SensorReading,
    health::{HealthEvaluator, HealthVerdict, Humidity, Lighting, Temperature},
    plants::PlantProfile,
};

/// Sensor battery percentage below which a low-battery line is added.
pub const BATTERY_LOW_THRESHOLD: i64 = 72;

pub const ADVISORY_TITLE: &str = "FloraFeed";

/// Condition of one dimension, as the plant owner should read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Advice {
    IdealLighting,
    TooBright,
    TooDark,
    NoWateringNeeded,
    NeedsWatering,
    IdealHumidity,
    TooHumid,
    TooDry,
    IdealTemperature,
    TooHot,
    TooCold,
}

impl Advice {
    pub fn is_ideal(self) -> bool {
        matches!(
            self,
            Advice::IdealLighting
                | Advice::NoWateringNeeded
                | Advice::IdealHumidity
                | Advice::IdealTemperature
        )
    }

    pub fn message(self, plant_name: &str) -> String {
        match self {
            Advice::IdealLighting => format!("Lighting is ideal at this location for {plant_name}."),
            Advice::TooBright => {
                format!("Average light levels are too high in this location for {plant_name}.")
            }
            Advice::TooDark => {
                format!("Average light levels are too low in this location for {plant_name}.")
            }
            Advice::NoWateringNeeded => format!("{plant_name} doesn't need to be watered yet."),
            Advice::NeedsWatering => format!("{plant_name} needs to be watered."),
            Advice::IdealHumidity => format!("Humidity is ideal for {plant_name}."),
            Advice::TooHumid => format!("It is too humid for {plant_name}."),
            Advice::TooDry => format!("It is too dry for {plant_name}."),
            Advice::IdealTemperature => {
                format!("Temperature is ideal at this location for {plant_name}.")
            }
            Advice::TooHot => format!("It is too hot for {plant_name}."),
            Advice::TooCold => format!("It is too cold for {plant_name}."),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-dimension advice
// ---------------------------------------------------------------------------

pub fn lighting_advice(ideal: bool, category: Lighting) -> Advice {
    match (ideal, category) {
        (true, _) => Advice::IdealLighting,
        (false, Lighting::BrightLight) => Advice::TooDark,
        (false, Lighting::Shade) => Advice::TooBright,
    }
}

pub fn moisture_advice(ideal: bool) -> Advice {
    if ideal {
        Advice::NoWateringNeeded
    } else {
        Advice::NeedsWatering
    }
}

pub fn humidity_advice(ideal: bool, humidity: i64, category: Humidity) -> Advice {
    match (ideal, category) {
        (true, _) => Advice::IdealHumidity,
        (false, Humidity::Dry) => Advice::TooHumid,
        (false, Humidity::Humid) => Advice::TooDry,
        (false, Humidity::Normal) if humidity > category.level() => Advice::TooHumid,
        (false, Humidity::Normal) => Advice::TooDry,
    }
}

pub fn temperature_advice(ideal: bool, temperature: i64, category: Temperature) -> Advice {
    match (ideal, category) {
        (true, _) => Advice::IdealTemperature,
        (false, Temperature::Cold) => Advice::TooHot,
        (false, Temperature::Hot) => Advice::TooCold,
        (false, Temperature::Normal) if temperature > category.level() => Advice::TooHot,
        (false, Temperature::Normal) => Advice::TooCold,
    }
}

pub fn battery_low(reading: &SensorReading) -> bool {
    reading.battery < BATTERY_LOW_THRESHOLD
}

pub fn battery_message(reading: &SensorReading) -> String {
    format!("Sensor battery is low ({}%).", reading.battery)
}

// ---------------------------------------------------------------------------
// PlantReport
// ---------------------------------------------------------------------------

/// Normalised values of the latest reading, 0..=100 per dimension except
/// temperature which stays in °C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NormalizedValues {
    pub light: i64,
    pub moisture: i64,
    pub humidity: i64,
    pub temperature: i64,
}

/// Everything the presentation layer needs to render one plant's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PlantReport {
    pub plant: PlantProfile,
    pub latest: SensorReading,
    /// Daytime light average, if one is known.
    pub light_average: Option<i64>,
    /// Value the lighting verdict was based on.
    pub effective_light: i64,
    pub normalized: NormalizedValues,
    pub verdict: HealthVerdict,
    pub advice: Vec<Advice>,
    pub messages: Vec<String>,
    pub battery_low: bool,
}

impl PlantReport {
    pub fn build(
        evaluator: &HealthEvaluator,
        plant: &PlantProfile,
        latest: &SensorReading,
        light_average: Option<i64>,
    ) -> Self {
        let verdict = evaluator.evaluate_all(latest, plant, light_average);
        let advice = vec![
            lighting_advice(verdict.lighting_ideal, plant.lighting),
            moisture_advice(verdict.moisture_ideal),
            humidity_advice(verdict.humidity_ideal, latest.humidity, plant.humidity),
            temperature_advice(verdict.temperature_ideal, latest.temperature, plant.temperature),
        ];
        let messages = advice.iter().map(|a| a.message(&plant.name)).collect();

        Self {
            plant: plant.clone(),
            latest: latest.clone(),
            light_average,
            effective_light: evaluator.effective_light(latest, light_average),
            normalized: NormalizedValues {
                light: evaluator.normalize_light_intensity(latest.light_intensity),
                moisture: evaluator.normalize_moisture(latest.moisture),
                humidity: latest.humidity,
                temperature: latest.temperature,
            },
            verdict,
            advice,
            messages,
            battery_low: battery_low(latest),
        }
    }

    /// Messages for the dimensions that are not ideal.
    pub fn problems(&self) -> impl Iterator<Item = String> + '_ {
        self.advice
            .iter()
            .filter(|a| !a.is_ideal())
            .map(|a| a.message(&self.plant.name))
    }
}

// ---------------------------------------------------------------------------
// Advisory
// ---------------------------------------------------------------------------

/// A multi-line notification to be delivered after `deliver_after`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub title: String,
    pub lines: Vec<String>,
    pub deliver_after: Duration,
}

impl Advisory {
    pub fn body(&self) -> String {
        self.lines.join("\n")
    }
}

/// One line per failing dimension of every plant, plus a battery line.
/// `None` when everything is ideal and the battery is fine.
pub fn compose_advisory(
    reports: &[PlantReport],
    latest: &SensorReading,
    deliver_after: Duration,
) -> Option<Advisory> {
    let mut lines: Vec<String> = reports.iter().flat_map(|r| r.problems()).collect();
    if battery_low(latest) {
        lines.push(battery_message(latest));
    }

    (!lines.is_empty()).then(|| Advisory {
        title: ADVISORY_TITLE.to_owned(),
        lines,
        deliver_after,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::health::Moisture;

    fn reading(light: i64, moisture: i64, humidity: i64, temperature: i64, battery: i64) -> SensorReading {
        SensorReading {
            id: Uuid::new_v4(),
            light_intensity: light,
            moisture,
            humidity,
            temperature,
            battery,
            charging: false,
            timestamp: Utc::now(),
        }
    }

    fn plant(name: &str, l: Lighting, m: Moisture, h: Humidity, t: Temperature) -> PlantProfile {
        PlantProfile::new(name, "IMG", l, m, h, t).unwrap()
    }

    #[test]
    fn lighting_advice_follows_category_direction() {
        assert_eq!(lighting_advice(true, Lighting::Shade), Advice::IdealLighting);
        assert_eq!(lighting_advice(false, Lighting::BrightLight), Advice::TooDark);
        assert_eq!(lighting_advice(false, Lighting::Shade), Advice::TooBright);
    }

    #[test]
    fn humidity_advice_for_normal_depends_on_side() {
        assert_eq!(humidity_advice(false, 60, Humidity::Normal), Advice::TooHumid);
        assert_eq!(humidity_advice(false, 20, Humidity::Normal), Advice::TooDry);
        assert_eq!(humidity_advice(false, 40, Humidity::Dry), Advice::TooHumid);
        assert_eq!(humidity_advice(false, 40, Humidity::Humid), Advice::TooDry);
    }

    #[test]
    fn temperature_advice_for_normal_depends_on_side() {
        assert_eq!(temperature_advice(false, 30, Temperature::Normal), Advice::TooHot);
        assert_eq!(temperature_advice(false, 10, Temperature::Normal), Advice::TooCold);
        assert_eq!(temperature_advice(false, 20, Temperature::Cold), Advice::TooHot);
        assert_eq!(temperature_advice(false, 20, Temperature::Hot), Advice::TooCold);
        assert_eq!(temperature_advice(true, 20, Temperature::Normal), Advice::IdealTemperature);
    }

    #[test]
    fn advice_messages_include_plant_name() {
        assert_eq!(Advice::NeedsWatering.message("Fern"), "Fern needs to be watered.");
        assert_eq!(Advice::TooCold.message("Fern"), "It is too cold for Fern.");
        assert!(Advice::NoWateringNeeded.is_ideal());
        assert!(!Advice::TooDry.is_ideal());
    }

    #[test]
    fn battery_low_strictly_below_threshold() {
        let mut r = reading(0, 50, 40, 20, 71);
        assert!(battery_low(&r));
        r.battery = 72;
        assert!(!battery_low(&r));
    }

    #[test]
    fn battery_low_ignores_charging_flag() {
        let mut r = reading(0, 50, 40, 20, 10);
        r.charging = true;
        assert!(battery_low(&r));
    }

    #[test]
    fn report_matches_end_to_end_scenario() {
        let e = HealthEvaluator::default();
        let latest = reading(1600, 20, 55, 10, 70);
        let p = plant("Cactus", Lighting::Shade, Moisture::Dry, Humidity::Humid, Temperature::Cold);

        let report = PlantReport::build(&e, &p, &latest, Some(400));
        assert_eq!(report.effective_light, 400);
        assert_eq!(report.normalized.light, 100);
        assert_eq!(report.normalized.moisture, 20);
        assert!(report.battery_low);
        assert_eq!(
            report.advice,
            vec![
                Advice::IdealLighting,
                Advice::NeedsWatering,
                Advice::IdealHumidity,
                Advice::IdealTemperature,
            ]
        );
        assert_eq!(report.problems().collect::<Vec<_>>(), ["Cactus needs to be watered."]);
    }

    #[test]
    fn compose_collects_problems_and_battery() {
        let e = HealthEvaluator::default();
        let latest = reading(300, 20, 55, 30, 50);
        let a = plant("Ficus", Lighting::BrightLight, Moisture::Dry, Humidity::Humid, Temperature::Hot);
        let b = plant("Moss", Lighting::Shade, Moisture::BoneDry, Humidity::Dry, Temperature::Cold);

        let reports = [
            PlantReport::build(&e, &a, &latest, None),
            PlantReport::build(&e, &b, &latest, None),
        ];
        let advisory = compose_advisory(&reports, &latest, Duration::from_secs(5)).unwrap();

        assert_eq!(advisory.title, ADVISORY_TITLE);
        assert_eq!(advisory.deliver_after, Duration::from_secs(5));
        assert_eq!(
            advisory.lines,
            [
                "Average light levels are too low in this location for Ficus.",
                "Ficus needs to be watered.",
                "Moss needs to be watered.",
                "It is too humid for Moss.",
                "It is too hot for Moss.",
                "Sensor battery is low (50%).",
            ]
        );
        assert_eq!(advisory.body().lines().count(), 6);
    }

    #[test]
    fn compose_nothing_to_report() {
        let e = HealthEvaluator::default();
        let latest = reading(300, 50, 40, 20, 95);
        let p = plant("Pothos", Lighting::Shade, Moisture::Dry, Humidity::Normal, Temperature::Normal);
        let reports = [PlantReport::build(&e, &p, &latest, None)];
        assert!(compose_advisory(&reports, &latest, Duration::ZERO).is_none());
    }
}
