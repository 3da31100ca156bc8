use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    health::{HealthEvaluator, Humidity, Lighting, Moisture, Temperature},
    light_cache::LightAverageCache,
    plants::{PlantError, PlantProfile, PlantRegistry},
    telemetry::{DataRange, TelemetrySource},
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub telemetry: Arc<dyn TelemetrySource>,
    pub plants: PlantRegistry,
    pub cache: LightAverageCache,
    pub evaluator: HealthEvaluator,
    /// Readings considered when computing the daytime light average.
    pub history_limit: usize,
}

/// Request body for `POST /plants`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NewPlantRequest {
    pub name: String,
    #[serde(default)]
    pub photo_reference: String,
    pub lighting: Lighting,
    pub moisture: Moisture,
    pub humidity: Humidity,
    pub temperature: Temperature,
}

impl TryFrom<NewPlantRequest> for PlantProfile {
    type Error = PlantError;

    fn try_from(r: NewPlantRequest) -> Result<Self, Self::Error> {
        PlantProfile::new(r.name, r.photo_reference, r.lighting, r.moisture, r.humidity, r.temperature)
    }
}

/// Query string for `GET /readings/chart`.
#[derive(Debug, Deserialize)]
pub struct ChartParams {
    #[serde(default)]
    pub range: DataRange,
}

/// Response for `GET /readings/chart`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChartResponse {
    pub range: DataRange,
    pub label: String,
    /// Oldest first.
    pub points: Vec<crate::telemetry::ChartPoint>,
}

/// Response for `GET /plants/{id}/status`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlantStatusResponse {
    /// `false` when no reading has been recorded yet and `report` is based
    /// on placeholder values.
    pub has_telemetry: bool,
    pub report: crate::advisory::PlantReport,
}
