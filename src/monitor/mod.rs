mod service;

pub use service::MonitorService;

use chrono::{DateTime, Utc};

use crate::{
    db::models::SensorReading,
    health::HealthEvaluator,
    light_cache::{resolve_light_average, LightAverageCache},
    telemetry::{self, TelemetryError, TelemetrySource},
};

/// Consistent view of the telemetry used for one evaluation.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub latest: SensorReading,
    pub light_average: Option<i64>,
    /// Readings the average was computed over, newest first.
    pub history: Vec<SensorReading>,
}

/// Fetch up to `history_limit` readings and resolve the light average
/// through `cache`. `None` when the store holds no readings at all.
pub async fn current_snapshot(
    source: &dyn TelemetrySource,
    cache: &LightAverageCache,
    evaluator: &HealthEvaluator,
    history_limit: usize,
    now: DateTime<Utc>,
) -> Result<Option<Snapshot>, TelemetryError> {
    let history = source.recent(Some(history_limit)).await?;
    let Some(latest) = telemetry::latest(&history).cloned() else {
        return Ok(None);
    };

    let computed = evaluator.daytime_light_average(&history);
    let light_average = resolve_light_average(computed, cache, now).await;

    Ok(Some(Snapshot {
        latest,
        light_average,
        history,
    }))
}
