use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio::time;
use tracing::{error, info};

use super::{current_snapshot, Snapshot};
use crate::{
    advisory::{compose_advisory, Advisory, PlantReport},
    health::HealthEvaluator,
    light_cache::LightAverageCache,
    notify::NotificationSink,
    plants::PlantRegistry,
    telemetry::TelemetrySource,
};

pub struct MonitorService {
    telemetry: Arc<dyn TelemetrySource>,
    plants: PlantRegistry,
    cache: LightAverageCache,
    sink: Arc<dyn NotificationSink>,
    evaluator: HealthEvaluator,
    history_limit: usize,
    advisory_delay: Duration,
    interval: Duration,
}

impl MonitorService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        telemetry: Arc<dyn TelemetrySource>,
        plants: PlantRegistry,
        cache: LightAverageCache,
        sink: Arc<dyn NotificationSink>,
        evaluator: HealthEvaluator,
        history_limit: usize,
        advisory_delay: Duration,
        interval_secs: u64,
    ) -> Self {
        Self {
            telemetry,
            plants,
            cache,
            sink,
            evaluator,
            history_limit,
            advisory_delay,
            // tokio intervals must be non-zero
            interval: Duration::from_secs(interval_secs.max(1)),
        }
    }

    /// Runs the monitoring loop indefinitely.
    /// Spawn this via `tokio::spawn`.
    pub async fn run(self) {
        info!(interval_secs = self.interval.as_secs(), "Monitor loop started");
        let mut ticker = time::interval(self.interval);

        loop {
            ticker.tick().await;
            if let Err(e) = self.run_once().await {
                error!(error = %e, "Monitor iteration failed");
            }
        }
    }

    /// One evaluation pass. Returns the advisory that was delivered, if any.
    pub async fn run_once(&self) -> anyhow::Result<Option<Advisory>> {
        let snapshot = current_snapshot(
            self.telemetry.as_ref(),
            &self.cache,
            &self.evaluator,
            self.history_limit,
            Utc::now(),
        )
        .await?;

        let Some(Snapshot { latest, light_average, .. }) = snapshot else {
            info!("No telemetry yet; skipping monitor iteration");
            return Ok(None);
        };

        let plants = self.plants.list().await;
        let reports: Vec<PlantReport> = plants
            .iter()
            .map(|plant| PlantReport::build(&self.evaluator, plant, &latest, light_average))
            .collect();

        info!(
            plants = reports.len(),
            light_average = ?light_average,
            battery = latest.battery,
            "Monitor iteration, latest reading evaluated"
        );

        let Some(advisory) = compose_advisory(&reports, &latest, self.advisory_delay) else {
            info!("All plants in ideal conditions; nothing to notify");
            return Ok(None);
        };

        self.sink.deliver(advisory.clone()).await?;
        Ok(Some(advisory))
    }
}
