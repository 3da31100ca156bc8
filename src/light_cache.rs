use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use utoipa::ToSchema;

/// Last daytime light average that could be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct LightAverage {
    pub value: i64,
    pub computed_at: DateTime<Utc>,
}

/// Holds the most recent daytime light average so that evaluations made
/// outside daylight hours can still judge lighting by the last full day.
///
/// Cloning shares the cached value.
#[derive(Clone, Default)]
pub struct LightAverageCache {
    inner: Arc<RwLock<Option<LightAverage>>>,
}

impl LightAverageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the cached average.
    pub async fn store(&self, value: i64, computed_at: DateTime<Utc>) {
        *self.inner.write().await = Some(LightAverage { value, computed_at });
    }

    pub async fn get(&self) -> Option<LightAverage> {
        *self.inner.read().await
    }
}

/// Pick the light average to evaluate with.
///
/// A freshly computed average is cached and returned; without one the cached
/// value is used; with neither the caller falls back to the latest reading.
pub async fn resolve_light_average(
    computed: Option<i64>,
    cache: &LightAverageCache,
    now: DateTime<Utc>,
) -> Option<i64> {
    match computed {
        Some(value) => {
            cache.store(value, now).await;
            Some(value)
        }
        None => cache.get().await.map(|a| a.value),
    }
}
