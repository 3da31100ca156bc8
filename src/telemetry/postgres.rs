use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::debug;

use super::{TelemetryError, TelemetrySource};
use crate::db::models::{NewSensorReading, SensorReading};

#[derive(Clone)]
pub struct PgTelemetrySource {
    pool: PgPool,
}

impl PgTelemetrySource {
    /// Open a pool against `database_url` and apply pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, TelemetryError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool. Migrations are the caller's concern.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TelemetrySource for PgTelemetrySource {
    async fn recent(&self, limit: Option<usize>) -> Result<Vec<SensorReading>, TelemetryError> {
        // LIMIT NULL returns every row.
        let limit = limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX));
        let rows = sqlx::query_as::<_, SensorReading>(
            r#"
            SELECT id, light_intensity, moisture, humidity, temperature,
                   battery, charging, recorded_at
            FROM plant_readings
            ORDER BY recorded_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(rows = rows.len(), "Fetched plant readings");
        Ok(rows)
    }

    async fn record(&self, reading: NewSensorReading) -> Result<SensorReading, TelemetryError> {
        let row = sqlx::query_as::<_, SensorReading>(
            r#"
            INSERT INTO plant_readings
                (light_intensity, moisture, humidity, temperature, battery, charging, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, light_intensity, moisture, humidity, temperature,
                      battery, charging, recorded_at
            "#,
        )
        .bind(reading.light_intensity)
        .bind(reading.moisture)
        .bind(reading.humidity)
        .bind(reading.temperature)
        .bind(reading.battery)
        .bind(reading.charging)
        .bind(reading.timestamp)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
