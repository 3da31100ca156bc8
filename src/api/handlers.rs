use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use utoipa::OpenApi;
use uuid::Uuid;

use super::{
    dto::{AppState, ChartParams, ChartResponse, NewPlantRequest, PlantStatusResponse},
    errors::AppError,
};
use crate::{
    advisory::{Advice, NormalizedValues, PlantReport},
    db::models::{NewSensorReading, SensorReading},
    health::{HealthVerdict, Humidity, Lighting, Moisture, Temperature},
    monitor::{current_snapshot, Snapshot},
    plants::{CategoryUpdate, PlantProfile},
    telemetry::{self, chart_series, ordered_window, ChartPoint, DataRange},
};

// ---------------------------------------------------------------------------
// Plants
// ---------------------------------------------------------------------------

/// List every configured plant in display order.
#[utoipa::path(
    get,
    path = "/plants",
    responses(
        (status = 200, description = "Configured plants", body = Vec<PlantProfile>),
    ),
    tag = "plants"
)]
pub async fn list_plants(State(state): State<AppState>) -> Json<Vec<PlantProfile>> {
    Json(state.plants.list().await)
}

/// Add a plant with its ideal-range categories.
#[utoipa::path(
    post,
    path = "/plants",
    request_body = NewPlantRequest,
    responses(
        (status = 201, description = "Plant created", body = PlantProfile),
        (status = 422, description = "Empty plant name"),
    ),
    tag = "plants"
)]
pub async fn create_plant(
    State(state): State<AppState>,
    Json(body): Json<NewPlantRequest>,
) -> Result<(StatusCode, Json<PlantProfile>), AppError> {
    let plant = PlantProfile::try_from(body)?;
    let plant = state.plants.add(plant).await;
    Ok((StatusCode::CREATED, Json(plant)))
}

#[utoipa::path(
    get,
    path = "/plants/{id}",
    params(("id" = Uuid, Path, description = "Plant ID")),
    responses(
        (status = 200, description = "Plant", body = PlantProfile),
        (status = 404, description = "Unknown plant"),
    ),
    tag = "plants"
)]
pub async fn get_plant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlantProfile>, AppError> {
    Ok(Json(state.plants.get(id).await?))
}

/// Change some or all of a plant's category selections.
#[utoipa::path(
    patch,
    path = "/plants/{id}",
    params(("id" = Uuid, Path, description = "Plant ID")),
    request_body = CategoryUpdate,
    responses(
        (status = 200, description = "Updated plant", body = PlantProfile),
        (status = 404, description = "Unknown plant"),
    ),
    tag = "plants"
)]
pub async fn update_plant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<CategoryUpdate>,
) -> Result<Json<PlantProfile>, AppError> {
    Ok(Json(state.plants.update_categories(id, &update).await?))
}

#[utoipa::path(
    delete,
    path = "/plants/{id}",
    params(("id" = Uuid, Path, description = "Plant ID")),
    responses(
        (status = 204, description = "Plant removed"),
        (status = 404, description = "Unknown plant"),
    ),
    tag = "plants"
)]
pub async fn delete_plant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.plants.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Evaluate a plant against the latest reading and the daytime light
/// average. Without any telemetry the placeholder reading is used.
#[utoipa::path(
    get,
    path = "/plants/{id}/status",
    params(("id" = Uuid, Path, description = "Plant ID")),
    responses(
        (status = 200, description = "Health report", body = PlantStatusResponse),
        (status = 404, description = "Unknown plant"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "plants"
)]
pub async fn plant_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlantStatusResponse>, AppError> {
    let plant = state.plants.get(id).await?;
    let now = Utc::now();
    let snapshot = current_snapshot(
        state.telemetry.as_ref(),
        &state.cache,
        &state.evaluator,
        state.history_limit,
        now,
    )
    .await?;

    let (has_telemetry, latest, light_average) = match snapshot {
        Some(Snapshot { latest, light_average, .. }) => (true, latest, light_average),
        None => (false, SensorReading::fallback(now), None),
    };

    Ok(Json(PlantStatusResponse {
        has_telemetry,
        report: PlantReport::build(&state.evaluator, &plant, &latest, light_average),
    }))
}

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/readings/latest",
    responses(
        (status = 200, description = "Latest reading, or null when none exist", body = SensorReading),
        (status = 500, description = "Internal server error"),
    ),
    tag = "readings"
)]
pub async fn latest_reading(
    State(state): State<AppState>,
) -> Result<Json<Option<SensorReading>>, AppError> {
    let readings = state.telemetry.recent(Some(1)).await?;
    Ok(Json(telemetry::latest(&readings).cloned()))
}

/// Chart series for the requested window, oldest first. Light and moisture
/// are normalised to 0–100.
#[utoipa::path(
    get,
    path = "/readings/chart",
    params(
        ("range" = Option<DataRange>, Query, description = "hours | day | week | all_time (default hours)"),
    ),
    responses(
        (status = 200, description = "Chart series", body = ChartResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "readings"
)]
pub async fn reading_chart(
    State(state): State<AppState>,
    Query(params): Query<ChartParams>,
) -> Result<Json<ChartResponse>, AppError> {
    let readings = state.telemetry.recent(params.range.limit()).await?;
    let window = ordered_window(&readings, params.range);

    Ok(Json(ChartResponse {
        range: params.range,
        label: params.range.label().to_owned(),
        points: chart_series(&window, &state.evaluator),
    }))
}

/// Ingest one telemetry document.
#[utoipa::path(
    post,
    path = "/readings",
    request_body = NewSensorReading,
    responses(
        (status = 201, description = "Reading stored", body = SensorReading),
        (status = 500, description = "Internal server error"),
    ),
    tag = "readings"
)]
pub async fn record_reading(
    State(state): State<AppState>,
    Json(body): Json<NewSensorReading>,
) -> Result<(StatusCode, Json<SensorReading>), AppError> {
    let reading = state.telemetry.record(body).await?;
    tracing::debug!(id = %reading.id, timestamp = %reading.timestamp, "Reading recorded");
    Ok((StatusCode::CREATED, Json(reading)))
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "system"
)]
pub async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(
        list_plants,
        create_plant,
        get_plant,
        update_plant,
        delete_plant,
        plant_status,
        latest_reading,
        reading_chart,
        record_reading,
        health,
    ),
    components(schemas(
        PlantProfile,
        NewPlantRequest,
        CategoryUpdate,
        Lighting,
        Moisture,
        Humidity,
        Temperature,
        PlantStatusResponse,
        PlantReport,
        NormalizedValues,
        HealthVerdict,
        Advice,
        SensorReading,
        NewSensorReading,
        DataRange,
        ChartPoint,
        ChartResponse,
    )),
    tags(
        (name = "plants",   description = "Plant profiles and health status"),
        (name = "readings", description = "Sensor telemetry"),
        (name = "system",   description = "System endpoints"),
    ),
    info(
        title = "FloraFeed API",
        version = "0.1.0",
        description = "Plant health monitoring over sensor telemetry"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum_test::TestServer;
    use chrono::{DateTime, TimeZone};
    use serde_json::{json, Value};

    use crate::{
        api::{dto::AppState, router},
        health::HealthEvaluator,
        light_cache::LightAverageCache,
        plants::PlantRegistry,
        telemetry::{MemoryTelemetrySource, TelemetrySource},
    };

    use super::*;

    fn state(telemetry: MemoryTelemetrySource, plants: PlantRegistry) -> AppState {
        AppState {
            telemetry: Arc::new(telemetry),
            plants,
            cache: LightAverageCache::new(),
            evaluator: HealthEvaluator::default(),
            history_limit: 168,
        }
    }

    fn test_server(state: AppState) -> TestServer {
        TestServer::new(router(state)).unwrap()
    }

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, h, 0, 0).unwrap()
    }

    async fn insert_reading(source: &MemoryTelemetrySource, light: i64, moisture: i64, hour: u32) {
        source
            .record(NewSensorReading {
                light_intensity: light,
                moisture,
                humidity: 55,
                temperature: 10,
                battery: 70,
                charging: false,
                timestamp: at(hour),
            })
            .await
            .unwrap();
    }

    async fn cactus(plants: &PlantRegistry) -> PlantProfile {
        plants
            .add(
                PlantProfile::new("Cactus", "IMG", Lighting::Shade, Moisture::Dry, Humidity::Humid, Temperature::Cold)
                    .unwrap(),
            )
            .await
    }

    // -----------------------------------------------------------------------
    // /plants
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn list_plants_returns_seeded_plants() {
        let server = test_server(state(MemoryTelemetrySource::new(), PlantRegistry::seeded()));
        let resp = server.get("/plants").await;
        resp.assert_status_ok();

        let body: Vec<Value> = resp.json();
        assert_eq!(body.len(), 4);
        assert_eq!(body[0]["name"], "The Undying");
        assert_eq!(body[0]["lighting"], "shade");
    }

    #[tokio::test]
    async fn create_plant_then_get() {
        let server = test_server(state(MemoryTelemetrySource::new(), PlantRegistry::default()));
        let resp = server
            .post("/plants")
            .json(&json!({
                "name": "Monstera",
                "photo_reference": "IMG_9",
                "lighting": "bright_light",
                "moisture": "bone_dry",
                "humidity": "humid",
                "temperature": "hot"
            }))
            .await;
        resp.assert_status(StatusCode::CREATED);
        let created: Value = resp.json();

        let id = created["id"].as_str().unwrap();
        let resp = server.get(&format!("/plants/{id}")).await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body["name"], "Monstera");
        assert_eq!(body["moisture"], "bone_dry");
    }

    #[tokio::test]
    async fn create_plant_with_blank_name_is_rejected() {
        let server = test_server(state(MemoryTelemetrySource::new(), PlantRegistry::default()));
        let resp = server
            .post("/plants")
            .json(&json!({
                "name": "  ",
                "lighting": "shade",
                "moisture": "dry",
                "humidity": "dry",
                "temperature": "cold"
            }))
            .await;
        resp.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = resp.json();
        assert_eq!(body["error"], "plant name must not be empty");
    }

    #[tokio::test]
    async fn unknown_plant_is_404() {
        let server = test_server(state(MemoryTelemetrySource::new(), PlantRegistry::default()));
        let resp = server.get(&format!("/plants/{}", Uuid::new_v4())).await;
        resp.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn patch_updates_only_given_categories() {
        let plants = PlantRegistry::default();
        let plant = cactus(&plants).await;
        let server = test_server(state(MemoryTelemetrySource::new(), plants));

        let resp = server
            .patch(&format!("/plants/{}", plant.id))
            .json(&json!({ "humidity": "normal" }))
            .await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body["humidity"], "normal");
        assert_eq!(body["temperature"], "cold");
    }

    #[tokio::test]
    async fn delete_removes_plant() {
        let plants = PlantRegistry::default();
        let plant = cactus(&plants).await;
        let server = test_server(state(MemoryTelemetrySource::new(), plants));

        server
            .delete(&format!("/plants/{}", plant.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/plants/{}", plant.id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    // -----------------------------------------------------------------------
    // /plants/{id}/status
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn status_without_telemetry_uses_placeholder() {
        let plants = PlantRegistry::default();
        let plant = cactus(&plants).await;
        let server = test_server(state(MemoryTelemetrySource::new(), plants));

        let resp = server.get(&format!("/plants/{}/status", plant.id)).await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body["has_telemetry"], false);
        assert_eq!(body["report"]["latest"]["light_intensity"], 800);
        assert!(body["report"]["light_average"].is_null());
    }

    #[tokio::test]
    async fn status_evaluates_latest_reading() {
        let telemetry = MemoryTelemetrySource::new();
        // Daytime readings average to 400; the latest raw light is 1600.
        insert_reading(&telemetry, 200, 20, 10).await;
        insert_reading(&telemetry, 600, 20, 11).await;
        insert_reading(&telemetry, 1600, 20, 20).await;

        let plants = PlantRegistry::default();
        let plant = cactus(&plants).await;
        let server = test_server(state(telemetry, plants));

        let resp = server.get(&format!("/plants/{}/status", plant.id)).await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        let report = &body["report"];

        assert_eq!(body["has_telemetry"], true);
        assert_eq!(report["light_average"], 400);
        assert_eq!(
            report["verdict"],
            json!({
                "lighting_ideal": true,
                "moisture_ideal": false,
                "humidity_ideal": true,
                "temperature_ideal": true
            })
        );
        assert_eq!(report["normalized"]["light"], 100);
        assert_eq!(report["messages"][1], "Cactus needs to be watered.");
        assert_eq!(report["battery_low"], true);
    }

    // -----------------------------------------------------------------------
    // /readings
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn latest_reading_null_when_empty() {
        let server = test_server(state(MemoryTelemetrySource::new(), PlantRegistry::default()));
        let resp = server.get("/readings/latest").await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert!(body.is_null());
    }

    #[tokio::test]
    async fn record_then_latest() {
        let server = test_server(state(MemoryTelemetrySource::new(), PlantRegistry::default()));
        let resp = server
            .post("/readings")
            .json(&json!({
                "lightIntensity": 420,
                "moisture": 1900,
                "humidity": 44,
                "temperature": 19,
                "battery": 91,
                "timestamp": "2024-05-01T13:00:00Z"
            }))
            .await;
        resp.assert_status(StatusCode::CREATED);

        let body: Value = server.get("/readings/latest").await.json();
        assert_eq!(body["light_intensity"], 420);
        assert_eq!(body["charging"], false);
    }

    #[tokio::test]
    async fn chart_defaults_to_last_six_oldest_first() {
        let telemetry = MemoryTelemetrySource::new();
        for h in 0..10 {
            insert_reading(&telemetry, 150 * i64::from(h), 2000, h).await;
        }
        let server = test_server(state(telemetry, PlantRegistry::default()));

        let resp = server.get("/readings/chart").await;
        resp.assert_status_ok();
        let body: Value = resp.json();

        assert_eq!(body["range"], "hours");
        assert_eq!(body["label"], "Last 6 hours");
        let points = body["points"].as_array().unwrap();
        assert_eq!(points.len(), 6);
        // hours 4..=9, light 600..=1350 raw -> 40..=90 %
        assert_eq!(points[0]["light"], 40);
        assert_eq!(points[5]["light"], 90);
        assert_eq!(points[0]["moisture"], 50);
    }

    #[tokio::test]
    async fn chart_all_time() {
        let telemetry = MemoryTelemetrySource::new();
        for h in 0..10 {
            insert_reading(&telemetry, 100, 50, h).await;
        }
        let server = test_server(state(telemetry, PlantRegistry::default()));

        let body: Value = server
            .get("/readings/chart")
            .add_query_param("range", "all_time")
            .await
            .json();
        assert_eq!(body["points"].as_array().unwrap().len(), 10);
    }

    // -----------------------------------------------------------------------
    // /health and /api-docs
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn health_returns_ok() {
        let server = test_server(state(MemoryTelemetrySource::new(), PlantRegistry::default()));
        let resp = server.get("/health").await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn openapi_spec_is_served() {
        let server = test_server(state(MemoryTelemetrySource::new(), PlantRegistry::default()));
        let resp = server.get("/api-docs/openapi.json").await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body["info"]["title"], "FloraFeed API");
    }
}
