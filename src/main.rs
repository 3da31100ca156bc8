use std::sync::Arc;

use anyhow::Result;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use florafeed_service::{
    api::{self, dto::AppState},
    config::Config,
    light_cache::LightAverageCache,
    monitor::MonitorService,
    notify::LogSink,
    plants::PlantRegistry,
    telemetry::{MemoryTelemetrySource, PgTelemetrySource, TelemetrySource},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present; variables may also come from the environment
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    info!(
        monitor_interval_secs = config.monitor_interval_secs,
        history_limit = config.history_limit,
        utc_offset = %config.local_utc_offset,
        moisture_offset = config.moisture_calibration.offset(),
        moisture_scale = config.moisture_calibration.scale(),
        "Config loaded"
    );

    let telemetry: Arc<dyn TelemetrySource> = match &config.database_url {
        Some(url) => {
            let source = PgTelemetrySource::connect(url).await?;
            info!("Database ready");
            Arc::new(source)
        }
        None => {
            warn!("DATABASE_URL not set; readings are kept in memory only");
            Arc::new(MemoryTelemetrySource::new())
        }
    };

    let plants = PlantRegistry::seeded();
    let cache = LightAverageCache::new();
    let evaluator = config.evaluator();

    // Background evaluation, shares the cache and plant list with the API
    {
        let monitor = MonitorService::new(
            telemetry.clone(),
            plants.clone(),
            cache.clone(),
            Arc::new(LogSink),
            evaluator,
            config.history_limit,
            config.advisory_delay,
            config.monitor_interval_secs,
        );
        tokio::spawn(monitor.run());
    }

    let state = AppState {
        telemetry,
        plants,
        cache,
        evaluator,
        history_limit: config.history_limit,
    };

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
