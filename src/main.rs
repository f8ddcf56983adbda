mod access;
mod api;
mod config;
mod database;
mod due;
mod errors;
mod logging;
mod models;
mod review_service;
mod scheduler;

use anyhow::Result;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    access::UnrestrictedPolicy,
    api::{create_router, AppState},
    config::Config,
    database::Database,
    review_service::ReviewService,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    config.validate()?;

    // Initialize logging with console and rotating file output
    let _guard = setup_logging(&config)?;

    info!("Starting vocabulary trainer server...");

    let db = Database::new(&config.database.url).await?;
    info!("Database initialized successfully");

    let review_service = ReviewService::new(db);

    // Subscription gating is injected here; the default policy allows
    // every action.
    let state = AppState {
        review_service,
        access_policy: Arc::new(UnrestrictedPolicy),
    };

    let app = create_router(state).layer(ServiceBuilder::new().layer(CorsLayer::permissive()));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn setup_logging(config: &Config) -> Result<Option<WorkerGuard>> {
    use std::fs;
    use tracing_subscriber::fmt;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(true);

    if config.logging.file_enabled {
        fs::create_dir_all(&config.logging.log_directory).unwrap_or_else(|e| {
            eprintln!("Warning: Could not create logs directory: {}", e);
        });

        let file_appender =
            tracing_appender::rolling::daily(&config.logging.log_directory, "vocab-trainer.log");
        let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(non_blocking_file);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .init();

        info!(
            "Logging initialized - writing to {}/vocab-trainer.log with daily rotation",
            config.logging.log_directory
        );
        Ok(Some(guard))
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .init();
        Ok(None)
    }
}
