// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! EcoTrack API Server
//!
//! Serves challenges, events, blogs and community statistics for the
//! EcoTrack web client.

use ecotrack_api::{config::Config, db::MongoDb, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting EcoTrack API");

    // The store connects on first use; nothing is dialed here.
    let db = MongoDb::new(&config.mongodb_uri, &config.database_name);
    tracing::info!(database = db.database_name(), "Document store configured");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
    });

    // Build router
    let app = ecotrack_api::routes::create_router(state);

    if config.serverless {
        tracing::info!("Serverless deployment detected; not binding a listener");
        return Ok(());
    }

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("ecotrack_api=debug".parse().expect("valid directive"))
        .add_directive("info".parse().expect("valid directive"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
