//! IRIS lookup server.
//!
//! Loads the IRIS feature collection once at startup and answers
//! point lookups over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use iris_lookup::config::Config;
use iris_lookup::pip::{FeatureStore, IrisService};

mod routes;
use routes::{health_handler, iris_handler, AppState};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "iris-server")]
#[command(about = "IRIS zone lookup server")]
struct Args {
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides the configuration file
    #[arg(short, long)]
    listen: Option<String>,

    /// Listen port on all interfaces, used when no listen address is given
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// IRIS feature collection (GeoJSON, optionally gzipped)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Number of bounding-box candidates examined per lookup
    #[arg(long)]
    candidates: Option<usize>,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(listen) = self.listen {
            config.server.listen = listen;
        } else if let Some(port) = self.port {
            config.server.listen = format!("0.0.0.0:{}", port);
        }
        if let Some(data) = self.data {
            config.data.path = data;
        }
        if let Some(candidates) = self.candidates {
            config.lookup.candidates = candidates;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Args::parse().into_config()?;

    info!("IRIS Lookup Server");

    let store = FeatureStore::load(&config.data.path).with_context(|| {
        format!(
            "Failed to load IRIS features from {}",
            config.data.path.display()
        )
    })?;
    let service = IrisService::from_store(store, config.lookup_options());

    let state = Arc::new(AppState { service });

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/iris", get(iris_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen))?;
    axum::serve(listener, app).await?;

    Ok(())
}
