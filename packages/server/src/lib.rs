#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the violence map dashboard.
//!
//! Serves the query API over a cached incident dataset and, optionally, a
//! static frontend. The dataset is loaded at startup; if that fails the
//! server still starts and answers data requests with `503` until a later
//! load succeeds.

mod handlers;

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpResponse, HttpServer, error, middleware, web};
use violence_map_dataset::Repository;
use violence_map_source::SourceError;
use violence_map_source::columns::ColumnMapping;

/// Dataset path used when `VIOLENCE_MAP_DATA` is not set.
pub const DEFAULT_DATA_PATH: &str = "data/incidents.csv";

/// Errors that prevent the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Binding or running the HTTP server failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The column mapping file could not be loaded.
    #[error("Source configuration error: {0}")]
    Source(#[from] SourceError),
}

/// Server settings, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to bind (`PORT`).
    pub port: u16,
    /// Incident CSV file (`VIOLENCE_MAP_DATA`).
    pub data_path: PathBuf,
    /// Optional column mapping TOML (`VIOLENCE_MAP_COLUMNS`).
    pub columns_path: Option<PathBuf>,
    /// Optional frontend directory served at `/` (`VIOLENCE_MAP_STATIC_DIR`).
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            columns_path: None,
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            data_path: std::env::var_os("VIOLENCE_MAP_DATA")
                .map_or(defaults.data_path, PathBuf::from),
            columns_path: std::env::var_os("VIOLENCE_MAP_COLUMNS").map(PathBuf::from),
            static_dir: std::env::var_os("VIOLENCE_MAP_STATIC_DIR").map(PathBuf::from),
        }
    }

    /// Loads the configured column mapping, or the bundled default.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the mapping file cannot be read or parsed.
    pub fn column_mapping(&self) -> Result<ColumnMapping, SourceError> {
        self.columns_path
            .as_deref()
            .map_or_else(|| Ok(ColumnMapping::default()), ColumnMapping::from_path)
    }
}

/// Shared application state.
pub struct AppState {
    /// Cached dataset handle.
    pub repository: Arc<Repository>,
}

/// Registers the `/api` routes and the JSON error handler for malformed
/// query strings.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
        )
        .into()
    }))
    .service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/summary", web::get().to(handlers::summary))
            .route("/facets", web::get().to(handlers::facets))
            .route("/legend", web::get().to(handlers::legend))
            .route("/map", web::get().to(handlers::map))
            .route("/timeline", web::get().to(handlers::timeline))
            .route("/animation", web::get().to(handlers::animation))
            .route("/reload", web::post().to(handlers::reload)),
    );
}

/// Starts the violence map API server.
///
/// Loads the dataset once up front so the first request does not pay for
/// it, then serves until shut down. The caller provides the async runtime.
///
/// # Errors
///
/// Returns [`ServerError::Source`] if the column mapping cannot be loaded,
/// or [`ServerError::Io`] if the HTTP server fails to bind or run.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let mapping = config.column_mapping()?;
    let repository = Arc::new(Repository::new(&config.data_path, mapping));

    match repository.load() {
        Ok(dataset) => log::info!("Dataset ready with {} incidents", dataset.len()),
        Err(e) => log::error!(
            "Failed to load {}: {e}; data endpoints will return 503 until it loads",
            config.data_path.display()
        ),
    }

    let state = web::Data::new(AppState { repository });
    let static_dir = config.static_dir.clone();

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        let mut app = App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure);

        // Serve frontend static files
        if let Some(dir) = &static_dir {
            app = app.service(Files::new("/", dir).index_file("index.html"));
        }

        app
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
