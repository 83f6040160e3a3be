//! # OwnedIt Backend
//!
//! Contains all non-UI logic of the home inventory.
//!
//! ## Architecture
//!
//! ```text
//! UI Layer (any front end)
//!     ↓
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (Business logic, services)
//!     ↓
//! Storage Layer (SQLite via sqlx)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::domain::{BarcodeClient, ExportService, ItemService, RoomService, SummaryService};
use crate::storage::DbConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub item_service: ItemService<DbConnection>,
    pub room_service: RoomService<DbConnection>,
    pub summary_service: SummaryService<DbConnection>,
    pub export_service: ExportService<DbConnection>,
    pub barcode_client: BarcodeClient,
    pub config: AppConfig,
}

impl AppState {
    /// Wire every service to one store connection
    pub fn new(connection: Arc<DbConnection>, config: AppConfig) -> Result<Self> {
        let item_service = ItemService::new(connection.clone(), config.undo_window());
        let room_service = RoomService::new(connection.clone());
        let summary_service = SummaryService::new(connection.clone());
        let export_service = ExportService::new(connection, config.report_settings());
        let barcode_client = BarcodeClient::new(config.barcode_endpoint.clone())
            .context("Failed to build barcode lookup client")?;

        Ok(Self {
            item_service,
            room_service,
            summary_service,
            export_service,
            barcode_client,
            config,
        })
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_path().display());
    let connection = Arc::new(DbConnection::new(&config.database_path()).await?);

    info!("Setting up domain model");
    AppState::new(connection, config)
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_static("http://localhost:8080"))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .nest("/api", io::rest::api_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
