//! # REST API Interface Layer
//!
//! HTTP endpoints under `/api`. Each submodule exposes a `router()` that is
//! merged here; handlers log the request, call one service and translate the
//! outcome into a status code.
//!
//! ## Error Translation
//!
//! - Malformed ids, dates or base64 payloads: 400
//! - Validation failures from the domain: 400
//! - Missing items or rooms: 404
//! - Anything else: 500

pub mod barcode_apis;
pub mod export_apis;
pub mod item_apis;
pub mod mappers;
pub mod room_apis;
pub mod summary_apis;

use axum::{http::StatusCode, Router};

use crate::domain::models::{ItemValidationError, RoomValidationError};
use crate::AppState;

/// Request input that could not be converted into a domain value
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidRequest {
    #[error("Invalid id: {0}")]
    Id(String),
    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    Date(String),
    #[error("Invalid base64 data: {0}")]
    Data(String),
}

/// Status code for a failed service call
pub fn error_status(error: &anyhow::Error) -> StatusCode {
    if error.downcast_ref::<ItemValidationError>().is_some()
        || error.downcast_ref::<RoomValidationError>().is_some()
        || error.downcast_ref::<InvalidRequest>().is_some()
    {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// All API routes, to be nested under `/api`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/items", item_apis::router())
        .nest("/rooms", room_apis::router())
        .nest("/summary", summary_apis::router())
        .merge(export_apis::router())
        .nest("/barcode", barcode_apis::router())
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{body::Body, http::Request, Router};
    use serde::de::DeserializeOwned;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::storage::DbConnection;
    use crate::{create_router, AppState};

    pub async fn test_app() -> (Router, AppState) {
        let connection = Arc::new(DbConnection::in_memory().await.expect("Failed to open database"));
        let config = AppConfig {
            barcode_endpoint: "http://127.0.0.1:9/lookup".to_string(),
            ..AppConfig::default()
        };
        let state = AppState::new(connection, config).expect("Failed to build app state");
        (create_router(state.clone()), state)
    }

    pub async fn send(app: &Router, method: &str, uri: &str, body: Option<serde_json::Value>) -> (u16, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status().as_u16();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    pub fn json<T: DeserializeOwned>(bytes: &[u8]) -> T {
        serde_json::from_slice(bytes).expect("Failed to parse response body")
    }
}
