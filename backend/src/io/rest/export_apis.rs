//! # REST API for Export and Import
//!
//! CSV and PDF downloads, CSV upload, and export straight to a directory.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Local;
use log::{error, info};

use shared::{ExportFormat, ExportToPathRequest, ImportCsvResponse};

use crate::io::rest::mappers::ItemMapper;
use crate::AppState;

/// Create a router for export related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/export/csv", get(export_csv))
        .route("/export/pdf", get(export_pdf))
        .route("/export/items/:id/pdf", get(export_item_pdf))
        .route("/export/to-path", post(export_to_path))
        .route("/import/csv", post(import_csv))
}

fn attachment(content_type: &str, file_name: &str, body: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response()
}

/// Download the inventory as CSV
pub async fn export_csv(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/export/csv");

    match state.export_service.export_csv().await {
        Ok((csv, _)) => attachment(
            "text/csv; charset=utf-8",
            &state.export_service.file_name(ExportFormat::Csv),
            csv.into_bytes(),
        ),
        Err(e) => {
            error!("❌ Failed to export CSV: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to export inventory").into_response()
        }
    }
}

/// Download the inventory report as PDF
pub async fn export_pdf(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/export/pdf");

    match state.export_service.inventory_pdf(Local::now().date_naive()).await {
        Ok((pdf, _)) => attachment(
            "application/pdf",
            &state.export_service.file_name(ExportFormat::Pdf),
            pdf,
        ),
        Err(e) => {
            error!("❌ Failed to export PDF: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to export inventory").into_response()
        }
    }
}

/// Download the report of a single item
pub async fn export_item_pdf(State(state): State<AppState>, Path(item_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/export/items/{}/pdf", item_id);

    let item_id = match ItemMapper::parse_id(&item_id) {
        Ok(id) => id,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    match state.export_service.item_pdf(item_id, Local::now().date_naive()).await {
        Ok(Some(pdf)) => attachment("application/pdf", &format!("{}-Item.pdf", state.config.app_name), pdf),
        Ok(None) => (StatusCode::NOT_FOUND, "Item not found").into_response(),
        Err(e) => {
            error!("❌ Failed to export item report: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to export item").into_response()
        }
    }
}

/// Import items from an uploaded CSV file; the body is the raw file
pub async fn import_csv(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    info!("POST /api/import/csv - {} bytes", body.len());

    match state.export_service.import_csv(&body).await {
        Ok(summary) => {
            let response = ImportCsvResponse {
                imported: summary.imported,
                skipped: summary.skipped,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("❌ Failed to import CSV: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to import items").into_response()
        }
    }
}

/// Write an export file into a directory (Documents by default)
pub async fn export_to_path(
    State(state): State<AppState>,
    Json(request): Json<ExportToPathRequest>,
) -> impl IntoResponse {
    info!("POST /api/export/to-path - request: {:?}", request);

    match state.export_service.export_to_path(request).await {
        Ok(response) => {
            info!("✅ Export to path completed: success={}", response.success);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("❌ Failed to export to path: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to export inventory").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::{json, send, test_app};
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json as body;
    use shared::{ExportToPathResponse, ItemListResponse, ItemResponse};
    use tempfile::TempDir;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_csv_download_headers() {
        let (app, _) = test_app().await;
        send(&app, "POST", "/api/items", Some(body!({ "name": "Desk, oak" }))).await;

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/export/csv").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"OwnedIt-Inventory.csv\""
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(csv.starts_with("Name,Category,Room,"));
        assert!(csv.contains("\"Desk, oak\""));
    }

    #[tokio::test]
    async fn test_import_then_list() {
        let (app, _) = test_app().await;
        let csv = "Name,Category,Room,Make,Model,Serial Number,Condition,Purchase Price,Purchase Date,Current Value,Warranty Expires,Store,Notes\n\
                   Drill,Tools,Garage,DeWalt,DCD771,SN1,Good,$89.00,3/15/24,,,,\n\
                   ,Tools,Garage,,,,,,,,,,\n";
        let request = Request::builder()
            .method("POST")
            .uri("/api/import/csv")
            .header("content-type", "text/csv")
            .body(Body::from(csv))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let imported: ImportCsvResponse = json(&bytes);
        assert_eq!(imported.imported, 1);
        assert_eq!(imported.skipped, 1);

        let (_, bytes) = send(&app, "GET", "/api/items", None).await;
        let list: ItemListResponse = json(&bytes);
        assert_eq!(list.items[0].room_name.as_deref(), Some("Garage"));
        assert_eq!(list.items[0].purchase_price, Some(89.0));
    }

    #[tokio::test]
    async fn test_pdf_downloads() {
        let (app, _) = test_app().await;
        let (_, bytes) = send(&app, "POST", "/api/items", Some(body!({ "name": "Clock" }))).await;
        let id = json::<ItemResponse>(&bytes).item.id;

        let (status, bytes) = send(&app, "GET", "/api/export/pdf", None).await;
        assert_eq!(status, 200);
        assert!(bytes.starts_with(b"%PDF-1.4"));

        let (status, bytes) = send(&app, "GET", &format!("/api/export/items/{}/pdf", id), None).await;
        assert_eq!(status, 200);
        assert!(bytes.starts_with(b"%PDF-1.4"));

        let missing = format!("/api/export/items/{}/pdf", uuid::Uuid::new_v4());
        assert_eq!(send(&app, "GET", &missing, None).await.0, 404);
    }

    #[tokio::test]
    async fn test_export_to_path() {
        let (app, _) = test_app().await;
        let temp_dir = TempDir::new().unwrap();

        let (status, bytes) = send(
            &app,
            "POST",
            "/api/export/to-path",
            Some(body!({ "format": "csv", "custom_path": temp_dir.path().to_string_lossy() })),
        )
        .await;
        assert_eq!(status, 200);
        let response: ExportToPathResponse = json(&bytes);
        assert!(response.success);
        assert!(temp_dir.path().join("OwnedIt-Inventory.csv").exists());
    }
}
