//! # REST API for Barcode Lookup
//!
//! Failures never produce an error status: the response carries the
//! fields as typed plus a message for the user.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use log::{info, warn};

use shared::{BarcodeLookupRequest, BarcodeLookupResponse};

use crate::domain::barcode_service::apply_product;
use crate::domain::commands::items::ItemDraft;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/lookup", post(lookup_barcode))
}

/// Look up a scanned code and fill the empty name/make/model fields
pub async fn lookup_barcode(
    State(state): State<AppState>,
    Json(request): Json<BarcodeLookupRequest>,
) -> impl IntoResponse {
    info!("POST /api/barcode/lookup - barcode: {}", request.barcode);

    let mut draft = ItemDraft {
        name: request.name,
        make: request.make,
        model: request.model,
        serial_number: request.barcode.trim().to_string(),
        ..Default::default()
    };

    let error = match state.barcode_client.lookup(&request.barcode).await {
        Ok(product) => {
            apply_product(&mut draft, &request.barcode, &product);
            None
        }
        Err(e) => {
            warn!("Barcode lookup for {} failed: {:?}", request.barcode, e);
            Some(e.to_string())
        }
    };

    let response = BarcodeLookupResponse {
        name: draft.name,
        make: draft.make,
        model: draft.model,
        serial_number: draft.serial_number,
        error,
    };
    (StatusCode::OK, Json(response))
}
