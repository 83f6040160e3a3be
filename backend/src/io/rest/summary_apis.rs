//! # REST API for the Inventory Summary

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::Local;
use log::{error, info};

use shared::{CategoryBreakdown, RoomBreakdown, SummaryResponse};

use crate::domain::formatting::format_currency;
use crate::domain::models::Room;
use crate::domain::summary_service::InventorySummary;
use crate::io::rest::mappers::ItemMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_summary))
}

fn to_response(summary: InventorySummary, rooms: &[Room], currency_symbol: &str) -> SummaryResponse {
    SummaryResponse {
        total_items: summary.total_items,
        total_value: summary.total_value,
        total_value_formatted: (summary.total_value > 0.0)
            .then(|| format_currency(summary.total_value, currency_symbol)),
        by_category: summary
            .by_category
            .iter()
            .map(|c| CategoryBreakdown {
                category: c.category,
                icon: c.category.icon().to_string(),
                count: c.count,
                value: c.value,
            })
            .collect(),
        by_room: summary
            .by_room
            .iter()
            .map(|r| RoomBreakdown {
                room_id: r.room.id.to_string(),
                room_name: r.room.name.clone(),
                icon: r.room.icon.clone(),
                count: r.count,
                value: r.value,
            })
            .collect(),
        recently_added: ItemMapper::to_dto_list(&summary.recently_added, rooms),
        expired_warranties: ItemMapper::to_dto_list(&summary.expired_warranties, rooms),
        expiring_warranties: ItemMapper::to_dto_list(&summary.expiring_warranties, rooms),
    }
}

/// Totals, breakdowns and warranty alerts as of today
pub async fn get_summary(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/summary");

    let rooms = match state.room_service.list_rooms().await {
        Ok(rooms) => rooms,
        Err(e) => {
            error!("Failed to load rooms: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error building summary").into_response();
        }
    };

    match state.summary_service.get_summary(Local::now().date_naive()).await {
        Ok(summary) => {
            let response = to_response(summary, &rooms, &state.config.currency_symbol);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to build summary: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error building summary").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::{json, send, test_app};
    use serde_json::json as body;

    #[tokio::test]
    async fn test_summary_totals() {
        let (app, _) = test_app().await;

        let (_, bytes) = send(&app, "GET", "/api/summary", None).await;
        let empty: SummaryResponse = json(&bytes);
        assert_eq!(empty.total_items, 0);
        assert_eq!(empty.total_value_formatted, None);

        send(
            &app,
            "POST",
            "/api/items",
            Some(body!({ "name": "TV", "category": "Electronics", "current_value": 1200.0 })),
        )
        .await;
        send(
            &app,
            "POST",
            "/api/items",
            Some(body!({ "name": "Radio", "category": "Electronics", "purchase_price": 34.5 })),
        )
        .await;

        let (status, bytes) = send(&app, "GET", "/api/summary", None).await;
        assert_eq!(status, 200);
        let summary: SummaryResponse = json(&bytes);
        assert_eq!(summary.total_items, 2);
        assert_eq!(summary.total_value_formatted.as_deref(), Some("$1,234.50"));
        assert_eq!(summary.by_category.len(), 1);
        assert_eq!(summary.by_category[0].count, 2);
        assert_eq!(summary.recently_added.len(), 2);
    }
}
