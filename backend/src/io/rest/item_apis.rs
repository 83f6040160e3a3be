//! # REST API for Item Management
//!
//! Listing, create/edit/duplicate, bulk delete with undo, and bulk move.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use log::{error, info, warn};

use shared::{
    CreateItemRequest, DeleteItemsRequest, DeleteItemsResponse, ItemListRequest, ItemListResponse, ItemResponse,
    MoveItemsRequest, MoveItemsResponse, UndoDeleteResponse, UpdateItemRequest,
};

use crate::domain::commands::items::{DeleteItemsResult, MoveItemsCommand};
use crate::domain::models::Room;
use crate::io::rest::error_status;
use crate::io::rest::mappers::ItemMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/bulk-delete", post(delete_items))
        .route("/bulk-move", post(move_items))
        .route("/undo", post(undo_delete))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
        .route("/:id/duplicate", post(duplicate_item))
}

/// Rooms are needed to fill in room names; a failure here is a server error
async fn load_rooms(state: &AppState) -> Result<Vec<Room>, Response> {
    state.room_service.list_rooms().await.map_err(|e| {
        error!("Failed to load rooms: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Error loading rooms").into_response()
    })
}

fn delete_response(state: &AppState, result: DeleteItemsResult) -> DeleteItemsResponse {
    DeleteItemsResponse {
        deleted_count: result.deleted_count,
        not_found_ids: result.not_found_ids.iter().map(ToString::to_string).collect(),
        undo_message: result.undo_message,
        undo_window_secs: state.item_service.undo_window().as_secs(),
    }
}

/// List items with search, category/room filters and a sort order
pub async fn list_items(
    State(state): State<AppState>,
    Query(request): Query<ItemListRequest>,
) -> impl IntoResponse {
    info!("GET /api/items - query: {:?}", request);

    let query = match ItemMapper::to_list_query(request) {
        Ok(query) => query,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    let rooms = match load_rooms(&state).await {
        Ok(rooms) => rooms,
        Err(response) => return response,
    };

    let total_count = match state.item_service.all_items().await {
        Ok(items) => items.len(),
        Err(e) => {
            error!("Failed to count items: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error listing items").into_response();
        }
    };

    match state.item_service.list_items(&query).await {
        Ok(items) => {
            let response = ItemListResponse {
                items: ItemMapper::to_dto_list(&items, &rooms),
                total_count,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list items: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing items").into_response()
        }
    }
}

/// Create a new item with photos and receipts
pub async fn create_item(
    State(state): State<AppState>,
    Json(request): Json<CreateItemRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/items - name: {:?}, {} photos, {} receipts",
        request.fields.name,
        request.photos.len(),
        request.receipts.len()
    );

    let command = match ItemMapper::to_create_command(request) {
        Ok(command) => command,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    match state.item_service.create_item(command).await {
        Ok(item) => {
            let rooms = match load_rooms(&state).await {
                Ok(rooms) => rooms,
                Err(response) => return response,
            };
            let response = ItemResponse {
                success_message: format!("Added \"{}\"", item.name),
                item: ItemMapper::to_dto(&item, &rooms),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to create item: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Get an item with its photos and receipt metadata
pub async fn get_item(State(state): State<AppState>, Path(item_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/items/{}", item_id);

    let item_id = match ItemMapper::parse_id(&item_id) {
        Ok(id) => id,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    match state.item_service.get_item_detail(item_id).await {
        Ok(Some(detail)) => {
            let rooms = match load_rooms(&state).await {
                Ok(rooms) => rooms,
                Err(response) => return response,
            };
            (StatusCode::OK, Json(ItemMapper::to_detail_dto(&detail, &rooms))).into_response()
        }
        Ok(None) => (StatusCode::NOT_FOUND, "Item not found").into_response(),
        Err(e) => {
            error!("Failed to get item: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving item").into_response()
        }
    }
}

/// Save the edit form of an item
pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Json(request): Json<UpdateItemRequest>,
) -> impl IntoResponse {
    info!("PUT /api/items/{} - name: {:?}", item_id, request.fields.name);

    let command = match ItemMapper::parse_id(&item_id).and_then(|id| ItemMapper::to_update_command(id, request)) {
        Ok(command) => command,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    match state.item_service.update_item(command).await {
        Ok(Some(item)) => {
            let rooms = match load_rooms(&state).await {
                Ok(rooms) => rooms,
                Err(response) => return response,
            };
            let response = ItemResponse {
                success_message: format!("Saved \"{}\"", item.name),
                item: ItemMapper::to_dto(&item, &rooms),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(None) => (StatusCode::NOT_FOUND, "Item not found").into_response(),
        Err(e) => {
            error!("Failed to update item: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Delete one item; it can be restored through the undo endpoint
pub async fn delete_item(State(state): State<AppState>, Path(item_id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/items/{}", item_id);

    let item_id = match ItemMapper::parse_id(&item_id) {
        Ok(id) => id,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    match state.item_service.delete_items(&[item_id]).await {
        Ok(result) if result.deleted_count == 0 => (StatusCode::NOT_FOUND, "Item not found").into_response(),
        Ok(result) => (StatusCode::OK, Json(delete_response(&state, result))).into_response(),
        Err(e) => {
            error!("Failed to delete item: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error deleting item").into_response()
        }
    }
}

/// Copy an item under a new id
pub async fn duplicate_item(State(state): State<AppState>, Path(item_id): Path<String>) -> impl IntoResponse {
    info!("POST /api/items/{}/duplicate", item_id);

    let item_id = match ItemMapper::parse_id(&item_id) {
        Ok(id) => id,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    match state.item_service.duplicate_item(item_id).await {
        Ok(Some(item)) => {
            let rooms = match load_rooms(&state).await {
                Ok(rooms) => rooms,
                Err(response) => return response,
            };
            let response = ItemResponse {
                success_message: format!("Duplicated as \"{}\"", item.name),
                item: ItemMapper::to_dto(&item, &rooms),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Ok(None) => (StatusCode::NOT_FOUND, "Item not found").into_response(),
        Err(e) => {
            error!("Failed to duplicate item: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error duplicating item").into_response()
        }
    }
}

/// Delete a batch of items
pub async fn delete_items(
    State(state): State<AppState>,
    Json(request): Json<DeleteItemsRequest>,
) -> impl IntoResponse {
    info!("POST /api/items/bulk-delete - {} ids", request.item_ids.len());

    let item_ids = match ItemMapper::parse_ids(&request.item_ids) {
        Ok(ids) => ids,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    match state.item_service.delete_items(&item_ids).await {
        Ok(result) => {
            if !result.not_found_ids.is_empty() {
                warn!("{} items to delete were not found", result.not_found_ids.len());
            }
            (StatusCode::OK, Json(delete_response(&state, result))).into_response()
        }
        Err(e) => {
            error!("Failed to delete items: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error deleting items").into_response()
        }
    }
}

/// Restore the last deleted batch while its undo window is open
pub async fn undo_delete(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/items/undo");

    match state.item_service.undo_delete().await {
        Ok(items) => {
            let rooms = match load_rooms(&state).await {
                Ok(rooms) => rooms,
                Err(response) => return response,
            };
            let response = UndoDeleteResponse {
                restored: ItemMapper::to_dto_list(&items, &rooms),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to undo delete: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error restoring items").into_response()
        }
    }
}

/// Move a batch of items into a room, or out of any room
pub async fn move_items(
    State(state): State<AppState>,
    Json(request): Json<MoveItemsRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/items/bulk-move - {} ids to room {:?}",
        request.item_ids.len(),
        request.room_id
    );

    let item_ids = match ItemMapper::parse_ids(&request.item_ids) {
        Ok(ids) => ids,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    let room_id = match request.room_id.as_deref().map(ItemMapper::parse_id).transpose() {
        Ok(room_id) => room_id,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    match state.item_service.move_items(MoveItemsCommand { item_ids, room_id }).await {
        Ok(moved_count) => (StatusCode::OK, Json(MoveItemsResponse { moved_count })).into_response(),
        Err(e) => {
            error!("Failed to move items: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}
