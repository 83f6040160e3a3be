//! # REST API for Room Management

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::{error, info};
use std::slice;

use shared::{
    CreateRoomRequest, DeleteRoomResponse, RoomDetailResponse, RoomListResponse, RoomSuggestionsResponse,
    UpdateRoomRequest,
};

use crate::domain::commands::rooms::{CreateRoomCommand, UpdateRoomCommand};
use crate::io::rest::error_status;
use crate::io::rest::mappers::{ItemMapper, RoomMapper};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rooms).post(create_room))
        .route("/suggestions", get(list_suggestions))
        .route("/:id", get(get_room).put(update_room).delete(delete_room))
}

/// List rooms by name, with their item counts
pub async fn list_rooms(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/rooms");

    match state.room_service.list_rooms_with_counts().await {
        Ok(rooms) => {
            let response = RoomListResponse {
                rooms: rooms.iter().map(|(room, count)| RoomMapper::to_dto(room, *count)).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list rooms: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing rooms").into_response()
        }
    }
}

/// Create a room
pub async fn create_room(
    State(state): State<AppState>,
    Json(request): Json<CreateRoomRequest>,
) -> impl IntoResponse {
    info!("POST /api/rooms - request: {:?}", request);

    let command = CreateRoomCommand {
        name: request.name,
        icon: request.icon,
        color: request.color,
    };
    match state.room_service.create_room(command).await {
        Ok(room) => (StatusCode::CREATED, Json(RoomMapper::to_dto(&room, 0))).into_response(),
        Err(e) => {
            error!("Failed to create room: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Room with its items, newest first
pub async fn get_room(State(state): State<AppState>, Path(room_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/rooms/{}", room_id);

    let room_id = match ItemMapper::parse_id(&room_id) {
        Ok(id) => id,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    match state.room_service.room_detail(room_id).await {
        Ok(Some(detail)) => {
            let response = RoomDetailResponse {
                room: RoomMapper::to_dto(&detail.room, detail.items.len()),
                items: ItemMapper::to_dto_list(&detail.items, slice::from_ref(&detail.room)),
                total_value: detail.total_value,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(None) => (StatusCode::NOT_FOUND, "Room not found").into_response(),
        Err(e) => {
            error!("Failed to get room: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving room").into_response()
        }
    }
}

/// Rename or restyle a room
pub async fn update_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(request): Json<UpdateRoomRequest>,
) -> impl IntoResponse {
    info!("PUT /api/rooms/{} - request: {:?}", room_id, request);

    let room_id = match ItemMapper::parse_id(&room_id) {
        Ok(id) => id,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    let command = UpdateRoomCommand {
        room_id,
        name: request.name,
        icon: request.icon,
        color: request.color,
    };
    match state.room_service.update_room(command).await {
        Ok(Some(room)) => {
            let count = match state.room_service.room_detail(room.id).await {
                Ok(detail) => detail.map_or(0, |d| d.items.len()),
                Err(e) => {
                    error!("Failed to count room items: {}", e);
                    0
                }
            };
            (StatusCode::OK, Json(RoomMapper::to_dto(&room, count))).into_response()
        }
        Ok(None) => (StatusCode::NOT_FOUND, "Room not found").into_response(),
        Err(e) => {
            error!("Failed to update room: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Delete a room; its items become unassigned
pub async fn delete_room(State(state): State<AppState>, Path(room_id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/rooms/{}", room_id);

    let room_id = match ItemMapper::parse_id(&room_id) {
        Ok(id) => id,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    match state.room_service.delete_room(room_id).await {
        Ok(Some(unassigned_item_count)) => {
            (StatusCode::OK, Json(DeleteRoomResponse { unassigned_item_count })).into_response()
        }
        Ok(None) => (StatusCode::NOT_FOUND, "Room not found").into_response(),
        Err(e) => {
            error!("Failed to delete room: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error deleting room").into_response()
        }
    }
}

/// Common rooms not created yet
pub async fn list_suggestions(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/rooms/suggestions");

    match state.room_service.suggestions().await {
        Ok(suggestions) => {
            let response = RoomSuggestionsResponse {
                suggestions: suggestions.iter().map(RoomMapper::to_suggestion_dto).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to list room suggestions: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing suggestions").into_response()
        }
    }
}
