//! Conversion between room DTOs and domain models.

use shared::{Room as SharedRoom, RoomSuggestion as SharedRoomSuggestion};

use crate::domain::models::{Room, RoomSuggestion};

pub struct RoomMapper;

impl RoomMapper {
    pub fn to_dto(room: &Room, item_count: usize) -> SharedRoom {
        SharedRoom {
            id: room.id.to_string(),
            name: room.name.clone(),
            icon: room.icon.clone(),
            color: room.color,
            date_created: room.date_created.map(|d| d.to_rfc3339()),
            item_count,
        }
    }

    pub fn to_suggestion_dto(suggestion: &RoomSuggestion) -> SharedRoomSuggestion {
        SharedRoomSuggestion {
            name: suggestion.name.to_string(),
            icon: suggestion.icon.to_string(),
            color: suggestion.color,
        }
    }
}
