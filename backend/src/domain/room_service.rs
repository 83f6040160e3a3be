use anyhow::Result;
use log::{info, warn};
use shared::{ROOM_ICONS, DEFAULT_ROOM_ICON};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::commands::rooms::{CreateRoomCommand, UpdateRoomCommand};
use crate::domain::models::{
    remaining_suggestions, total_display_value, Item, Room, RoomSuggestion, RoomValidationError,
    MAX_NAME_LENGTH,
};
use crate::storage::{Connection, ItemStorage, RoomStorage};

/// A room with the items assigned to it, newest first
#[derive(Debug, Clone)]
pub struct RoomDetail {
    pub room: Room,
    pub items: Vec<Item>,
    pub total_value: f64,
}

/// Service for managing rooms
#[derive(Clone)]
pub struct RoomService<C: Connection> {
    room_repository: C::RoomRepository,
    item_repository: C::ItemRepository,
}

impl<C: Connection> RoomService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            room_repository: connection.create_room_repository(),
            item_repository: connection.create_item_repository(),
        }
    }

    fn validate_name(name: &str) -> Result<String, RoomValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RoomValidationError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(RoomValidationError::NameTooLong);
        }
        Ok(name.to_string())
    }

    fn validate_icon(icon: &str) -> Result<String, RoomValidationError> {
        if ROOM_ICONS.contains(&icon) {
            Ok(icon.to_string())
        } else {
            Err(RoomValidationError::UnknownIcon(icon.to_string()))
        }
    }

    /// Create a new room
    pub async fn create_room(&self, command: CreateRoomCommand) -> Result<Room> {
        info!("Creating room: name={}", command.name.trim());

        let name = Self::validate_name(&command.name)?;
        let icon = match command.icon.as_deref() {
            Some(icon) => Self::validate_icon(icon)?,
            None => DEFAULT_ROOM_ICON.to_string(),
        };
        let room = Room::with_style(name, &icon, command.color.unwrap_or_default());

        self.room_repository.store_room(&room).await?;
        info!("Created room: {} with ID: {}", room.name, room.id);
        Ok(room)
    }

    /// Create a room from one of the suggestions
    pub async fn create_from_suggestion(&self, suggestion: &RoomSuggestion) -> Result<Room> {
        self.create_room(CreateRoomCommand {
            name: suggestion.name.to_string(),
            icon: Some(suggestion.icon.to_string()),
            color: Some(suggestion.color),
        })
        .await
    }

    pub async fn get_room(&self, room_id: Uuid) -> Result<Option<Room>> {
        let room = self.room_repository.get_room(room_id).await?;
        if room.is_none() {
            warn!("Room not found: {}", room_id);
        }
        Ok(room)
    }

    /// All rooms sorted by name
    pub async fn list_rooms(&self) -> Result<Vec<Room>> {
        self.room_repository.list_rooms().await
    }

    /// All rooms sorted by name, each with its number of items
    pub async fn list_rooms_with_counts(&self) -> Result<Vec<(Room, usize)>> {
        let rooms = self.room_repository.list_rooms().await?;
        let items = self.item_repository.list_items().await?;

        let mut counts: HashMap<Uuid, usize> = HashMap::new();
        for room_id in items.iter().filter_map(|i| i.room_id) {
            *counts.entry(room_id).or_default() += 1;
        }

        Ok(rooms
            .into_iter()
            .map(|room| {
                let count = counts.get(&room.id).copied().unwrap_or(0);
                (room, count)
            })
            .collect())
    }

    pub async fn room_detail(&self, room_id: Uuid) -> Result<Option<RoomDetail>> {
        let Some(room) = self.get_room(room_id).await? else {
            return Ok(None);
        };

        let mut items: Vec<Item> = self
            .item_repository
            .list_items()
            .await?
            .into_iter()
            .filter(|i| i.room_id == Some(room_id))
            .collect();
        items.sort_by_key(|i| Reverse(i.date_added));
        let total_value = total_display_value(&items);

        Ok(Some(RoomDetail {
            room,
            items,
            total_value,
        }))
    }

    /// Update name, icon or color. Returns None if the room does not exist.
    pub async fn update_room(&self, command: UpdateRoomCommand) -> Result<Option<Room>> {
        info!("Updating room: {}", command.room_id);

        let Some(mut room) = self.room_repository.get_room(command.room_id).await? else {
            return Ok(None);
        };

        if let Some(name) = command.name {
            room.name = Self::validate_name(&name)?;
        }
        if let Some(icon) = command.icon {
            room.icon = Self::validate_icon(&icon)?;
        }
        if let Some(color) = command.color {
            room.color = color;
        }

        self.room_repository.update_room(&room).await?;
        info!("Updated room: {} with ID: {}", room.name, room.id);
        Ok(Some(room))
    }

    /// Delete a room; its items stay and lose their room.
    /// Returns the number of detached items, or None if the room does not exist.
    pub async fn delete_room(&self, room_id: Uuid) -> Result<Option<u32>> {
        info!("Deleting room: {}", room_id);
        let detached = self.room_repository.delete_room(room_id).await?;
        match detached {
            Some(count) => info!("Deleted room {}, {} items are now unassigned", room_id, count),
            None => warn!("Cannot delete missing room {}", room_id),
        }
        Ok(detached)
    }

    /// Suggested rooms whose names are not taken yet
    pub async fn suggestions(&self) -> Result<Vec<RoomSuggestion>> {
        let rooms = self.room_repository.list_rooms().await?;
        Ok(remaining_suggestions(&rooms))
    }
}
