use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{RoomColor, DEFAULT_ROOM_ICON};
use uuid::Uuid;

/// A named location grouping items. Names need not be unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub icon: String,
    pub color: RoomColor,
    pub date_created: Option<DateTime<Utc>>,
}

impl Room {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            icon: DEFAULT_ROOM_ICON.to_string(),
            color: RoomColor::default(),
            date_created: Some(Utc::now()),
        }
    }

    pub fn with_style(name: impl Into<String>, icon: &str, color: RoomColor) -> Self {
        Self {
            icon: icon.to_string(),
            color,
            ..Self::new(name)
        }
    }

    /// Case-insensitive name comparison used when resolving rooms by name
    pub fn name_matches(&self, other: &str) -> bool {
        self.name.trim().to_lowercase() == other.trim().to_lowercase()
    }
}

/// A common room offered to users who have not created it yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomSuggestion {
    pub name: &'static str,
    pub icon: &'static str,
    pub color: RoomColor,
}

pub const SUGGESTED_ROOMS: [RoomSuggestion; 8] = [
    RoomSuggestion { name: "Living Room", icon: "sofa", color: RoomColor::Blue },
    RoomSuggestion { name: "Kitchen", icon: "fork.knife", color: RoomColor::Orange },
    RoomSuggestion { name: "Bedroom", icon: "bed.double", color: RoomColor::Purple },
    RoomSuggestion { name: "Bathroom", icon: "shower", color: RoomColor::Teal },
    RoomSuggestion { name: "Garage", icon: "car.fill", color: RoomColor::Green },
    RoomSuggestion { name: "Office", icon: "building.2", color: RoomColor::Blue },
    RoomSuggestion { name: "Laundry", icon: "washer", color: RoomColor::Teal },
    RoomSuggestion { name: "Storage", icon: "shippingbox", color: RoomColor::Yellow },
];

/// Suggestions whose exact name is not already taken
pub fn remaining_suggestions(existing: &[Room]) -> Vec<RoomSuggestion> {
    SUGGESTED_ROOMS
        .into_iter()
        .filter(|s| !existing.iter().any(|r| r.name == s.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_room_defaults() {
        let room = Room::new("Den");
        assert_eq!(room.icon, "house");
        assert_eq!(room.color, RoomColor::Blue);
        assert!(room.date_created.is_some());
    }

    #[test]
    fn test_name_matches_ignores_case() {
        let room = Room::new("Garage");
        assert!(room.name_matches("garage"));
        assert!(room.name_matches(" GARAGE "));
        assert!(!room.name_matches("Garage 2"));
    }

    #[test]
    fn test_remaining_suggestions_skip_existing_names() {
        let existing = vec![Room::new("Kitchen"), Room::new("garage")];
        let names: Vec<_> = remaining_suggestions(&existing).iter().map(|s| s.name).collect();
        assert!(!names.contains(&"Kitchen"));
        // exact-name match only, so a lower-case "garage" still leaves the suggestion
        assert!(names.contains(&"Garage"));
        assert_eq!(names.len(), 7);
    }
}
