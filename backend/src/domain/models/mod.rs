pub mod attachment;
pub mod item;
pub mod room;

pub use attachment::{Photo, Receipt};
pub use item::{total_display_value, Item};
pub use room::{remaining_suggestions, Room, RoomSuggestion, SUGGESTED_ROOMS};

pub const MAX_NAME_LENGTH: usize = 200;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ItemValidationError {
    #[error("Item name cannot be empty")]
    EmptyName,
    #[error("Item name cannot exceed {} characters", MAX_NAME_LENGTH)]
    NameTooLong,
    #[error("Purchase date cannot be in the future")]
    PurchaseDateInFuture,
    #[error("Amounts cannot be negative")]
    NegativeAmount,
    #[error("Room not found: {0}")]
    UnknownRoom(uuid::Uuid),
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RoomValidationError {
    #[error("Room name cannot be empty")]
    EmptyName,
    #[error("Room name cannot exceed {} characters", MAX_NAME_LENGTH)]
    NameTooLong,
    #[error("Unknown room icon: {0}")]
    UnknownIcon(String),
}
