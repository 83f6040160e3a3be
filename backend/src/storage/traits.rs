//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.
//!
//! Relationship rules live in the delete paths of the implementations:
//! deleting an item removes its photos and receipts, deleting a room only
//! detaches the items that referenced it.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::models::{Item, Photo, Receipt, Room};

/// Trait defining the interface for item storage operations
///
/// Photo and receipt bytes are kept out of line from item rows; listing items
/// never loads them.
#[async_trait]
pub trait ItemStorage: Send + Sync {
    /// Store a new item together with its attachments in one transaction
    async fn store_item(&self, item: &Item, photos: &[Photo], receipts: &[Receipt]) -> Result<()>;

    /// Retrieve a specific item by ID
    async fn get_item(&self, item_id: Uuid) -> Result<Option<Item>>;

    /// List every item, in no particular order
    async fn list_items(&self) -> Result<Vec<Item>>;

    /// Overwrite the scalar fields of an existing item
    /// Returns false if the item does not exist
    async fn update_item(&self, item: &Item) -> Result<bool>;

    /// Delete an item and everything it owns
    /// Returns true if the item was found and deleted
    async fn delete_item(&self, item_id: Uuid) -> Result<bool>;

    /// Delete several items and their attachments in one transaction
    /// Returns the ids that existed; on error nothing is deleted
    async fn delete_items(&self, item_ids: &[Uuid]) -> Result<Vec<Uuid>>;

    /// Point the given items at a room (or at no room)
    /// Returns the number of items actually updated
    async fn assign_room(&self, item_ids: &[Uuid], room_id: Option<Uuid>) -> Result<u32>;

    /// Photos of an item in display order
    async fn list_photos(&self, item_id: Uuid) -> Result<Vec<Photo>>;

    /// Replace the whole photo set of an item atomically
    async fn replace_photos(&self, item_id: Uuid, photos: &[Photo]) -> Result<()>;

    /// Receipts of an item in the order they were added
    async fn list_receipts(&self, item_id: Uuid) -> Result<Vec<Receipt>>;

    /// Append receipts to an item
    async fn add_receipts(&self, receipts: &[Receipt]) -> Result<()>;

    /// Photos and receipts whose owning item no longer exists
    async fn count_orphaned_attachments(&self) -> Result<u64>;
}

/// Trait defining the interface for room storage operations
#[async_trait]
pub trait RoomStorage: Send + Sync {
    /// Store a new room
    async fn store_room(&self, room: &Room) -> Result<()>;

    /// Retrieve a specific room by ID
    async fn get_room(&self, room_id: Uuid) -> Result<Option<Room>>;

    /// List all rooms ordered by name
    async fn list_rooms(&self) -> Result<Vec<Room>>;

    /// Update an existing room
    /// Returns false if the room does not exist
    async fn update_room(&self, room: &Room) -> Result<bool>;

    /// Delete a room, clearing the room reference of its items
    /// Returns the number of items that were detached, or None if the room did not exist
    async fn delete_room(&self, room_id: Uuid) -> Result<Option<u32>>;
}

/// Trait defining the interface for storage connections
///
/// This trait abstracts away the specific connection type and provides
/// factory methods for creating repositories, so the domain layer can work
/// with any storage backend without knowing the implementation details.
pub trait Connection: Send + Sync + Clone + 'static {
    /// The type of ItemStorage this connection creates
    type ItemRepository: ItemStorage + Clone + 'static;

    /// The type of RoomStorage this connection creates
    type RoomRepository: RoomStorage + Clone + 'static;

    /// Create a new item repository for this connection
    fn create_item_repository(&self) -> Self::ItemRepository;

    /// Create a new room repository for this connection
    fn create_room_repository(&self) -> Self::RoomRepository;
}
