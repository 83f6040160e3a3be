//! Item service domain logic for the inventory.
use anyhow::{Context, Result};
use chrono::{Local, Utc};
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::commands::items::{
    CreateItemCommand, DeleteItemsResult, ItemDraft, ItemListQuery, MoveItemsCommand, ReceiptFile,
    UpdateItemCommand,
};
use crate::domain::item_list::{visible_items, ItemListState};
use crate::domain::models::{Item, ItemValidationError, Photo, Receipt};
use crate::domain::photo_processing::compress_photo;
use crate::domain::undo::{DeletedItemMemento, UndoBuffer};
use crate::storage::{Connection, ItemStorage, RoomStorage};

/// An item together with its attachments
#[derive(Debug, Clone)]
pub struct ItemDetail {
    pub item: Item,
    pub photos: Vec<Photo>,
    pub receipts: Vec<Receipt>,
}

#[derive(Clone)]
pub struct ItemService<C: Connection> {
    item_repository: C::ItemRepository,
    room_repository: C::RoomRepository,
    undo: UndoBuffer<DeletedItemMemento>,
}

impl<C: Connection> ItemService<C> {
    pub fn new(connection: Arc<C>, undo_window: Duration) -> Self {
        Self {
            item_repository: connection.create_item_repository(),
            room_repository: connection.create_room_repository(),
            undo: UndoBuffer::new(undo_window),
        }
    }

    async fn validate_draft(&self, draft: &ItemDraft) -> Result<()> {
        draft.validate(Local::now().date_naive())?;
        if let Some(room_id) = draft.room_id {
            if self.room_repository.get_room(room_id).await?.is_none() {
                return Err(ItemValidationError::UnknownRoom(room_id).into());
            }
        }
        Ok(())
    }

    fn build_attachments(item_id: Uuid, photos: Vec<Vec<u8>>, receipts: Vec<ReceiptFile>) -> (Vec<Photo>, Vec<Receipt>) {
        let photos = photos
            .into_iter()
            .map(|data| Photo::new(item_id, compress_photo(data)))
            .collect();
        let receipts = receipts
            .into_iter()
            .map(|r| Receipt::new(item_id, r.data, r.filename))
            .collect();
        (photos, receipts)
    }

    pub async fn create_item(&self, command: CreateItemCommand) -> Result<Item> {
        info!("Creating item: name={}", command.draft.name.trim());
        self.validate_draft(&command.draft).await?;

        let mut item = Item::new("");
        command.draft.apply_to(&mut item);

        let (photos, receipts) = Self::build_attachments(item.id, command.photos, command.receipts);
        self.item_repository
            .store_item(&item, &photos, &receipts)
            .await
            .context("Failed to store new item")?;

        info!(
            "Created item {} ({}) with {} photos and {} receipts",
            item.name,
            item.id,
            photos.len(),
            receipts.len()
        );
        Ok(item)
    }

    pub async fn get_item(&self, item_id: Uuid) -> Result<Option<Item>> {
        let item = self.item_repository.get_item(item_id).await?;
        if item.is_none() {
            warn!("Item not found: {}", item_id);
        }
        Ok(item)
    }

    pub async fn get_item_detail(&self, item_id: Uuid) -> Result<Option<ItemDetail>> {
        let Some(item) = self.get_item(item_id).await? else {
            return Ok(None);
        };
        let photos = self.item_repository.list_photos(item_id).await?;
        let receipts = self.item_repository.list_receipts(item_id).await?;
        Ok(Some(ItemDetail { item, photos, receipts }))
    }

    /// Overwrite the item's fields in place. Returns None if the item does not exist.
    pub async fn update_item(&self, command: UpdateItemCommand) -> Result<Option<Item>> {
        info!("Updating item: {}", command.item_id);

        let Some(mut item) = self.item_repository.get_item(command.item_id).await? else {
            warn!("Cannot update missing item {}", command.item_id);
            return Ok(None);
        };
        self.validate_draft(&command.draft).await?;

        command.draft.apply_to(&mut item);
        self.item_repository.update_item(&item).await?;

        if let Some(photos) = command.photos {
            let (photos, _) = Self::build_attachments(item.id, photos, Vec::new());
            self.item_repository
                .replace_photos(item.id, &photos)
                .await
                .context("Failed to replace photos")?;
            info!("Replaced photos of item {} ({} photos)", item.id, photos.len());
        }
        if !command.new_receipts.is_empty() {
            let (_, receipts) = Self::build_attachments(item.id, Vec::new(), command.new_receipts);
            self.item_repository.add_receipts(&receipts).await?;
        }

        info!("Updated item {} ({})", item.name, item.id);
        Ok(Some(item))
    }

    /// Copy an item with its attachments under a new id and " (Copy)" name
    pub async fn duplicate_item(&self, item_id: Uuid) -> Result<Option<Item>> {
        let Some(detail) = self.get_item_detail(item_id).await? else {
            return Ok(None);
        };

        let mut copy = detail.item.with_new_identity();
        copy.name = format!("{} (Copy)", detail.item.name);
        copy.date_added = Some(Utc::now());

        let photos: Vec<Photo> = detail
            .photos
            .iter()
            .map(|p| Photo::new(copy.id, p.image_data.clone()))
            .collect();
        let receipts: Vec<Receipt> = detail
            .receipts
            .iter()
            .map(|r| Receipt::new(copy.id, r.file_data.clone(), r.filename.clone()))
            .collect();

        self.item_repository.store_item(&copy, &photos, &receipts).await?;
        info!("Duplicated item {} as {}", item_id, copy.id);
        Ok(Some(copy))
    }

    pub async fn all_items(&self) -> Result<Vec<Item>> {
        self.item_repository.list_items().await
    }

    /// Visible items for a filter and sort
    pub async fn list_items(&self, query: &ItemListQuery) -> Result<Vec<Item>> {
        let items = self.item_repository.list_items().await?;
        let rooms = self.room_repository.list_rooms().await?;
        Ok(visible_items(items, &rooms, query))
    }

    /// Delete items and make the batch available to [`Self::undo_delete`]
    pub async fn delete_items(&self, item_ids: &[Uuid]) -> Result<DeleteItemsResult> {
        info!("Deleting {} items", item_ids.len());

        let mut captured = Vec::with_capacity(item_ids.len());
        let mut not_found_ids = Vec::new();

        for &item_id in item_ids {
            match self.get_item_detail(item_id).await? {
                Some(detail) => captured.push(DeletedItemMemento::capture(
                    &detail.item,
                    &detail.photos,
                    &detail.receipts,
                )),
                None => not_found_ids.push(item_id),
            }
        }

        let capture_ids: Vec<Uuid> = captured.iter().map(|m| m.item.id).collect();
        let deleted_ids = self
            .item_repository
            .delete_items(&capture_ids)
            .await
            .context("Failed to delete items")?;

        let mut mementos = Vec::with_capacity(deleted_ids.len());
        for memento in captured {
            if deleted_ids.contains(&memento.item.id) {
                mementos.push(memento);
            } else {
                not_found_ids.push(memento.item.id);
            }
        }

        let deleted_count = mementos.len();
        let undo_message = match mementos.as_slice() {
            [] => None,
            [only] => Some(format!("Deleted \"{}\"", only.item.name)),
            many => Some(format!("Deleted {} items", many.len())),
        };
        if mementos.is_empty() {
            // a delete that removed nothing still closes the previous window
            if self.undo.take().is_some() {
                info!("Discarded pending undo batch");
            }
        } else {
            self.undo.arm(mementos);
        }

        info!(
            "Deleted {} items, {} not found",
            deleted_count,
            not_found_ids.len()
        );
        Ok(DeleteItemsResult {
            deleted_count,
            not_found_ids,
            undo_message,
        })
    }

    /// Re-create the most recently deleted batch, if its undo window is still open.
    /// Restored items get new ids; a room that no longer exists is dropped.
    pub async fn undo_delete(&self) -> Result<Vec<Item>> {
        let Some(batch) = self.undo.take() else {
            info!("Nothing to undo");
            return Ok(Vec::new());
        };

        let mut restored = Vec::with_capacity(batch.len());
        for memento in batch {
            let (mut item, photos, receipts) = memento.restore();
            if let Some(room_id) = item.room_id {
                if self.room_repository.get_room(room_id).await?.is_none() {
                    item.room_id = None;
                }
            }
            self.item_repository.store_item(&item, &photos, &receipts).await?;
            restored.push(item);
        }

        info!("Restored {} deleted items", restored.len());
        Ok(restored)
    }

    pub fn pending_undo_count(&self) -> usize {
        self.undo.pending_len()
    }

    pub fn undo_window(&self) -> Duration {
        self.undo.window()
    }

    /// Assign items to a room, or to no room. Returns how many items were moved.
    pub async fn move_items(&self, command: MoveItemsCommand) -> Result<u32> {
        if let Some(room_id) = command.room_id {
            if self.room_repository.get_room(room_id).await?.is_none() {
                return Err(ItemValidationError::UnknownRoom(room_id).into());
            }
        }
        let moved = self
            .item_repository
            .assign_room(&command.item_ids, command.room_id)
            .await?;
        info!("Moved {} items to room {:?}", moved, command.room_id);
        Ok(moved)
    }

    /// Delete the selected visible items of a list and leave select mode
    pub async fn delete_selection(&self, state: &mut ItemListState) -> Result<DeleteItemsResult> {
        let visible = self.list_items(state.query()).await?;
        let ids = state.selected_visible(&visible);
        let result = self.delete_items(&ids).await?;
        state.complete_bulk_action();
        Ok(result)
    }

    /// Move the selected visible items of a list and leave select mode
    pub async fn move_selection(&self, state: &mut ItemListState, room_id: Option<Uuid>) -> Result<u32> {
        let visible = self.list_items(state.query()).await?;
        let item_ids = state.selected_visible(&visible);
        let moved = self.move_items(MoveItemsCommand { item_ids, room_id }).await?;
        state.complete_bulk_action();
        Ok(moved)
    }
}
