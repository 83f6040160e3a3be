//! Domain-level command and query types.
//!
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the DTOs defined in the
//! `shared` crate to these internal types.

pub mod items {
    use chrono::NaiveDate;
    use shared::{ItemCategory, ItemCondition, SortOrder};
    use uuid::Uuid;

    use crate::domain::models::{Item, ItemValidationError, MAX_NAME_LENGTH};

    /// Editable fields of an item, as held by the add/edit form.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ItemDraft {
        pub name: String,
        pub description: String,
        pub category: ItemCategory,
        pub condition: ItemCondition,
        pub room_id: Option<Uuid>,
        pub make: String,
        pub model: String,
        pub serial_number: String,
        pub purchase_price: Option<f64>,
        pub purchase_date: Option<NaiveDate>,
        pub purchase_store: String,
        pub current_value: Option<f64>,
        pub warranty_expiration: Option<NaiveDate>,
        pub warranty_provider: String,
        pub notes: String,
    }

    impl Default for ItemDraft {
        fn default() -> Self {
            Self {
                name: String::new(),
                description: String::new(),
                category: ItemCategory::Other,
                condition: ItemCondition::Good,
                room_id: None,
                make: String::new(),
                model: String::new(),
                serial_number: String::new(),
                purchase_price: None,
                purchase_date: None,
                purchase_store: String::new(),
                current_value: None,
                warranty_expiration: None,
                warranty_provider: String::new(),
                notes: String::new(),
            }
        }
    }

    impl ItemDraft {
        /// Load the form from an existing item
        pub fn from_item(item: &Item) -> Self {
            Self {
                name: item.name.clone(),
                description: item.description.clone(),
                category: item.category_or_default(),
                condition: item.condition_or_default(),
                room_id: item.room_id,
                make: item.make.clone(),
                model: item.model.clone(),
                serial_number: item.serial_number.clone(),
                purchase_price: item.purchase_price,
                purchase_date: item.purchase_date,
                purchase_store: item.purchase_store.clone(),
                current_value: item.current_value,
                warranty_expiration: item.warranty_expiration,
                warranty_provider: item.warranty_provider.clone(),
                notes: item.notes.clone(),
            }
        }

        /// Save is only allowed for a non-empty name and a purchase date no later than `today`
        pub fn validate(&self, today: NaiveDate) -> Result<(), ItemValidationError> {
            let name = self.name.trim();
            if name.is_empty() {
                return Err(ItemValidationError::EmptyName);
            }
            if name.chars().count() > MAX_NAME_LENGTH {
                return Err(ItemValidationError::NameTooLong);
            }
            if matches!(self.purchase_date, Some(date) if date > today) {
                return Err(ItemValidationError::PurchaseDateInFuture);
            }
            let negative = |v: Option<f64>| v.map_or(false, |v| v < 0.0);
            if negative(self.purchase_price) || negative(self.current_value) {
                return Err(ItemValidationError::NegativeAmount);
            }
            Ok(())
        }

        /// Overwrite the item's editable fields in place; `id` and `date_added` are untouched
        pub fn apply_to(&self, item: &mut Item) {
            item.name = self.name.trim().to_string();
            item.description = self.description.clone();
            item.category = Some(self.category);
            item.condition = Some(self.condition);
            item.room_id = self.room_id;
            item.make = self.make.clone();
            item.model = self.model.clone();
            item.serial_number = self.serial_number.clone();
            item.purchase_price = self.purchase_price;
            item.purchase_date = self.purchase_date;
            item.purchase_store = self.purchase_store.clone();
            item.current_value = self.current_value;
            item.warranty_expiration = self.warranty_expiration;
            item.warranty_provider = self.warranty_provider.clone();
            item.notes = self.notes.clone();
        }
    }

    /// A receipt file picked by the user
    #[derive(Debug, Clone, PartialEq)]
    pub struct ReceiptFile {
        pub filename: String,
        pub data: Vec<u8>,
    }

    /// Input for creating a new item.
    #[derive(Debug, Clone)]
    pub struct CreateItemCommand {
        pub draft: ItemDraft,
        /// Raw image bytes; re-compressed to JPEG before storage
        pub photos: Vec<Vec<u8>>,
        pub receipts: Vec<ReceiptFile>,
    }

    /// Input for saving an edited item.
    #[derive(Debug, Clone)]
    pub struct UpdateItemCommand {
        pub item_id: Uuid,
        pub draft: ItemDraft,
        /// `Some` replaces the whole photo set atomically, `None` keeps it
        pub photos: Option<Vec<Vec<u8>>>,
        pub new_receipts: Vec<ReceiptFile>,
    }

    /// Filter and sort parameters for the item list.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ItemListQuery {
        pub search: String,
        pub category: Option<ItemCategory>,
        pub room_id: Option<Uuid>,
        pub sort: SortOrder,
    }

    /// Result of deleting items.
    #[derive(Debug, Clone)]
    pub struct DeleteItemsResult {
        pub deleted_count: usize,
        pub not_found_ids: Vec<Uuid>,
        /// Text of the undo toast, None when nothing was deleted
        pub undo_message: Option<String>,
    }

    /// Command for moving items into a room (or out of any room).
    #[derive(Debug, Clone)]
    pub struct MoveItemsCommand {
        pub item_ids: Vec<Uuid>,
        pub room_id: Option<Uuid>,
    }
}

pub mod rooms {
    use shared::RoomColor;
    use uuid::Uuid;

    /// Input for creating a room.
    #[derive(Debug, Clone)]
    pub struct CreateRoomCommand {
        pub name: String,
        pub icon: Option<String>,
        pub color: Option<RoomColor>,
    }

    /// Input for editing a room; absent fields are left as they are.
    #[derive(Debug, Clone)]
    pub struct UpdateRoomCommand {
        pub room_id: Uuid,
        pub name: Option<String>,
        pub icon: Option<String>,
        pub color: Option<RoomColor>,
    }
}

#[cfg(test)]
mod tests {
    use super::items::*;
    use crate::domain::models::{Item, ItemValidationError};
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let draft = ItemDraft {
            name: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(draft.validate(today()), Err(ItemValidationError::EmptyName));
    }

    #[test]
    fn test_validate_rejects_future_purchase_date() {
        let draft = ItemDraft {
            name: "TV".to_string(),
            purchase_date: NaiveDate::from_ymd_opt(2025, 6, 2),
            ..Default::default()
        };
        assert_eq!(
            draft.validate(today()),
            Err(ItemValidationError::PurchaseDateInFuture)
        );

        let ok = ItemDraft {
            purchase_date: Some(today()),
            ..draft
        };
        assert!(ok.validate(today()).is_ok());
    }

    #[test]
    fn test_apply_to_keeps_identity_and_date_added() {
        let mut item = Item::new("Old name");
        let id = item.id;
        let added = item.date_added;

        let draft = ItemDraft {
            name: "  New name ".to_string(),
            make: "Sony".to_string(),
            current_value: Some(300.0),
            ..Default::default()
        };
        draft.apply_to(&mut item);

        assert_eq!(item.id, id);
        assert_eq!(item.date_added, added);
        assert_eq!(item.name, "New name");
        assert_eq!(item.make, "Sony");
        assert_eq!(item.display_value(), Some(300.0));
    }

    #[test]
    fn test_from_item_normalizes_missing_enums() {
        let mut item = Item::new("Chair");
        item.category = None;
        item.condition = None;
        let draft = ItemDraft::from_item(&item);
        assert_eq!(draft.category, shared::ItemCategory::Other);
        assert_eq!(draft.condition, shared::ItemCondition::Good);
    }
}
