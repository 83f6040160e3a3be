//! Aggregates shown on the summary screen.

use anyhow::Result;
use chrono::{Months, NaiveDate};
use log::info;
use shared::ItemCategory;
use std::cmp::Reverse;
use std::sync::Arc;

use crate::domain::models::{total_display_value, Item, Room};
use crate::storage::{Connection, ItemStorage, RoomStorage};

pub const RECENT_ITEM_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: ItemCategory,
    pub count: usize,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomTotal {
    pub room: Room,
    pub count: usize,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventorySummary {
    pub total_items: usize,
    pub total_value: f64,
    /// Non-empty categories, largest first
    pub by_category: Vec<CategoryTotal>,
    /// Non-empty rooms, largest first
    pub by_room: Vec<RoomTotal>,
    pub recently_added: Vec<Item>,
    /// Warranty ended before today, oldest first
    pub expired_warranties: Vec<Item>,
    /// Warranty ends after today and within three months, soonest first
    pub expiring_warranties: Vec<Item>,
}

/// Compute the summary of `items` as of `today`
pub fn summarize(items: &[Item], rooms: &[Room], today: NaiveDate) -> InventorySummary {
    let mut by_category: Vec<CategoryTotal> = ItemCategory::ALL
        .iter()
        .map(|&category| {
            let members: Vec<&Item> = items
                .iter()
                .filter(|i| i.category_or_default() == category)
                .collect();
            CategoryTotal {
                category,
                count: members.len(),
                value: total_display_value(members),
            }
        })
        .filter(|c| c.count > 0)
        .collect();
    by_category.sort_by_key(|c| Reverse(c.count));

    let mut by_room: Vec<RoomTotal> = rooms
        .iter()
        .map(|room| {
            let members: Vec<&Item> = items.iter().filter(|i| i.room_id == Some(room.id)).collect();
            RoomTotal {
                room: room.clone(),
                count: members.len(),
                value: total_display_value(members),
            }
        })
        .filter(|r| r.count > 0)
        .collect();
    by_room.sort_by_key(|r| Reverse(r.count));

    let mut recently_added = items.to_vec();
    recently_added.sort_by_key(|i| Reverse(i.date_added));
    recently_added.truncate(RECENT_ITEM_COUNT);

    let horizon = today.checked_add_months(Months::new(3)).unwrap_or(NaiveDate::MAX);

    let mut expired_warranties: Vec<Item> = items
        .iter()
        .filter(|i| i.warranty_expiration.map_or(false, |d| d < today))
        .cloned()
        .collect();
    expired_warranties.sort_by_key(|i| i.warranty_expiration);

    let mut expiring_warranties: Vec<Item> = items
        .iter()
        .filter(|i| i.warranty_expiration.map_or(false, |d| d > today && d <= horizon))
        .cloned()
        .collect();
    expiring_warranties.sort_by_key(|i| i.warranty_expiration);

    InventorySummary {
        total_items: items.len(),
        total_value: total_display_value(items),
        by_category,
        by_room,
        recently_added,
        expired_warranties,
        expiring_warranties,
    }
}

#[derive(Clone)]
pub struct SummaryService<C: Connection> {
    item_repository: C::ItemRepository,
    room_repository: C::RoomRepository,
}

impl<C: Connection> SummaryService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            item_repository: connection.create_item_repository(),
            room_repository: connection.create_room_repository(),
        }
    }

    pub async fn get_summary(&self, today: NaiveDate) -> Result<InventorySummary> {
        let items = self.item_repository.list_items().await?;
        let rooms = self.room_repository.list_rooms().await?;
        let summary = summarize(&items, &rooms, today);
        info!(
            "Summary: {} items worth {:.2}, {} expired and {} expiring warranties",
            summary.total_items,
            summary.total_value,
            summary.expired_warranties.len(),
            summary.expiring_warranties.len()
        );
        Ok(summary)
    }
}
