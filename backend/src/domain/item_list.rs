//! In-memory filtering, sorting and bulk selection over the item collection.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use shared::{ItemCategory, SortOrder};
use uuid::Uuid;

use crate::domain::commands::items::ItemListQuery;
use crate::domain::models::{Item, Room};

/// Case-insensitive substring match against name, make, model, serial number and description
pub fn matches_search(item: &Item, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    [
        &item.name,
        &item.make,
        &item.model,
        &item.serial_number,
        &item.description,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Produce the ordered visible subset of `items` for `query`
pub fn visible_items(items: Vec<Item>, rooms: &[Room], query: &ItemListQuery) -> Vec<Item> {
    let mut visible: Vec<Item> = items
        .into_iter()
        .filter(|item| matches_search(item, &query.search))
        .filter(|item| query.category.map_or(true, |c| item.category_or_default() == c))
        .filter(|item| query.room_id.map_or(true, |r| item.room_id == Some(r)))
        .collect();

    sort_items(&mut visible, rooms, query.sort);
    visible
}

/// Stable sort by the given key
pub fn sort_items(items: &mut [Item], rooms: &[Room], sort: SortOrder) {
    match sort {
        SortOrder::DateAdded => {
            items.sort_by(|a, b| date_added_key(b).cmp(&date_added_key(a)));
        }
        SortOrder::Name => {
            items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        }
        SortOrder::Value => {
            let value = |item: &Item| item.display_value().unwrap_or(0.0);
            items.sort_by(|a, b| value(b).partial_cmp(&value(a)).unwrap_or(Ordering::Equal));
        }
        SortOrder::Condition => {
            // by label text, so "Fair" < "Good" < "New" < "Poor"
            let label = |item: &Item| item.condition.map_or("", |c| c.label());
            items.sort_by(|a, b| label(a).cmp(label(b)));
        }
        SortOrder::Room => {
            let names: HashMap<Uuid, String> = rooms
                .iter()
                .map(|r| (r.id, r.name.to_lowercase()))
                .collect();
            let room_name = |item: &Item| item.room_id.and_then(|id| names.get(&id));
            items.sort_by(|a, b| match (room_name(a), room_name(b)) {
                (Some(x), Some(y)) => x.cmp(y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
        }
    }
}

fn date_added_key(item: &Item) -> DateTime<Utc> {
    item.date_added.unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Filter, sort and selection state of one item list
///
/// Changing the search text or either filter leaves select mode and empties
/// the selection, as does finishing a bulk action.
#[derive(Debug, Clone, Default)]
pub struct ItemListState {
    query: ItemListQuery,
    selecting: bool,
    selection: HashSet<Uuid>,
}

impl ItemListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &ItemListQuery {
        &self.query
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if search != self.query.search {
            self.query.search = search;
            self.reset_selection();
        }
    }

    pub fn set_category(&mut self, category: Option<ItemCategory>) {
        if category != self.query.category {
            self.query.category = category;
            self.reset_selection();
        }
    }

    pub fn set_room(&mut self, room_id: Option<Uuid>) {
        if room_id != self.query.room_id {
            self.query.room_id = room_id;
            self.reset_selection();
        }
    }

    /// Sorting does not touch the selection
    pub fn set_sort(&mut self, sort: SortOrder) {
        self.query.sort = sort;
    }

    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    pub fn enter_select_mode(&mut self) {
        self.selecting = true;
    }

    pub fn exit_select_mode(&mut self) {
        self.reset_selection();
    }

    /// Toggle a row in or out of the selection. Ignored outside select mode.
    /// Returns whether the row is selected afterwards.
    pub fn toggle(&mut self, item_id: Uuid) -> bool {
        if !self.selecting {
            return false;
        }
        if !self.selection.remove(&item_id) {
            self.selection.insert(item_id);
            return true;
        }
        false
    }

    pub fn is_selected(&self, item_id: Uuid) -> bool {
        self.selection.contains(&item_id)
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// Selected ids among `visible`, in display order
    pub fn selected_visible(&self, visible: &[Item]) -> Vec<Uuid> {
        visible
            .iter()
            .filter(|item| self.selection.contains(&item.id))
            .map(|item| item.id)
            .collect()
    }

    /// Called once a bulk delete or move has been carried out
    pub fn complete_bulk_action(&mut self) {
        self.reset_selection();
    }

    fn reset_selection(&mut self) {
        self.selecting = false;
        self.selection.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared::ItemCondition;

    fn item(name: &str) -> Item {
        Item::new(name)
    }

    fn names(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_search_matches_any_text_field() {
        let mut drill = item("Drill");
        drill.make = "DeWalt".to_string();
        let mut tv = item("Television");
        tv.serial_number = "SN-WALT-1".to_string();
        let chair = item("Chair");

        let query = ItemListQuery {
            search: "walt".to_string(),
            ..Default::default()
        };
        let visible = visible_items(vec![drill, tv, chair], &[], &query);
        assert_eq!(visible.len(), 2);
    }

    #[test]
    fn test_category_and_room_filters() {
        let room = Room::new("Garage");
        let mut drill = item("Drill");
        drill.category = Some(ItemCategory::Tools);
        drill.room_id = Some(room.id);
        let mut saw = item("Saw");
        saw.category = Some(ItemCategory::Tools);
        let mut legacy = item("Lamp");
        legacy.category = None;

        let all = vec![drill, saw, legacy];

        let tools = ItemListQuery {
            category: Some(ItemCategory::Tools),
            ..Default::default()
        };
        assert_eq!(visible_items(all.clone(), &[], &tools).len(), 2);

        let other = ItemListQuery {
            category: Some(ItemCategory::Other),
            ..Default::default()
        };
        assert_eq!(names(&visible_items(all.clone(), &[], &other)), vec!["Lamp"]);

        let garage_tools = ItemListQuery {
            room_id: Some(room.id),
            ..tools
        };
        assert_eq!(names(&visible_items(all, &[room], &garage_tools)), vec!["Drill"]);
    }

    #[test]
    fn test_date_added_sort_puts_missing_last() {
        let mut old = item("Old");
        old.date_added = Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
        let mut new = item("New");
        new.date_added = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let mut unknown = item("Unknown");
        unknown.date_added = None;

        let mut items = vec![unknown, old, new];
        sort_items(&mut items, &[], SortOrder::DateAdded);
        assert_eq!(names(&items), vec!["New", "Old", "Unknown"]);
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let mut items = vec![item("banana"), item("Apple"), item("cherry")];
        sort_items(&mut items, &[], SortOrder::Name);
        assert_eq!(names(&items), vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_condition_sort_is_alphabetical_by_label() {
        let mut items: Vec<Item> = [ItemCondition::New, ItemCondition::Poor, ItemCondition::Fair, ItemCondition::Good]
            .into_iter()
            .map(|c| {
                let mut i = item(c.label());
                i.condition = Some(c);
                i
            })
            .collect();
        let mut missing = item("Missing");
        missing.condition = None;
        items.push(missing);

        sort_items(&mut items, &[], SortOrder::Condition);
        assert_eq!(names(&items), vec!["Missing", "Fair", "Good", "New", "Poor"]);
    }

    #[test]
    fn test_room_sort_puts_roomless_last() {
        let attic = Room::new("Attic");
        let basement = Room::new("basement");
        let mut a = item("A");
        a.room_id = Some(basement.id);
        let b = item("B");
        let mut c = item("C");
        c.room_id = Some(attic.id);

        let mut items = vec![b, a, c];
        sort_items(&mut items, &[attic, basement], SortOrder::Room);
        assert_eq!(names(&items), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_filter_change_clears_selection() {
        let mut state = ItemListState::new();
        let id = Uuid::new_v4();

        assert!(!state.toggle(id), "toggling outside select mode is ignored");

        state.enter_select_mode();
        assert!(state.toggle(id));
        assert_eq!(state.selected_count(), 1);

        state.set_sort(SortOrder::Name);
        assert!(state.is_selected(id), "sorting keeps the selection");

        state.set_search("drill");
        assert!(!state.is_selecting());
        assert_eq!(state.selected_count(), 0);

        state.enter_select_mode();
        state.toggle(id);
        state.set_category(Some(ItemCategory::Tools));
        assert_eq!(state.selected_count(), 0);

        state.enter_select_mode();
        state.toggle(id);
        state.set_room(Some(Uuid::new_v4()));
        assert_eq!(state.selected_count(), 0);
    }

    #[test]
    fn test_selected_visible_follows_display_order() {
        let items = vec![item("A"), item("B"), item("C")];
        let mut state = ItemListState::new();
        state.enter_select_mode();
        state.toggle(items[2].id);
        state.toggle(items[0].id);
        state.toggle(Uuid::new_v4());

        assert_eq!(state.selected_visible(&items), vec![items[0].id, items[2].id]);

        state.complete_bulk_action();
        assert!(!state.is_selecting());
        assert!(state.selected_visible(&items).is_empty());
    }
}
