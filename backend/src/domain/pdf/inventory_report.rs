//! Whole-inventory report: items grouped by room in column-aligned tables.

use chrono::NaiveDate;
use std::collections::HashSet;
use uuid::Uuid;

use super::layout::{PageLayout, BLACK, CONTENT_WIDTH, MARGIN, SECONDARY};
use super::writer::Font;
use super::ReportSettings;
use crate::domain::formatting::{format_currency, long_date, month_year, truncate, EM_DASH};
use crate::domain::models::{total_display_value, Item, Room};

pub const ROW_HEIGHT: f64 = 22.0;
pub const NAME_MAX_CHARS: usize = 28;
pub const UNASSIGNED_TITLE: &str = "Unassigned";
pub const TABLE_HEADERS: [&str; 5] = ["ITEM", "CATEGORY", "CONDITION", "VALUE", "WARRANTY"];

/// Column offsets as fractions of the content width
const COLUMNS: [f64; 5] = [0.0, 0.32, 0.55, 0.70, 0.84];

fn column_x(index: usize) -> f64 {
    MARGIN + CONTENT_WIDTH * COLUMNS[index]
}

/// Title block shared by both reports; returns the y below it
pub(super) fn draw_header(layout: &mut PageLayout, title: &str, subtitle: &str) -> f64 {
    let y = layout.y();
    layout.text(MARGIN, y, 22.0, Font::Bold, BLACK, title);
    layout.text(MARGIN, y + 28.0, 11.0, Font::Regular, SECONDARY, subtitle);
    layout.rule(y + 48.0);
    y + 60.0
}

fn draw_table_header(layout: &mut PageLayout) {
    let y = layout.y();
    for (index, label) in TABLE_HEADERS.iter().enumerate() {
        layout.text(column_x(index), y + 3.0, 9.0, Font::Bold, SECONDARY, *label);
    }
    layout.rule(y + 18.0);
    layout.advance(ROW_HEIGHT);
}

fn draw_row(layout: &mut PageLayout, item: &Item, settings: &ReportSettings) {
    let y = layout.y() + 4.0;
    let value = item
        .display_value()
        .map(|v| format_currency(v, &settings.currency_symbol))
        .unwrap_or_else(|| EM_DASH.to_string());
    let warranty = item
        .warranty_expiration
        .map(month_year)
        .unwrap_or_else(|| EM_DASH.to_string());

    layout.text(column_x(0), y, 10.0, Font::Regular, BLACK, truncate(&item.name, NAME_MAX_CHARS));
    layout.text(column_x(1), y, 10.0, Font::Regular, SECONDARY, item.category_or_default().label());
    layout.text(column_x(2), y, 10.0, Font::Regular, SECONDARY, item.condition_or_default().label());
    layout.text(column_x(3), y, 10.0, Font::Regular, SECONDARY, value);
    layout.text(column_x(4), y, 10.0, Font::Regular, SECONDARY, warranty);
    layout.advance(ROW_HEIGHT);
}

/// Sections of the report: roomless items first, then rooms by name, empty sections dropped
pub fn group_by_room<'a>(items: &'a [Item], rooms: &'a [Room]) -> Vec<(&'a str, Vec<&'a Item>)> {
    let known: HashSet<Uuid> = rooms.iter().map(|r| r.id).collect();
    let by_name = |group: &mut Vec<&Item>| group.sort_by(|a, b| a.name.cmp(&b.name));

    let mut groups = Vec::new();

    let mut unassigned: Vec<&Item> = items
        .iter()
        .filter(|i| i.room_id.map_or(true, |r| !known.contains(&r)))
        .collect();
    if !unassigned.is_empty() {
        by_name(&mut unassigned);
        groups.push((UNASSIGNED_TITLE, unassigned));
    }

    let mut sorted_rooms: Vec<&Room> = rooms.iter().collect();
    sorted_rooms.sort_by(|a, b| a.name.cmp(&b.name));
    for room in sorted_rooms {
        let mut room_items: Vec<&Item> = items.iter().filter(|i| i.room_id == Some(room.id)).collect();
        if !room_items.is_empty() {
            by_name(&mut room_items);
            groups.push((room.name.as_str(), room_items));
        }
    }

    groups
}

/// Lay out the inventory report
pub fn inventory_report(
    items: &[Item],
    rooms: &[Room],
    settings: &ReportSettings,
    generated_on: NaiveDate,
) -> PageLayout {
    let mut layout = PageLayout::new();

    let subtitle = format!("Generated {}  ·  {} items", long_date(generated_on), items.len());
    let title = format!("{} – Inventory Report", settings.app_name);
    let y = draw_header(&mut layout, &title, &subtitle);
    layout.set_y(y);

    for (title, group) in group_by_room(items, rooms) {
        layout.advance(16.0);
        layout.ensure_space(30.0);
        let y = layout.y();
        layout.text(MARGIN, y, 13.0, Font::Bold, BLACK, title);
        layout.advance(24.0);

        layout.ensure_space(ROW_HEIGHT);
        draw_table_header(&mut layout);

        for item in group {
            if layout.ensure_space(ROW_HEIGHT) {
                draw_table_header(&mut layout);
            }
            draw_row(&mut layout, item, settings);
        }
    }

    let total = total_display_value(items);
    if total > 0.0 {
        layout.advance(20.0);
        layout.ensure_space(24.0);
        let y = layout.y();
        layout.text(
            MARGIN,
            y,
            12.0,
            Font::Bold,
            BLACK,
            format!(
                "Total Inventory Value: {}",
                format_currency(total, &settings.currency_symbol)
            ),
        );
    }

    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pdf::layout::BOTTOM;

    fn settings() -> ReportSettings {
        ReportSettings::default()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
    }

    #[test]
    fn test_groups_unassigned_first_then_rooms_by_name() {
        let garage = Room::new("Garage");
        let attic = Room::new("Attic");
        let empty = Room::new("Basement");

        let mut saw = Item::new("Saw");
        saw.room_id = Some(garage.id);
        let mut box_ = Item::new("Box");
        box_.room_id = Some(attic.id);
        let lamp = Item::new("Lamp");
        let items = vec![saw, box_, lamp];
        let rooms = vec![garage, attic, empty];

        let titles: Vec<&str> = group_by_room(&items, &rooms).into_iter().map(|(t, _)| t).collect();
        assert_eq!(titles, vec!["Unassigned", "Attic", "Garage"]);
    }

    #[test]
    fn test_single_page_report_content() {
        let mut tv = Item::new("Television with an extraordinarily long name");
        tv.current_value = Some(1234.5);
        tv.warranty_expiration = NaiveDate::from_ymd_opt(2026, 7, 1);
        let chair = Item::new("Chair");

        let layout = inventory_report(&[tv, chair], &[], &settings(), today());
        assert_eq!(layout.pages().len(), 1);

        let texts: Vec<&str> = layout.pages()[0].texts().map(|(t, _)| t).collect();
        assert!(texts.contains(&"OwnedIt – Inventory Report"));
        assert!(texts.contains(&"Generated March 9, 2025  ·  2 items"));
        assert!(texts.contains(&"Unassigned"));
        assert!(texts.contains(&"Television with an extraord…"));
        assert!(texts.contains(&"$1,234.50"));
        assert!(texts.contains(&"Jul 2026"));
        assert!(texts.contains(&"—"));
        assert!(texts.contains(&"Total Inventory Value: $1,234.50"));
    }

    #[test]
    fn test_total_hidden_when_zero() {
        let layout = inventory_report(&[Item::new("Rock")], &[], &settings(), today());
        assert!(!layout.pages()[0]
            .texts()
            .any(|(t, _)| t.starts_with("Total Inventory Value")));
    }

    #[test]
    fn test_long_table_continues_with_header() {
        let items: Vec<Item> = (0..60).map(|i| Item::new(format!("Item {:02}", i))).collect();
        let layout = inventory_report(&items, &[], &settings(), today());

        assert!(layout.pages().len() > 1);
        for page in layout.pages() {
            for (_, y) in page.texts() {
                assert!(y <= BOTTOM);
            }
        }
        let second = &layout.pages()[1];
        let first_text = second.texts().next().map(|(t, _)| t);
        assert_eq!(first_text, Some("ITEM"));
    }
}
