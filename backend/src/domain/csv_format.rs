//! CSV interchange format for the inventory.
//!
//! Export writes one header row plus one row per item, sorted by name. Import
//! accepts any RFC 4180 style CSV, discards the first row, and degrades bad
//! cells to "unset" instead of failing.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use log::{debug, warn};
use shared::{ItemCategory, ItemCondition};
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::formatting::{format_amount, short_date};
use crate::domain::models::{Item, Room};

pub const CSV_HEADER: [&str; 14] = [
    "Name",
    "Category",
    "Room",
    "Make",
    "Model",
    "Serial Number",
    "Condition",
    "Purchase Price",
    "Purchase Date",
    "Current Value",
    "Warranty Expires",
    "Store",
    "Notes",
    "Date Added",
];

/// Rows shorter than this are skipped on import; Date Added is optional
pub const MIN_IMPORT_FIELDS: usize = 13;

/// Quote a field if and only if it contains a comma, a double quote or a newline
pub fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Serialize items as CSV text; rows are joined with `\n` and there is no trailing newline
pub fn export_csv(items: &[Item], rooms: &[Room]) -> String {
    let room_names: HashMap<Uuid, &str> = rooms.iter().map(|r| (r.id, r.name.as_str())).collect();

    let mut sorted: Vec<&Item> = items.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let amount = |v: Option<f64>| v.map(format_amount).unwrap_or_default();
    let date = |d: Option<NaiveDate>| d.map(short_date).unwrap_or_default();

    let mut lines = Vec::with_capacity(sorted.len() + 1);
    lines.push(CSV_HEADER.join(","));

    for item in sorted {
        let room = item
            .room_id
            .and_then(|id| room_names.get(&id).copied())
            .unwrap_or("");
        let fields = [
            escape_field(&item.name),
            escape_field(item.category_or_default().label()),
            escape_field(room),
            escape_field(&item.make),
            escape_field(&item.model),
            escape_field(&item.serial_number),
            escape_field(item.condition_or_default().label()),
            amount(item.purchase_price),
            date(item.purchase_date),
            amount(item.current_value),
            date(item.warranty_expiration),
            escape_field(&item.purchase_store),
            escape_field(&item.notes),
            date(item.date_added.map(|d| d.date_naive())),
        ];
        lines.push(fields.join(","));
    }

    lines.join("\n")
}

/// One importable row: the item to create and the room name it asked for
#[derive(Debug, Clone)]
pub struct ImportedRow {
    pub item: Item,
    pub room_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedImport {
    pub rows: Vec<ImportedRow>,
    pub skipped: usize,
}

/// Parse CSV bytes into items. `now` is the date added for rows without one.
///
/// Bytes that are not valid UTF-8 yield an empty result with nothing skipped.
pub fn parse_import(data: &[u8], now: DateTime<Utc>) -> ParsedImport {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    if std::str::from_utf8(data).is_err() {
        warn!("CSV import input is not valid UTF-8, nothing imported");
        return ParsedImport::default();
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut parsed = ParsedImport::default();
    for (index, record) in reader.records().enumerate() {
        if index == 0 {
            continue;
        }
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                debug!("Skipping unreadable CSV row {}: {}", index + 1, e);
                parsed.skipped += 1;
                continue;
            }
        };
        match row_to_item(&record, now) {
            Some(row) => parsed.rows.push(row),
            None => parsed.skipped += 1,
        }
    }

    parsed
}

fn row_to_item(record: &csv::StringRecord, now: DateTime<Utc>) -> Option<ImportedRow> {
    if record.len() < MIN_IMPORT_FIELDS {
        return None;
    }
    let field = |i: usize| record.get(i).unwrap_or("");

    let name = field(0);
    if name.trim().is_empty() {
        return None;
    }

    let mut item = Item::new(name);
    item.category = Some(ItemCategory::from_label(field(1)).unwrap_or_default());
    item.make = field(3).to_string();
    item.model = field(4).to_string();
    item.serial_number = field(5).to_string();
    item.condition = Some(ItemCondition::from_label(field(6)).unwrap_or_default());
    item.purchase_price = parse_amount(field(7));
    item.purchase_date = parse_date(field(8));
    item.current_value = parse_amount(field(9));
    item.warranty_expiration = parse_date(field(10));
    item.purchase_store = field(11).to_string();
    item.notes = field(12).to_string();
    item.date_added = Some(
        parse_date(field(13))
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
            .unwrap_or(now),
    );

    let room = field(2).trim();
    let room_name = (!room.is_empty()).then(|| room.to_string());

    Some(ImportedRow { item, room_name })
}

/// Permissive amount parsing: surrounding whitespace, a currency symbol and
/// thousands separators are ignored. Anything else unparsable is unset.
pub fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .trim_start_matches(|c: char| !(c.is_ascii_digit() || c == '-' || c == '.'))
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Accepts `M/D/YY`, `M/D/YYYY` and ISO `YYYY-MM-DD`
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    // %y must not swallow a four-digit year
    let short_year = text.rsplit('/').next().map_or(false, |y| y.len() <= 2);
    if short_year {
        if let Ok(date) = NaiveDate::parse_from_str(text, "%m/%d/%y") {
            return Some(date);
        }
    }
    NaiveDate::parse_from_str(text, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_escape_field_only_when_needed() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
        assert_eq!(escape_field("semi;colon"), "semi;colon");
    }

    #[test]
    fn test_export_header_and_order() {
        let room = Room::new("Garage");
        let mut saw = Item::new("Saw");
        saw.room_id = Some(room.id);
        saw.purchase_price = Some(20.0);
        saw.date_added = Some(Utc.with_ymd_and_hms(2024, 1, 6, 9, 30, 0).unwrap());
        let mut anvil = Item::new("Anvil");
        anvil.category = None;
        anvil.condition = None;
        anvil.date_added = None;

        let text = export_csv(&[saw, anvil], &[room]);
        let lines: Vec<&str> = text.split('\n').collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER.join(","));
        assert_eq!(lines[1], "Anvil,Other,,,,,Good,,,,,,,");
        assert_eq!(lines[2], "Saw,Other,Garage,,,,Good,20.00,,,,,,1/6/24");
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_export_sorts_by_byte_order() {
        let text = export_csv(&[Item::new("apple"), Item::new("Zebra")], &[]);
        let first_column: Vec<&str> = text
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap())
            .collect();
        assert_eq!(first_column, vec!["Zebra", "apple"]);
    }

    #[test]
    fn test_import_scenario_row() {
        let csv = format!(
            "{}\n\"Drill\",\"Tools\",\"Garage\",\"DeWalt\",\"DCD771\",\"SN123\",\"Good\",\"89.99\",\"1/5/24\",\"\",\"\",\"\",\" \",\"1/6/24\"",
            CSV_HEADER.join(",")
        );
        let parsed = parse_import(csv.as_bytes(), now());

        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.rows.len(), 1);
        let row = &parsed.rows[0];
        assert_eq!(row.item.name, "Drill");
        assert_eq!(row.item.category, Some(ItemCategory::Tools));
        assert_eq!(row.room_name.as_deref(), Some("Garage"));
        assert_eq!(row.item.purchase_price, Some(89.99));
        assert_eq!(row.item.current_value, None);
        assert_eq!(row.item.display_value(), Some(89.99));
        assert_eq!(row.item.purchase_date, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(
            row.item.date_added,
            Some(Utc.with_ymd_and_hms(2024, 1, 6, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_import_skips_short_and_nameless_rows() {
        let csv = "header\n\
                   ,Tools,,,,,Good,,,,,,\n\
                   Hammer,Tools,,,,\n\
                   Level,Tools,,,,,Good,,,,,,\n";
        let parsed = parse_import(csv.as_bytes(), now());
        assert_eq!(parsed.skipped, 2);
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].item.name, "Level");
        assert_eq!(parsed.rows[0].item.date_added, Some(now()));
    }

    #[test]
    fn test_import_handles_quotes_crlf_and_fallbacks() {
        let csv = "Name,Category\r\n\
                   \"Lamp, brass\",tools,,,,,Mint,\"$1,200.50\",bad,,,,\"line one\nline \"\"two\"\"\"\r\n";
        let parsed = parse_import(csv.as_bytes(), now());
        assert_eq!(parsed.rows.len(), 1);
        let item = &parsed.rows[0].item;
        assert_eq!(item.name, "Lamp, brass");
        assert_eq!(item.category, Some(ItemCategory::Other));
        assert_eq!(item.condition, Some(ItemCondition::Good));
        assert_eq!(item.purchase_price, Some(1200.5));
        assert_eq!(item.purchase_date, None);
        assert_eq!(item.notes, "line one\nline \"two\"");
    }

    #[test]
    fn test_import_keeps_name_padding_from_export() {
        let mut item = Item::new("  Vase ");
        item.category = Some(ItemCategory::Art);
        let csv = export_csv(&[item], &[]);

        let parsed = parse_import(csv.as_bytes(), now());
        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.rows[0].item.name, "  Vase ");
        assert_eq!(parsed.rows[0].item.category, Some(ItemCategory::Art));
    }

    #[test]
    fn test_import_rejects_invalid_utf8() {
        let parsed = parse_import(&[0xff, 0xfe, 0x00, 0x41], now());
        assert!(parsed.rows.is_empty());
        assert_eq!(parsed.skipped, 0);
    }

    #[test]
    fn test_import_ignores_bom() {
        let csv = "\u{feff}Name\nDesk,Furniture,,,,,New,,,,,,";
        let parsed = parse_import(csv.as_bytes(), now());
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].item.category, Some(ItemCategory::Furniture));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 5);
        assert_eq!(parse_date("1/5/24"), expected);
        assert_eq!(parse_date("01/05/2024"), expected);
        assert_eq!(parse_date("2024-01-05"), expected);
        assert_eq!(parse_date("13/45/24"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 89.99 "), Some(89.99));
        assert_eq!(parse_amount("$1,234.00"), Some(1234.0));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
    }
}
