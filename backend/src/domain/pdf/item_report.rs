//! Single-item report: title block, item name, first photo and detail sections.

use chrono::NaiveDate;
use log::warn;

use super::inventory_report::draw_header;
use super::layout::{wrap_text, PageLayout, BLACK, CONTENT_WIDTH, MARGIN, SECONDARY};
use super::writer::{Font, PdfImage};
use super::ReportSettings;
use crate::domain::formatting::{format_currency, long_date};
use crate::domain::models::{Item, Room};
use crate::domain::photo_processing::{encode_jpeg, JPEG_QUALITY};

pub const PHOTO_MAX_HEIGHT: f64 = 240.0;
pub const LINE_HEIGHT: f64 = 16.0;
const LABEL_WIDTH: f64 = 110.0;

/// A titled group of label/value lines
#[derive(Debug, Clone, PartialEq)]
pub struct DetailSection {
    pub title: &'static str,
    pub rows: Vec<(&'static str, String)>,
}

/// Sections with at least one non-empty field, in report order.
/// Notes is a single row with an empty label.
pub fn detail_sections(item: &Item, room: Option<&Room>, settings: &ReportSettings) -> Vec<DetailSection> {
    let money = |v: f64| format_currency(v, &settings.currency_symbol);
    let text = |label: &'static str, value: &str| (!value.is_empty()).then(|| (label, value.to_string()));

    let candidates = [
        (
            "Overview",
            vec![
                Some(("Category", item.category_or_default().label().to_string())),
                Some(("Condition", item.condition_or_default().label().to_string())),
                room.map(|r| ("Room", r.name.clone())),
                text("Description", &item.description),
            ],
        ),
        (
            "Identification",
            vec![
                text("Make", &item.make),
                text("Model", &item.model),
                text("Serial #", &item.serial_number),
            ],
        ),
        (
            "Purchase",
            vec![
                item.purchase_price.map(|p| ("Price", money(p))),
                item.purchase_date.map(|d| ("Date", long_date(d))),
                text("Store", &item.purchase_store),
            ],
        ),
        (
            "Current Value",
            vec![item.current_value.map(|v| ("Value", money(v)))],
        ),
        (
            "Warranty",
            vec![
                item.warranty_expiration.map(|d| ("Expires", long_date(d))),
                text("Provider", &item.warranty_provider),
            ],
        ),
        ("Notes", vec![text("", &item.notes)]),
    ];

    candidates
        .into_iter()
        .map(|(title, rows)| DetailSection {
            title,
            rows: rows.into_iter().flatten().collect(),
        })
        .filter(|section| !section.rows.is_empty())
        .collect()
}

/// Decode a stored photo and size it to the content width and the max height
fn prepare_photo(data: &[u8]) -> Option<(PdfImage, f64, f64)> {
    let decoded = match image::load_from_memory(data) {
        Ok(image) => image,
        Err(e) => {
            warn!("Leaving photo out of item report: {}", e);
            return None;
        }
    };
    if decoded.width() == 0 || decoded.height() == 0 {
        return None;
    }
    let jpeg = encode_jpeg(&decoded, JPEG_QUALITY).ok()?;

    let (w, h) = (decoded.width() as f64, decoded.height() as f64);
    let scale = (CONTENT_WIDTH / w).min(PHOTO_MAX_HEIGHT / h);
    let image = PdfImage {
        width: decoded.width(),
        height: decoded.height(),
        jpeg,
    };
    Some((image, w * scale, h * scale))
}

fn draw_section(layout: &mut PageLayout, section: &DetailSection) {
    layout.advance(12.0);
    layout.ensure_space(20.0 + LINE_HEIGHT);
    let y = layout.y();
    layout.text(MARGIN, y, 13.0, Font::Bold, BLACK, section.title);
    layout.advance(20.0);

    for (label, value) in &section.rows {
        let (value_x, value_width) = if label.is_empty() {
            (MARGIN, CONTENT_WIDTH)
        } else {
            (MARGIN + LABEL_WIDTH, CONTENT_WIDTH - LABEL_WIDTH)
        };
        for (index, line) in wrap_text(value, value_width, 10.0, Font::Regular).into_iter().enumerate() {
            layout.ensure_space(LINE_HEIGHT);
            let y = layout.y();
            if index == 0 && !label.is_empty() {
                layout.text(MARGIN, y, 10.0, Font::Bold, SECONDARY, *label);
            }
            layout.text(value_x, y, 10.0, Font::Regular, BLACK, line);
            layout.advance(LINE_HEIGHT);
        }
    }
}

/// Lay out the report for one item. `photo` is the item's first photo, if any.
pub fn item_report(
    item: &Item,
    room: Option<&Room>,
    photo: Option<&[u8]>,
    settings: &ReportSettings,
    generated_on: NaiveDate,
) -> PageLayout {
    let mut layout = PageLayout::new();

    let title = format!("{} – Item Report", settings.app_name);
    let subtitle = format!("Generated {}", long_date(generated_on));
    let y = draw_header(&mut layout, &title, &subtitle);
    layout.set_y(y);

    let name = if item.name.is_empty() { "Item" } else { item.name.as_str() };
    for line in wrap_text(name, CONTENT_WIDTH, 18.0, Font::Bold) {
        layout.ensure_space(24.0);
        let y = layout.y();
        layout.text(MARGIN, y, 18.0, Font::Bold, BLACK, line);
        layout.advance(24.0);
    }

    if let Some((image, width, height)) = photo.and_then(prepare_photo) {
        layout.advance(8.0);
        layout.ensure_space(height);
        layout.image(image, MARGIN, width, height);
        layout.advance(height + 8.0);
    }

    for section in detail_sections(item, room, settings) {
        draw_section(&mut layout, &section);
    }

    if let Some(added) = item.date_added {
        layout.advance(16.0);
        layout.ensure_space(LINE_HEIGHT);
        let y = layout.y();
        layout.text(
            MARGIN,
            y,
            9.0,
            Font::Regular,
            SECONDARY,
            format!("Added {}", long_date(added.date_naive())),
        );
    }

    layout
}
