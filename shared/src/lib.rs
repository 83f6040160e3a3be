use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of an owned item. Serialized with its display label ("Electronics", ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Electronics,
    Furniture,
    Appliances,
    Clothing,
    Jewelry,
    Tools,
    Sports,
    Books,
    Art,
    Kitchen,
    Outdoor,
    Other,
}

impl ItemCategory {
    /// All categories in display order
    pub const ALL: [ItemCategory; 12] = [
        ItemCategory::Electronics,
        ItemCategory::Furniture,
        ItemCategory::Appliances,
        ItemCategory::Clothing,
        ItemCategory::Jewelry,
        ItemCategory::Tools,
        ItemCategory::Sports,
        ItemCategory::Books,
        ItemCategory::Art,
        ItemCategory::Kitchen,
        ItemCategory::Outdoor,
        ItemCategory::Other,
    ];

    /// Human-readable label, also used in CSV files and reports
    pub fn label(&self) -> &'static str {
        match self {
            ItemCategory::Electronics => "Electronics",
            ItemCategory::Furniture => "Furniture",
            ItemCategory::Appliances => "Appliances",
            ItemCategory::Clothing => "Clothing",
            ItemCategory::Jewelry => "Jewelry",
            ItemCategory::Tools => "Tools",
            ItemCategory::Sports => "Sports",
            ItemCategory::Books => "Books",
            ItemCategory::Art => "Art",
            ItemCategory::Kitchen => "Kitchen",
            ItemCategory::Outdoor => "Outdoor",
            ItemCategory::Other => "Other",
        }
    }

    /// Symbol identifier shown next to the category
    pub fn icon(&self) -> &'static str {
        match self {
            ItemCategory::Electronics => "tv",
            ItemCategory::Furniture => "sofa",
            ItemCategory::Appliances => "washer",
            ItemCategory::Clothing => "tshirt",
            ItemCategory::Jewelry => "sparkles",
            ItemCategory::Tools => "wrench.and.screwdriver",
            ItemCategory::Sports => "figure.run",
            ItemCategory::Books => "books.vertical",
            ItemCategory::Art => "paintpalette",
            ItemCategory::Kitchen => "fork.knife",
            ItemCategory::Outdoor => "leaf",
            ItemCategory::Other => "archivebox",
        }
    }

    /// Exact (case-sensitive) match against the display labels
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl Default for ItemCategory {
    fn default() -> Self {
        ItemCategory::Other
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Physical condition of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCondition {
    New,
    Good,
    Fair,
    Poor,
}

impl ItemCondition {
    pub const ALL: [ItemCondition; 4] = [
        ItemCondition::New,
        ItemCondition::Good,
        ItemCondition::Fair,
        ItemCondition::Poor,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ItemCondition::New => "New",
            ItemCondition::Good => "Good",
            ItemCondition::Fair => "Fair",
            ItemCondition::Poor => "Poor",
        }
    }

    /// Severity color used by front ends when rendering the condition badge
    pub fn color_name(&self) -> &'static str {
        match self {
            ItemCondition::New => "green",
            ItemCondition::Good => "blue",
            ItemCondition::Fair => "orange",
            ItemCondition::Poor => "red",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl Default for ItemCondition {
    fn default() -> Self {
        ItemCondition::Good
    }
}

impl fmt::Display for ItemCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fixed palette of room colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomColor {
    Blue,
    Green,
    Orange,
    Red,
    Purple,
    Pink,
    Teal,
    Yellow,
}

impl RoomColor {
    /// Palette in picker order
    pub const ALL: [RoomColor; 8] = [
        RoomColor::Blue,
        RoomColor::Green,
        RoomColor::Orange,
        RoomColor::Red,
        RoomColor::Purple,
        RoomColor::Pink,
        RoomColor::Teal,
        RoomColor::Yellow,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RoomColor::Blue => "blue",
            RoomColor::Green => "green",
            RoomColor::Orange => "orange",
            RoomColor::Red => "red",
            RoomColor::Purple => "purple",
            RoomColor::Pink => "pink",
            RoomColor::Teal => "teal",
            RoomColor::Yellow => "yellow",
        }
    }

    /// Unknown names fall back to blue
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == name)
            .unwrap_or_default()
    }
}

impl Default for RoomColor {
    fn default() -> Self {
        RoomColor::Blue
    }
}

/// Symbol identifiers a room may use as its icon
pub const ROOM_ICONS: [&str; 12] = [
    "house", "bed.double", "sofa", "fork.knife", "washer", "shower",
    "car.fill", "shippingbox", "tent", "building.2", "trash", "garage",
];

pub const DEFAULT_ROOM_ICON: &str = "house";

/// Sort key for the item list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    DateAdded,
    Name,
    Value,
    Condition,
    Room,
}

impl SortOrder {
    pub const ALL: [SortOrder; 5] = [
        SortOrder::DateAdded,
        SortOrder::Name,
        SortOrder::Value,
        SortOrder::Condition,
        SortOrder::Room,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::DateAdded => "Date Added",
            SortOrder::Name => "Name",
            SortOrder::Value => "Value",
            SortOrder::Condition => "Condition",
            SortOrder::Room => "Room",
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::DateAdded
    }
}

/// Item as exposed to front ends. Dates are ISO 8601 (YYYY-MM-DD), timestamps RFC 3339.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: ItemCategory,
    pub category_icon: String,
    pub condition: ItemCondition,
    pub condition_color: String,
    pub room_id: Option<String>,
    pub room_name: Option<String>,
    pub make: String,
    pub model: String,
    pub serial_number: String,
    pub purchase_price: Option<f64>,
    pub purchase_date: Option<String>,
    pub purchase_store: String,
    pub current_value: Option<f64>,
    pub warranty_expiration: Option<String>,
    pub warranty_provider: String,
    pub notes: String,
    pub date_added: Option<String>,
    /// current_value if set, otherwise purchase_price
    pub display_value: Option<f64>,
}

/// Receipt metadata; file bytes are only sent on request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptInfo {
    pub id: String,
    pub filename: String,
    pub is_pdf: bool,
    pub size_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDetailResponse {
    pub item: Item,
    /// Base64 encoded JPEG images in display order
    pub photos: Vec<String>,
    pub receipts: Vec<ReceiptInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptUpload {
    pub filename: String,
    /// Base64 encoded file contents (image or PDF)
    pub data: String,
}

/// Fields of the add/edit form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ItemFields {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: ItemCategory,
    #[serde(default)]
    pub condition: ItemCondition,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub purchase_price: Option<f64>,
    #[serde(default)]
    pub purchase_date: Option<String>,
    #[serde(default)]
    pub purchase_store: String,
    #[serde(default)]
    pub current_value: Option<f64>,
    #[serde(default)]
    pub warranty_expiration: Option<String>,
    #[serde(default)]
    pub warranty_provider: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateItemRequest {
    #[serde(flatten)]
    pub fields: ItemFields,
    /// Base64 encoded images
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub receipts: Vec<ReceiptUpload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateItemRequest {
    #[serde(flatten)]
    pub fields: ItemFields,
    /// When present, replaces the whole photo set
    #[serde(default)]
    pub photos: Option<Vec<String>>,
    /// Receipts appended to the existing ones
    #[serde(default)]
    pub receipts: Vec<ReceiptUpload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResponse {
    pub item: Item,
    pub success_message: String,
}

/// Query string of the item list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ItemListRequest {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<ItemCategory>,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub sort: Option<SortOrder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemListResponse {
    pub items: Vec<Item>,
    /// Number of items in the catalog before filtering
    pub total_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteItemsRequest {
    pub item_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteItemsResponse {
    pub deleted_count: usize,
    pub not_found_ids: Vec<String>,
    /// Toast text, e.g. `Deleted "Drill"` or `Deleted 3 items`
    pub undo_message: Option<String>,
    pub undo_window_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoDeleteResponse {
    pub restored: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveItemsRequest {
    pub item_ids: Vec<String>,
    /// None moves the items out of any room
    pub room_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveItemsResponse {
    pub moved_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: RoomColor,
    pub date_created: Option<String>,
    pub item_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<RoomColor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRoomRequest {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<RoomColor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomListResponse {
    pub rooms: Vec<Room>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDetailResponse {
    pub room: Room,
    /// Newest first
    pub items: Vec<Item>,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRoomResponse {
    pub unassigned_item_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSuggestion {
    pub name: String,
    pub icon: String,
    pub color: RoomColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSuggestionsResponse {
    pub suggestions: Vec<RoomSuggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: ItemCategory,
    pub icon: String,
    pub count: usize,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomBreakdown {
    pub room_id: String,
    pub room_name: String,
    pub icon: String,
    pub count: usize,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub total_items: usize,
    pub total_value: f64,
    /// Localized total, e.g. "$1,234.50"; None when the total is zero
    pub total_value_formatted: Option<String>,
    pub by_category: Vec<CategoryBreakdown>,
    pub by_room: Vec<RoomBreakdown>,
    pub recently_added: Vec<Item>,
    pub expired_warranties: Vec<Item>,
    pub expiring_warranties: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportCsvResponse {
    pub imported: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Pdf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportToPathRequest {
    pub format: ExportFormat,
    /// Directory to write into; Documents when absent
    pub custom_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportToPathResponse {
    pub success: bool,
    pub message: String,
    pub file_path: String,
    pub item_count: usize,
}

/// Barcode lookup against the product database, filling only empty fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarcodeLookupRequest {
    pub barcode: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarcodeLookupResponse {
    pub name: String,
    pub make: String,
    pub model: String,
    pub serial_number: String,
    /// Dismissible message when the lookup failed; fields are left as typed
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels_round_trip() {
        for category in ItemCategory::ALL {
            assert_eq!(ItemCategory::from_label(category.label()), Some(category));
        }
        assert_eq!(ItemCategory::from_label("tools"), None);
        assert_eq!(ItemCategory::default(), ItemCategory::Other);
    }

    #[test]
    fn test_condition_serializes_as_label() {
        let json = serde_json::to_string(&ItemCondition::Fair).unwrap();
        assert_eq!(json, "\"Fair\"");
        assert_eq!(ItemCondition::default(), ItemCondition::Good);
    }

    #[test]
    fn test_room_color_falls_back_to_blue() {
        assert_eq!(RoomColor::from_name("teal"), RoomColor::Teal);
        assert_eq!(RoomColor::from_name("magenta"), RoomColor::Blue);
    }

    #[test]
    fn test_item_fields_defaults_from_json() {
        let fields: ItemFields = serde_json::from_str(r#"{"name":"Lamp"}"#).unwrap();
        assert_eq!(fields.category, ItemCategory::Other);
        assert_eq!(fields.condition, ItemCondition::Good);
        assert!(fields.purchase_price.is_none());
    }
}
