use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::{ItemCategory, ItemCondition};
use uuid::Uuid;

/// A single owned possession.
///
/// `category` and `condition` are optional at rest so rows written before a
/// field existed still load; read them through [`Item::category_or_default`]
/// and [`Item::condition_or_default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: Option<ItemCategory>,
    pub condition: Option<ItemCondition>,
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
    pub date_added: Option<DateTime<Utc>>,
}

impl Item {
    /// New item with a fresh id, default enums and `date_added` set to now
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            category: Some(ItemCategory::Other),
            condition: Some(ItemCondition::Good),
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
            date_added: Some(Utc::now()),
        }
    }

    /// Current value if tracked, else purchase price
    pub fn display_value(&self) -> Option<f64> {
        self.current_value.or(self.purchase_price)
    }

    pub fn category_or_default(&self) -> ItemCategory {
        self.category.unwrap_or_default()
    }

    pub fn condition_or_default(&self) -> ItemCondition {
        self.condition.unwrap_or_default()
    }

    /// Copy of every field under a new identity
    pub fn with_new_identity(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }
}

/// Sum of display values, ignoring items without one
pub fn total_display_value<'a>(items: impl IntoIterator<Item = &'a Item>) -> f64 {
    items.into_iter().filter_map(Item::display_value).sum()
}
