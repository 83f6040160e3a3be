//! # PDF Reports
//!
//! Reports are laid out onto a [`layout::PageLayout`], which records the draw
//! operations of every page, and serialized by [`writer`] into a letter-size
//! PDF document.

pub mod inventory_report;
pub mod item_report;
pub mod layout;
pub mod writer;

pub use inventory_report::inventory_report;
pub use item_report::item_report;
pub use layout::PageLayout;

/// Presentation settings shared by the reports
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    pub app_name: String,
    pub currency_symbol: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            app_name: "OwnedIt".to_string(),
            currency_symbol: "$".to_string(),
        }
    }
}
