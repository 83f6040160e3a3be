//! # Domain Module
//!
//! Business logic of the home inventory.
//!
//! Services are generic over a storage [`Connection`](crate::storage::Connection)
//! and hold the repositories it creates. The list engine, CSV format, summary
//! and report layout are pure functions over loaded items and rooms, so they
//! can be tested without a store.
//!
//! ## Services
//!
//! - **ItemService**: create, edit, duplicate, bulk delete with undo, bulk move
//! - **RoomService**: rooms, suggestions and per-room detail
//! - **SummaryService**: totals, breakdowns and warranty alerts
//! - **ExportService**: CSV export/import and PDF reports
//! - **BarcodeClient**: product lookup by barcode

pub mod barcode_service;
pub mod commands;
pub mod csv_format;
pub mod export_service;
pub mod formatting;
pub mod item_list;
pub mod item_service;
pub mod models;
pub mod pdf;
pub mod photo_processing;
pub mod room_service;
pub mod summary_service;
pub mod undo;

pub use barcode_service::{BarcodeClient, LookupError, LookupSession};
pub use export_service::ExportService;
pub use item_list::ItemListState;
pub use item_service::ItemService;
pub use room_service::RoomService;
pub use summary_service::SummaryService;
