//! Export service domain logic for the inventory.
//!
//! CSV export and import, PDF reports, and writing exports straight to a
//! directory on disk.

use anyhow::Result;
use chrono::{Local, NaiveDate, Utc};
use log::{error, info};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use shared::{ExportFormat, ExportToPathRequest, ExportToPathResponse};

use crate::domain::csv_format::{export_csv, parse_import};
use crate::domain::models::Room;
use crate::domain::pdf::{inventory_report, item_report, ReportSettings};
use crate::storage::{Connection, ItemStorage, RoomStorage};

/// Outcome of a CSV import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Export service that handles all export-related business logic
#[derive(Clone)]
pub struct ExportService<C: Connection> {
    item_repository: C::ItemRepository,
    room_repository: C::RoomRepository,
    settings: ReportSettings,
}

impl<C: Connection> ExportService<C> {
    pub fn new(connection: Arc<C>, settings: ReportSettings) -> Self {
        Self {
            item_repository: connection.create_item_repository(),
            room_repository: connection.create_room_repository(),
            settings,
        }
    }

    /// File name used when exporting in `format`
    pub fn file_name(&self, format: ExportFormat) -> String {
        match format {
            ExportFormat::Csv => format!("{}-Inventory.csv", self.settings.app_name),
            ExportFormat::Pdf => format!("{}-Inventory.pdf", self.settings.app_name),
        }
    }

    /// The whole inventory as CSV text
    pub async fn export_csv(&self) -> Result<(String, usize)> {
        let items = self.item_repository.list_items().await?;
        let rooms = self.room_repository.list_rooms().await?;
        info!("📄 EXPORT: Exporting {} items as CSV", items.len());
        Ok((export_csv(&items, &rooms), items.len()))
    }

    /// Import CSV bytes, creating rooms that do not exist yet
    pub async fn import_csv(&self, data: &[u8]) -> Result<ImportSummary> {
        let parsed = parse_import(data, Utc::now());
        info!(
            "📥 IMPORT: {} importable rows, {} skipped",
            parsed.rows.len(),
            parsed.skipped
        );

        let mut rooms = self.room_repository.list_rooms().await?;
        // lower-cased trimmed name -> room id, covering rooms created during this import
        let mut resolved: HashMap<String, Uuid> = HashMap::new();

        let mut imported = 0;
        for row in parsed.rows {
            let mut item = row.item;
            if let Some(name) = row.room_name {
                let key = name.trim().to_lowercase();
                let room_id = match resolved.get(&key) {
                    Some(id) => *id,
                    None => {
                        let id = match rooms.iter().find(|r| r.name_matches(&name)) {
                            Some(room) => room.id,
                            None => {
                                let room = Room::new(name.trim());
                                self.room_repository.store_room(&room).await?;
                                info!("📥 IMPORT: Created room {}", room.name);
                                let id = room.id;
                                rooms.push(room);
                                id
                            }
                        };
                        resolved.insert(key, id);
                        id
                    }
                };
                item.room_id = Some(room_id);
            }

            self.item_repository.store_item(&item, &[], &[]).await?;
            imported += 1;
        }

        info!("✅ IMPORT: Imported {} items, skipped {}", imported, parsed.skipped);
        Ok(ImportSummary {
            imported,
            skipped: parsed.skipped,
        })
    }

    /// PDF report of the whole inventory
    pub async fn inventory_pdf(&self, today: NaiveDate) -> Result<(Vec<u8>, usize)> {
        let items = self.item_repository.list_items().await?;
        let rooms = self.room_repository.list_rooms().await?;
        let layout = inventory_report(&items, &rooms, &self.settings, today);
        info!(
            "📄 EXPORT: Inventory report with {} items on {} pages",
            items.len(),
            layout.pages().len()
        );
        Ok((layout.to_pdf(&self.settings.app_name), items.len()))
    }

    /// PDF report of one item, None if the item does not exist
    pub async fn item_pdf(&self, item_id: Uuid, today: NaiveDate) -> Result<Option<Vec<u8>>> {
        let Some(item) = self.item_repository.get_item(item_id).await? else {
            return Ok(None);
        };
        let room = match item.room_id {
            Some(room_id) => self.room_repository.get_room(room_id).await?,
            None => None,
        };
        let photos = self.item_repository.list_photos(item_id).await?;
        let first_photo = photos.first().map(|p| p.image_data.as_slice());

        let layout = item_report(&item, room.as_ref(), first_photo, &self.settings, today);
        Ok(Some(layout.to_pdf(&self.settings.app_name)))
    }

    /// Write a CSV or PDF export into a directory (Documents by default)
    pub async fn export_to_path(&self, request: ExportToPathRequest) -> Result<ExportToPathResponse> {
        info!(
            "📁 EXPORT: Exporting {:?} to path - custom_path: {:?}",
            request.format, request.custom_path
        );

        let export_dir = match request.custom_path.as_deref() {
            Some(custom_path) if !custom_path.trim().is_empty() => PathBuf::from(sanitize_path(custom_path)),
            _ => match dirs::document_dir().or_else(dirs::home_dir) {
                Some(dir) => dir,
                None => {
                    error!("❌ EXPORT: Could not determine default export directory");
                    return Ok(failure("Failed to determine export directory".to_string(), String::new()));
                }
            },
        };

        let (content, item_count) = match request.format {
            ExportFormat::Csv => {
                let (csv, count) = self.export_csv().await?;
                (csv.into_bytes(), count)
            }
            ExportFormat::Pdf => self.inventory_pdf(Local::now().date_naive()).await?,
        };

        if let Err(e) = fs::create_dir_all(&export_dir) {
            error!("❌ EXPORT: Failed to create export directory {:?}: {}", export_dir, e);
            return Ok(failure(
                format!("Failed to create export directory: {}", e),
                export_dir.to_string_lossy().to_string(),
            ));
        }

        let file_path = export_dir.join(self.file_name(request.format));
        let file_path_str = file_path.to_string_lossy().to_string();
        match fs::write(&file_path, &content) {
            Ok(()) => {
                info!("✅ EXPORT: Exported {} items to: {}", item_count, file_path_str);
                Ok(ExportToPathResponse {
                    success: true,
                    message: format!("File exported successfully to: {}", file_path_str),
                    file_path: file_path_str,
                    item_count,
                })
            }
            Err(e) => {
                error!("❌ EXPORT: Failed to write export file to {:?}: {}", file_path, e);
                Ok(failure(format!("Failed to write export file: {}", e), file_path_str))
            }
        }
    }
}

fn failure(message: String, file_path: String) -> ExportToPathResponse {
    ExportToPathResponse {
        success: false,
        message,
        file_path,
        item_count: 0,
    }
}

/// Clean up a user-typed directory: surrounding quotes, escaped spaces,
/// trailing separators and a leading `~`
pub fn sanitize_path(path: &str) -> String {
    let mut cleaned = path.trim().to_string();

    if cleaned.len() >= 2
        && ((cleaned.starts_with('"') && cleaned.ends_with('"'))
            || (cleaned.starts_with('\'') && cleaned.ends_with('\'')))
    {
        cleaned = cleaned[1..cleaned.len() - 1].trim().to_string();
    }

    cleaned = cleaned.replace("\\ ", " ");

    while cleaned.len() > 1 && (cleaned.ends_with('/') || cleaned.ends_with('\\')) {
        cleaned.pop();
    }

    if let Some(home) = dirs::home_dir() {
        if cleaned == "~" {
            cleaned = home.to_string_lossy().to_string();
        } else if cleaned.starts_with("~/") || cleaned.starts_with("~\\") {
            cleaned = home.join(&cleaned[2..]).to_string_lossy().to_string();
        }
    }

    cleaned
}
