use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use shared::{ItemCategory, ItemCondition};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use crate::domain::models::{Item, Photo, Receipt};
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::ItemStorage;

const ITEM_COLUMNS: &str = r#"
    id, name, item_description, category, item_condition, room_id, make, model,
    serial_number, purchase_price, purchase_date, purchase_store, current_value,
    warranty_expiration, warranty_provider, notes, date_added
"#;

const ISO_DATE: &str = "%Y-%m-%d";

/// Repository for items and the attachments they own
#[derive(Clone)]
pub struct ItemRepository {
    db: DbConnection,
}

impl ItemRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn item_from_row(row: &SqliteRow) -> Result<Item> {
        let id: String = row.try_get("id")?;
        let room_id: Option<String> = row.try_get("room_id")?;
        let category: Option<String> = row.try_get("category")?;
        let condition: Option<String> = row.try_get("item_condition")?;
        let purchase_date: Option<String> = row.try_get("purchase_date")?;
        let warranty_expiration: Option<String> = row.try_get("warranty_expiration")?;
        let date_added: Option<String> = row.try_get("date_added")?;

        Ok(Item {
            id: Uuid::parse_str(&id).with_context(|| format!("Invalid item id in database: {}", id))?,
            name: row.try_get("name")?,
            description: row.try_get("item_description")?,
            category: category.as_deref().and_then(ItemCategory::from_label),
            condition: condition.as_deref().and_then(ItemCondition::from_label),
            room_id: room_id.as_deref().and_then(|r| Uuid::parse_str(r).ok()),
            make: row.try_get("make")?,
            model: row.try_get("model")?,
            serial_number: row.try_get("serial_number")?,
            purchase_price: row.try_get("purchase_price")?,
            purchase_date: parse_stored_date(purchase_date),
            purchase_store: row.try_get("purchase_store")?,
            current_value: row.try_get("current_value")?,
            warranty_expiration: parse_stored_date(warranty_expiration),
            warranty_provider: row.try_get("warranty_provider")?,
            notes: row.try_get("notes")?,
            date_added: date_added
                .as_deref()
                .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
                .map(|d| d.with_timezone(&Utc)),
        })
    }

    /// Remove an item row and its attachments; true if the item existed
    async fn delete_item_rows(conn: &mut SqliteConnection, item_id: Uuid) -> Result<bool> {
        let id = item_id.to_string();
        let photos = sqlx::query("DELETE FROM photos WHERE item_id = ?")
            .bind(&id)
            .execute(&mut *conn)
            .await?;
        let receipts = sqlx::query("DELETE FROM receipts WHERE item_id = ?")
            .bind(&id)
            .execute(&mut *conn)
            .await?;
        let items = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(&id)
            .execute(&mut *conn)
            .await?;

        debug!(
            "Deleted item {} ({} photos, {} receipts)",
            item_id,
            photos.rows_affected(),
            receipts.rows_affected()
        );
        Ok(items.rows_affected() > 0)
    }

    async fn insert_item(conn: &mut SqliteConnection, item: &Item) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO items (
                id, name, item_description, category, item_condition, room_id, make, model,
                serial_number, purchase_price, purchase_date, purchase_store, current_value,
                warranty_expiration, warranty_provider, notes, date_added
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(item.id.to_string())
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.category.map(|c| c.label()))
        .bind(item.condition.map(|c| c.label()))
        .bind(item.room_id.map(|r| r.to_string()))
        .bind(&item.make)
        .bind(&item.model)
        .bind(&item.serial_number)
        .bind(item.purchase_price)
        .bind(format_stored_date(item.purchase_date))
        .bind(&item.purchase_store)
        .bind(item.current_value)
        .bind(format_stored_date(item.warranty_expiration))
        .bind(&item.warranty_provider)
        .bind(&item.notes)
        .bind(item.date_added.map(|d| d.to_rfc3339()))
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    async fn insert_photos(conn: &mut SqliteConnection, item_id: Uuid, photos: &[Photo]) -> Result<()> {
        for (position, photo) in photos.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO photos (id, item_id, position, image_data)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(photo.id.to_string())
            .bind(item_id.to_string())
            .bind(position as i64)
            .bind(&photo.image_data)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    async fn insert_receipts(conn: &mut SqliteConnection, receipts: &[Receipt]) -> Result<()> {
        for receipt in receipts {
            sqlx::query(
                r#"
                INSERT INTO receipts (id, item_id, position, filename, file_data)
                VALUES (
                    ?, ?,
                    (SELECT COALESCE(MAX(position) + 1, 0) FROM receipts WHERE item_id = ?),
                    ?, ?
                )
                "#,
            )
            .bind(receipt.id.to_string())
            .bind(receipt.item_id.to_string())
            .bind(receipt.item_id.to_string())
            .bind(&receipt.filename)
            .bind(&receipt.file_data)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }
}

fn format_stored_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(ISO_DATE).to_string())
}

fn parse_stored_date(value: Option<String>) -> Option<NaiveDate> {
    value.and_then(|v| NaiveDate::parse_from_str(&v, ISO_DATE).ok())
}

#[async_trait]
impl ItemStorage for ItemRepository {
    async fn store_item(&self, item: &Item, photos: &[Photo], receipts: &[Receipt]) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;
        Self::insert_item(&mut tx, item).await?;
        Self::insert_photos(&mut tx, item.id, photos).await?;
        Self::insert_receipts(&mut tx, receipts).await?;
        tx.commit().await?;

        debug!(
            "Stored item {} with {} photos and {} receipts",
            item.id,
            photos.len(),
            receipts.len()
        );
        Ok(())
    }

    async fn get_item(&self, item_id: Uuid) -> Result<Option<Item>> {
        let row = sqlx::query(&format!("SELECT {} FROM items WHERE id = ?", ITEM_COLUMNS))
            .bind(item_id.to_string())
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::item_from_row).transpose()
    }

    async fn list_items(&self) -> Result<Vec<Item>> {
        let rows = sqlx::query(&format!("SELECT {} FROM items", ITEM_COLUMNS))
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(Self::item_from_row).collect()
    }

    async fn update_item(&self, item: &Item) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE items SET
                name = ?, item_description = ?, category = ?, item_condition = ?, room_id = ?,
                make = ?, model = ?, serial_number = ?, purchase_price = ?, purchase_date = ?,
                purchase_store = ?, current_value = ?, warranty_expiration = ?,
                warranty_provider = ?, notes = ?
            WHERE id = ?
            "#,
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.category.map(|c| c.label()))
        .bind(item.condition.map(|c| c.label()))
        .bind(item.room_id.map(|r| r.to_string()))
        .bind(&item.make)
        .bind(&item.model)
        .bind(&item.serial_number)
        .bind(item.purchase_price)
        .bind(format_stored_date(item.purchase_date))
        .bind(&item.purchase_store)
        .bind(item.current_value)
        .bind(format_stored_date(item.warranty_expiration))
        .bind(&item.warranty_provider)
        .bind(&item.notes)
        .bind(item.id.to_string())
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_item(&self, item_id: Uuid) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;
        let deleted = Self::delete_item_rows(&mut tx, item_id).await?;
        tx.commit().await?;
        Ok(deleted)
    }

    async fn delete_items(&self, item_ids: &[Uuid]) -> Result<Vec<Uuid>> {
        let mut tx = self.db.pool().begin().await?;
        let mut deleted = Vec::with_capacity(item_ids.len());

        for &item_id in item_ids {
            if Self::delete_item_rows(&mut tx, item_id)
                .await
                .with_context(|| format!("Failed to delete item {}", item_id))?
            {
                deleted.push(item_id);
            }
        }

        tx.commit().await?;
        Ok(deleted)
    }

    async fn assign_room(&self, item_ids: &[Uuid], room_id: Option<Uuid>) -> Result<u32> {
        let room = room_id.map(|r| r.to_string());
        let mut tx = self.db.pool().begin().await?;
        let mut updated = 0u32;

        for item_id in item_ids {
            let result = sqlx::query("UPDATE items SET room_id = ? WHERE id = ?")
                .bind(&room)
                .bind(item_id.to_string())
                .execute(&mut *tx)
                .await?;
            updated += result.rows_affected() as u32;
        }

        tx.commit().await?;
        Ok(updated)
    }

    async fn list_photos(&self, item_id: Uuid) -> Result<Vec<Photo>> {
        let rows = sqlx::query(
            r#"
            SELECT id, image_data
            FROM photos
            WHERE item_id = ?
            ORDER BY position ASC
            "#,
        )
        .bind(item_id.to_string())
        .fetch_all(self.db.pool())
        .await?;

        rows.iter()
            .map(|row| {
                let id: String = row.try_get("id")?;
                Ok(Photo {
                    id: Uuid::parse_str(&id)?,
                    item_id,
                    image_data: row.try_get("image_data")?,
                })
            })
            .collect()
    }

    async fn replace_photos(&self, item_id: Uuid, photos: &[Photo]) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;
        sqlx::query("DELETE FROM photos WHERE item_id = ?")
            .bind(item_id.to_string())
            .execute(&mut *tx)
            .await?;
        Self::insert_photos(&mut tx, item_id, photos).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn list_receipts(&self, item_id: Uuid) -> Result<Vec<Receipt>> {
        let rows = sqlx::query(
            r#"
            SELECT id, filename, file_data
            FROM receipts
            WHERE item_id = ?
            ORDER BY position ASC
            "#,
        )
        .bind(item_id.to_string())
        .fetch_all(self.db.pool())
        .await?;

        rows.iter()
            .map(|row| {
                let id: String = row.try_get("id")?;
                Ok(Receipt {
                    id: Uuid::parse_str(&id)?,
                    item_id,
                    filename: row.try_get("filename")?,
                    file_data: row.try_get("file_data")?,
                })
            })
            .collect()
    }

    async fn add_receipts(&self, receipts: &[Receipt]) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;
        Self::insert_receipts(&mut tx, receipts).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn count_orphaned_attachments(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT
                (SELECT COUNT(*) FROM photos WHERE item_id NOT IN (SELECT id FROM items))
              + (SELECT COUNT(*) FROM receipts WHERE item_id NOT IN (SELECT id FROM items))
            "#,
        )
        .fetch_one(self.db.pool())
        .await?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Room;
    use crate::storage::traits::{Connection, RoomStorage};

    async fn setup_test_repo() -> (ItemRepository, DbConnection) {
        let conn = DbConnection::in_memory().await.expect("Failed to open in-memory database");
        (conn.create_item_repository(), conn)
    }

    #[tokio::test]
    async fn test_store_and_get_item_round_trips_fields() {
        let (repo, _conn) = setup_test_repo().await;

        let mut item = Item::new("Espresso machine");
        item.category = Some(ItemCategory::Kitchen);
        item.condition = Some(ItemCondition::Fair);
        item.purchase_price = Some(499.99);
        item.purchase_date = NaiveDate::from_ymd_opt(2023, 3, 14);
        item.notes = "Descale monthly".to_string();

        repo.store_item(&item, &[], &[]).await.expect("Failed to store item");

        let loaded = repo.get_item(item.id).await.unwrap().expect("Item should exist");
        assert_eq!(loaded.name, "Espresso machine");
        assert_eq!(loaded.category, Some(ItemCategory::Kitchen));
        assert_eq!(loaded.condition, Some(ItemCondition::Fair));
        assert_eq!(loaded.purchase_price, Some(499.99));
        assert_eq!(loaded.purchase_date, item.purchase_date);
        assert_eq!(loaded.notes, "Descale monthly");
        assert_eq!(
            loaded.date_added.map(|d| d.timestamp()),
            item.date_added.map(|d| d.timestamp())
        );
    }

    #[tokio::test]
    async fn test_delete_item_cascades_to_attachments() {
        let (repo, _conn) = setup_test_repo().await;

        let item = Item::new("Laptop");
        let photos = vec![
            Photo::new(item.id, vec![1, 2, 3]),
            Photo::new(item.id, vec![4, 5, 6]),
        ];
        let receipts = vec![Receipt::new(item.id, b"%PDF-1.4".to_vec(), "invoice.pdf")];
        repo.store_item(&item, &photos, &receipts).await.unwrap();

        assert!(repo.delete_item(item.id).await.unwrap());
        assert!(repo.get_item(item.id).await.unwrap().is_none());
        assert!(repo.list_photos(item.id).await.unwrap().is_empty());
        assert!(repo.list_receipts(item.id).await.unwrap().is_empty());
        assert_eq!(repo.count_orphaned_attachments().await.unwrap(), 0);

        assert!(!repo.delete_item(item.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_items_is_all_or_nothing() {
        let (repo, conn) = setup_test_repo().await;

        let lamp = Item::new("Lamp");
        let rug = Item::new("Rug");
        repo.store_item(&lamp, &[Photo::new(lamp.id, vec![1])], &[]).await.unwrap();
        repo.store_item(&rug, &[], &[]).await.unwrap();

        sqlx::query(
            "CREATE TRIGGER keep_rug BEFORE DELETE ON items WHEN old.name = 'Rug' \
             BEGIN SELECT RAISE(ABORT, 'rug is pinned'); END",
        )
        .execute(conn.pool())
        .await
        .unwrap();

        assert!(repo.delete_items(&[lamp.id, rug.id]).await.is_err());
        assert!(repo.get_item(lamp.id).await.unwrap().is_some());
        assert_eq!(repo.list_photos(lamp.id).await.unwrap().len(), 1);

        sqlx::query("DROP TRIGGER keep_rug").execute(conn.pool()).await.unwrap();
        let missing = Uuid::new_v4();
        let deleted = repo.delete_items(&[lamp.id, missing, rug.id]).await.unwrap();
        assert_eq!(deleted, vec![lamp.id, rug.id]);
        assert!(repo.list_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_photos_swaps_whole_set() {
        let (repo, _conn) = setup_test_repo().await;

        let item = Item::new("Bike");
        repo.store_item(&item, &[Photo::new(item.id, vec![9])], &[]).await.unwrap();

        let replacement = vec![Photo::new(item.id, vec![1]), Photo::new(item.id, vec![2])];
        repo.replace_photos(item.id, &replacement).await.unwrap();

        let photos = repo.list_photos(item.id).await.unwrap();
        let data: Vec<_> = photos.iter().map(|p| p.image_data.clone()).collect();
        assert_eq!(data, vec![vec![1], vec![2]]);
    }

    #[tokio::test]
    async fn test_receipts_keep_insertion_order() {
        let (repo, _conn) = setup_test_repo().await;

        let item = Item::new("Fridge");
        repo.store_item(&item, &[], &[Receipt::new(item.id, vec![1], "first.jpg")])
            .await
            .unwrap();
        repo.add_receipts(&[Receipt::new(item.id, vec![2], "second.jpg")])
            .await
            .unwrap();

        let names: Vec<_> = repo
            .list_receipts(item.id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.filename)
            .collect();
        assert_eq!(names, vec!["first.jpg", "second.jpg"]);
    }

    #[tokio::test]
    async fn test_assign_room_counts_updated_items() {
        let (repo, conn) = setup_test_repo().await;
        let rooms = conn.create_room_repository();

        let room = Room::new("Office");
        rooms.store_room(&room).await.unwrap();

        let a = Item::new("Desk");
        let b = Item::new("Chair");
        repo.store_item(&a, &[], &[]).await.unwrap();
        repo.store_item(&b, &[], &[]).await.unwrap();

        let moved = repo
            .assign_room(&[a.id, b.id, Uuid::new_v4()], Some(room.id))
            .await
            .unwrap();
        assert_eq!(moved, 2);
        assert_eq!(repo.get_item(a.id).await.unwrap().unwrap().room_id, Some(room.id));
    }
}
