use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use shared::RoomColor;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::models::Room;
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::RoomStorage;

/// Repository for rooms
#[derive(Clone)]
pub struct RoomRepository {
    db: DbConnection,
}

impl RoomRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn room_from_row(row: &SqliteRow) -> Result<Room> {
        let id: String = row.try_get("id")?;
        let color: String = row.try_get("color_name")?;
        let date_created: Option<String> = row.try_get("date_created")?;

        Ok(Room {
            id: Uuid::parse_str(&id).with_context(|| format!("Invalid room id in database: {}", id))?,
            name: row.try_get("name")?,
            icon: row.try_get("icon")?,
            color: RoomColor::from_name(&color),
            date_created: date_created
                .as_deref()
                .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
                .map(|d| d.with_timezone(&Utc)),
        })
    }
}

#[async_trait]
impl RoomStorage for RoomRepository {
    async fn store_room(&self, room: &Room) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO rooms (id, name, icon, color_name, date_created)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(room.id.to_string())
        .bind(&room.name)
        .bind(&room.icon)
        .bind(room.color.name())
        .bind(room.date_created.map(|d| d.to_rfc3339()))
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    async fn get_room(&self, room_id: Uuid) -> Result<Option<Room>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, icon, color_name, date_created
            FROM rooms
            WHERE id = ?
            "#,
        )
        .bind(room_id.to_string())
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::room_from_row).transpose()
    }

    async fn list_rooms(&self) -> Result<Vec<Room>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, icon, color_name, date_created
            FROM rooms
            ORDER BY name ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::room_from_row).collect()
    }

    async fn update_room(&self, room: &Room) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE rooms
            SET name = ?, icon = ?, color_name = ?
            WHERE id = ?
            "#,
        )
        .bind(&room.name)
        .bind(&room.icon)
        .bind(room.color.name())
        .bind(room.id.to_string())
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_room(&self, room_id: Uuid) -> Result<Option<u32>> {
        let id = room_id.to_string();
        let mut tx = self.db.pool().begin().await?;

        let detached = sqlx::query("UPDATE items SET room_id = NULL WHERE room_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM rooms WHERE id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        debug!(
            "Deleted room {} and detached {} items",
            room_id,
            detached.rows_affected()
        );
        Ok(Some(detached.rows_affected() as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Item;
    use crate::storage::traits::{Connection, ItemStorage};

    async fn setup_test_repo() -> (RoomRepository, DbConnection) {
        let conn = DbConnection::in_memory().await.expect("Failed to open in-memory database");
        (conn.create_room_repository(), conn)
    }

    #[tokio::test]
    async fn test_list_rooms_sorted_by_name() {
        let (repo, _conn) = setup_test_repo().await;

        for name in ["Kitchen", "Attic", "Garage"] {
            repo.store_room(&Room::new(name)).await.expect("Failed to store room");
        }

        let names: Vec<_> = repo.list_rooms().await.unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Attic", "Garage", "Kitchen"]);
    }

    #[tokio::test]
    async fn test_update_room_style() {
        let (repo, _conn) = setup_test_repo().await;

        let mut room = Room::new("Den");
        repo.store_room(&room).await.unwrap();

        room.icon = "sofa".to_string();
        room.color = RoomColor::Purple;
        assert!(repo.update_room(&room).await.unwrap());

        let loaded = repo.get_room(room.id).await.unwrap().expect("Room should exist");
        assert_eq!(loaded.icon, "sofa");
        assert_eq!(loaded.color, RoomColor::Purple);

        assert!(!repo.update_room(&Room::new("Ghost")).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_room_detaches_items() {
        let (repo, conn) = setup_test_repo().await;
        let items = conn.create_item_repository();

        let room = Room::new("Garage");
        repo.store_room(&room).await.unwrap();

        let mut drill = Item::new("Drill");
        drill.room_id = Some(room.id);
        items.store_item(&drill, &[], &[]).await.unwrap();

        assert_eq!(repo.delete_room(room.id).await.unwrap(), Some(1));
        assert!(repo.get_room(room.id).await.unwrap().is_none());

        let loaded = items.get_item(drill.id).await.unwrap().expect("Item must survive");
        assert_eq!(loaded.room_id, None);

        assert_eq!(repo.delete_room(room.id).await.unwrap(), None);
    }
}
