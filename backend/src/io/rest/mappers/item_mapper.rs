//! Conversion between item DTOs and domain models.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::NaiveDate;
use uuid::Uuid;

use shared::{
    CreateItemRequest, Item as SharedItem, ItemDetailResponse, ItemFields, ItemListRequest, ReceiptInfo,
    ReceiptUpload, UpdateItemRequest,
};

use crate::domain::commands::items::{
    CreateItemCommand, ItemDraft, ItemListQuery, ReceiptFile, UpdateItemCommand,
};
use crate::domain::item_service::ItemDetail;
use crate::domain::models::{Item, Receipt, Room};
use crate::io::rest::InvalidRequest;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Mapper to convert between shared Item DTOs and domain Item models.
pub struct ItemMapper;

impl ItemMapper {
    /// Converts a domain Item to its DTO; `rooms` supplies the room name.
    pub fn to_dto(item: &Item, rooms: &[Room]) -> SharedItem {
        let category = item.category_or_default();
        let condition = item.condition_or_default();
        let room_name = item
            .room_id
            .and_then(|id| rooms.iter().find(|r| r.id == id))
            .map(|r| r.name.clone());

        SharedItem {
            id: item.id.to_string(),
            name: item.name.clone(),
            description: item.description.clone(),
            category,
            category_icon: category.icon().to_string(),
            condition,
            condition_color: condition.color_name().to_string(),
            room_id: item.room_id.map(|id| id.to_string()),
            room_name,
            make: item.make.clone(),
            model: item.model.clone(),
            serial_number: item.serial_number.clone(),
            purchase_price: item.purchase_price,
            purchase_date: item.purchase_date.map(|d| d.format(DATE_FORMAT).to_string()),
            purchase_store: item.purchase_store.clone(),
            current_value: item.current_value,
            warranty_expiration: item.warranty_expiration.map(|d| d.format(DATE_FORMAT).to_string()),
            warranty_provider: item.warranty_provider.clone(),
            notes: item.notes.clone(),
            date_added: item.date_added.map(|d| d.to_rfc3339()),
            display_value: item.display_value(),
        }
    }

    pub fn to_dto_list(items: &[Item], rooms: &[Room]) -> Vec<SharedItem> {
        items.iter().map(|item| Self::to_dto(item, rooms)).collect()
    }

    pub fn to_detail_dto(detail: &ItemDetail, rooms: &[Room]) -> ItemDetailResponse {
        ItemDetailResponse {
            item: Self::to_dto(&detail.item, rooms),
            photos: detail.photos.iter().map(|p| STANDARD.encode(&p.image_data)).collect(),
            receipts: detail.receipts.iter().map(Self::to_receipt_info).collect(),
        }
    }

    fn to_receipt_info(receipt: &Receipt) -> ReceiptInfo {
        ReceiptInfo {
            id: receipt.id.to_string(),
            filename: receipt.filename.clone(),
            is_pdf: receipt.is_pdf(),
            size_bytes: receipt.file_data.len(),
        }
    }

    /// Converts the form fields of a request into a domain draft.
    pub fn to_draft(fields: ItemFields) -> Result<ItemDraft, InvalidRequest> {
        Ok(ItemDraft {
            name: fields.name,
            description: fields.description,
            category: fields.category,
            condition: fields.condition,
            room_id: fields.room_id.as_deref().map(Self::parse_id).transpose()?,
            make: fields.make,
            model: fields.model,
            serial_number: fields.serial_number,
            purchase_price: fields.purchase_price,
            purchase_date: Self::parse_date(fields.purchase_date.as_deref())?,
            purchase_store: fields.purchase_store,
            current_value: fields.current_value,
            warranty_expiration: Self::parse_date(fields.warranty_expiration.as_deref())?,
            warranty_provider: fields.warranty_provider,
            notes: fields.notes,
        })
    }

    pub fn to_create_command(request: CreateItemRequest) -> Result<CreateItemCommand, InvalidRequest> {
        Ok(CreateItemCommand {
            draft: Self::to_draft(request.fields)?,
            photos: Self::decode_photos(&request.photos)?,
            receipts: Self::decode_receipts(request.receipts)?,
        })
    }

    pub fn to_update_command(item_id: Uuid, request: UpdateItemRequest) -> Result<UpdateItemCommand, InvalidRequest> {
        Ok(UpdateItemCommand {
            item_id,
            draft: Self::to_draft(request.fields)?,
            photos: request.photos.as_deref().map(Self::decode_photos).transpose()?,
            new_receipts: Self::decode_receipts(request.receipts)?,
        })
    }

    pub fn to_list_query(request: ItemListRequest) -> Result<ItemListQuery, InvalidRequest> {
        Ok(ItemListQuery {
            search: request.search.unwrap_or_default(),
            category: request.category,
            room_id: request.room_id.as_deref().map(Self::parse_id).transpose()?,
            sort: request.sort.unwrap_or_default(),
        })
    }

    pub fn parse_id(id: &str) -> Result<Uuid, InvalidRequest> {
        Uuid::parse_str(id.trim()).map_err(|_| InvalidRequest::Id(id.to_string()))
    }

    pub fn parse_ids(ids: &[String]) -> Result<Vec<Uuid>, InvalidRequest> {
        ids.iter().map(|id| Self::parse_id(id)).collect()
    }

    /// Blank dates are treated as absent
    fn parse_date(text: Option<&str>) -> Result<Option<NaiveDate>, InvalidRequest> {
        match text.map(str::trim).filter(|t| !t.is_empty()) {
            None => Ok(None),
            Some(text) => NaiveDate::parse_from_str(text, DATE_FORMAT)
                .map(Some)
                .map_err(|_| InvalidRequest::Date(text.to_string())),
        }
    }

    fn decode(data: &str) -> Result<Vec<u8>, InvalidRequest> {
        STANDARD
            .decode(data.trim())
            .map_err(|e| InvalidRequest::Data(e.to_string()))
    }

    fn decode_photos(photos: &[String]) -> Result<Vec<Vec<u8>>, InvalidRequest> {
        photos.iter().map(|p| Self::decode(p)).collect()
    }

    fn decode_receipts(receipts: Vec<ReceiptUpload>) -> Result<Vec<ReceiptFile>, InvalidRequest> {
        receipts
            .into_iter()
            .map(|r| {
                Ok(ReceiptFile {
                    data: Self::decode(&r.data)?,
                    filename: r.filename,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{ItemCategory, ItemCondition};

    #[test]
    fn test_to_dto_resolves_room_and_formats_dates() {
        let room = Room::new("Office");
        let mut item = Item::new("Monitor");
        item.room_id = Some(room.id);
        item.category = Some(ItemCategory::Electronics);
        item.purchase_price = Some(250.0);
        item.warranty_expiration = NaiveDate::from_ymd_opt(2026, 3, 9);

        let dto = ItemMapper::to_dto(&item, &[room]);
        assert_eq!(dto.room_name.as_deref(), Some("Office"));
        assert_eq!(dto.warranty_expiration.as_deref(), Some("2026-03-09"));
        assert_eq!(dto.display_value, Some(250.0));
        assert_eq!(dto.category_icon, ItemCategory::Electronics.icon());
        assert_eq!(dto.condition, ItemCondition::Good);
    }

    #[test]
    fn test_to_dto_with_dangling_room_has_no_name() {
        let mut item = Item::new("Lamp");
        item.room_id = Some(Uuid::new_v4());
        let dto = ItemMapper::to_dto(&item, &[]);
        assert!(dto.room_id.is_some());
        assert_eq!(dto.room_name, None);
    }

    #[test]
    fn test_to_draft_parses_dates_and_room() {
        let room_id = Uuid::new_v4();
        let fields = ItemFields {
            name: "Bike".to_string(),
            room_id: Some(room_id.to_string()),
            purchase_date: Some("2024-05-01".to_string()),
            warranty_expiration: Some("  ".to_string()),
            ..Default::default()
        };
        let draft = ItemMapper::to_draft(fields).expect("Failed to map fields");
        assert_eq!(draft.room_id, Some(room_id));
        assert_eq!(draft.purchase_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(draft.warranty_expiration, None);
    }

    #[test]
    fn test_invalid_input_is_rejected() {
        let bad_date = ItemFields {
            name: "Bike".to_string(),
            purchase_date: Some("05/01/2024".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ItemMapper::to_draft(bad_date),
            Err(InvalidRequest::Date("05/01/2024".to_string()))
        );
        assert!(ItemMapper::parse_ids(&["not-a-uuid".to_string()]).is_err());

        let request = CreateItemRequest {
            fields: ItemFields {
                name: "Bike".to_string(),
                ..Default::default()
            },
            photos: vec!["***".to_string()],
            receipts: vec![],
        };
        assert!(matches!(
            ItemMapper::to_create_command(request),
            Err(InvalidRequest::Data(_))
        ));
    }

    #[test]
    fn test_receipts_are_decoded() {
        let request = UpdateItemRequest {
            fields: ItemFields {
                name: "Bike".to_string(),
                ..Default::default()
            },
            photos: None,
            receipts: vec![ReceiptUpload {
                filename: "receipt.pdf".to_string(),
                data: STANDARD.encode(b"%PDF-1.4"),
            }],
        };
        let command = ItemMapper::to_update_command(Uuid::new_v4(), request).unwrap();
        assert!(command.photos.is_none());
        assert_eq!(command.new_receipts[0].data, b"%PDF-1.4".to_vec());
        assert_eq!(command.new_receipts[0].filename, "receipt.pdf");
    }
}
