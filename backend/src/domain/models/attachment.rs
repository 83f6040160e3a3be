use uuid::Uuid;

const PDF_MAGIC: [u8; 4] = [0x25, 0x50, 0x44, 0x46];

/// Compressed JPEG image owned by an item
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub id: Uuid,
    pub item_id: Uuid,
    pub image_data: Vec<u8>,
}

impl Photo {
    pub fn new(item_id: Uuid, image_data: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id,
            image_data,
        }
    }
}

/// Receipt document (image or PDF) owned by an item
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub id: Uuid,
    pub item_id: Uuid,
    pub file_data: Vec<u8>,
    pub filename: String,
}

impl Receipt {
    pub fn new(item_id: Uuid, file_data: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id,
            file_data,
            filename: filename.into(),
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.file_data.starts_with(&PDF_MAGIC)
    }
}
