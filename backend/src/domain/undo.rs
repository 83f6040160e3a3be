//! Undo for item deletion.
//!
//! Deletion is carried out immediately; undo re-creates the deleted items from
//! snapshots taken just before the delete. Only the most recent delete batch
//! can be undone, and only until its window runs out.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::debug;
use tokio::task::JoinHandle;

use crate::domain::models::{Item, Photo, Receipt};

/// Snapshot of a deleted item, including copies of its attachment bytes
#[derive(Debug, Clone, PartialEq)]
pub struct DeletedItemMemento {
    pub item: Item,
    pub photos: Vec<Vec<u8>>,
    /// (filename, bytes)
    pub receipts: Vec<(String, Vec<u8>)>,
}

impl DeletedItemMemento {
    pub fn capture(item: &Item, photos: &[Photo], receipts: &[Receipt]) -> Self {
        Self {
            item: item.clone(),
            photos: photos.iter().map(|p| p.image_data.clone()).collect(),
            receipts: receipts
                .iter()
                .map(|r| (r.filename.clone(), r.file_data.clone()))
                .collect(),
        }
    }

    /// Rebuild the item under a new id with freshly created attachments.
    /// Every captured field is kept, including `date_added` and the room reference.
    pub fn restore(&self) -> (Item, Vec<Photo>, Vec<Receipt>) {
        let item = self.item.with_new_identity();
        let photos = self
            .photos
            .iter()
            .map(|data| Photo::new(item.id, data.clone()))
            .collect();
        let receipts = self
            .receipts
            .iter()
            .map(|(filename, data)| Receipt::new(item.id, data.clone(), filename.clone()))
            .collect();
        (item, photos, receipts)
    }
}

struct UndoState<T> {
    batch: Option<Vec<T>>,
    generation: u64,
    expiry: Option<JoinHandle<()>>,
}

/// Holds the latest batch of deleted entries for a limited time
///
/// Arming a new batch aborts the previous expiry timer and bumps a generation
/// counter; a timer only clears the batch it was started for.
pub struct UndoBuffer<T> {
    state: Arc<Mutex<UndoState<T>>>,
    window: Duration,
}

impl<T> Clone for UndoBuffer<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            window: self.window,
        }
    }
}

impl<T: Send + 'static> UndoBuffer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(UndoState {
                batch: None,
                generation: 0,
                expiry: None,
            })),
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn lock(&self) -> MutexGuard<'_, UndoState<T>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace any pending batch with `batch` and start a fresh window.
    /// Must be called from within a Tokio runtime.
    pub fn arm(&self, batch: Vec<T>) {
        let mut state = self.lock();
        if let Some(previous) = state.expiry.take() {
            previous.abort();
        }
        state.generation += 1;
        state.batch = Some(batch);

        let generation = state.generation;
        let shared = Arc::clone(&self.state);
        let window = self.window;
        state.expiry = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let mut state = shared.lock().unwrap_or_else(|e| e.into_inner());
            if state.generation == generation {
                state.batch = None;
                state.expiry = None;
                debug!("Undo window expired, deletion is now permanent");
            }
        }));
    }

    /// Take the pending batch, if its window is still open
    pub fn take(&self) -> Option<Vec<T>> {
        let mut state = self.lock();
        if let Some(expiry) = state.expiry.take() {
            expiry.abort();
        }
        state.batch.take()
    }

    /// Number of entries that undo would restore right now
    pub fn pending_len(&self) -> usize {
        self.lock().batch.as_ref().map_or(0, Vec::len)
    }

    pub fn is_pending(&self) -> bool {
        self.lock().batch.is_some()
    }
}
