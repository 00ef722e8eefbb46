// ── Upload queue store ──
//
// `completed_count` looks at progress while `clear_completed` looks at
// status. The two can disagree (an item at 100% still marked
// `Uploading`); both readings are kept as they are.

use std::collections::HashMap;

use tokio::sync::watch;

use super::{LoadState, Revision};
use crate::model::{EntityId, UploadFile, UploadId, UploadItem, UploadStatus};

#[derive(Debug, Default)]
pub struct UploadStore {
    queue: Vec<UploadItem>,
    uploading: bool,
    progress: HashMap<UploadId, u8>,
    error: Option<String>,
    revision: Revision,
}

impl UploadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&self) -> &[UploadItem] {
        &self.queue
    }

    pub fn get(&self, id: UploadId) -> Option<&UploadItem> {
        self.queue.iter().find(|item| item.id == id)
    }

    pub fn progress_of(&self, id: UploadId) -> Option<u8> {
        self.progress.get(&id).copied()
    }

    pub fn progress(&self) -> &HashMap<UploadId, u8> {
        &self.progress
    }

    pub fn uploading(&self) -> bool {
        self.uploading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    // ── Derived views ────────────────────────────────────────────────

    pub fn queue_length(&self) -> usize {
        self.queue.len()
    }

    /// Mean progress across the queue, rounded half up. Zero when empty.
    pub fn total_progress(&self) -> u8 {
        if self.queue.is_empty() {
            return 0;
        }
        let n = u64::try_from(self.queue.len()).unwrap_or(u64::MAX);
        let sum: u64 = self
            .queue
            .iter()
            .map(|item| u64::from(self.progress_of(item.id).unwrap_or(0)))
            .sum();
        // round(sum / n) without floats: floor((2 * sum + n) / (2 * n))
        u8::try_from((2 * sum + n) / (2 * n)).unwrap_or(u8::MAX)
    }

    /// Items whose progress is exactly 100, whatever their status says.
    pub fn completed_count(&self) -> usize {
        self.queue
            .iter()
            .filter(|item| self.progress_of(item.id) == Some(100))
            .count()
    }

    /// Items still waiting to be sent.
    pub fn pending(&self) -> Vec<&UploadItem> {
        self.queue
            .iter()
            .filter(|item| item.status == UploadStatus::Pending)
            .collect()
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Append a new pending item and start its progress at 0.
    pub fn enqueue(&mut self, file: UploadFile, album_id: Option<EntityId>) -> UploadId {
        let item = UploadItem::new(file, album_id);
        let id = item.id;
        self.queue.push(item);
        self.progress.insert(id, 0);
        self.revision.bump();
        id
    }

    pub fn dequeue(&mut self, id: UploadId) -> Option<UploadItem> {
        let index = self.queue.iter().position(|item| item.id == id)?;
        let item = self.queue.remove(index);
        self.progress.remove(&id);
        self.revision.bump();
        Some(item)
    }

    /// Overwrite the stored percentage. Values are not clamped and ids
    /// that are not queued still get an entry.
    pub fn update_progress(&mut self, id: UploadId, percent: u8) {
        self.progress.insert(id, percent);
        self.revision.bump();
    }

    /// Set the status (and error detail) of a queued item. Any status
    /// may follow any other.
    pub fn update_status(&mut self, id: UploadId, status: UploadStatus, error: Option<String>) -> bool {
        let Some(item) = self.queue.iter_mut().find(|item| item.id == id) else {
            return false;
        };
        item.status = status;
        item.error = error;
        self.revision.bump();
        true
    }

    pub fn set_uploading(&mut self, uploading: bool) {
        self.uploading = uploading;
        self.revision.bump();
    }

    pub fn clear_queue(&mut self) {
        self.queue.clear();
        self.progress.clear();
        self.revision.bump();
    }

    /// Drop items whose status is `Completed`. Progress entries stay.
    pub fn clear_completed(&mut self) {
        self.queue.retain(|item| item.status != UploadStatus::Completed);
        self.revision.bump();
    }
}

impl LoadState for UploadStore {
    fn set_loading(&mut self, loading: bool) {
        self.set_uploading(loading);
    }

    fn set_error(&mut self, message: String) {
        self.error = Some(message);
        self.revision.bump();
    }

    fn clear_error(&mut self) {
        self.error = None;
        self.revision.bump();
    }
}
