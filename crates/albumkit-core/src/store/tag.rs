// ── Tag store ──

use indexmap::IndexMap;
use tokio::sync::watch;

use super::{EntityCollection, LoadState, Patch, Revision, newest_first};
use crate::model::{EntityId, Tag, TagUpdate};

#[derive(Debug, Default)]
pub struct TagStore {
    tags: EntityCollection<Tag>,
    loading: bool,
    error: Option<String>,
    revision: Revision,
}

impl TagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Most recently updated first.
    pub fn sorted(&self) -> Vec<&Tag> {
        newest_first(self.tags.iter(), |t| t.updated_at)
    }

    /// Tags grouped by color. Groups appear in first-seen order and keep
    /// insertion order inside each group.
    pub fn by_color(&self) -> IndexMap<&str, Vec<&Tag>> {
        let mut groups: IndexMap<&str, Vec<&Tag>> = IndexMap::new();
        for tag in self.tags.iter() {
            groups.entry(tag.color.as_str()).or_default().push(tag);
        }
        groups
    }

    pub fn by_id(&self, id: &EntityId) -> Option<&Tag> {
        self.tags.get(id)
    }

    /// First tag carrying `name`.
    pub fn by_name(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.name == name)
    }

    pub fn set_tags(&mut self, tags: Vec<Tag>) {
        self.tags.replace_all(tags);
        self.revision.bump();
    }

    pub fn add(&mut self, tag: Tag) {
        self.tags.upsert(tag);
        self.revision.bump();
    }

    pub fn update(&mut self, id: &EntityId, update: &TagUpdate) -> bool {
        let Some(tag) = self.tags.get_mut(id) else {
            return false;
        };
        update.apply_to(tag);
        self.revision.bump();
        true
    }

    pub fn remove(&mut self, id: &EntityId) -> Option<Tag> {
        let removed = self.tags.remove(id);
        if removed.is_some() {
            self.revision.bump();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.tags.clear();
        self.revision.bump();
    }
}

impl LoadState for TagStore {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.revision.bump();
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
