// ── Album collection store ──

use indexmap::IndexSet;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::{EntityCollection, LoadState, Patch, Revision, newest_first};
use crate::error::CoreError;
use crate::favorite::{FavoriteToggle, InFlight};
use crate::model::{Album, AlbumUpdate, EntityId};

/// Albums plus the tag/favorite view filters the album grid applies.
#[derive(Debug, Default)]
pub struct AlbumStore {
    albums: EntityCollection<Album>,
    current: Option<Album>,
    loading: bool,
    error: Option<String>,
    selected_tags: IndexSet<String>,
    favorites_only: bool,
    in_flight: InFlight,
    revision: Revision,
}

impl AlbumStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Raw state ────────────────────────────────────────────────────

    pub fn albums(&self) -> impl Iterator<Item = &Album> {
        self.albums.iter()
    }

    pub fn get(&self, id: &EntityId) -> Option<&Album> {
        self.albums.get(id)
    }

    pub fn current(&self) -> Option<&Album> {
        self.current.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected_tags(&self) -> &IndexSet<String> {
        &self.selected_tags
    }

    pub fn favorites_only(&self) -> bool {
        self.favorites_only
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    // ── Derived views ────────────────────────────────────────────────

    pub fn album_count(&self) -> usize {
        self.albums.len()
    }

    /// All albums, most recently updated first.
    pub fn sorted(&self) -> Vec<&Album> {
        newest_first(self.albums.iter(), |a| a.updated_at)
    }

    /// The sorted view restricted by the favorites-only flag and the
    /// selected tag set.
    pub fn filtered(&self) -> Vec<&Album> {
        self.sorted()
            .into_iter()
            .filter(|album| self.passes_filters(album))
            .collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.albums.iter().filter(|a| self.passes_filters(a)).count()
    }

    fn passes_filters(&self, album: &Album) -> bool {
        if self.favorites_only && !album.is_favored {
            return false;
        }
        self.selected_tags.is_empty()
            || album.tags.iter().any(|tag| self.selected_tags.contains(tag))
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub fn set_albums(&mut self, albums: Vec<Album>) {
        self.albums.replace_all(albums);
        self.revision.bump();
    }

    pub fn add(&mut self, album: Album) {
        self.albums.upsert(album);
        self.revision.bump();
    }

    /// Merge `update` into the album with `id`. Unknown ids are ignored.
    pub fn update(&mut self, id: &EntityId, update: &AlbumUpdate) -> bool {
        let Some(album) = self.albums.get_mut(id) else {
            return false;
        };
        update.apply_to(album);
        self.revision.bump();
        true
    }

    pub fn remove(&mut self, id: &EntityId) -> Option<Album> {
        let removed = self.albums.remove(id);
        if removed.is_some() {
            self.revision.bump();
        }
        removed
    }

    pub fn set_current(&mut self, album: Option<Album>) {
        self.current = album;
        self.revision.bump();
    }

    pub fn set_selected_tags(&mut self, tags: impl IntoIterator<Item = String>) {
        self.selected_tags = tags.into_iter().collect();
        self.revision.bump();
    }

    pub fn add_selected_tag(&mut self, tag: impl Into<String>) {
        if self.selected_tags.insert(tag.into()) {
            self.revision.bump();
        }
    }

    pub fn remove_selected_tag(&mut self, tag: &str) {
        if self.selected_tags.shift_remove(tag) {
            self.revision.bump();
        }
    }

    pub fn clear_selected_tags(&mut self) {
        self.selected_tags.clear();
        self.revision.bump();
    }

    pub fn set_favorites_only(&mut self, favorites_only: bool) {
        self.favorites_only = favorites_only;
        self.revision.bump();
    }

    // ── Favorite toggle ──────────────────────────────────────────────

    /// Flip `is_favored` locally and hand back the pending toggle.
    ///
    /// Returns `None` (and changes nothing) when the album is unknown.
    pub fn begin_favorite_toggle(&mut self, id: &EntityId) -> Option<FavoriteToggle> {
        let Some(album) = self.albums.get_mut(id) else {
            warn!(id = %id, "favorite toggle for unknown album ignored");
            return None;
        };
        let previous = album.is_favored;
        album.is_favored = !previous;
        self.in_flight.enter("album", id);
        self.revision.bump();
        debug!(id = %id, favored = !previous, "album favorite toggled optimistically");
        Some(FavoriteToggle::optimistic(id.clone(), previous))
    }

    /// Settle a toggle once the server has answered.
    ///
    /// On failure the flag is flipped back relative to its current value
    /// and a user-visible error is recorded.
    pub fn finish_favorite_toggle(
        &mut self,
        toggle: &mut FavoriteToggle,
        outcome: Result<(), &CoreError>,
    ) {
        self.in_flight.leave(toggle.id());
        match outcome {
            Ok(()) => toggle.confirm(),
            Err(err) => {
                if let Some(album) = self.albums.get_mut(toggle.id()) {
                    album.is_favored = !album.is_favored;
                }
                self.error = Some(format!("Failed to update album favorite: {err}"));
                toggle.roll_back();
            }
        }
        self.revision.bump();
    }
}

impl LoadState for AlbumStore {
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
