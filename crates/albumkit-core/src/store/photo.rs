// ── Photo collection store ──

use indexmap::IndexSet;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::{EntityCollection, LoadState, Patch, Revision, newest_first};
use crate::error::CoreError;
use crate::favorite::{FavoriteToggle, InFlight};
use crate::model::{EntityId, Photo, PhotoFilterUpdate, PhotoFilters, PhotoUpdate};

const FAVORITE_FAILED: &str = "Failed to update favorite status";

/// Photos, the multi-select set, and the active filters.
#[derive(Debug, Default)]
pub struct PhotoStore {
    photos: EntityCollection<Photo>,
    current: Option<Photo>,
    selected: IndexSet<EntityId>,
    loading: bool,
    error: Option<String>,
    filters: PhotoFilters,
    in_flight: InFlight,
    revision: Revision,
}

impl PhotoStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Raw state ────────────────────────────────────────────────────

    pub fn photos(&self) -> impl Iterator<Item = &Photo> {
        self.photos.iter()
    }

    pub fn get(&self, id: &EntityId) -> Option<&Photo> {
        self.photos.get(id)
    }

    pub fn current(&self) -> Option<&Photo> {
        self.current.as_ref()
    }

    /// Selected ids in the order they were selected.
    pub fn selected(&self) -> &IndexSet<EntityId> {
        &self.selected
    }

    pub fn is_selected(&self, id: &EntityId) -> bool {
        self.selected.contains(id)
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn filters(&self) -> &PhotoFilters {
        &self.filters
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    // ── Derived views ────────────────────────────────────────────────

    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Photos passing every active filter, newest first.
    pub fn filtered(&self) -> Vec<&Photo> {
        newest_first(
            self.photos.iter().filter(|p| self.filters.matches(p)),
            |p| p.created_at,
        )
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub fn set_photos(&mut self, photos: Vec<Photo>) {
        self.photos.replace_all(photos);
        self.revision.bump();
    }

    pub fn add(&mut self, photo: Photo) {
        self.photos.upsert(photo);
        self.revision.bump();
    }

    pub fn add_many(&mut self, photos: impl IntoIterator<Item = Photo>) {
        for photo in photos {
            self.photos.upsert(photo);
        }
        self.revision.bump();
    }

    pub fn update(&mut self, id: &EntityId, update: &PhotoUpdate) -> bool {
        let Some(photo) = self.photos.get_mut(id) else {
            return false;
        };
        update.apply_to(photo);
        self.revision.bump();
        true
    }

    pub fn remove(&mut self, id: &EntityId) -> Option<Photo> {
        let removed = self.photos.remove(id);
        if removed.is_some() {
            self.revision.bump();
        }
        removed
    }

    pub fn remove_many(&mut self, ids: &[EntityId]) -> usize {
        let removed = self.photos.remove_many(ids);
        if removed > 0 {
            self.revision.bump();
        }
        removed
    }

    pub fn set_current(&mut self, photo: Option<Photo>) {
        self.current = photo;
        self.revision.bump();
    }

    // ── Selection ────────────────────────────────────────────────────

    /// Selecting an already-selected id changes nothing.
    pub fn select(&mut self, id: EntityId) {
        if self.selected.insert(id) {
            self.revision.bump();
        }
    }

    pub fn deselect(&mut self, id: &EntityId) {
        if self.selected.shift_remove(id) {
            self.revision.bump();
        }
    }

    /// Replace the selection with exactly the ids of the filtered view.
    pub fn select_all(&mut self) {
        self.selected = self.filtered().into_iter().map(|p| p.id.clone()).collect();
        self.revision.bump();
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
        self.revision.bump();
    }

    // ── Filters ──────────────────────────────────────────────────────

    pub fn set_filters(&mut self, update: PhotoFilterUpdate) {
        self.filters.apply(update);
        self.revision.bump();
    }

    pub fn clear_filters(&mut self) {
        self.filters = PhotoFilters::default();
        self.revision.bump();
    }

    // ── Favorite toggle ──────────────────────────────────────────────

    pub fn begin_favorite_toggle(&mut self, id: &EntityId) -> Option<FavoriteToggle> {
        let Some(photo) = self.photos.get_mut(id) else {
            warn!(id = %id, "favorite toggle for unknown photo ignored");
            return None;
        };
        let previous = photo.is_favored;
        photo.is_favored = !previous;
        self.in_flight.enter("photo", id);
        self.revision.bump();
        debug!(id = %id, favored = !previous, "photo favorite toggled optimistically");
        Some(FavoriteToggle::optimistic(id.clone(), previous))
    }

    /// On failure the flag is restored to the value it had before the
    /// toggle began, whatever happened in between.
    pub fn finish_favorite_toggle(
        &mut self,
        toggle: &mut FavoriteToggle,
        outcome: Result<(), &CoreError>,
    ) {
        self.in_flight.leave(toggle.id());
        match outcome {
            Ok(()) => toggle.confirm(),
            Err(err) => {
                debug!(id = %toggle.id(), error = %err, "rolling back photo favorite");
                if let Some(photo) = self.photos.get_mut(toggle.id()) {
                    photo.is_favored = toggle.previous();
                }
                self.error = Some(FAVORITE_FAILED.to_owned());
                toggle.roll_back();
            }
        }
        self.revision.bump();
    }
}

impl LoadState for PhotoStore {
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::favorite::ToggleState;
    use crate::model::DateRange;

    fn photo(id: &str, day: Option<u32>, tags: &[&str]) -> Photo {
        let mut p = Photo::new(id, id);
        p.created_at = day.map(|d| Utc.with_ymd_and_hms(2024, 5, d, 8, 0, 0).unwrap());
        p.tags = tags.iter().map(ToString::to_string).collect();
        p
    }

    fn names(photos: &[&Photo]) -> Vec<String> {
        photos.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn filtered_sorts_newest_first() {
        let mut store = PhotoStore::new();
        // D2 > D3 > D1
        store.set_photos(vec![
            photo("d1", Some(1), &[]),
            photo("d2", Some(20), &[]),
            photo("d3", Some(10), &[]),
        ]);
        assert_eq!(names(&store.filtered()), vec!["d2", "d3", "d1"]);
    }

    #[test]
    fn date_filter_excludes_undated_photos() {
        let mut store = PhotoStore::new();
        store.set_photos(vec![photo("a", Some(5), &[]), photo("b", None, &[])]);
        assert_eq!(store.filtered().len(), 2);

        store.set_filters(PhotoFilterUpdate {
            date_range: Some(Some(DateRange::new(
                Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()),
                None,
            ))),
            ..PhotoFilterUpdate::default()
        });
        assert_eq!(names(&store.filtered()), vec!["a"]);

        store.clear_filters();
        assert!(store.filters().is_empty());
        assert_eq!(store.filtered().len(), 2);
    }

    #[test]
    fn select_is_idempotent() {
        let mut store = PhotoStore::new();
        store.select(EntityId::from(1));
        store.select(EntityId::from(2));
        let before = store.selected().clone();

        store.select(EntityId::from(1));
        assert_eq!(store.selected(), &before);
        assert_eq!(store.selected_count(), 2);

        store.deselect(&EntityId::from(1));
        store.deselect(&EntityId::from(1));
        assert_eq!(store.selected_count(), 1);
    }

    #[test]
    fn select_all_tracks_filtered_view() {
        let mut store = PhotoStore::new();
        store.set_photos(vec![
            photo("a", Some(1), &["sea"]),
            photo("b", Some(2), &["snow"]),
            photo("c", Some(3), &["sea"]),
        ]);
        store.select(EntityId::from("b"));
        store.set_filters(PhotoFilterUpdate {
            tags: Some(vec!["sea".into()]),
            ..PhotoFilterUpdate::default()
        });
        store.select_all();

        let selected: Vec<_> = store.selected().iter().map(ToString::to_string).collect();
        assert_eq!(selected, vec!["c", "a"]);

        store.deselect_all();
        assert_eq!(store.selected_count(), 0);
    }

    #[test]
    fn add_many_and_remove_many() {
        let mut store = PhotoStore::new();
        store.add_many(vec![photo("a", None, &[]), photo("b", None, &[]), photo("c", None, &[])]);
        assert_eq!(store.photo_count(), 3);
        assert_eq!(store.remove_many(&[EntityId::from("a"), EntityId::from("c")]), 2);
        assert_eq!(store.photo_count(), 1);
    }

    #[test]
    fn update_merges_fields() {
        let mut store = PhotoStore::new();
        store.add(photo("a", None, &["old"]));
        assert!(store.update(
            &EntityId::from("a"),
            &PhotoUpdate {
                tags: Some(vec!["new".into()]),
                ..PhotoUpdate::default()
            }
        ));
        let updated = store.get(&EntityId::from("a")).unwrap();
        assert_eq!(updated.tags, vec!["new".to_string()]);
        assert_eq!(updated.name, "a");
    }

    #[test]
    fn toggle_failure_restores_original_value() {
        let mut store = PhotoStore::new();
        store.add(photo("a", None, &[]));
        let id = EntityId::from("a");

        let mut toggle = store.begin_favorite_toggle(&id).unwrap();
        assert!(store.get(&id).unwrap().is_favored);

        let err = CoreError::Timeout;
        store.finish_favorite_toggle(&mut toggle, Err(&err));
        assert_eq!(toggle.state(), ToggleState::RolledBack);
        assert!(!store.get(&id).unwrap().is_favored);
        assert_eq!(store.error(), Some(FAVORITE_FAILED));
    }

    #[test]
    fn toggle_unknown_photo_returns_none() {
        let mut store = PhotoStore::new();
        assert!(store.begin_favorite_toggle(&EntityId::from(3)).is_none());
    }
}
