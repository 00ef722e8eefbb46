// ── Shallow merges ──
//
// Update-by-id in every store overwrites only the fields a patch
// carries. Unknown fields travel in `extra` and are merged key by key.

use crate::model::{Album, AlbumUpdate, Photo, PhotoUpdate, Tag, TagUpdate};

/// A partial update that can be merged into an entity.
pub trait Patch<T> {
    fn apply_to(&self, target: &mut T);
}

impl Patch<Album> for AlbumUpdate {
    fn apply_to(&self, album: &mut Album) {
        if let Some(name) = &self.name {
            album.name.clone_from(name);
        }
        if let Some(tags) = &self.tags {
            album.tags.clone_from(tags);
        }
        if let Some(is_favored) = self.is_favored {
            album.is_favored = is_favored;
        }
        if self.updated_at.is_some() {
            album.updated_at = self.updated_at;
        }
        album
            .extra
            .extend(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

impl Patch<Photo> for PhotoUpdate {
    fn apply_to(&self, photo: &mut Photo) {
        if let Some(name) = &self.name {
            photo.name.clone_from(name);
        }
        if let Some(tags) = &self.tags {
            photo.tags.clone_from(tags);
        }
        if let Some(is_favored) = self.is_favored {
            photo.is_favored = is_favored;
        }
        if self.album_id.is_some() {
            photo.album_id.clone_from(&self.album_id);
        }
        photo
            .extra
            .extend(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

impl Patch<Tag> for TagUpdate {
    fn apply_to(&self, tag: &mut Tag) {
        if let Some(name) = &self.name {
            tag.name.clone_from(name);
        }
        if let Some(color) = &self.color {
            tag.color.clone_from(color);
        }
        if self.updated_at.is_some() {
            tag.updated_at = self.updated_at;
        }
    }
}
