// ── Domain model ──
//
// Albums, photos, and tags are the server's wire types re-exported as
// is; this module adds the client-only types (filters, upload items)
// and the `Entity` identity seam the stores are generic over.

mod filter;
mod upload;

pub use albumkit_api::types::{
    Album, AlbumUpdate, CreateAlbumRequest, EntityId, FileVariant, ListParams, Photo, PhotoUpdate,
    Tag,
};
pub use albumkit_api::UploadFile;
pub use filter::{DateRange, PhotoFilterUpdate, PhotoFilters};
pub use upload::{UploadId, UploadItem, UploadStatus};

use chrono::{DateTime, Utc};

/// Anything stored in an entity collection.
pub trait Entity {
    fn id(&self) -> &EntityId;
}

impl Entity for Album {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Entity for Photo {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Entity for Tag {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Partial tag update applied by the tag store. Tags have no update
/// endpoint, so this never goes over the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}
