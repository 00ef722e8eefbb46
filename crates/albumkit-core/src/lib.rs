// albumkit-core: Client-side state between albumkit-api and consumers (CLI).

pub mod config;
pub mod error;
pub mod favorite;
pub mod model;
pub mod session;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, UploadPolicy};
pub use error::CoreError;
pub use favorite::{FavoriteToggle, ToggleState};
pub use session::{Session, UploadSummary};
pub use store::{AlbumStore, LoadState, PhotoStore, TagStore, UploadStore};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    // Server entities
    Album, EntityId, Photo, Tag,
    // Requests and patches
    AlbumUpdate, CreateAlbumRequest, ListParams, PhotoUpdate, TagUpdate,
    // Filters
    DateRange, PhotoFilterUpdate, PhotoFilters,
    // Uploads
    UploadFile, UploadId, UploadItem, UploadStatus,
    // Supporting types
    FileVariant,
};
