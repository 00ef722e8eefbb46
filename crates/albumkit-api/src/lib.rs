// albumkit-api: Async Rust client for the albumkit photo file server

pub mod albums;
pub mod client;
pub mod error;
pub mod files;
pub mod tags;
pub mod transport;
pub mod types;
pub mod upload;

pub use client::PhotoServerClient;
pub use error::Error;
pub use transport::TransportConfig;
pub use types::{
    Album, AlbumUpdate, CreateAlbumRequest, EntityId, FileVariant, ListParams, Listing, Photo,
    PhotoUpdate, Tag,
};
pub use upload::{ProgressFn, UploadFile};
