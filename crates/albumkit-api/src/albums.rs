// Album endpoints
//
// CRUD under `/albums`, album contents, and album favorites. Note the
// favorite endpoints live under the singular `/album/` prefix.

use crate::client::PhotoServerClient;
use crate::error::Error;
use crate::types::{Album, AlbumUpdate, CreateAlbumRequest, EntityId, ListParams, Photo};

impl PhotoServerClient {
    /// `GET /albums`
    pub async fn list_albums(&self) -> Result<Vec<Album>, Error> {
        self.get_list("albums", &ListParams::new()).await
    }

    /// `GET /albums/{id}`
    pub async fn get_album(&self, id: &EntityId) -> Result<Album, Error> {
        self.get(&format!("albums/{id}")).await
    }

    /// `POST /albums`
    pub async fn create_album(&self, request: &CreateAlbumRequest) -> Result<Album, Error> {
        self.post("albums", request).await
    }

    /// `PUT /albums/{id}`
    pub async fn update_album(&self, id: &EntityId, update: &AlbumUpdate) -> Result<Album, Error> {
        self.put(&format!("albums/{id}"), update).await
    }

    /// `DELETE /albums/{id}`
    pub async fn delete_album(&self, id: &EntityId) -> Result<serde_json::Value, Error> {
        self.delete(&format!("albums/{id}")).await
    }

    /// Photos contained in an album.
    ///
    /// `GET /albums/{id}/photos`
    pub async fn list_album_photos(
        &self,
        id: &EntityId,
        params: &ListParams,
    ) -> Result<Vec<Photo>, Error> {
        self.get_list(&format!("albums/{id}/photos"), params).await
    }

    /// `POST /album/favorite/{id}`
    pub async fn add_album_favorite(&self, id: &EntityId) -> Result<serde_json::Value, Error> {
        self.post_empty(&format!("album/favorite/{id}")).await
    }

    /// `DELETE /album/favorite/{id}`
    pub async fn remove_album_favorite(&self, id: &EntityId) -> Result<serde_json::Value, Error> {
        self.delete(&format!("album/favorite/{id}")).await
    }
}
