// File (photo) endpoints
//
// Listing, lookup, uploads, deletion, metadata updates, rendition URLs,
// and photo favorites. Paths are relative to the configured base URL.

use reqwest::multipart::Form;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::client::PhotoServerClient;
use crate::error::Error;
use crate::types::{Body, EntityId, FileVariant, ListParams, Listing, Photo, PhotoUpdate};
use crate::upload::{ProgressFn, ProgressTracker, UploadFile, tracked_part};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchDeleteBody<'a> {
    file_ids: &'a [EntityId],
}

impl PhotoServerClient {
    /// List files.
    ///
    /// `GET /list`
    pub async fn list_files(&self, params: &ListParams) -> Result<Vec<Photo>, Error> {
        self.get_list("list", params).await
    }

    /// Fetch a single file's metadata.
    ///
    /// `GET /query/{id}`
    pub async fn get_file(&self, id: &EntityId) -> Result<Photo, Error> {
        self.get(&format!("query/{id}")).await
    }

    /// Upload one file, optionally into an album.
    ///
    /// `POST /upload` (multipart field `file`, optional `albumId`)
    pub async fn upload_file(
        &self,
        file: &UploadFile,
        album_id: Option<&EntityId>,
        progress: Option<ProgressFn>,
    ) -> Result<Photo, Error> {
        debug!(file = %file.file_name, size = file.size(), "uploading file");
        let tracker = ProgressTracker::new(file.size(), progress);

        let mut form = Form::new().part("file", tracked_part(file, &tracker)?);
        if let Some(album_id) = album_id {
            form = form.text("albumId", album_id.to_string());
        }

        let body: Body<Photo> = self.post_multipart("upload", form).await?;
        tracker.finish();
        Ok(body.into_inner())
    }

    /// Upload several files in one request.
    ///
    /// `POST /upload/batch` (repeated multipart field `files`, optional `albumId`)
    pub async fn upload_files(
        &self,
        files: &[UploadFile],
        album_id: Option<&EntityId>,
        progress: Option<ProgressFn>,
    ) -> Result<Vec<Photo>, Error> {
        let total = files.iter().map(UploadFile::size).sum();
        debug!(count = files.len(), total, "uploading batch");
        let tracker = ProgressTracker::new(total, progress);

        let mut form = Form::new();
        for file in files {
            form = form.part("files", tracked_part(file, &tracker)?);
        }
        if let Some(album_id) = album_id {
            form = form.text("albumId", album_id.to_string());
        }

        let listing: Listing = self.post_multipart("upload/batch", form).await?;
        tracker.finish();
        Ok(listing.into_items("upload/batch"))
    }

    /// Delete one file.
    ///
    /// `DELETE /delete/{id}`
    pub async fn delete_file(&self, id: &EntityId) -> Result<serde_json::Value, Error> {
        self.delete(&format!("delete/{id}")).await
    }

    /// Delete several files.
    ///
    /// `DELETE /batch` with body `{ "fileIds": [...] }`
    pub async fn delete_files(&self, ids: &[EntityId]) -> Result<serde_json::Value, Error> {
        self.delete_with_body("batch", &BatchDeleteBody { file_ids: ids })
            .await
    }

    /// Update a file's metadata.
    ///
    /// `PUT /update/{id}`
    pub async fn update_file(&self, id: &EntityId, update: &PhotoUpdate) -> Result<Photo, Error> {
        self.put(&format!("update/{id}"), update).await
    }

    /// URL of a file rendition, for embedding or direct download.
    ///
    /// `GET /getFile/{id}` or `GET /getFile/{id}?type=thumbnail`
    pub fn file_url(&self, id: &EntityId, variant: FileVariant) -> Result<Url, Error> {
        let mut url = self.url(&format!("getFile/{id}"))?;
        if variant == FileVariant::Thumbnail {
            url.query_pairs_mut().append_pair("type", "thumbnail");
        }
        Ok(url)
    }

    pub fn thumbnail_url(&self, id: &EntityId) -> Result<Url, Error> {
        self.file_url(id, FileVariant::Thumbnail)
    }

    pub fn original_url(&self, id: &EntityId) -> Result<Url, Error> {
        self.file_url(id, FileVariant::Original)
    }

    /// Download a file rendition.
    pub async fn download_file(
        &self,
        id: &EntityId,
        variant: FileVariant,
    ) -> Result<bytes::Bytes, Error> {
        let url = self.file_url(id, variant)?;
        self.get_bytes(url).await
    }

    /// Mark a photo as favorite.
    ///
    /// `POST /favorite/{id}`
    pub async fn favorite_photo(&self, id: &EntityId) -> Result<serde_json::Value, Error> {
        self.post_empty(&format!("favorite/{id}")).await
    }

    /// Remove a photo from favorites.
    ///
    /// `DELETE /favorite/{id}`
    pub async fn unfavorite_photo(&self, id: &EntityId) -> Result<serde_json::Value, Error> {
        self.delete(&format!("favorite/{id}")).await
    }
}
