// ── Session facade ──
//
// Owns the gateway client and the four stores. Every server round trip
// follows the same shape: mutate the store, release the lock, await the
// request, lock again and apply the outcome. Store guards are never held
// across an `.await`.

use std::future::Future;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use albumkit_api::transport::TransportConfig;
use albumkit_api::{PhotoServerClient, ProgressFn};

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::favorite::ToggleState;
use crate::model::{
    Album, AlbumUpdate, CreateAlbumRequest, EntityId, ListParams, Photo, PhotoUpdate, Tag,
    UploadFile, UploadId, UploadStatus,
};
use crate::store::{AlbumStore, LoadState, PhotoStore, TagStore, UploadStore};

/// Result of one [`Session::upload_pending`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub completed: Vec<UploadId>,
    pub failed: Vec<(UploadId, String)>,
}

impl UploadSummary {
    pub fn attempted(&self) -> usize {
        self.completed.len() + self.failed.len()
    }
}

/// Client session against one file server.
///
/// Cheaply cloneable; clones share the same client and stores. The store
/// accessors return lock guards: read what you need and drop them before
/// awaiting anything.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: PhotoServerClient,
    config: ClientConfig,
    albums: Mutex<AlbumStore>,
    photos: Mutex<PhotoStore>,
    tags: Mutex<TagStore>,
    uploads: Mutex<UploadStore>,
}

fn lock<S>(store: &Mutex<S>) -> MutexGuard<'_, S> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Session {
    /// Build a session and its HTTP client from configuration. Does not
    /// contact the server.
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = PhotoServerClient::new(config.base_url.as_str(), &transport)?;
        Ok(Self::with_client(config, client))
    }

    /// Use an already-built gateway client.
    pub fn with_client(config: ClientConfig, client: PhotoServerClient) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                client,
                config,
                albums: Mutex::new(AlbumStore::new()),
                photos: Mutex::new(PhotoStore::new()),
                tags: Mutex::new(TagStore::new()),
                uploads: Mutex::new(UploadStore::new()),
            }),
        }
    }

    pub fn client(&self) -> &PhotoServerClient {
        &self.inner.client
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    // ── Store access ─────────────────────────────────────────────────

    pub fn albums(&self) -> MutexGuard<'_, AlbumStore> {
        lock(&self.inner.albums)
    }

    pub fn photos(&self) -> MutexGuard<'_, PhotoStore> {
        lock(&self.inner.photos)
    }

    pub fn tags(&self) -> MutexGuard<'_, TagStore> {
        lock(&self.inner.tags)
    }

    pub fn uploads(&self) -> MutexGuard<'_, UploadStore> {
        lock(&self.inner.uploads)
    }

    // ── Albums ───────────────────────────────────────────────────────

    pub async fn load_albums(&self) -> Result<Vec<Album>, CoreError> {
        let albums = tracked(&self.inner.albums, self.inner.client.list_albums()).await?;
        debug!(count = albums.len(), "albums loaded");
        self.albums().set_albums(albums.clone());
        Ok(albums)
    }

    /// Fetch one album and make it the current one.
    pub async fn load_album(&self, id: &EntityId) -> Result<Album, CoreError> {
        let album = tracked(&self.inner.albums, self.inner.client.get_album(id)).await?;
        let mut store = self.albums();
        store.add(album.clone());
        store.set_current(Some(album.clone()));
        Ok(album)
    }

    pub async fn create_album(&self, request: &CreateAlbumRequest) -> Result<Album, CoreError> {
        let album = tracked(&self.inner.albums, self.inner.client.create_album(request)).await?;
        info!(id = %album.id, name = %album.name, "album created");
        self.albums().add(album.clone());
        Ok(album)
    }

    /// Send `update` to the server, then merge the same fields locally.
    pub async fn update_album(
        &self,
        id: &EntityId,
        update: &AlbumUpdate,
    ) -> Result<Album, CoreError> {
        let album = tracked(&self.inner.albums, self.inner.client.update_album(id, update)).await?;
        self.albums().update(id, update);
        Ok(album)
    }

    pub async fn delete_album(&self, id: &EntityId) -> Result<(), CoreError> {
        tracked(&self.inner.albums, self.inner.client.delete_album(id)).await?;
        info!(id = %id, "album deleted");
        self.albums().remove(id);
        Ok(())
    }

    // ── Photos ───────────────────────────────────────────────────────

    pub async fn load_photos(&self, params: &ListParams) -> Result<Vec<Photo>, CoreError> {
        let photos = tracked(&self.inner.photos, self.inner.client.list_files(params)).await?;
        debug!(count = photos.len(), "photos loaded");
        self.photos().set_photos(photos.clone());
        Ok(photos)
    }

    /// Replace the photo store with the contents of one album.
    pub async fn load_album_photos(
        &self,
        album_id: &EntityId,
        params: &ListParams,
    ) -> Result<Vec<Photo>, CoreError> {
        let photos = tracked(
            &self.inner.photos,
            self.inner.client.list_album_photos(album_id, params),
        )
        .await?;
        debug!(album = %album_id, count = photos.len(), "album photos loaded");
        self.photos().set_photos(photos.clone());
        Ok(photos)
    }

    pub async fn load_photo(&self, id: &EntityId) -> Result<Photo, CoreError> {
        let photo = tracked(&self.inner.photos, self.inner.client.get_file(id)).await?;
        let mut store = self.photos();
        store.add(photo.clone());
        store.set_current(Some(photo.clone()));
        Ok(photo)
    }

    pub async fn update_photo(
        &self,
        id: &EntityId,
        update: &PhotoUpdate,
    ) -> Result<Photo, CoreError> {
        let photo = tracked(&self.inner.photos, self.inner.client.update_file(id, update)).await?;
        self.photos().update(id, update);
        Ok(photo)
    }

    pub async fn delete_photo(&self, id: &EntityId) -> Result<(), CoreError> {
        tracked(&self.inner.photos, self.inner.client.delete_file(id)).await?;
        let mut store = self.photos();
        store.remove(id);
        store.deselect(id);
        Ok(())
    }

    /// Batch delete. Returns how many photos left the local store.
    pub async fn delete_photos(&self, ids: &[EntityId]) -> Result<usize, CoreError> {
        if ids.is_empty() {
            return Ok(0);
        }
        tracked(&self.inner.photos, self.inner.client.delete_files(ids)).await?;
        let mut store = self.photos();
        for id in ids {
            store.deselect(id);
        }
        let removed = store.remove_many(ids);
        info!(requested = ids.len(), removed, "photos deleted");
        Ok(removed)
    }

    // ── Tags ─────────────────────────────────────────────────────────

    pub async fn load_tags(&self) -> Result<Vec<Tag>, CoreError> {
        let tags = tracked(&self.inner.tags, self.inner.client.list_tags()).await?;
        debug!(count = tags.len(), "tags loaded");
        self.tags().set_tags(tags.clone());
        Ok(tags)
    }

    // ── Favorites ────────────────────────────────────────────────────

    /// Flip an album's favorite flag, optimistically. Failures roll the
    /// flag back and land in the album store's error field.
    pub async fn toggle_album_favorite(&self, id: &EntityId) -> ToggleState {
        let Some(mut toggle) = self.albums().begin_favorite_toggle(id) else {
            return ToggleState::Idle;
        };

        let result = if toggle.target() {
            self.inner.client.add_album_favorite(id).await
        } else {
            self.inner.client.remove_album_favorite(id).await
        };

        let outcome = result.map(drop).map_err(CoreError::from);
        if let Err(err) = &outcome {
            warn!(id = %id, error = %err, "album favorite rolled back");
        }
        self.albums()
            .finish_favorite_toggle(&mut toggle, outcome.as_ref().map(|_| ()));
        toggle.state()
    }

    /// Same as [`toggle_album_favorite`](Self::toggle_album_favorite) for
    /// a photo.
    pub async fn toggle_photo_favorite(&self, id: &EntityId) -> ToggleState {
        let Some(mut toggle) = self.photos().begin_favorite_toggle(id) else {
            return ToggleState::Idle;
        };

        let result = if toggle.target() {
            self.inner.client.favorite_photo(id).await
        } else {
            self.inner.client.unfavorite_photo(id).await
        };

        let outcome = result.map(drop).map_err(CoreError::from);
        if let Err(err) = &outcome {
            warn!(id = %id, error = %err, "photo favorite rolled back");
        }
        self.photos()
            .finish_favorite_toggle(&mut toggle, outcome.as_ref().map(|_| ()));
        toggle.state()
    }

    // ── Uploads ──────────────────────────────────────────────────────

    /// Check `file` against the upload policy and queue it.
    pub fn enqueue_upload(
        &self,
        file: UploadFile,
        album_id: Option<EntityId>,
    ) -> Result<UploadId, CoreError> {
        if let Err(err) = self.inner.config.upload.check(&file) {
            self.uploads().set_error(err.to_string());
            return Err(err);
        }
        debug!(file = %file.file_name, size = file.size(), "upload queued");
        Ok(self.uploads().enqueue(file, album_id))
    }

    /// Read a file from disk and queue it.
    pub async fn enqueue_upload_path(
        &self,
        path: impl AsRef<Path>,
        album_id: Option<EntityId>,
    ) -> Result<UploadId, CoreError> {
        let file = UploadFile::from_path(path).await?;
        self.enqueue_upload(file, album_id)
    }

    /// Send every pending item at once.
    ///
    /// Progress callbacks feed the upload store; successful uploads are
    /// added to the photo store. Failures are recorded on the item and
    /// counted in the summary, never returned as an error.
    pub async fn upload_pending(&self) -> UploadSummary {
        let batch: Vec<(UploadId, UploadFile, Option<EntityId>)> = {
            let mut store = self.uploads();
            let batch: Vec<_> = store
                .pending()
                .into_iter()
                .map(|item| (item.id, item.file.clone(), item.album_id.clone()))
                .collect();
            for (id, _, _) in &batch {
                store.update_status(*id, UploadStatus::Uploading, None);
            }
            if !batch.is_empty() {
                store.set_uploading(true);
                store.clear_error();
            }
            batch
        };

        if batch.is_empty() {
            debug!("no pending uploads");
            return UploadSummary::default();
        }
        info!(count = batch.len(), "starting uploads");

        let transfers = batch.into_iter().map(|(id, file, album_id)| {
            let inner = Arc::clone(&self.inner);
            async move {
                let progress_inner = Arc::clone(&inner);
                let on_progress: ProgressFn = Arc::new(move |percent| {
                    lock(&progress_inner.uploads).update_progress(id, percent);
                });

                let result = inner
                    .client
                    .upload_file(&file, album_id.as_ref(), Some(on_progress))
                    .await;

                match result {
                    Ok(photo) => {
                        debug!(upload = %id, photo = %photo.id, "upload completed");
                        lock(&inner.photos).add(photo);
                        lock(&inner.uploads).update_status(id, UploadStatus::Completed, None);
                        Ok(id)
                    }
                    Err(err) => {
                        let message = CoreError::from(err).to_string();
                        warn!(upload = %id, file = %file.file_name, error = %message, "upload failed");
                        lock(&inner.uploads).update_status(
                            id,
                            UploadStatus::Error,
                            Some(message.clone()),
                        );
                        Err((id, message))
                    }
                }
            }
        });

        let mut summary = UploadSummary::default();
        for outcome in join_all(transfers).await {
            match outcome {
                Ok(id) => summary.completed.push(id),
                Err(failure) => summary.failed.push(failure),
            }
        }

        let mut store = self.uploads();
        store.set_uploading(false);
        if !summary.failed.is_empty() {
            store.set_error(format!(
                "{} of {} uploads failed",
                summary.failed.len(),
                summary.attempted()
            ));
        }
        summary
    }
}

/// Run one request with the store's loading flag raised, recording any
/// failure in its error field before handing it back.
async fn tracked<S, T, F>(store: &Mutex<S>, request: F) -> Result<T, CoreError>
where
    S: LoadState,
    F: Future<Output = Result<T, albumkit_api::Error>>,
{
    {
        let mut guard = lock(store);
        guard.set_loading(true);
        guard.clear_error();
    }

    let result = request.await.map_err(CoreError::from);

    let mut guard = lock(store);
    guard.set_loading(false);
    if let Err(err) = &result {
        guard.set_error(err.to_string());
    }
    result
}
