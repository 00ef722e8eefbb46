#![allow(clippy::unwrap_used)]
// Integration tests for `Session` against a wiremock file server.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use albumkit_core::{
    Album, AlbumUpdate, ClientConfig, CoreError, EntityId, ListParams, LoadState, Photo, Session,
    ToggleState, UploadFile, UploadPolicy, UploadStatus,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Session) {
    let server = MockServer::start().await;
    let base = Url::parse(&format!("{}/api/files", server.uri())).unwrap();
    let session = Session::new(ClientConfig::new(base)).unwrap();
    (server, session)
}

fn api_path(suffix: &str) -> String {
    format!("/api/files/{suffix}")
}

fn seed_album(session: &Session, id: i64, favored: bool) {
    let mut album = Album::new(id, format!("album {id}"));
    album.is_favored = favored;
    session.albums().add(album);
}

// ── Album favorites ─────────────────────────────────────────────────

#[tokio::test]
async fn test_album_toggle_confirms() {
    let (server, session) = setup().await;
    seed_album(&session, 1, false);

    Mock::given(method("POST"))
        .and(path(api_path("album/favorite/1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let state = session.toggle_album_favorite(&EntityId::from(1)).await;

    assert_eq!(state, ToggleState::Confirmed);
    let albums = session.albums();
    assert!(albums.get(&EntityId::from(1)).unwrap().is_favored);
    assert!(albums.error().is_none());
}

#[tokio::test]
async fn test_album_toggle_rolls_back_on_failure() {
    let (server, session) = setup().await;
    seed_album(&session, 1, false);

    Mock::given(method("POST"))
        .and(path(api_path("album/favorite/1")))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "db down" })))
        .mount(&server)
        .await;

    let state = session.toggle_album_favorite(&EntityId::from(1)).await;

    assert_eq!(state, ToggleState::RolledBack);
    let albums = session.albums();
    assert!(!albums.get(&EntityId::from(1)).unwrap().is_favored);
    assert!(albums.error().unwrap().contains("db down"));
}

#[tokio::test]
async fn test_album_toggle_success_then_failed_unfavorite() {
    let (server, session) = setup().await;
    seed_album(&session, 1, false);
    let id = EntityId::from(1);

    Mock::given(method("POST"))
        .and(path(api_path("album/favorite/1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api_path("album/favorite/1")))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "db down" })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(session.toggle_album_favorite(&id).await, ToggleState::Confirmed);
    assert!(session.albums().get(&id).unwrap().is_favored);
    assert!(session.albums().error().is_none());

    assert_eq!(session.toggle_album_favorite(&id).await, ToggleState::RolledBack);
    let albums = session.albums();
    assert!(albums.get(&id).unwrap().is_favored);
    assert!(albums.error().unwrap().contains("db down"));
}

#[tokio::test]
async fn test_album_unfavorite_uses_delete() {
    let (server, session) = setup().await;
    seed_album(&session, 4, true);

    Mock::given(method("DELETE"))
        .and(path(api_path("album/favorite/4")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let state = session.toggle_album_favorite(&EntityId::from(4)).await;
    assert_eq!(state, ToggleState::Confirmed);
    assert!(!session.albums().get(&EntityId::from(4)).unwrap().is_favored);
}

#[tokio::test]
async fn test_toggle_unknown_album_makes_no_request() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let state = session.toggle_album_favorite(&EntityId::from(9)).await;
    assert_eq!(state, ToggleState::Idle);
}

// ── Photo favorites ─────────────────────────────────────────────────

#[tokio::test]
async fn test_photo_toggle_failure_restores_flag() {
    let (server, session) = setup().await;
    let mut photo = Photo::new(5, "beach");
    photo.is_favored = true;
    session.photos().add(photo);

    Mock::given(method("DELETE"))
        .and(path(api_path("favorite/5")))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let state = session.toggle_photo_favorite(&EntityId::from(5)).await;

    assert_eq!(state, ToggleState::RolledBack);
    let photos = session.photos();
    assert!(photos.get(&EntityId::from(5)).unwrap().is_favored);
    assert_eq!(photos.error(), Some("Failed to update favorite status"));
}

// ── Loaders ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_load_albums_fills_store() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("albums")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": 1, "name": "Old", "updatedAt": "2024-01-01T00:00:00Z" },
                { "id": 2, "name": "New", "updatedAt": "2024-06-01T00:00:00Z" }
            ]
        })))
        .mount(&server)
        .await;

    let albums = session.load_albums().await.unwrap();
    assert_eq!(albums.len(), 2);

    let store = session.albums();
    assert!(!store.loading());
    let names: Vec<_> = store.sorted().iter().map(|a| a.name.clone()).collect();
    assert_eq!(names, vec!["New", "Old"]);
}

#[tokio::test]
async fn test_load_albums_records_error() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("albums")))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "broken" })))
        .mount(&server)
        .await;

    let err = session.load_albums().await.unwrap_err();
    assert!(matches!(err, CoreError::Server { status: 500, .. }));

    let store = session.albums();
    assert!(!store.loading());
    assert!(store.error().unwrap().contains("broken"));
}

#[tokio::test]
async fn test_load_album_photos_replaces_store() {
    let (server, session) = setup().await;
    session.photos().add(Photo::new(100, "stale"));

    Mock::given(method("GET"))
        .and(path(api_path("albums/3/photos")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "originalName": "a.jpg", "createdAt": "2024-01-01T00:00:00Z" },
            { "id": 2, "originalName": "b.jpg", "createdAt": "2024-02-01T00:00:00Z" }
        ])))
        .mount(&server)
        .await;

    session
        .load_album_photos(&EntityId::from(3), &ListParams::new())
        .await
        .unwrap();

    let photos = session.photos();
    assert_eq!(photos.photo_count(), 2);
    assert!(photos.get(&EntityId::from(100)).is_none());
    assert_eq!(photos.filtered()[0].original_name, "b.jpg");
}

#[tokio::test]
async fn test_update_album_merges_locally() {
    let (server, session) = setup().await;
    seed_album(&session, 2, false);

    Mock::given(method("PUT"))
        .and(path(api_path("albums/2")))
        .and(body_json(json!({ "name": "Renamed" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": 2, "name": "Renamed" })),
        )
        .mount(&server)
        .await;

    let update = AlbumUpdate {
        name: Some("Renamed".into()),
        ..AlbumUpdate::default()
    };
    session.update_album(&EntityId::from(2), &update).await.unwrap();
    assert_eq!(session.albums().get(&EntityId::from(2)).unwrap().name, "Renamed");
}

#[tokio::test]
async fn test_delete_photos_clears_selection() {
    let (server, session) = setup().await;
    {
        let mut photos = session.photos();
        photos.add_many(vec![Photo::new(1, "a"), Photo::new(2, "b"), Photo::new(3, "c")]);
        photos.select(EntityId::from(1));
        photos.select(EntityId::from(3));
    }

    Mock::given(method("DELETE"))
        .and(path(api_path("batch")))
        .and(body_json(json!({ "fileIds": [1, 3] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "deleted": 2 })))
        .mount(&server)
        .await;

    let removed = session
        .delete_photos(&[EntityId::from(1), EntityId::from(3)])
        .await
        .unwrap();

    assert_eq!(removed, 2);
    let photos = session.photos();
    assert_eq!(photos.photo_count(), 1);
    assert_eq!(photos.selected_count(), 0);
}

#[tokio::test]
async fn test_load_tags() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("tags/all")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "sea", "color": "blue" },
            { "id": 2, "name": "sky", "color": "blue" }
        ])))
        .mount(&server)
        .await;

    session.load_tags().await.unwrap();
    let tags = session.tags();
    assert_eq!(tags.tag_count(), 2);
    assert_eq!(tags.by_color()["blue"].len(), 2);
}

// ── Uploads ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_enqueue_rejects_unsupported_format() {
    let (_server, session) = setup().await;

    let err = session
        .enqueue_upload(UploadFile::new("notes.txt", vec![1_u8; 4]), None)
        .unwrap_err();

    assert!(matches!(err, CoreError::Validation { .. }));
    let uploads = session.uploads();
    assert_eq!(uploads.queue_length(), 0);
    assert!(uploads.error().is_some());
}

#[tokio::test]
async fn test_enqueue_respects_size_limit() {
    let server = MockServer::start().await;
    let mut config = ClientConfig::new(Url::parse(&server.uri()).unwrap());
    config.upload = UploadPolicy {
        max_file_size: 8,
        ..UploadPolicy::default()
    };
    let session = Session::new(config).unwrap();

    assert!(session
        .enqueue_upload(UploadFile::new("big.png", vec![0_u8; 9]), None)
        .is_err());
    assert!(session
        .enqueue_upload(UploadFile::new("ok.png", vec![0_u8; 8]), None)
        .is_ok());
}

#[tokio::test]
async fn test_upload_pending_updates_queue_and_photos() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("upload")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 10, "originalName": "sunset.jpg"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let a = session
        .enqueue_upload(UploadFile::new("sunset.jpg", vec![1_u8; 128 * 1024]), None)
        .unwrap();
    let b = session
        .enqueue_upload(
            UploadFile::new("sunrise.jpg", vec![2_u8; 1024]),
            Some(EntityId::from(3)),
        )
        .unwrap();

    let summary = session.upload_pending().await;

    assert_eq!(summary.completed.len(), 2);
    assert!(summary.failed.is_empty());

    let uploads = session.uploads();
    assert!(!uploads.uploading());
    for id in [a, b] {
        assert_eq!(uploads.get(id).unwrap().status, UploadStatus::Completed);
        assert_eq!(uploads.progress_of(id), Some(100));
    }
    assert_eq!(uploads.completed_count(), 2);
    assert_eq!(uploads.total_progress(), 100);
    drop(uploads);

    assert!(session.photos().get(&EntityId::from(10)).is_some());
}

#[tokio::test]
async fn test_upload_failure_marks_item() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("upload")))
        .respond_with(ResponseTemplate::new(413).set_body_json(json!({ "message": "too large" })))
        .mount(&server)
        .await;

    let id = session
        .enqueue_upload(UploadFile::new("a.png", vec![1_u8; 16]), None)
        .unwrap();
    let summary = session.upload_pending().await;

    assert_eq!(summary.failed.len(), 1);
    let uploads = session.uploads();
    let item = uploads.get(id).unwrap();
    assert_eq!(item.status, UploadStatus::Error);
    assert!(item.error.as_deref().unwrap().contains("too large"));
    assert_eq!(uploads.error(), Some("1 of 1 uploads failed"));
}

#[tokio::test]
async fn test_upload_pending_with_empty_queue() {
    let (_server, session) = setup().await;
    let summary = session.upload_pending().await;
    assert_eq!(summary.attempted(), 0);
    assert!(!session.uploads().uploading());
}

#[tokio::test]
async fn test_loading_flag_toggles_through_trait() {
    let (_server, session) = setup().await;
    let mut albums = session.albums();
    albums.set_loading(true);
    assert!(albums.loading());
    albums.set_error("x".into());
    albums.clear_error();
    assert!(albums.error().is_none());
}
