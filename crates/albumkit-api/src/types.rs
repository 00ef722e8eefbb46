//! Wire types for the albumkit file server.
//!
//! Field names use camelCase via `#[serde(rename_all = "camelCase")]`.
//! Fields the server sends that are not modeled here are kept in a
//! flattened `extra` map so that updates never drop them.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

// ── EntityId ────────────────────────────────────────────────────────

/// Server-assigned identifier for albums, photos, and tags.
///
/// The server hands out either numeric or string ids; both are kept in
/// their original JSON shape so request bodies echo them back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        match s.parse::<i64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

// ── Timestamps ──────────────────────────────────────────────────────

/// Lenient timestamp parsing: RFC 3339, `YYYY-MM-DD HH:MM:SS`, or epoch
/// milliseconds. Anything else becomes `None` instead of failing the
/// whole entity.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(raw.as_ref().and_then(parse))
    }

    pub(crate) fn parse(value: &Value) -> Option<DateTime<Utc>> {
        match value {
            Value::String(s) => parse_str(s),
            Value::Number(n) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
            _ => None,
        }
    }

    fn parse_str(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|naive| naive.and_utc())
    }
}

/// Treat an explicit `null` like a missing field.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Albums ──────────────────────────────────────────────────────────

/// Album, from `GET /albums` and `GET /albums/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: EntityId,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub is_favored: bool,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Catch-all for additional fields not modeled above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Album {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tags: Vec::new(),
            is_favored: false,
            updated_at: None,
            extra: HashMap::new(),
        }
    }
}

/// Request body for `POST /albums`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlbumRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Partial album update.
///
/// Doubles as the `PUT /albums/{id}` body and as the shallow-merge patch
/// the album store applies locally: only `Some` fields are touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favored: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

// ── Photos ──────────────────────────────────────────────────────────

/// Photo (a stored file), from `GET /list`, `GET /query/{id}`, uploads,
/// and `GET /albums/{id}/photos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: EntityId,
    #[serde(default, deserialize_with = "null_default")]
    pub original_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub is_favored: bool,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_id: Option<EntityId>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Photo {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            original_name: name.clone(),
            name,
            tags: Vec::new(),
            is_favored: false,
            created_at: None,
            album_id: None,
            extra: HashMap::new(),
        }
    }
}

/// Partial photo update: `PUT /update/{id}` body and local patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favored: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_id: Option<EntityId>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Which rendition `GET /getFile/{id}` should serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileVariant {
    #[default]
    Original,
    Thumbnail,
}

// ── Tags ────────────────────────────────────────────────────────────

/// Tag, from `GET /tags/all`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: EntityId,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub color: String,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Tag {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            updated_at: None,
        }
    }
}

// ── Query parameters ────────────────────────────────────────────────

/// Free-form query parameters for list endpoints, sent in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams(Vec<(String, String)>);

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.0.push((key.into(), value.to_string()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

// ── Response bodies ─────────────────────────────────────────────────

/// A single-entity response, either bare or wrapped as `{ "data": ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Body<T> {
    Bare(T),
    Wrapped { data: T },
}

impl<T> Body<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Self::Bare(v) | Self::Wrapped { data: v } => v,
        }
    }
}

/// A list response.
///
/// Accepts a bare array or a `{ "data": [...] }` envelope. Anything else
/// is captured as `Unexpected` and degrades to an empty list, so callers
/// always receive a well-typed `Vec`. Elements are decoded one at a time:
/// a malformed entry is skipped without losing the rest of the list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Listing {
    Items(Vec<Value>),
    Wrapped { data: Vec<Value> },
    Unexpected(Value),
}

impl Listing {
    /// Decode into items, logging a warning for each element that does not
    /// fit `T` and for a body that was not list-shaped.
    pub fn into_items<T: DeserializeOwned>(self, context: &str) -> Vec<T> {
        let raw = match self {
            Self::Items(items) | Self::Wrapped { data: items } => items,
            Self::Unexpected(value) => {
                warn!(context, body = %value, "expected a list response, using an empty list");
                return Vec::new();
            }
        };
        raw.into_iter()
            .filter_map(|value| match serde_json::from_value(value.clone()) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(context, body = %value, error = %e, "skipping malformed list entry");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn entity_id_keeps_json_shape() {
        let num: EntityId = serde_json::from_value(json!(7)).unwrap();
        let text: EntityId = serde_json::from_value(json!("abc")).unwrap();
        assert_eq!(num, EntityId::Number(7));
        assert_eq!(text, EntityId::Text("abc".into()));
        assert_eq!(serde_json::to_value(&num).unwrap(), json!(7));
        assert_eq!(EntityId::from("42"), EntityId::Number(42));
        assert_eq!(EntityId::from("f-1").to_string(), "f-1");
    }

    #[test]
    fn album_parses_with_unknown_fields() {
        let album: Album = serde_json::from_value(json!({
            "id": 1,
            "name": "Holiday",
            "tags": ["sea"],
            "isFavored": true,
            "updatedAt": "2024-05-01T10:00:00Z",
            "coverId": 99
        }))
        .unwrap();

        assert_eq!(album.id, EntityId::Number(1));
        assert!(album.is_favored);
        assert_eq!(
            album.updated_at,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(album.extra.get("coverId"), Some(&json!(99)));
    }

    #[test]
    fn lenient_timestamps() {
        let photo: Photo = serde_json::from_value(json!({
            "id": "p1",
            "createdAt": "2024-01-02 03:04:05"
        }))
        .unwrap();
        assert_eq!(
            photo.created_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
        );

        let photo: Photo =
            serde_json::from_value(json!({ "id": "p2", "createdAt": "yesterday" })).unwrap();
        assert_eq!(photo.created_at, None);

        let photo: Photo =
            serde_json::from_value(json!({ "id": "p3", "createdAt": 1_700_000_000_000_i64 }))
                .unwrap();
        assert!(photo.created_at.is_some());
    }

    #[test]
    fn update_serializes_only_present_fields() {
        let update = AlbumUpdate {
            name: Some("Renamed".into()),
            ..AlbumUpdate::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "name": "Renamed" }));
    }

    #[test]
    fn body_accepts_bare_and_wrapped() {
        let bare: Body<Tag> =
            serde_json::from_value(json!({ "id": 1, "name": "x", "color": "red" })).unwrap();
        let wrapped: Body<Tag> = serde_json::from_value(
            json!({ "code": 0, "data": { "id": 2, "name": "y", "color": "blue" } }),
        )
        .unwrap();
        assert_eq!(bare.into_inner().name, "x");
        assert_eq!(wrapped.into_inner().name, "y");
    }

    #[test]
    fn listing_degrades_to_empty() {
        let listing: Listing =
            serde_json::from_value(json!({ "message": "not a list" })).unwrap();
        assert!(listing.into_items::<Tag>("tags").is_empty());

        let listing: Listing =
            serde_json::from_value(json!({ "data": [{ "id": 1, "name": "x" }] })).unwrap();
        assert_eq!(listing.into_items::<Tag>("tags").len(), 1);
    }

    #[test]
    fn listing_skips_only_malformed_entries() {
        let listing: Listing = serde_json::from_value(json!([
            { "id": 1, "name": "Holiday" },
            { "id": 2 },
            { "id": 3, "name": "Work", "tags": null }
        ]))
        .unwrap();
        let albums = listing.into_items::<Album>("albums");
        let ids: Vec<_> = albums.iter().map(|a| a.id.clone()).collect();
        assert_eq!(ids, vec![EntityId::Number(1), EntityId::Number(3)]);
        assert!(albums[1].tags.is_empty());
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let tag: Tag =
            serde_json::from_value(json!({ "id": 2, "name": "sky", "color": null })).unwrap();
        assert_eq!(tag.color, "");

        let album: Album =
            serde_json::from_value(json!({ "id": 1, "name": null, "isFavored": null })).unwrap();
        assert_eq!(album.name, "");
        assert!(!album.is_favored);

        let photo: Photo = serde_json::from_value(
            json!({ "id": 5, "originalName": null, "name": null, "tags": null }),
        )
        .unwrap();
        assert!(photo.name.is_empty() && photo.original_name.is_empty());
    }
}
