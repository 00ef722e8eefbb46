use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use albumkit_api::types::EntityId;
use albumkit_api::UploadFile;

/// Client-generated upload identifier.
///
/// UUID v7: a millisecond timestamp prefix followed by random bits, so ids
/// sort roughly by creation time without any coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UploadId(Uuid);

impl UploadId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UploadId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Upload status label. Any status may follow any other.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UploadStatus {
    #[default]
    Pending,
    Uploading,
    Completed,
    Error,
}

/// One queued upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadItem {
    pub id: UploadId,
    pub file: UploadFile,
    pub album_id: Option<EntityId>,
    pub status: UploadStatus,
    pub error: Option<String>,
}

impl UploadItem {
    pub fn new(file: UploadFile, album_id: Option<EntityId>) -> Self {
        Self {
            id: UploadId::new(),
            file,
            album_id,
            status: UploadStatus::Pending,
            error: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn ids_are_unique_v7() {
        let a = UploadId::new();
        let b = UploadId::new();
        assert_ne!(a, b);
        assert_eq!(a.as_uuid().get_version_num(), 7);
    }

    #[test]
    fn status_labels() {
        assert_eq!(UploadStatus::Completed.to_string(), "completed");
        assert_eq!(UploadStatus::from_str("error").unwrap(), UploadStatus::Error);
    }
}
