// ── Runtime client configuration ──
//
// Describes *where* the file server lives and what the client accepts
// for upload. Never touches disk: albumkit-config (or a test) builds a
// `ClientConfig` and hands it to the session.

use std::time::Duration;

use url::Url;

use crate::error::CoreError;
use crate::model::UploadFile;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
pub const DEFAULT_SUPPORTED_FORMATS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Configuration for talking to one file server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the file API (e.g., `http://localhost:8888/api/files`).
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    pub upload: UploadPolicy,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            upload: UploadPolicy::default(),
        }
    }
}

/// Limits applied to files before they enter the upload queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Largest accepted file, in bytes.
    pub max_file_size: u64,
    /// Lower-case extensions without the dot. Empty accepts anything.
    pub supported_formats: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            supported_formats: DEFAULT_SUPPORTED_FORMATS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl UploadPolicy {
    pub fn check(&self, file: &UploadFile) -> Result<(), CoreError> {
        if file.size() > self.max_file_size {
            return Err(CoreError::Validation {
                message: format!(
                    "{} is {} bytes, larger than the {} byte limit",
                    file.file_name,
                    file.size(),
                    self.max_file_size
                ),
            });
        }
        if self.supported_formats.is_empty() {
            return Ok(());
        }
        match file.extension() {
            Some(ext) if self.supported_formats.iter().any(|f| f.eq_ignore_ascii_case(&ext)) => {
                Ok(())
            }
            _ => Err(CoreError::Validation {
                message: format!(
                    "{} is not a supported format (expected one of: {})",
                    file.file_name,
                    self.supported_formats.join(", ")
                ),
            }),
        }
    }
}
