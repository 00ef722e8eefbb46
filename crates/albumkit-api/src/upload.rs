// Upload payloads and progress reporting.
//
// File contents are split into chunks and streamed into the multipart
// body; each chunk handed to the transport advances a shared tracker
// that reports whole percentages to the caller.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use bytes::Bytes;
use reqwest::multipart::Part;

use crate::error::Error;

/// Progress callback, invoked with a percentage in `0..=100`.
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

const CHUNK_SIZE: usize = 64 * 1024;

/// A file handle ready to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub contents: Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, contents: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_owned();
        Self {
            file_name,
            mime_type,
            contents: contents.into(),
        }
    }

    /// Read a file from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".into());
        Ok(Self::new(file_name, contents))
    }

    pub fn size(&self) -> u64 {
        u64::try_from(self.contents.len()).unwrap_or(u64::MAX)
    }

    /// Lower-cased extension without the dot, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }
}

/// Shared byte counter for one upload call (one or many files).
///
/// Only strictly increasing percentages are forwarded, so the callback
/// sees a non-decreasing sequence even when parts are polled out of order.
pub(crate) struct ProgressTracker {
    total: u64,
    sent: AtomicU64,
    last: AtomicU8,
    callback: Option<ProgressFn>,
}

impl ProgressTracker {
    pub(crate) fn new(total: u64, callback: Option<ProgressFn>) -> Arc<Self> {
        Arc::new(Self {
            total,
            sent: AtomicU64::new(0),
            last: AtomicU8::new(0),
            callback,
        })
    }

    pub(crate) fn advance(&self, bytes: u64) {
        let sent = self.sent.fetch_add(bytes, Ordering::AcqRel) + bytes;
        let percent = if self.total == 0 {
            100
        } else {
            sent.saturating_mul(100) / self.total
        };
        let percent = u8::try_from(percent.min(100)).unwrap_or(100);

        if self.last.fetch_max(percent, Ordering::AcqRel) < percent {
            if let Some(callback) = &self.callback {
                callback(percent);
            }
        }
    }

    /// Report completion for bodies that produced no chunks (empty files).
    pub(crate) fn finish(&self) {
        if self.last.fetch_max(100, Ordering::AcqRel) < 100 {
            if let Some(callback) = &self.callback {
                callback(100);
            }
        }
    }
}

/// Build a streaming multipart part whose chunks feed `tracker`.
pub(crate) fn tracked_part(file: &UploadFile, tracker: &Arc<ProgressTracker>) -> Result<Part, Error> {
    let data = file.contents.clone();
    let chunks: Vec<Bytes> = (0..data.len())
        .step_by(CHUNK_SIZE)
        .map(|start| data.slice(start..(start + CHUNK_SIZE).min(data.len())))
        .collect();

    let tracker = Arc::clone(tracker);
    let stream = futures_util::stream::iter(chunks.into_iter().map(move |chunk| {
        tracker.advance(u64::try_from(chunk.len()).unwrap_or(0));
        Ok::<Bytes, std::io::Error>(chunk)
    }));

    Part::stream_with_length(reqwest::Body::wrap_stream(stream), file.size())
        .file_name(file.file_name.clone())
        .mime_str(&file.mime_type)
        .map_err(|e| Error::Client(format!("invalid MIME type {}: {e}", file.mime_type)))
}
