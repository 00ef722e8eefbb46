// ── Client-side stores ──
//
// Plain state containers with explicit mutation methods. Derived views
// are pure functions over the raw state, recomputed on demand; every
// mutation bumps a `watch`-backed revision so subscribers know when to
// recompute.

mod album;
mod collection;
mod patch;
mod photo;
mod tag;
mod upload;

use tokio::sync::watch;

pub use album::AlbumStore;
pub use collection::EntityCollection;
pub use patch::Patch;
pub use photo::PhotoStore;
pub use tag::TagStore;
pub use upload::UploadStore;

/// Monotonic change counter shared by every store.
#[derive(Debug)]
pub struct Revision {
    tx: watch::Sender<u64>,
}

impl Revision {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self { tx }
    }

    /// Current revision number.
    pub fn current(&self) -> u64 {
        *self.tx.borrow()
    }

    /// Receive a notification after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }

    pub(crate) fn bump(&self) {
        // `send_modify` updates unconditionally, even with zero receivers.
        self.tx.send_modify(|v| *v += 1);
    }
}

impl Default for Revision {
    fn default() -> Self {
        Self::new()
    }
}

/// Loading/error bookkeeping common to every store.
pub trait LoadState {
    fn set_loading(&mut self, loading: bool);
    fn set_error(&mut self, message: String);
    fn clear_error(&mut self);
}

/// Stable sort, newest first. Entries without a timestamp sort last.
pub(crate) fn newest_first<'a, T, F>(items: impl IntoIterator<Item = &'a T>, key: F) -> Vec<&'a T>
where
    T: 'a,
    F: Fn(&T) -> Option<chrono::DateTime<chrono::Utc>>,
{
    let mut sorted: Vec<&T> = items.into_iter().collect();
    // `None < Some(_)`, so comparing in reverse leaves the `None`s at the end.
    sorted.sort_by(|a, b| key(b).cmp(&key(a)));
    sorted
}
