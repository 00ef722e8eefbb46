//! Upload command handler: queue files, send them concurrently, show
//! aggregate progress.

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tabled::Tabled;

use albumkit_core::{EntityId, Session, UploadItem, UploadStatus};

use crate::cli::{GlobalOpts, UploadArgs};
use crate::error::CliError;
use crate::output;

// ── Report rows ─────────────────────────────────────────────────────

/// Serializable outcome of one queued file.
#[derive(Serialize)]
struct UploadReport {
    id: String,
    file: String,
    size: u64,
    status: UploadStatus,
    progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl UploadReport {
    fn new(item: &UploadItem, progress: Option<u8>) -> Self {
        Self {
            id: item.id.to_string(),
            file: item.file.file_name.clone(),
            size: item.file.size(),
            status: item.status,
            progress: progress.unwrap_or(0),
            error: item.error.clone(),
        }
    }
}

#[derive(Tabled)]
struct UploadRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Error")]
    error: String,
}

impl From<&UploadReport> for UploadRow {
    fn from(r: &UploadReport) -> Self {
        Self {
            file: r.file.clone(),
            size: human_size(r.size),
            status: r.status.to_string(),
            progress: format!("{}%", r.progress),
            error: r.error.clone().unwrap_or_default(),
        }
    }
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn human_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    match bytes {
        b if b >= MIB => format!("{:.1} MiB", b as f64 / MIB as f64),
        b if b >= KIB => format!("{:.1} KiB", b as f64 / KIB as f64),
        b => format!("{b} B"),
    }
}

fn progress_bar(quiet: bool, len: usize) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(100);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos:>3}% {msg}")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_message(format!("uploading {len} file(s)"));
    bar
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &Session, args: UploadArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let album_id = args.album.as_deref().map(EntityId::from);

    let mut rejected = 0usize;
    for path in &args.files {
        if let Err(err) = session.enqueue_upload_path(path, album_id.clone()).await {
            rejected += 1;
            tracing::warn!(path = %path.display(), error = %err, "file rejected");
            if !global.quiet {
                eprintln!("Skipping {}: {err}", path.display());
            }
        }
    }

    let queued = session.uploads().queue_length();
    if queued == 0 {
        return Err(CliError::Validation {
            field: "files".into(),
            reason: format!("none of the {rejected} file(s) can be uploaded"),
        });
    }

    let bar = progress_bar(global.quiet, queued);
    let mut changes = session.uploads().subscribe();
    let watcher = {
        let session = session.clone();
        let bar = bar.clone();
        tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let percent = session.uploads().total_progress();
                bar.set_position(u64::from(percent));
            }
        })
    };

    let summary = session.upload_pending().await;
    watcher.abort();

    let reports: Vec<UploadReport> = {
        let store = session.uploads();
        bar.set_position(u64::from(store.total_progress()));
        store
            .queue()
            .iter()
            .map(|item| UploadReport::new(item, store.progress_of(item.id)))
            .collect()
    };
    bar.finish_and_clear();

    let out = output::render_list(&global.output, &reports, |r| UploadRow::from(r), |r| r.id.clone());
    output::print_output(&out, global.quiet);

    let failed = summary.failed.len() + rejected;
    if failed > 0 {
        return Err(CliError::UploadFailed {
            failed,
            total: summary.attempted() + rejected,
        });
    }
    Ok(())
}
