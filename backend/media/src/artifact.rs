//! Summary artifacts: where a summary lives, whether one already exists, and
//! writing it out.
//!
//! The artifact doubles as the "already processed" marker; there is no
//! manifest or index besides the files themselves.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use captionforge_core::SkipMarker;
use tokio::fs;
use tracing::debug;

const SUMMARY_SUFFIX: &str = "_summary.txt";

/// `<dir>/<stem>_summary.txt` for an image at `<dir>/<stem>.<ext>`.
pub fn summary_path(image: &Path) -> PathBuf {
    let mut name: OsString = image.file_stem().map(OsString::from).unwrap_or_default();
    name.push(SUMMARY_SUFFIX);
    image.with_file_name(name)
}

/// The path whose existence means `image` was already handled.
pub fn marker_path(image: &Path, marker: SkipMarker) -> PathBuf {
    match marker {
        SkipMarker::Summary => summary_path(image),
        SkipMarker::LegacyTxt => image.with_extension("txt"),
    }
}

/// True iff the marker for `image` does not exist yet.
pub async fn should_process(image: &Path, marker: SkipMarker) -> bool {
    let marker = marker_path(image, marker);
    // An unprobeable marker is treated as absent.
    !fs::try_exists(&marker).await.unwrap_or(false)
}

/// Write `text` as the full UTF-8 content of the summary for `image`,
/// replacing any previous content. Returns the path written.
pub async fn write_summary(image: &Path, text: &str) -> Result<PathBuf> {
    let path = summary_path(image);
    fs::write(&path, text.as_bytes())
        .await
        .with_context(|| format!("Failed to write summary: {}", path.display()))?;
    debug!(path = %path.display(), bytes = text.len(), "Wrote summary");
    Ok(path)
}
