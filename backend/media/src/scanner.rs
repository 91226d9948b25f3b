//! Directory scan for candidate images.

use std::path::Path;

use anyhow::Result;
use captionforge_core::{CaptionError, ImageFile};
use tokio::fs;
use tracing::debug;

use crate::mime_detect::name_suffix;

/// Extensions (lowercase, no dot) picked up by the scan.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Whether `path` carries one of the supported image extensions (case-insensitive).
pub fn is_supported_image(path: &Path) -> bool {
    name_suffix(path)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// List the image files directly inside `dir`, in directory listing order.
///
/// Subdirectories are neither descended into nor returned, even when their
/// name ends in an image extension. Entries whose metadata cannot be read
/// (a dangling symlink, say) are kept so the failure is recorded per file.
pub async fn list_image_files(dir: &Path) -> Result<Vec<ImageFile>> {
    let scan_err = |source| CaptionError::Scan { path: dir.to_path_buf(), source };

    let mut entries = fs::read_dir(dir).await.map_err(scan_err)?;
    let mut images = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(scan_err)? {
        let path = entry.path();
        if !is_supported_image(&path) {
            continue;
        }
        // Follows symlinks, so a link to an image still counts.
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => images.push(ImageFile::new(path)),
            Ok(_) => debug!(path = %path.display(), "Skipping non-file entry"),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Keeping entry with unreadable metadata");
                images.push(ImageFile::new(path));
            }
        }
    }

    debug!(dir = %dir.display(), count = images.len(), "Scanned directory");
    Ok(images)
}
