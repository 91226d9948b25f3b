//! MIME type detection for image files.
//!
//! Used by the vision client to label the inline image payload.

use std::path::Path;

/// Lowercased text after the last `.` of the file name.
///
/// Unlike `Path::extension`, a bare `.png` yields `png`.
pub fn name_suffix(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let (_, ext) = name.rsplit_once('.')?;
    Some(ext.to_lowercase())
}

/// Detect an image MIME type by file extension.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = name_suffix(path).unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png"          => "image/png",
        "gif"          => "image/gif",
        "webp"         => "image/webp",
        _              => "application/octet-stream",
    }
}
