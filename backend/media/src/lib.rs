//! Local filesystem side of captionforge: finding images, deciding whether
//! they still need a summary, and writing the summary next to them.

pub mod artifact;
pub mod mime_detect;
pub mod scanner;

pub use artifact::{marker_path, should_process, summary_path, write_summary};
pub use mime_detect::{detect_mime_type, name_suffix};
pub use scanner::{is_supported_image, list_image_files, SUPPORTED_EXTENSIONS};
