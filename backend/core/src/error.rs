use std::path::PathBuf;

use thiserror::Error;

/// Domain errors raised while summarizing a batch of images.
#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("failed to read image {path}: {source}")]
    ReadImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to scan directory {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("inference request failed: {0}")]
    Http(String),

    #[error("inference service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed inference response: {0}")]
    ParseResponse(String),

    #[error("configuration error: {0}")]
    Config(String),
}
