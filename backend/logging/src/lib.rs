//! Structured logging for captionforge.
//!
//! Console output, optional NDJSON file rotation, and scrubbing of
//! credentials from strings before they are logged.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_sensitive_data;
