use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Text recorded in place of a description when analysis fails.
pub const PLACEHOLDER_RESULT: &str = "Error occurred during analysis.";

/// An image discovered in the scan directory. Identity is the path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageFile {
    pub path: PathBuf,
    pub file_name: String,
}

impl ImageFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, file_name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Result of analyzing one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    /// The model produced a description. `raw_fallback` is set when the
    /// expected field was missing and the raw response body was kept instead.
    Described { text: String, raw_fallback: bool },
    /// Anything went wrong between reading the file and parsing the response.
    Failed { reason: String },
}

impl AnalysisOutcome {
    pub fn described(text: impl Into<String>) -> Self {
        Self::Described { text: text.into(), raw_fallback: false }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed { reason: reason.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Described { .. })
    }

    /// Text to persist for this outcome, with failures mapped to `placeholder`.
    pub fn text_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        match self {
            Self::Described { text, .. } => text.as_str(),
            Self::Failed { .. } => placeholder,
        }
    }
}

/// Which sibling path counts as the "already processed" marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipMarker {
    /// `<stem>_summary.txt`, the file the summary writer produces.
    #[default]
    Summary,
    /// `<stem>.txt`. Never written by captionforge itself, so images are
    /// reprocessed unless something else left that file behind.
    LegacyTxt,
}

/// How a failed analysis is recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailurePolicy {
    /// Write the placeholder text as the summary. The image counts as done.
    #[default]
    WritePlaceholder,
    /// Leave no summary so the image is retried on the next run.
    SkipWrite,
}

/// Per-run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Image files discovered by the scan.
    pub total: usize,
    /// Files that reached the analyzer.
    pub processed: usize,
    /// Files skipped because their marker already existed.
    pub skipped: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} processed ({} succeeded, {} failed), {} skipped",
            self.processed, self.total, self.succeeded, self.failed, self.skipped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_file_name_from_path() {
        let img = ImageFile::new("/photos/Cat.JPG");
        assert_eq!(img.file_name, "Cat.JPG");
        assert_eq!(img.to_string(), "/photos/Cat.JPG");
    }

    #[test]
    fn failed_outcome_maps_to_placeholder() {
        let outcome = AnalysisOutcome::failed("connection refused");
        assert!(!outcome.is_success());
        assert_eq!(outcome.text_or(PLACEHOLDER_RESULT), "Error occurred during analysis.");
    }

    #[test]
    fn described_outcome_keeps_text() {
        let outcome = AnalysisOutcome::described("a cat on a mat");
        assert_eq!(outcome.text_or(PLACEHOLDER_RESULT), "a cat on a mat");
    }

    #[test]
    fn policies_use_camel_case_names() {
        assert_eq!(serde_json::to_string(&SkipMarker::LegacyTxt).unwrap(), "\"legacyTxt\"");
        let policy: FailurePolicy = serde_json::from_str("\"skipWrite\"").unwrap();
        assert_eq!(policy, FailurePolicy::SkipWrite);
    }

    #[test]
    fn report_display() {
        let report = BatchReport { total: 3, processed: 2, skipped: 1, succeeded: 1, failed: 1 };
        assert_eq!(report.to_string(), "2/3 processed (1 succeeded, 1 failed), 1 skipped");
    }
}
