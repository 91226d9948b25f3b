pub mod error;
pub mod traits;
pub mod types;

pub use error::CaptionError;
pub use traits::ImageAnalyzer;
pub use types::{
    AnalysisOutcome, BatchReport, FailurePolicy, ImageFile, SkipMarker, PLACEHOLDER_RESULT,
};
