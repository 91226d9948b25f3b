use async_trait::async_trait;

use crate::types::{AnalysisOutcome, ImageFile};

/// Something that can turn an image into a textual description.
///
/// Implementations never fail outright: every problem on the way to a
/// description is reported as [`AnalysisOutcome::Failed`] so the caller
/// decides how the failure gets recorded.
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    /// Short identifier used in logs (e.g., the model id).
    fn name(&self) -> &str;

    /// Describe one image.
    async fn analyze(&self, image: &ImageFile) -> AnalysisOutcome;
}
