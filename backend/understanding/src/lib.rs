pub mod response;
pub mod vision;

pub use response::{extract_analysis, Extraction, NO_ANALYSIS_SENTINEL};
pub use vision::{BedrockVisionClient, MediaTypePolicy, VisionSettings};
