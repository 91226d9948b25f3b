//! Config defaults: applies the values the tool runs with when a field is
//! left out of the file.

use captionforge_core::{FailurePolicy, SkipMarker, PLACEHOLDER_RESULT};

use crate::schema::{BedrockConfig, CaptionForgeConfig, LoggingConfig, OutputConfig, ScanConfig};

/// Directory scanned when none is configured.
pub const DEFAULT_SCAN_DIRECTORY: &str = ".";

pub const DEFAULT_REGION: &str = "us-east-1";

pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-haiku-20240307-v1:0";

/// Protocol version tag sent in every request body.
pub const DEFAULT_ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

pub const DEFAULT_MAX_TOKENS: u32 = 1000;

pub const DEFAULT_PROMPT: &str = "Explain the content of this image.";

pub const DEFAULT_MEDIA_TYPE: &str = "detect";

pub const DEFAULT_RESPONSE_PATHS: &[&str] = &["/message/content", "/content"];

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Regional Bedrock runtime URL.
pub fn bedrock_endpoint(region: &str) -> String {
    format!("https://bedrock-runtime.{region}.amazonaws.com")
}

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: CaptionForgeConfig) -> CaptionForgeConfig {
    let config = apply_scan_defaults(config);
    let config = apply_bedrock_defaults(config);
    let config = apply_output_defaults(config);
    apply_logging_defaults(config)
}

fn apply_scan_defaults(mut config: CaptionForgeConfig) -> CaptionForgeConfig {
    let scan = config.scan.get_or_insert_with(ScanConfig::default);
    scan.directory.get_or_insert_with(|| DEFAULT_SCAN_DIRECTORY.to_string());
    scan.skip_marker.get_or_insert(SkipMarker::default());
    config
}

/// Fill the request shape. The endpoint follows the region unless set
/// explicitly; the bearer token and timeout stay unset.
fn apply_bedrock_defaults(mut config: CaptionForgeConfig) -> CaptionForgeConfig {
    let bedrock = config.bedrock.get_or_insert_with(BedrockConfig::default);
    let region = bedrock
        .region
        .get_or_insert_with(|| DEFAULT_REGION.to_string())
        .clone();
    bedrock.endpoint.get_or_insert_with(|| bedrock_endpoint(&region));
    bedrock.model_id.get_or_insert_with(|| DEFAULT_MODEL_ID.to_string());
    bedrock
        .anthropic_version
        .get_or_insert_with(|| DEFAULT_ANTHROPIC_VERSION.to_string());
    bedrock.max_tokens.get_or_insert(DEFAULT_MAX_TOKENS);
    bedrock.prompt.get_or_insert_with(|| DEFAULT_PROMPT.to_string());
    bedrock.media_type.get_or_insert_with(|| DEFAULT_MEDIA_TYPE.to_string());
    bedrock
        .response_paths
        .get_or_insert_with(|| DEFAULT_RESPONSE_PATHS.iter().map(|p| p.to_string()).collect());
    config
}

fn apply_output_defaults(mut config: CaptionForgeConfig) -> CaptionForgeConfig {
    let output = config.output.get_or_insert_with(OutputConfig::default);
    output.on_failure.get_or_insert(FailurePolicy::default());
    output.placeholder.get_or_insert_with(|| PLACEHOLDER_RESULT.to_string());
    config
}

fn apply_logging_defaults(mut config: CaptionForgeConfig) -> CaptionForgeConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging.level.get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.progress.get_or_insert(true);
    config
}
