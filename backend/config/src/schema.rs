//! captionforge configuration schema.
//!
//! Every field is optional in the file; `defaults::apply_all_defaults` fills
//! in the values the tool runs with when a field is left out.

use captionforge_core::{FailurePolicy, SkipMarker};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionForgeConfig {
    /// Which directory to scan and how to recognise finished images
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan: Option<ScanConfig>,

    /// Remote model and request shape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrock: Option<BedrockConfig>,

    /// How results are recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

// ---------------------------------------------------------------------------
// Scan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_marker: Option<SkipMarker>,
}

// ---------------------------------------------------------------------------
// Bedrock
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BedrockConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Overrides the regional `bedrock-runtime` URL (proxies, VPC endpoints)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// `"detect"` or a fixed MIME type such as `"image/jpeg"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// JSON pointers tried in order to find the generated text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_paths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_failure: Option<FailurePolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for rolling NDJSON logs; console only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_yaml() {
        let yaml = r#"
scan:
  directory: ./photos
  skipMarker: legacyTxt
bedrock:
  modelId: anthropic.claude-3-5-sonnet-20240620-v1:0
  maxTokens: 512
  responsePaths: ["/content"]
output:
  onFailure: skipWrite
"#;
        let cfg: CaptionForgeConfig = serde_yaml::from_str(yaml).unwrap();
        let scan = cfg.scan.unwrap();
        assert_eq!(scan.directory.as_deref(), Some("./photos"));
        assert_eq!(scan.skip_marker, Some(SkipMarker::LegacyTxt));
        let bedrock = cfg.bedrock.unwrap();
        assert_eq!(bedrock.max_tokens, Some(512));
        assert_eq!(bedrock.response_paths.unwrap(), vec!["/content".to_string()]);
        assert_eq!(cfg.output.unwrap().on_failure, Some(FailurePolicy::SkipWrite));
        assert!(cfg.logging.is_none());
    }

    #[test]
    fn empty_document_is_default() {
        let cfg: CaptionForgeConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg, CaptionForgeConfig::default());
    }
}
