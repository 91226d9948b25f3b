/// Vision understanding — describe images with Claude on Amazon Bedrock.
///
/// One `InvokeModel` call per image, authenticated with a Bedrock API key
/// (bearer token).
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use captionforge_config::defaults::{
    bedrock_endpoint, DEFAULT_ANTHROPIC_VERSION, DEFAULT_MAX_TOKENS, DEFAULT_MEDIA_TYPE,
    DEFAULT_MODEL_ID, DEFAULT_PROMPT, DEFAULT_REGION, DEFAULT_RESPONSE_PATHS,
};
use captionforge_core::{AnalysisOutcome, CaptionError, ImageAnalyzer, ImageFile};
use captionforge_logging::redact_sensitive_data;
use captionforge_media::detect_mime_type;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use tracing::{debug, error, warn};

use crate::response::{extract_analysis, Extraction};

/// How the `media_type` of the inline image is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MediaTypePolicy {
    /// From the file extension.
    #[default]
    Detect,
    /// Always this value, whatever the file is.
    Fixed(String),
}

impl MediaTypePolicy {
    /// `"detect"` (any case) selects detection; anything else is a fixed type.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("detect") {
            Self::Detect
        } else {
            Self::Fixed(value.trim().to_string())
        }
    }

    pub fn resolve(&self, path: &Path) -> String {
        match self {
            Self::Detect => detect_mime_type(path).to_string(),
            Self::Fixed(media_type) => media_type.clone(),
        }
    }
}

/// Everything the client needs to build and send a request.
#[derive(Debug, Clone)]
pub struct VisionSettings {
    /// Base URL, without the `/model/...` path.
    pub endpoint: String,
    pub model_id: String,
    pub anthropic_version: String,
    pub max_tokens: u32,
    pub prompt: String,
    pub media_type: MediaTypePolicy,
    /// JSON pointers tried in order when extracting the generated text.
    pub response_paths: Vec<String>,
    pub bearer_token: Option<String>,
    /// `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

/// The same values `captionforge_config::apply_all_defaults` fills in.
impl Default for VisionSettings {
    fn default() -> Self {
        Self {
            endpoint: bedrock_endpoint(DEFAULT_REGION),
            model_id: DEFAULT_MODEL_ID.to_string(),
            anthropic_version: DEFAULT_ANTHROPIC_VERSION.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            prompt: DEFAULT_PROMPT.to_string(),
            media_type: MediaTypePolicy::parse(DEFAULT_MEDIA_TYPE),
            response_paths: DEFAULT_RESPONSE_PATHS.iter().map(|p| p.to_string()).collect(),
            bearer_token: None,
            request_timeout: None,
        }
    }
}

/// Claude-on-Bedrock image describer.
pub struct BedrockVisionClient {
    client: Client,
    settings: VisionSettings,
}

impl BedrockVisionClient {
    pub fn new(settings: VisionSettings) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self { client, settings })
    }

    pub fn invoke_url(&self) -> String {
        format!(
            "{}/model/{}/invoke",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.model_id
        )
    }

    /// Messages-API request body for one inline base64 image.
    pub fn build_request_body(&self, b64: &str, media_type: &str) -> serde_json::Value {
        serde_json::json!({
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "image",
                      "source": { "type": "base64", "media_type": media_type, "data": b64 } },
                    { "type": "text", "text": self.settings.prompt }
                ]
            }],
            "max_tokens": self.settings.max_tokens,
            "anthropic_version": self.settings.anthropic_version
        })
    }

    /// Read, encode, send and extract. Every failure surfaces as a `CaptionError`.
    pub async fn describe(&self, image: &ImageFile) -> Result<Extraction, CaptionError> {
        let bytes = tokio::fs::read(image.path())
            .await
            .map_err(|source| CaptionError::ReadImage { path: image.path.clone(), source })?;
        let b64 = STANDARD.encode(&bytes);
        let media_type = self.settings.media_type.resolve(image.path());
        let body = self.build_request_body(&b64, &media_type);

        debug!(
            "[Vision] Describing {} ({} bytes, {}) via {}",
            image.file_name,
            bytes.len(),
            media_type,
            self.settings.model_id
        );

        let mut request = self
            .client
            .post(self.invoke_url())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&body);
        if let Some(token) = &self.settings.bearer_token {
            request = request.bearer_auth(token);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| CaptionError::Http(e.to_string()))?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| CaptionError::Http(e.to_string()))?;
        if !status.is_success() {
            return Err(CaptionError::Status { status: status.as_u16(), body: text });
        }

        extract_analysis(&text, &self.settings.response_paths)
    }
}

#[async_trait]
impl ImageAnalyzer for BedrockVisionClient {
    fn name(&self) -> &str {
        &self.settings.model_id
    }

    async fn analyze(&self, image: &ImageFile) -> AnalysisOutcome {
        match self.describe(image).await {
            Ok(Extraction { text, raw_fallback }) => {
                if raw_fallback {
                    warn!(path = %image, "No generated text in response; keeping raw body");
                }
                AnalysisOutcome::Described { text, raw_fallback }
            }
            Err(e) => {
                let reason = redact_sensitive_data(&e.to_string());
                error!(path = %image, error = %reason, "Error processing image");
                AnalysisOutcome::Failed { reason }
            }
        }
    }
}
