use std::path::PathBuf;
use std::time::Duration;

use captionforge_config::{apply_all_defaults, CaptionForgeConfig};
use captionforge_pipeline::OrchestratorOptions;
use captionforge_understanding::{MediaTypePolicy, VisionSettings};

/// Runtime settings for one invocation, resolved from the prepared config.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory to scan
    pub scan_dir: PathBuf,
    /// Request shape and transport for the vision client
    pub vision: VisionSettings,
    /// Skip-check and failure recording
    pub orchestrator: OrchestratorOptions,
    /// Log level
    pub log_level: String,
    /// Optional NDJSON log directory
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Build runtime settings from a loaded config. Defaults are applied
    /// here as well, so an unprepared config resolves to the same values.
    pub fn from_config(config: &CaptionForgeConfig) -> Self {
        let config = apply_all_defaults(config.clone());
        let scan = config.scan.unwrap_or_default();
        let bedrock = config.bedrock.unwrap_or_default();
        let output = config.output.unwrap_or_default();
        let logging = config.logging.unwrap_or_default();

        let vision = VisionSettings {
            endpoint: bedrock.endpoint.unwrap_or_default(),
            model_id: bedrock.model_id.unwrap_or_default(),
            anthropic_version: bedrock.anthropic_version.unwrap_or_default(),
            max_tokens: bedrock.max_tokens.unwrap_or_default(),
            prompt: bedrock.prompt.unwrap_or_default(),
            media_type: bedrock
                .media_type
                .as_deref()
                .map(MediaTypePolicy::parse)
                .unwrap_or_default(),
            response_paths: bedrock.response_paths.unwrap_or_default(),
            bearer_token: bedrock.bearer_token.filter(|t| !t.is_empty()),
            request_timeout: bedrock.request_timeout_secs.map(Duration::from_secs),
        };

        let orchestrator = OrchestratorOptions {
            skip_marker: scan.skip_marker.unwrap_or_default(),
            failure_policy: output.on_failure.unwrap_or_default(),
            placeholder: output.placeholder.unwrap_or_default(),
            show_progress: logging.progress.unwrap_or_default(),
        };

        Self {
            scan_dir: PathBuf::from(scan.directory.unwrap_or_default()),
            vision,
            orchestrator,
            log_level: logging.level.unwrap_or_default(),
            log_dir: logging.dir.map(PathBuf::from),
        }
    }
}
