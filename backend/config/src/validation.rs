//! Config validation: schema checks with user-friendly error messages.

use crate::schema::CaptionForgeConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &CaptionForgeConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_scan(config, &mut report);
    validate_bedrock(config, &mut report);
    validate_output(config, &mut report);
    report
}

fn validate_scan(config: &CaptionForgeConfig, report: &mut ValidationReport) {
    let Some(scan) = &config.scan else { return };
    if scan.directory.as_deref().is_some_and(|d| d.trim().is_empty()) {
        report.error("scan.directory", "Scan directory cannot be empty");
    }
}

fn validate_bedrock(config: &CaptionForgeConfig, report: &mut ValidationReport) {
    let Some(bedrock) = &config.bedrock else { return };

    if bedrock.model_id.as_deref().is_some_and(|m| m.trim().is_empty()) {
        report.error("bedrock.modelId", "Model id cannot be empty");
    }
    if bedrock.anthropic_version.as_deref().is_some_and(|v| v.trim().is_empty()) {
        report.error("bedrock.anthropicVersion", "anthropicVersion cannot be empty");
    }
    if bedrock.max_tokens == Some(0) {
        report.error("bedrock.maxTokens", "maxTokens must be > 0");
    }
    if bedrock.request_timeout_secs == Some(0) {
        report.error("bedrock.requestTimeoutSecs", "requestTimeoutSecs must be > 0 when set");
    }
    if let Some(endpoint) = &bedrock.endpoint {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            report.error(
                "bedrock.endpoint",
                format!("Endpoint '{endpoint}' must start with http:// or https://"),
            );
        }
    }
    if let Some(paths) = &bedrock.response_paths {
        if paths.is_empty() {
            report.warn(
                "bedrock.responsePaths",
                "No response paths; every summary will be the raw response body",
            );
        }
        for (i, pointer) in paths.iter().enumerate() {
            if !pointer.is_empty() && !pointer.starts_with('/') {
                report.error(
                    format!("bedrock.responsePaths[{i}]"),
                    format!("'{pointer}' is not a JSON pointer (must start with '/')"),
                );
            }
        }
    }
    if let Some(media_type) = &bedrock.media_type {
        if !media_type.eq_ignore_ascii_case("detect") && !media_type.starts_with("image/") {
            report.warn(
                "bedrock.mediaType",
                format!("'{media_type}' is neither \"detect\" nor an image MIME type"),
            );
        }
    }
    if bedrock.bearer_token.as_deref().map(str::is_empty).unwrap_or(true) {
        report.warn(
            "bedrock.bearerToken",
            "No bearer token configured; requests will be sent unauthenticated",
        );
    }
}

fn validate_output(config: &CaptionForgeConfig, report: &mut ValidationReport) {
    let Some(output) = &config.output else { return };
    if output.placeholder.as_deref().is_some_and(str::is_empty) {
        report.warn(
            "output.placeholder",
            "Empty placeholder; failed images will get empty summaries",
        );
    }
}
