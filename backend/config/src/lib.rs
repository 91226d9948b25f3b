//! `captionforge-config` — runtime configuration for captionforge.
//!
//! Provides:
//! - Typed config schema (scan, bedrock, output, logging)
//! - YAML read/write
//! - `${ENV_VAR}` substitution and AWS environment fallbacks
//! - Config redaction for safe logging/display
//! - Default value application
//! - Schema validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use schema::{BedrockConfig, CaptionForgeConfig, LoggingConfig, OutputConfig, ScanConfig};
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use env::{apply_env_fallbacks, resolve_env_vars_with, MissingEnvVarError};
pub use redact::redact;
pub use defaults::apply_all_defaults;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use captionforge_core::CaptionError;
use serde_json::Value;
use std::collections::HashMap;

/// Apply env substitution and fallbacks, apply defaults, and validate a
/// loaded config. Validation errors fail; warnings are only logged.
///
/// Kept separate from `load_config` so the caller can bring logging up from
/// the raw file before any warning is emitted.
pub fn prepare(raw_config: CaptionForgeConfig, env: &HashMap<String, String>) -> Result<CaptionForgeConfig> {
    // Serialize to Value for the env substitution pass.
    let value: Value = serde_json::to_value(&raw_config)
        .context("Failed to serialize config for processing")?;
    let value = resolve_env_vars_with(&value, env).context("Failed to resolve env vars in config")?;

    let config: CaptionForgeConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;
    let config = apply_all_defaults(apply_env_fallbacks(config, env));

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.first() {
        return Err(CaptionError::Config(first.to_string()).into());
    }

    Ok(config)
}
