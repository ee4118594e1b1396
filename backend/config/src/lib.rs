//! `finscope-config`: Finscope runtime configuration.
//!
//! Provides:
//! - Typed config schema (server, vision provider, media limits, logging)
//! - YAML read/write with atomic replace
//! - `${ENV_VAR}` substitution
//! - Environment variable overrides
//! - Default value application and validation
//! - Config redaction for safe display

pub mod defaults;
pub mod env;
pub mod io;
pub mod overrides;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use overrides::apply_env_overrides;
pub use redact::redact;
pub use schema::{FinscopeConfig, ProviderKind, Settings, VisionSettings};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Load, substitute env vars, apply env overrides and defaults, and validate.
///
/// This is the main entry point for loading a config at runtime. Validation
/// errors fail the load; the returned report carries the warnings, which the
/// caller logs once its subscriber is installed.
pub async fn load_and_prepare(path: &Path) -> Result<(FinscopeConfig, ValidationReport)> {
    let env: HashMap<String, String> = std::env::vars().collect();
    load_and_prepare_with(path, &env).await
}

/// Same as [`load_and_prepare`] but reads variables from `env` (useful for testing).
pub async fn load_and_prepare_with(
    path: &Path,
    env: &HashMap<String, String>,
) -> Result<(FinscopeConfig, ValidationReport)> {
    let raw_config = load_config(path).await?;

    let value: Value =
        serde_json::to_value(&raw_config).context("Failed to serialize config for processing")?;
    let value = resolve_env_vars_with(&value, env).context("Failed to resolve env vars in config")?;
    let config: FinscopeConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides(config, env)?;
    let config = apply_all_defaults(config);

    let report = validate(&config);
    if !report.is_valid() {
        let errors: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        anyhow::bail!("{}", errors.join("; "));
    }

    Ok((config, report))
}
