use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use study_core::config::{get_default_config_file, StudyConfig, APP_NAME};

use crate::cli::Args;

pub const ENDPOINT_ENV: &str = "STUDY_BUDDY_ENDPOINT";
pub const MODEL_ENV: &str = "STUDY_BUDDY_MODEL";
pub const LOG_ENV: &str = "STUDY_BUDDY_LOG";

/// Extension trait for StudyConfig to layer environment and command-line overrides
pub trait ConfigOverridesExt {
    /// Values taken from `STUDY_BUDDY_*` environment variables
    fn env_overrides() -> StudyConfig;

    /// Values given on the command line
    fn arg_overrides(args: &Args) -> StudyConfig;
}

impl ConfigOverridesExt for StudyConfig {
    fn env_overrides() -> StudyConfig {
        overrides_from(|key| env::var(key).ok())
    }

    fn arg_overrides(args: &Args) -> StudyConfig {
        StudyConfig {
            endpoint: args.endpoint.clone(),
            model_name: args.model.clone(),
            item_count: args.count,
            parser_mode: args.parser,
            log_level: args.verbose.then(|| "debug".to_string()),
            ..StudyConfig::default()
        }
    }
}

fn overrides_from(lookup: impl Fn(&str) -> Option<String>) -> StudyConfig {
    let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
    StudyConfig {
        endpoint: read(ENDPOINT_ENV),
        model_name: read(MODEL_ENV),
        log_level: read(LOG_ENV),
        ..StudyConfig::default()
    }
}

pub fn config_path(args: &Args) -> Result<PathBuf> {
    match &args.config {
        Some(path) => Ok(path.clone()),
        None => get_default_config_file(APP_NAME).context("Failed to locate config directory"),
    }
}

/// Defaults, then the config file, then the environment, then command-line flags.
pub fn resolve(args: &Args) -> Result<(StudyConfig, PathBuf)> {
    let path = config_path(args)?;
    let file_config = StudyConfig::load_from_file(&path)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    let config = file_config
        .merge(&StudyConfig::env_overrides())
        .merge(&StudyConfig::arg_overrides(args));
    config.validate().context("Invalid configuration")?;

    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;

    #[test]
    fn test_env_overrides_skip_blank_values() {
        let vars: HashMap<&str, &str> = [(MODEL_ENV, "mistral"), (ENDPOINT_ENV, "  ")]
            .into_iter()
            .collect();
        let config = overrides_from(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.model_name.as_deref(), Some("mistral"));
        assert_eq!(config.endpoint, None);
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model_name = \"phi3\"\nitem_count = 4\n").unwrap();

        let args = Args::try_parse_from([
            "study-buddy",
            "--config",
            path.to_str().unwrap(),
            "-n",
            "9",
            "-v",
            "interactive",
        ])
        .unwrap();
        let (config, resolved_path) = resolve(&args).unwrap();

        assert_eq!(resolved_path, path);
        assert_eq!(config.item_count, Some(9));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        // The model comes from the file unless STUDY_BUDDY_MODEL is set in the test environment.
        if env::var(MODEL_ENV).is_err() {
            assert_eq!(config.model_name(), "phi3");
        }
    }
}
