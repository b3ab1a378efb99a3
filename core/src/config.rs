use crate::errors::{StudyError, StudyResult};
use crate::parser::ParserMode;
use crate::records::ItemCount;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "study-buddy";
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_MODEL: &str = "llama2";

/// Configuration for Study Buddy
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct StudyConfig {
    pub endpoint: Option<String>,
    pub model_name: Option<String>,
    pub item_count: Option<u8>,
    pub parser_mode: Option<ParserMode>,
    /// Quiz questions generated in flight at once; 1 keeps calls sequential.
    pub quiz_concurrency: Option<usize>,
    /// Unset means no client-side timeout.
    pub request_timeout_secs: Option<u64>,
    pub export_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl StudyConfig {
    /// The configuration written by `config init`, with every default spelled out
    pub fn with_defaults() -> Self {
        Self {
            endpoint: Some(DEFAULT_ENDPOINT.to_string()),
            model_name: Some(DEFAULT_MODEL.to_string()),
            item_count: Some(ItemCount::default().get() as u8),
            parser_mode: Some(ParserMode::Markers),
            quiz_concurrency: Some(1),
            request_timeout_secs: None,
            export_dir: Some(PathBuf::from(".")),
            log_level: Some("warn".to_string()),
        }
    }

    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> StudyResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            StudyError::Config(format!("Failed to read config file: {}", e))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            StudyError::Config(format!("Failed to parse config file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to a file
    pub fn save_to_file(&self, path: &Path) -> StudyResult<()> {
        let content = toml::to_string(self).map_err(|e| {
            StudyError::Config(format!("Failed to serialize config: {}", e))
        })?;

        // Ensure the directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StudyError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        fs::write(path, content).map_err(|e| {
            StudyError::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            endpoint: other.endpoint.clone().or_else(|| self.endpoint.clone()),
            model_name: other.model_name.clone().or_else(|| self.model_name.clone()),
            item_count: other.item_count.or(self.item_count),
            parser_mode: other.parser_mode.or(self.parser_mode),
            quiz_concurrency: other.quiz_concurrency.or(self.quiz_concurrency),
            request_timeout_secs: other.request_timeout_secs.or(self.request_timeout_secs),
            export_dir: other.export_dir.clone().or_else(|| self.export_dir.clone()),
            log_level: other.log_level.clone().or_else(|| self.log_level.clone()),
        }
    }

    pub fn validate(&self) -> StudyResult<()> {
        if let Some(count) = self.item_count {
            ItemCount::new(count as i64)?;
        }
        if self.quiz_concurrency == Some(0) {
            return Err(StudyError::Config(
                "quiz_concurrency must be at least 1".to_string(),
            ));
        }
        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(StudyError::Config(format!(
                    "Endpoint must be an http(s) URL: {}",
                    endpoint
                )));
            }
        }
        Ok(())
    }

    pub fn endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
    }

    pub fn model_name(&self) -> String {
        self.model_name
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    pub fn item_count(&self) -> StudyResult<ItemCount> {
        match self.item_count {
            Some(count) => ItemCount::new(count as i64),
            None => Ok(ItemCount::default()),
        }
    }

    pub fn parser_mode(&self) -> ParserMode {
        self.parser_mode.unwrap_or_default()
    }

    pub fn quiz_concurrency(&self) -> usize {
        self.quiz_concurrency.unwrap_or(1).max(1)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> StudyResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        StudyError::Config("Could not determine home directory".to_string())
    })?;

    Ok(home_dir.join(".config").join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> StudyResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = StudyConfig::load_from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, StudyConfig::default());
        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.model_name(), DEFAULT_MODEL);
        assert_eq!(config.item_count().unwrap().get(), 3);
        assert_eq!(config.parser_mode(), ParserMode::Markers);
        assert_eq!(config.quiz_concurrency(), 1);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = StudyConfig {
            model_name: Some("mistral".to_string()),
            item_count: Some(7),
            parser_mode: Some(ParserMode::Json),
            ..StudyConfig::with_defaults()
        };
        config.save_to_file(&path).unwrap();

        let loaded = StudyConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_parse_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "model_name = \"phi3\"\nparser_mode = \"json\"\n").unwrap();

        let loaded = StudyConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.model_name(), "phi3");
        assert_eq!(loaded.parser_mode(), ParserMode::Json);
        assert_eq!(loaded.endpoint(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_invalid_files_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        fs::write(&path, "item_count = 11\n").unwrap();
        assert!(matches!(
            StudyConfig::load_from_file(&path),
            Err(StudyError::InvalidItemCount { .. })
        ));

        fs::write(&path, "endpoint = \"localhost:11434\"\n").unwrap();
        assert!(matches!(
            StudyConfig::load_from_file(&path),
            Err(StudyError::Config(_))
        ));

        fs::write(&path, "this is not toml =").unwrap();
        assert!(matches!(
            StudyConfig::load_from_file(&path),
            Err(StudyError::Config(_))
        ));
    }

    #[test]
    fn test_merge_prefers_other() {
        let base = StudyConfig::with_defaults();
        let overrides = StudyConfig {
            model_name: Some("gemma".to_string()),
            quiz_concurrency: Some(4),
            ..StudyConfig::default()
        };
        let merged = base.merge(&overrides);
        assert_eq!(merged.model_name(), "gemma");
        assert_eq!(merged.quiz_concurrency(), 4);
        assert_eq!(merged.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(merged.log_level.as_deref(), Some("warn"));
    }
}
