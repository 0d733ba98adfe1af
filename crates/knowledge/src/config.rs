//! Knowledge configuration management.

use concierge_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for loading data and answering questions.
///
/// Stored at `.concierge/knowledge.yaml`; every field has a default so a
/// partial file is fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Top-level catalog key naming the organisation (first key when unset)
    pub organisation_key: Option<String>,

    /// Catalog key holding the facility list (first `*Facilities` key when unset)
    pub facilities_key: Option<String>,

    /// Data directory, relative to `.concierge/` unless absolute
    pub data_dir: String,

    pub catalog_file: String,
    pub conversations_file: String,
    pub staff_file: String,
    pub pages_file: String,
    pub chunks_file: String,
    pub metadata_file: String,
    pub terminology_file: String,
    pub links_file: String,

    /// Words per chunk
    pub chunk_size: usize,

    /// Words shared between neighbouring chunks
    pub chunk_overlap: usize,

    /// Chunks pulled into the answer context
    pub context_top_k: usize,

    /// Chunks scanned when aggregating events
    pub event_search_top_k: usize,

    pub completion_timeout_secs: u64,

    /// Sampling temperature sent with completion requests
    pub completion_temperature: f32,

    /// Completions this short (in characters) are discarded
    pub min_completion_chars: usize,

    /// Similarity a whole question must exceed to name a facility
    pub free_text_threshold: f64,

    /// Similarity an extracted entity phrase must exceed to name a facility
    pub phrase_threshold: f64,

    pub links_enabled: bool,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            organisation_key: None,
            facilities_key: None,
            data_dir: "data".to_string(),
            catalog_file: "catalog.json".to_string(),
            conversations_file: "conversations.json".to_string(),
            staff_file: "staff.json".to_string(),
            pages_file: "pages.json".to_string(),
            chunks_file: "chunks.json".to_string(),
            metadata_file: "metadata.json".to_string(),
            terminology_file: "terminology.json".to_string(),
            links_file: "links.yaml".to_string(),
            chunk_size: 1000,
            chunk_overlap: 200,
            context_top_k: 1,
            event_search_top_k: 10,
            completion_timeout_secs: 20,
            completion_temperature: 0.6,
            min_completion_chars: 20,
            free_text_threshold: 0.6,
            phrase_threshold: 0.5,
            links_enabled: true,
        }
    }
}

impl KnowledgeConfig {
    /// Resolve the data directory for a workspace.
    pub fn data_dir(&self, workspace: &Path) -> PathBuf {
        let dir = Path::new(&self.data_dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            workspace.join(".concierge").join(dir)
        }
    }

    /// Resolve a data file name inside the data directory.
    pub fn data_file(&self, workspace: &Path, file_name: &str) -> PathBuf {
        self.data_dir(workspace).join(file_name)
    }
}

/// Load knowledge configuration.
///
/// Loads from `.concierge/knowledge.yaml` if it exists, otherwise returns the
/// defaults.
pub fn load_config(workspace: &Path) -> AppResult<KnowledgeConfig> {
    let config_path = get_config_path(workspace);

    if config_path.exists() {
        let content = fs::read_to_string(&config_path).map_err(|e| {
            AppError::Knowledge(format!("Failed to read config at {:?}: {}", config_path, e))
        })?;

        let config: KnowledgeConfig = serde_yaml::from_str(&content).map_err(|e| {
            AppError::Knowledge(format!("Failed to parse config at {:?}: {}", config_path, e))
        })?;

        tracing::debug!("Loaded knowledge config from {:?}", config_path);
        Ok(config)
    } else {
        tracing::debug!("Using default knowledge config (no config file found)");
        Ok(KnowledgeConfig::default())
    }
}

/// Save knowledge configuration.
pub fn save_config(workspace: &Path, config: &KnowledgeConfig) -> AppResult<()> {
    let config_path = get_config_path(workspace);

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::Knowledge(format!("Failed to create config directory: {}", e))
        })?;
    }

    let yaml = serde_yaml::to_string(config)
        .map_err(|e| AppError::Knowledge(format!("Failed to serialize config: {}", e)))?;

    fs::write(&config_path, yaml).map_err(|e| {
        AppError::Knowledge(format!("Failed to write config to {:?}: {}", config_path, e))
    })?;

    tracing::debug!("Saved knowledge config to {:?}", config_path);
    Ok(())
}

/// Get the path to the knowledge config file.
pub fn get_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".concierge").join("knowledge.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_default_config() {
        let temp = TempDir::new().unwrap();
        let config = load_config(temp.path()).unwrap();

        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 200);
        assert_eq!(config.context_top_k, 1);
        assert!(config.links_enabled);
    }

    #[test]
    fn test_save_and_load_config() {
        let temp = TempDir::new().unwrap();
        let config = KnowledgeConfig {
            organisation_key: Some("Example Lab".to_string()),
            chunk_size: 400,
            ..Default::default()
        };

        save_config(temp.path(), &config).unwrap();

        let loaded = load_config(temp.path()).unwrap();
        assert_eq!(loaded.organisation_key.as_deref(), Some("Example Lab"));
        assert_eq!(loaded.chunk_size, 400);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = get_config_path(temp.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "context_top_k: 3\nlinks_enabled: false\n").unwrap();

        let loaded = load_config(temp.path()).unwrap();
        assert_eq!(loaded.context_top_k, 3);
        assert!(!loaded.links_enabled);
        assert_eq!(loaded.catalog_file, "catalog.json");
    }

    #[test]
    fn test_relative_data_dir_lives_under_concierge() {
        let config = KnowledgeConfig::default();
        let dir = config.data_dir(Path::new("/srv/ws"));
        assert_eq!(dir, PathBuf::from("/srv/ws/.concierge/data"));
    }
}
