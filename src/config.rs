//! Layered configuration for the board.
//!
//! Settings come from `auditboard.toml` (working directory first, then the
//! user config dir), with environment variables layered on top:
//!
//! ```toml
//! [backend]
//! base_url = "http://localhost:8080/api/findings"
//! timeout_secs = 10
//!
//! [board]
//! lanes = [
//!   { key = "not_started", label = "Not Started" },
//!   { key = "in_progress", label = "In Progress" },
//!   { key = "done", label = "Done" },
//! ]
//!
//! [search]
//! fields = ["name", "auditor", "description"]
//! ```
//!
//! Every section is optional; missing pieces fall back to defaults.
//! `AUDITBOARD_BASE_URL` overrides the configured backend URL.

use crate::model::{Lane, default_lanes};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "auditboard.toml";
pub const BASE_URL_ENV: &str = "AUDITBOARD_BASE_URL";

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080/api/findings".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Lane declarations for the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "default_lanes")]
    pub lanes: Vec<Lane>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            lanes: default_lanes(),
        }
    }
}

/// Which textual payload fields the search filter inspects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_fields")]
    pub fields: Vec<String>,
}

fn default_search_fields() -> Vec<String> {
    vec![
        "name".to_string(),
        "auditor".to_string(),
        "description".to_string(),
    ]
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            fields: default_search_fields(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl AppConfig {
    /// Load from an explicit file path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
        config.apply_env();
        Ok(config)
    }

    /// Load from the first discovered config file, or defaults if none
    /// exists. Environment overrides apply in every case.
    pub fn discover() -> Result<Self> {
        match discover_config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                let mut config = AppConfig::default();
                config.apply_env();
                Ok(config)
            }
        }
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.backend.base_url = url;
            }
        }
    }
}

/// Working directory first, then the user config dir.
fn discover_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    let user = dirs::config_dir()?.join("auditboard").join("config.toml");
    user.exists().then_some(user)
}
