//! # Configuration
//!
//! Runtime settings for the kennel backend, loaded from a YAML file with a few
//! environment overrides layered on top.
//!
//! Lookup order for the file:
//! 1. the path in `KENNEL_CONFIG`
//! 2. `<user config dir>/kennel/config.yaml`
//! 3. built-in defaults when neither exists

use anyhow::{Context, Result};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What happens when a grumble member still referenced by a litter is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParentDeletePolicy {
    /// Reject the delete while any litter points at the member
    Block,
    /// Copy the member's name onto the referencing litters, then delete
    Detach,
}

impl Default for ParentDeletePolicy {
    fn default() -> Self {
        ParentDeletePolicy::Block
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KennelConfig {
    pub database_url: String,
    pub bind_address: String,
    pub uploads_dir: PathBuf,
    /// Bearer token accepted on admin routes. Admin routes reject everything when unset.
    pub admin_token: Option<String>,
    /// Offset of the kennel's business timezone, in minutes east of UTC
    pub business_utc_offset_minutes: i32,
    pub parent_delete_policy: ParentDeletePolicy,
    pub cors_origin: String,
    pub log_level: String,
}

impl Default for KennelConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:kennel.db".to_string(),
            bind_address: "127.0.0.1:3000".to_string(),
            uploads_dir: PathBuf::from("uploads"),
            admin_token: None,
            // US Central standard time
            business_utc_offset_minutes: -6 * 60,
            parent_delete_policy: ParentDeletePolicy::Block,
            cors_origin: "http://localhost:8080".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl KennelConfig {
    /// Load configuration from the standard locations and apply env overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                info!("Loading configuration from {}", path.display());
                Self::from_file(&path)?
            }
            Some(path) => {
                info!("No configuration file at {}, using defaults", path.display());
                Self::default()
            }
            None => {
                warn!("Could not determine a configuration directory, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&yaml_content)
    }

    pub fn from_yaml(yaml_content: &str) -> Result<Self> {
        let config: KennelConfig =
            serde_yaml::from_str(yaml_content).context("Failed to parse kennel configuration")?;
        Ok(config)
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(explicit) = std::env::var("KENNEL_CONFIG") {
            return Some(PathBuf::from(explicit));
        }
        dirs::config_dir().map(|dir| dir.join("kennel").join("config.yaml"))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("KENNEL_DATABASE_URL") {
            self.database_url = url;
        }
        if let Ok(addr) = std::env::var("KENNEL_BIND_ADDRESS") {
            self.bind_address = addr;
        }
        if let Ok(token) = std::env::var("KENNEL_ADMIN_TOKEN") {
            self.admin_token = Some(token);
        }
        if let Ok(dir) = std::env::var("KENNEL_UPLOADS_DIR") {
            self.uploads_dir = PathBuf::from(dir);
        }
    }

    fn validate(&self) -> Result<()> {
        self.business_offset()?;
        if self.admin_token.as_deref().map(str::trim).unwrap_or("").is_empty() {
            warn!("No admin token configured; admin routes will reject every request");
        }
        Ok(())
    }

    /// The business timezone as a chrono offset
    pub fn business_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.business_utc_offset_minutes * 60).ok_or_else(|| {
            anyhow::anyhow!(
                "business_utc_offset_minutes out of range: {}",
                self.business_utc_offset_minutes
            )
        })
    }
}
