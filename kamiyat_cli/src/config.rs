//! CLI configuration.
//!
//! Read from `--config <path>`, else `kamiyat.toml` in the working directory,
//! else defaults. `KAMIYAT_STORE`, `KAMIYAT_ENGINEER_ID` and
//! `KAMIYAT_ENGINEER_NAME` override the file (a `.env` file is loaded first).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use kamiyat_core::project::EngineerInfo;
use kamiyat_core::reference::{ReferenceCache, ReferenceTables};

pub const DEFAULT_CONFIG_FILE: &str = "kamiyat.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// JSON report store
    pub store_path: PathBuf,
    /// Reference tables JSON; the built-in tables when unset
    pub reference_path: Option<PathBuf>,
    pub reference_ttl_secs: u64,
    pub engineer_id: String,
    pub engineer_name: String,
    /// Used when RUST_LOG is not set
    pub log_filter: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            store_path: PathBuf::from("kamiyat-reports.json"),
            reference_path: None,
            reference_ttl_secs: 600,
            engineer_id: "engineer".to_string(),
            engineer_name: "Engineer".to_string(),
            log_filter: "kamiyat=info,kamiyat_core=info".to_string(),
        }
    }
}

impl CliConfig {
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => CliConfig::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse config {}", path.display()))
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(store) = lookup("KAMIYAT_STORE") {
            self.store_path = PathBuf::from(store);
        }
        if let Some(id) = lookup("KAMIYAT_ENGINEER_ID") {
            self.engineer_id = id;
        }
        if let Some(name) = lookup("KAMIYAT_ENGINEER_NAME") {
            self.engineer_name = name;
        }
    }

    pub fn engineer(&self) -> EngineerInfo {
        EngineerInfo::new(&self.engineer_id, &self.engineer_name)
    }

    pub fn reference_cache(&self) -> Result<ReferenceCache<ReferenceTables>> {
        let tables = match &self.reference_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read reference tables {}", path.display()))?;
                ReferenceTables::from_json(&json)
                    .with_context(|| format!("Invalid reference tables in {}", path.display()))?
            }
            None => ReferenceTables::builtin().clone(),
        };
        let ttl_secs = i64::try_from(self.reference_ttl_secs).unwrap_or(i64::MAX);
        Ok(ReferenceCache::new(tables, chrono::Duration::seconds(ttl_secs)))
    }
}
