use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::entry::EntryDef;
use crate::error::ConfigError;
use crate::imports::ImportSetDef;

/// Complete configuration for one harness run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
  /// Path to the binary module. Relative paths resolve against the working directory.
  pub module_path: PathBuf,
  pub imports: ImportSetDef,
  pub entry: EntryDef,
}

impl Default for HarnessConfig {
  fn default() -> Self {
    Self {
      module_path: PathBuf::from("main.wasm"),
      imports: ImportSetDef::default(),
      entry: EntryDef::default(),
    }
  }
}

impl HarnessConfig {
  /// Parse a configuration from JSON. Missing fields take their defaults.
  pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
    let config: HarnessConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
  }

  /// Read and parse a JSON configuration file.
  pub async fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = tokio::fs::read_to_string(path)
      .await
      .map_err(|e| ConfigError::io(path, e))?;
    Self::from_json_str(&content)
  }

  /// Check the invariants serde cannot express.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.module_path.as_os_str().is_empty() {
      return Err(ConfigError::invalid("module path must not be empty"));
    }
    self.imports.validate()?;
    self.entry.validate()
  }
}
