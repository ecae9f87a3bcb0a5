use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The export called once the module is instantiated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryDef {
  /// Name of the exported function.
  pub export: String,

  /// Integer arguments, marshaled to the export's `i32`/`i64` parameters.
  pub args: Vec<i64>,
}

impl Default for EntryDef {
  fn default() -> Self {
    Self {
      export: "add".to_string(),
      args: vec![5, 10],
    }
  }
}

impl EntryDef {
  pub(crate) fn validate(&self) -> Result<(), ConfigError> {
    if self.export.is_empty() {
      return Err(ConfigError::invalid("entry export name must not be empty"));
    }
    Ok(())
  }
}
