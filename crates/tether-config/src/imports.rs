use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest page count a 32-bit linear memory can address.
pub(crate) const MAX_MEMORY_PAGES: u32 = 65536;

/// The capabilities offered to the module before instantiation.
///
/// Both entries live under the same import module name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSetDef {
  /// Import module name, e.g. "env".
  pub module: String,
  pub memory: MemoryDef,
  pub table: TableDef,
}

impl Default for ImportSetDef {
  fn default() -> Self {
    Self {
      module: "env".to_string(),
      memory: MemoryDef::default(),
      table: TableDef::default(),
    }
  }
}

/// Linear memory offered to the module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryDef {
  pub name: String,
  pub initial_pages: u32,
  /// Upper bound on growth. `None` lets the module grow it up to the engine limit.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub maximum_pages: Option<u32>,
}

impl Default for MemoryDef {
  fn default() -> Self {
    Self {
      name: "memory".to_string(),
      initial_pages: 32,
      maximum_pages: None,
    }
  }
}

/// Indirect call table offered to the module. Entries are never populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableDef {
  pub name: String,
  pub initial: u32,
  pub maximum: u32,
}

impl Default for TableDef {
  fn default() -> Self {
    Self {
      name: "__indirect_function_table".to_string(),
      initial: 1,
      maximum: 1,
    }
  }
}

impl ImportSetDef {
  pub(crate) fn validate(&self) -> Result<(), ConfigError> {
    if self.module.is_empty() {
      return Err(ConfigError::invalid("import module name must not be empty"));
    }
    if self.memory.name.is_empty() || self.table.name.is_empty() {
      return Err(ConfigError::invalid("import field names must not be empty"));
    }

    let memory = &self.memory;
    let largest = memory.maximum_pages.unwrap_or(memory.initial_pages);
    if memory.initial_pages.max(largest) > MAX_MEMORY_PAGES {
      return Err(ConfigError::invalid(format!(
        "memory pages must not exceed {MAX_MEMORY_PAGES}"
      )));
    }
    if let Some(maximum) = memory.maximum_pages
      && memory.initial_pages > maximum
    {
      return Err(ConfigError::invalid(format!(
        "memory initial pages {} exceed maximum {}",
        memory.initial_pages, maximum
      )));
    }

    if self.table.initial > self.table.maximum {
      return Err(ConfigError::invalid(format!(
        "table initial size {} exceeds maximum {}",
        self.table.initial, self.table.maximum
      )));
    }

    Ok(())
  }
}
