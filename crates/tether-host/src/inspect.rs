//! Listing of a module's declared imports and exports.

use std::fmt;

use wasmtime::{Engine, ExternType};

use crate::engine::compile_module;
use crate::error::HarnessError;

/// Kind of an import or export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
  Func,
  Global,
  Table,
  Memory,
  /// Anything else the engine supports, such as exception tags.
  Other,
}

impl ItemKind {
  fn of(ty: &ExternType) -> Self {
    match ty {
      ExternType::Func(_) => Self::Func,
      ExternType::Global(_) => Self::Global,
      ExternType::Table(_) => Self::Table,
      ExternType::Memory(_) => Self::Memory,
      #[allow(unreachable_patterns)]
      _ => Self::Other,
    }
  }
}

impl fmt::Display for ItemKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Func => "func",
      Self::Global => "global",
      Self::Table => "table",
      Self::Memory => "memory",
      Self::Other => "other",
    };
    f.write_str(name)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
  pub module: String,
  pub name: String,
  pub kind: ItemKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
  pub name: String,
  pub kind: ItemKind,
}

/// What a module asks the host for and what it offers back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleReport {
  pub imports: Vec<ImportEntry>,
  pub exports: Vec<ExportEntry>,
}

impl ModuleReport {
  pub fn import(&self, module: &str, name: &str) -> Option<&ImportEntry> {
    self
      .imports
      .iter()
      .find(|i| i.module == module && i.name == name)
  }

  pub fn export(&self, name: &str) -> Option<&ExportEntry> {
    self.exports.iter().find(|e| e.name == name)
  }
}

impl fmt::Display for ModuleReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for import in &self.imports {
      writeln!(f, "import {} {}.{}", import.kind, import.module, import.name)?;
    }
    for export in &self.exports {
      writeln!(f, "export {} {}", export.kind, export.name)?;
    }
    Ok(())
  }
}

/// Compile `bytes` on the blocking pool and list the module's imports and exports.
pub async fn inspect_module(engine: &Engine, bytes: Vec<u8>) -> Result<ModuleReport, HarnessError> {
  let module = compile_module(engine, bytes).await?;

  let imports = module
    .imports()
    .map(|import| ImportEntry {
      module: import.module().to_string(),
      name: import.name().to_string(),
      kind: ItemKind::of(&import.ty()),
    })
    .collect();

  let exports = module
    .exports()
    .map(|export| ExportEntry {
      name: export.name().to_string(),
      kind: ItemKind::of(&export.ty()),
    })
    .collect();

  Ok(ModuleReport { imports, exports })
}
