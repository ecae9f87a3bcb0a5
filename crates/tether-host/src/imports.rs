//! The import set offered to a module.

use tether_config::ImportSetDef;
use wasmtime::{
  AsContext, AsContextMut, Linker, Memory, MemoryType, Ref, RefType, Table, TableType,
};

use crate::error::HarnessError;

/// One linear memory and one empty `funcref` table, created in a run's store.
///
/// The host keeps handles to both so it can report on them, but never reads
/// or writes them after handing them to the instance.
pub struct ImportSet {
  module: String,
  memory_name: String,
  table_name: String,
  memory: Memory,
  table: Table,
}

impl ImportSet {
  /// Create the memory and table described by `def` inside `store`.
  pub fn build(mut store: impl AsContextMut, def: &ImportSetDef) -> Result<Self, HarnessError> {
    let memory_ty = MemoryType::new(def.memory.initial_pages, def.memory.maximum_pages);
    let memory = Memory::new(&mut store, memory_ty).map_err(|e| {
      HarnessError::instantiate(format!(
        "failed to create memory `{}.{}`: {e:#}",
        def.module, def.memory.name
      ))
    })?;

    let table_ty = TableType::new(RefType::FUNCREF, def.table.initial, Some(def.table.maximum));
    let table = Table::new(&mut store, table_ty, Ref::Func(None)).map_err(|e| {
      HarnessError::instantiate(format!(
        "failed to create table `{}.{}`: {e:#}",
        def.module, def.table.name
      ))
    })?;

    Ok(Self {
      module: def.module.clone(),
      memory_name: def.memory.name.clone(),
      table_name: def.table.name.clone(),
      memory,
      table,
    })
  }

  /// Register both imports with `linker` under the import module name.
  pub fn define<T: 'static>(
    &self,
    linker: &mut Linker<T>,
    store: impl AsContext<Data = T>,
  ) -> Result<(), HarnessError> {
    let store = store.as_context();
    linker
      .define(&store, &self.module, &self.memory_name, self.memory)
      .and_then(|linker| linker.define(&store, &self.module, &self.table_name, self.table))
      .map_err(|e| HarnessError::instantiate(format!("failed to define imports: {e:#}")))?;
    Ok(())
  }

  /// Current memory size in pages.
  pub fn memory_pages(&self, store: impl AsContext) -> u64 {
    self.memory.size(store)
  }

  /// Current table size in elements.
  pub fn table_size(&self, store: impl AsContext) -> u64 {
    self.table.size(store)
  }

  /// Whether every table slot still holds a null reference.
  pub fn table_is_empty(&self, mut store: impl AsContextMut) -> bool {
    let size = self.table.size(&store);
    (0..size).all(|i| {
      self
        .table
        .get(&mut store, i)
        .is_none_or(|entry| entry.is_null())
    })
  }
}
