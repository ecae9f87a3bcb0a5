//! The load-and-invoke sequence.

use std::io::Write;

use tether_config::HarnessConfig;
use tracing::{debug, info, instrument};
use wasmtime::{Engine, Instance, Linker, Module, Store};

use crate::engine::{compile_module, create_engine};
use crate::error::HarnessError;
use crate::imports::ImportSet;
use crate::marshal::{Invocation, marshal_args, result_slot, unmarshal_result};
use crate::state::HostState;

/// Printed once the instance is ready, before the entry point runs.
pub const STATUS_LINE: &str = "Module set to var `lib`...";

/// Runs one module through read, compile, instantiate and invoke.
///
/// The loader owns the engine. Each call to [`Loader::instantiate`] creates a
/// fresh store, so nothing carries over between runs.
pub struct Loader {
  engine: Engine,
  config: HarnessConfig,
}

impl Loader {
  /// Validate `config` and create the loader's async engine.
  pub fn new(config: HarnessConfig) -> Result<Self, HarnessError> {
    config.validate()?;
    let engine = create_engine()?;
    Ok(Self { engine, config })
  }

  /// Read the whole module file.
  pub async fn read_module(&self) -> Result<Vec<u8>, HarnessError> {
    let path = &self.config.module_path;
    let bytes = tokio::fs::read(path)
      .await
      .map_err(|e| HarnessError::file(path, e))?;
    debug!(path = %path.display(), size = bytes.len(), "module bytes read");
    Ok(bytes)
  }

  /// Validate and compile `bytes` on the blocking pool.
  pub async fn compile(&self, bytes: Vec<u8>) -> Result<Module, HarnessError> {
    let module = compile_module(&self.engine, bytes).await?;
    debug!(
      imports = module.imports().len(),
      exports = module.exports().len(),
      "module compiled"
    );
    Ok(module)
  }

  /// Build the import set in a fresh store and instantiate `module` against it.
  ///
  /// The module is consumed; it is not cached for later runs.
  pub async fn instantiate(&self, module: Module) -> Result<LoadedModule, HarnessError> {
    let mut store = Store::new(&self.engine, HostState::new());
    let imports = ImportSet::build(&mut store, &self.config.imports)?;

    let mut linker = Linker::new(&self.engine);
    imports.define(&mut linker, &store)?;

    let instance = linker
      .instantiate_async(&mut store, &module)
      .await
      .map_err(|e| HarnessError::instantiate(format!("{e:#}")))?;
    debug!(run_id = %store.data().run_id, "module instantiated");

    Ok(LoadedModule {
      store,
      instance,
      imports,
    })
  }

  /// Run the whole sequence, writing the status line and the result line to `out`.
  ///
  /// Nothing is written unless instantiation succeeds, and the result line is
  /// only written after the status line.
  #[instrument(name = "harness_run", skip(self, out), fields(module = %self.config.module_path.display()))]
  pub async fn run<W: Write>(&self, out: &mut W) -> Result<Invocation, HarnessError> {
    let bytes = self.read_module().await?;
    let module = self.compile(bytes).await?;
    let mut loaded = self.instantiate(module).await?;

    writeln!(out, "{STATUS_LINE}").map_err(HarnessError::Output)?;

    let entry = &self.config.entry;
    let invocation = loaded.invoke(&entry.export, &entry.args).await?;

    writeln!(out, "{invocation}").map_err(HarnessError::Output)?;
    info!(
      run_id = %loaded.run_id(),
      export = %invocation.export,
      result = invocation.result,
      "run completed"
    );

    Ok(invocation)
  }
}

/// A live module instance with the store and imports it was created with.
pub struct LoadedModule {
  store: Store<HostState>,
  instance: Instance,
  imports: ImportSet,
}

impl LoadedModule {
  pub fn run_id(&self) -> &str {
    &self.store.data().run_id
  }

  /// Call the integer function `export` with `args`.
  pub async fn invoke(&mut self, export: &str, args: &[i64]) -> Result<Invocation, HarnessError> {
    let func = self
      .instance
      .get_func(&mut self.store, export)
      .ok_or_else(|| HarnessError::invoke(export, "no exported function with this name"))?;

    let ty = func.ty(&self.store);
    let params = marshal_args(&ty, args).map_err(|m| HarnessError::invoke(export, m))?;
    let mut results = result_slot(&ty);

    debug!(run_id = %self.run_id(), export, ?args, "invoking export");
    func
      .call_async(&mut self.store, &params, &mut results)
      .await
      .map_err(|e| HarnessError::invoke(export, format!("{e:#}")))?;

    let result = unmarshal_result(&results).map_err(|m| HarnessError::invoke(export, m))?;

    Ok(Invocation {
      export: export.to_string(),
      args: args.to_vec(),
      result,
    })
  }

  /// Names of the instance's exports, in declaration order.
  pub fn export_names(&mut self) -> Vec<String> {
    self
      .instance
      .exports(&mut self.store)
      .map(|export| export.name().to_string())
      .collect()
  }

  /// Current size of the imported memory in pages.
  pub fn memory_pages(&self) -> u64 {
    self.imports.memory_pages(&self.store)
  }

  /// Current size of the imported table in elements.
  pub fn table_size(&self) -> u64 {
    self.imports.table_size(&self.store)
  }

  /// Whether the imported table still holds only null references.
  pub fn table_is_empty(&mut self) -> bool {
    self.imports.table_is_empty(&mut self.store)
  }
}
