//! Engine creation and module compilation.

use wasmtime::{Config, Engine, Module};

use crate::error::HarnessError;

/// Create the engine every run uses.
///
/// Async support is always on: instantiation and calls are awaited. Epoch
/// interruption stays off, so a run has no timeout.
pub fn create_engine() -> Result<Engine, HarnessError> {
  let mut wasm_config = Config::new();
  wasm_config.async_support(true);

  Engine::new(&wasm_config)
    .map_err(|e| HarnessError::compile(format!("failed to create engine: {e:#}")))
}

/// Validate and compile `bytes` on the blocking pool.
pub(crate) async fn compile_module(engine: &Engine, bytes: Vec<u8>) -> Result<Module, HarnessError> {
  let engine = engine.clone();
  tokio::task::spawn_blocking(move || Module::new(&engine, &bytes))
    .await
    .map_err(|e| HarnessError::compile(format!("compile task failed: {e}")))?
    .map_err(|e| HarnessError::compile(format!("{e:#}")))
}
