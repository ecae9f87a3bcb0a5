/// Host state stored in the wasmtime Store.
///
/// The module gets no host functions, so the state only identifies the run
/// for logging. Every run gets a fresh state and store.
#[derive(Debug, Clone)]
pub struct HostState {
  pub run_id: String,
}

impl HostState {
  pub fn new() -> Self {
    Self {
      run_id: uuid::Uuid::new_v4().to_string(),
    }
  }
}

impl Default for HostState {
  fn default() -> Self {
    Self::new()
  }
}
