//! Wasmtime host loader for tether.
//!
//! This crate runs one module through a fixed sequence of fallible steps:
//!
//! ```text
//! read bytes ─▶ compile ─▶ build imports ─▶ instantiate ─▶ invoke
//! ```
//!
//! Each step returns `Result<_, HarnessError>`, so an instance can only be
//! invoked once instantiation has completed, and any failure stops the
//! sequence. The import set is one linear memory and one empty `funcref`
//! table, both described by [`tether_config::ImportSetDef`].

mod engine;
mod error;
mod imports;
mod inspect;
mod loader;
mod marshal;
mod state;

pub use engine::create_engine;
pub use error::HarnessError;
pub use imports::ImportSet;
pub use inspect::{ExportEntry, ImportEntry, ItemKind, ModuleReport, inspect_module};
pub use loader::{LoadedModule, Loader, STATUS_LINE};
pub use marshal::Invocation;
pub use state::HostState;
