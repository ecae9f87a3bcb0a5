//! Tether Config
//!
//! This crate contains the serializable configuration types for the tether
//! harness: which module to load, the import set offered to it, and the
//! entry point to call once it is instantiated.
//!
//! Every field has a default, so an empty JSON object is a complete
//! configuration. The defaults describe a module built to import
//! `env.memory` (32 pages) and `env.__indirect_function_table` (1/1) and to
//! export `add`, which is called with `(5, 10)`.
//!
//! ```json
//! {
//!   "module_path": "build/main.wasm",
//!   "imports": { "memory": { "initial_pages": 64 } },
//!   "entry": { "export": "mul", "args": [6, 7] }
//! }
//! ```

mod entry;
mod error;
mod harness;
mod imports;

pub use entry::EntryDef;
pub use error::ConfigError;
pub use harness::HarnessConfig;
pub use imports::{ImportSetDef, MemoryDef, TableDef};
