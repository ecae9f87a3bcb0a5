use std::path::PathBuf;

use tether_config::ConfigError;
use thiserror::Error;

/// Errors that stop a harness run.
///
/// Variants are tagged by the step that produced them. The binary handles
/// them all the same way, but callers can match on the step.
#[derive(Debug, Error)]
pub enum HarnessError {
  /// Configuration could not be loaded or failed validation.
  #[error(transparent)]
  Config(#[from] ConfigError),

  /// The module file is missing or unreadable.
  #[error("failed to read module {}: {source}", path.display())]
  File {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The bytes are not a valid module, or use an unsupported feature.
  #[error("compilation failed: {message}")]
  Compile { message: String },

  /// The import set could not be built or does not satisfy the module.
  #[error("instantiation failed: {message}")]
  Instantiate { message: String },

  /// The export is missing, has the wrong shape, or trapped.
  #[error("invoking `{export}` failed: {message}")]
  Invoke { export: String, message: String },

  /// Writing the run's output failed.
  #[error("failed to write output: {0}")]
  Output(#[source] std::io::Error),
}

impl HarnessError {
  pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::File {
      path: path.into(),
      source,
    }
  }

  pub fn compile(message: impl Into<String>) -> Self {
    Self::Compile {
      message: message.into(),
    }
  }

  pub fn instantiate(message: impl Into<String>) -> Self {
    Self::Instantiate {
      message: message.into(),
    }
  }

  pub fn invoke(export: impl Into<String>, message: impl Into<String>) -> Self {
    Self::Invoke {
      export: export.into(),
      message: message.into(),
    }
  }

  /// Short tag naming the step that failed, for structured logs.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Config(_) => "config",
      Self::File { .. } => "file",
      Self::Compile { .. } => "compile",
      Self::Instantiate { .. } => "instantiate",
      Self::Invoke { .. } => "invoke",
      Self::Output(_) => "output",
    }
  }
}
