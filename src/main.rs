use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

use tether_config::HarnessConfig;
use tether_host::{HarnessError, Invocation, Loader, create_engine, inspect_module};

/// Tether - load a WebAssembly module into a sandbox and call one export
#[derive(Parser)]
#[command(name = "tether")]
#[command(version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
  /// Log output format (level comes from RUST_LOG, default "warn")
  #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
  log_format: LogFormat,

  #[command(subcommand)]
  command: Option<Commands>,

  #[command(flatten)]
  run: RunArgs,
}

#[derive(Subcommand)]
enum Commands {
  /// Instantiate a module and call its entry point (the default command)
  Run(RunArgs),

  /// List the imports and exports a module declares
  Inspect {
    /// Path to the binary module
    module: PathBuf,
  },
}

#[derive(Args)]
struct RunArgs {
  /// Path to a JSON harness config; flags below override it
  #[arg(long)]
  config: Option<PathBuf>,

  /// Path to the binary module (default: main.wasm)
  #[arg(long)]
  module: Option<PathBuf>,

  /// Name of the exported function to call (default: add)
  #[arg(long)]
  export: Option<String>,

  /// Integer argument for the export; repeat to pass several (default: 5 10)
  #[arg(long = "arg", allow_negative_numbers = true)]
  args: Vec<i64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
  Compact,
  Json,
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_logging(cli.log_format);

  let rt = match tokio::runtime::Runtime::new() {
    Ok(rt) => rt,
    Err(e) => {
      error!(error = %e, "failed to start async runtime");
      return ExitCode::FAILURE;
    }
  };

  match cli.command {
    Some(Commands::Run(args)) => rt.block_on(run(args)),
    Some(Commands::Inspect { module }) => rt.block_on(inspect(module)),
    None => rt.block_on(run(cli.run)),
  }
}

fn init_logging(format: LogFormat) {
  use std::io::IsTerminal;

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  let subscriber = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_ansi(std::io::stderr().is_terminal())
    .with_target(true);

  match format {
    LogFormat::Json => subscriber.json().init(),
    LogFormat::Compact => subscriber.compact().init(),
  }
}

/// Every run failure ends here: log it and stop.
async fn run(args: RunArgs) -> ExitCode {
  match run_harness(args).await {
    Ok(_) => ExitCode::SUCCESS,
    Err(e) => {
      error!(kind = e.kind(), error = %e, "harness run failed");
      ExitCode::FAILURE
    }
  }
}

async fn run_harness(args: RunArgs) -> Result<Invocation, HarnessError> {
  let config = resolve_config(args).await?;
  let loader = Loader::new(config)?;
  loader.run(&mut std::io::stdout()).await
}

/// Layer CLI flags over the config file, or over the defaults when there is none.
async fn resolve_config(args: RunArgs) -> Result<HarnessConfig, HarnessError> {
  let mut config = match &args.config {
    Some(path) => HarnessConfig::load(path).await?,
    None => HarnessConfig::default(),
  };

  if let Some(module) = args.module {
    config.module_path = module;
  }
  if let Some(export) = args.export {
    config.entry.export = export;
  }
  if !args.args.is_empty() {
    config.entry.args = args.args;
  }

  Ok(config)
}

async fn inspect(module: PathBuf) -> ExitCode {
  match inspect_inner(&module).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      error!(error = %format!("{e:#}"), "inspect failed");
      ExitCode::FAILURE
    }
  }
}

async fn inspect_inner(module: &Path) -> Result<()> {
  let bytes = tokio::fs::read(module)
    .await
    .with_context(|| format!("failed to read module: {}", module.display()))?;

  let engine = create_engine()?;
  let report = inspect_module(&engine, bytes)
    .await
    .with_context(|| format!("failed to inspect module: {}", module.display()))?;

  print!("{report}");
  Ok(())
}
