//! End-to-end tests running the `tether` binary.

use std::path::Path;
use std::process::{Command, Output};

const SUM_MODULE: &str = r#"
  (module
    (import "env" "memory" (memory 32))
    (import "env" "__indirect_function_table" (table 1 1 funcref))
    (func (export "add") (param i32 i32) (result i32)
      local.get 0
      local.get 1
      i32.add))
"#;

fn write_sum_module(dir: &Path) {
  let bytes = wat::parse_str(SUM_MODULE).expect("fixture should assemble");
  std::fs::write(dir.join("main.wasm"), bytes).expect("failed to write fixture");
}

fn tether(dir: &Path, args: &[&str]) -> Output {
  Command::new(env!("CARGO_BIN_EXE_tether"))
    .args(args)
    .current_dir(dir)
    .env_remove("RUST_LOG")
    .output()
    .expect("failed to run tether")
}

fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_default_run_prints_status_then_sum() {
  let dir = tempfile::tempdir().unwrap();
  write_sum_module(dir.path());

  let output = tether(dir.path(), &[]);

  assert!(output.status.success());
  let lines: Vec<String> = stdout(&output).lines().map(String::from).collect();
  assert_eq!(lines, vec!["Module set to var `lib`...", "Add 5 and 10: 15"]);
}

#[test]
fn test_run_subcommand_is_equivalent() {
  let dir = tempfile::tempdir().unwrap();
  write_sum_module(dir.path());

  let first = tether(dir.path(), &["run"]);
  let second = tether(dir.path(), &["run"]);

  assert!(first.status.success());
  assert_eq!(stdout(&first), stdout(&second));
}

#[test]
fn test_missing_module_logs_and_fails() {
  let dir = tempfile::tempdir().unwrap();

  let output = tether(dir.path(), &[]);

  assert!(!output.status.success());
  assert!(stdout(&output).is_empty());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("harness run failed"), "stderr: {stderr}");
  assert!(stderr.contains("main.wasm"), "stderr: {stderr}");
}

#[test]
fn test_flags_override_entry() {
  let dir = tempfile::tempdir().unwrap();
  write_sum_module(dir.path());

  let output = tether(dir.path(), &["--arg", "-3", "--arg", "40"]);

  assert!(output.status.success());
  assert!(stdout(&output).ends_with("Add -3 and 40: 37\n"));
}

#[test]
fn test_config_file_sets_module_path() {
  let dir = tempfile::tempdir().unwrap();
  let build = dir.path().join("build");
  std::fs::create_dir(&build).unwrap();
  write_sum_module(&build);
  std::fs::write(
    dir.path().join("tether.json"),
    r#"{"module_path": "build/main.wasm", "entry": {"args": [20, 22]}}"#,
  )
  .unwrap();

  let output = tether(dir.path(), &["run", "--config", "tether.json"]);

  assert!(output.status.success());
  assert!(stdout(&output).ends_with("Add 20 and 22: 42\n"));
}

#[test]
fn test_inspect_lists_module_surface() {
  let dir = tempfile::tempdir().unwrap();
  write_sum_module(dir.path());

  let output = tether(dir.path(), &["inspect", "main.wasm"]);

  assert!(output.status.success());
  assert_eq!(
    stdout(&output),
    "import memory env.memory\nimport table env.__indirect_function_table\nexport func add\n"
  );
}

#[test]
fn test_inspect_malformed_module_fails() {
  let dir = tempfile::tempdir().unwrap();
  std::fs::write(dir.path().join("main.wasm"), b"not a module").unwrap();

  let output = tether(dir.path(), &["inspect", "main.wasm"]);

  assert!(!output.status.success());
  assert!(stdout(&output).is_empty());
}

#[test]
fn test_missing_config_file_is_named_in_log() {
  let dir = tempfile::tempdir().unwrap();
  write_sum_module(dir.path());

  let output = tether(dir.path(), &["run", "--config", "absent.json"]);

  assert!(!output.status.success());
  assert!(stdout(&output).is_empty());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("absent.json"), "stderr: {stderr}");
}
