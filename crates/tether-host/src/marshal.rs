//! Integer argument marshaling for the entry point.

use std::fmt;

use wasmtime::{FuncType, Val, ValType};

/// The outcome of calling an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub export: String,
  pub args: Vec<i64>,
  pub result: i64,
}

impl fmt::Display for Invocation {
  /// Renders e.g. `Add 5 and 10: 15`.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut chars = self.export.chars();
    if let Some(first) = chars.next() {
      write!(f, "{}{}", first.to_uppercase(), chars.as_str())?;
    }
    let args: Vec<String> = self.args.iter().map(i64::to_string).collect();
    if !args.is_empty() {
      write!(f, " {}", args.join(" and "))?;
    }
    write!(f, ": {}", self.result)
  }
}

/// Convert `args` into values matching the parameters of `ty`.
///
/// Only `i32` and `i64` parameters are accepted, and the function must return
/// exactly one of those.
pub(crate) fn marshal_args(ty: &FuncType, args: &[i64]) -> Result<Vec<Val>, String> {
  let params: Vec<ValType> = ty.params().collect();
  if params.len() != args.len() {
    return Err(format!(
      "expected {} arguments, got {}",
      params.len(),
      args.len()
    ));
  }

  let results: Vec<ValType> = ty.results().collect();
  match results.as_slice() {
    [ValType::I32] | [ValType::I64] => {}
    other => {
      return Err(format!(
        "expected a single integer result, found {}",
        describe(other)
      ));
    }
  }

  params
    .iter()
    .zip(args)
    .enumerate()
    .map(|(i, (param, &arg))| match param {
      ValType::I32 => i32::try_from(arg)
        .map(Val::I32)
        .map_err(|_| format!("argument {i} ({arg}) does not fit in i32")),
      ValType::I64 => Ok(Val::I64(arg)),
      other => Err(format!("parameter {i} has unsupported type {other}")),
    })
    .collect()
}

/// Placeholder result slot matching the single result type of `ty`.
pub(crate) fn result_slot(ty: &FuncType) -> Vec<Val> {
  ty.results()
    .map(|result| match result {
      ValType::I64 => Val::I64(0),
      _ => Val::I32(0),
    })
    .collect()
}

/// Widen the returned integer to `i64`.
pub(crate) fn unmarshal_result(results: &[Val]) -> Result<i64, String> {
  match results {
    [Val::I32(v)] => Ok(i64::from(*v)),
    [Val::I64(v)] => Ok(*v),
    _ => Err("export returned a non-integer result".to_string()),
  }
}

fn describe(types: &[ValType]) -> String {
  if types.is_empty() {
    return "no results".to_string();
  }
  let names: Vec<String> = types.iter().map(ToString::to_string).collect();
  format!("({})", names.join(", "))
}

#[cfg(test)]
mod tests {
  use wasmtime::Engine;

  use super::*;

  fn func_type(params: &[ValType], results: &[ValType]) -> FuncType {
    let engine = Engine::default();
    FuncType::new(&engine, params.iter().cloned(), results.iter().cloned())
  }

  #[test]
  fn test_i32_pair() {
    let ty = func_type(&[ValType::I32, ValType::I32], &[ValType::I32]);
    let vals = marshal_args(&ty, &[5, 10]).unwrap();
    assert!(matches!(vals.as_slice(), [Val::I32(5), Val::I32(10)]));
  }

  #[test]
  fn test_i64_params_take_full_range() {
    let ty = func_type(&[ValType::I64, ValType::I32], &[ValType::I64]);
    let vals = marshal_args(&ty, &[i64::MAX, -1]).unwrap();
    assert!(matches!(vals.as_slice(), [Val::I64(i64::MAX), Val::I32(-1)]));
    assert!(matches!(result_slot(&ty).as_slice(), [Val::I64(0)]));
  }

  #[test]
  fn test_out_of_range_for_i32() {
    let ty = func_type(&[ValType::I32, ValType::I32], &[ValType::I32]);
    let err = marshal_args(&ty, &[5, i64::from(i32::MAX) + 1]).unwrap_err();
    assert!(err.contains("argument 1"));
  }

  #[test]
  fn test_arity_mismatch() {
    let ty = func_type(&[ValType::I32], &[ValType::I32]);
    let err = marshal_args(&ty, &[5, 10]).unwrap_err();
    assert_eq!(err, "expected 1 arguments, got 2");
  }

  #[test]
  fn test_float_parameter_rejected() {
    let ty = func_type(&[ValType::F32, ValType::I32], &[ValType::I32]);
    assert!(marshal_args(&ty, &[5, 10]).is_err());
  }

  #[test]
  fn test_missing_result_rejected() {
    let ty = func_type(&[ValType::I32, ValType::I32], &[]);
    let err = marshal_args(&ty, &[5, 10]).unwrap_err();
    assert!(err.contains("no results"));
  }

  #[test]
  fn test_unmarshal_widens() {
    assert_eq!(unmarshal_result(&[Val::I32(-7)]).unwrap(), -7);
    assert_eq!(unmarshal_result(&[Val::I64(1 << 40)]).unwrap(), 1 << 40);
    assert!(unmarshal_result(&[]).is_err());
  }

  #[test]
  fn test_display_sum_line() {
    let invocation = Invocation {
      export: "add".to_string(),
      args: vec![5, 10],
      result: 15,
    };
    assert_eq!(invocation.to_string(), "Add 5 and 10: 15");
  }

  #[test]
  fn test_display_without_args() {
    let invocation = Invocation {
      export: "answer".to_string(),
      args: vec![],
      result: 42,
    };
    assert_eq!(invocation.to_string(), "Answer: 42");
  }
}
