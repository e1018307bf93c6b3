//! Builtin functions available to BDL expressions.

use crate::address::{object_reference_type, secret_reference};
use crate::context::{Function, Param};
use bdl_ast::{Type, Value};
use indexmap::IndexMap;
use std::fs;
use std::path::Path;

pub fn builtins() -> IndexMap<&'static str, Function> {
    let mut functions = IndexMap::new();
    functions.insert(
        "file",
        Function {
            params: vec![Param {
                name: "path",
                ty: Type::String,
            }],
            return_type: Type::String,
            imp: file,
        },
    );
    functions.insert(
        "secret_name",
        Function {
            params: vec![Param {
                name: "name",
                ty: Type::String,
            }],
            return_type: object_reference_type(),
            imp: secret_name,
        },
    );
    functions
}

/// `file(path)`: contents of a file, relative paths being resolved against
/// the directory of the document.
fn file(base_dir: &Path, args: &[Value]) -> Result<Value, String> {
    let path = string_arg(args, 0)?;
    let path = if Path::new(path).is_absolute() {
        Path::new(path).to_path_buf()
    } else {
        base_dir.join(path)
    };
    fs::read_to_string(&path)
        .map(Value::String)
        .map_err(|e| format!("reading {}: {e}", path.display()))
}

/// `secret_name(name)`: reference to the Secret `name`.
fn secret_name(_: &Path, args: &[Value]) -> Result<Value, String> {
    let name = string_arg(args, 0)?;
    if name.is_empty() {
        return Err("the secret name must not be empty".to_string());
    }
    Ok(secret_reference(name))
}

fn string_arg(args: &[Value], index: usize) -> Result<&str, String> {
    args.get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("argument {index} must be a string"))
}
