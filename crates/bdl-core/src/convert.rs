//! Conversion of values to a target [`Type`].
//!
//! Rules:
//! - anything converts to `dynamic` unchanged
//! - null converts to null and unknown to unknown of the target type
//! - numbers and bools convert to strings
//! - strings convert to numbers and bools when they parse as such
//! - lists and maps convert element-wise, objects attribute-wise; attributes
//!   missing from an object become null, extra ones are rejected

use bdl_ast::{Type, Value};
use indexmap::IndexMap;

/// Converts `value` to `ty`, or explains why it can not be.
pub fn convert(value: &Value, ty: &Type) -> Result<Value, String> {
    match (value, ty) {
        (_, Type::Dynamic) => Ok(value.clone()),
        (Value::Null, _) => Ok(Value::Null),
        (Value::Unknown(_), _) => Ok(Value::Unknown(ty.clone())),

        (Value::Bool(_), Type::Bool) => Ok(value.clone()),
        (Value::String(s), Type::Bool) => match s.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(required(ty)),
        },

        (Value::Number(_), Type::Number) => Ok(value.clone()),
        (Value::String(s), Type::Number) => s
            .trim()
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| required(ty)),

        (Value::String(_), Type::String) => Ok(value.clone()),
        (Value::Number(n), Type::String) => Ok(Value::String(format_number(*n))),
        (Value::Bool(b), Type::String) => Ok(Value::String(b.to_string())),

        (Value::List(items), Type::List(elem)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| convert(item, elem).map_err(|e| format!("element {i}: {e}")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),

        (Value::Object(attrs), Type::Map(elem)) => attrs
            .iter()
            .map(|(k, v)| {
                convert(v, elem)
                    .map(|v| (k.clone(), v))
                    .map_err(|e| format!("element \"{k}\": {e}"))
            })
            .collect::<Result<IndexMap<_, _>, _>>()
            .map(Value::Object),

        (Value::Object(attrs), Type::Object(attr_types)) => {
            if let Some(extra) = attrs.keys().find(|k| !attr_types.contains_key(*k)) {
                return Err(format!("unsupported attribute \"{extra}\""));
            }
            attr_types
                .iter()
                .map(|(name, attr_ty)| {
                    let v = attrs.get(name).unwrap_or(&Value::Null);
                    convert(v, attr_ty)
                        .map(|v| (name.clone(), v))
                        .map_err(|e| format!("attribute \"{name}\": {e}"))
                })
                .collect::<Result<IndexMap<_, _>, _>>()
                .map(Value::Object)
        }

        _ => Err(required(ty)),
    }
}

fn required(ty: &Type) -> String {
    format!("{} required", ty.friendly_name())
}

/// Formats a number the way it is written in source: whole numbers without
/// a fractional part.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
