//! Dynamic value model used by configuration decoding.
//!
//! Component configurations are decoded into [`Value`]s whose shape is
//! described by a [`Type`]. Besides the usual JSON-like variants the model has
//! an explicit [`Value::Unknown`] variant: a typed placeholder standing for a
//! value that will only be known later. Unknown values propagate through
//! traversals and conversions, which is what allows a component to be decoded
//! before the addresses of all the components it references are known.

use indexmap::IndexMap;
use std::fmt;

/// Shape of a [`Value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// Accepts any value unchanged
    Dynamic,
    Bool,
    Number,
    String,
    List(Box<Type>),
    /// Object with arbitrary keys, all values of the same type
    Map(Box<Type>),
    /// Object with a fixed set of attributes
    Object(IndexMap<String, Type>),
}

impl Type {
    pub fn list(elem: Type) -> Type {
        Type::List(Box::new(elem))
    }

    pub fn map(elem: Type) -> Type {
        Type::Map(Box::new(elem))
    }

    pub fn object<'a>(attrs: impl IntoIterator<Item = (&'a str, Type)>) -> Type {
        Type::Object(
            attrs
                .into_iter()
                .map(|(k, t)| (k.to_string(), t))
                .collect(),
        )
    }

    /// Short human readable name, used in conversion diagnostics.
    pub fn friendly_name(&self) -> String {
        match self {
            Type::Dynamic => "any".to_string(),
            Type::Bool => "bool".to_string(),
            Type::Number => "number".to_string(),
            Type::String => "string".to_string(),
            Type::List(elem) => format!("list of {}", elem.friendly_name()),
            Type::Map(elem) => format!("map of {}", elem.friendly_name()),
            Type::Object(_) => "object".to_string(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.friendly_name())
    }
}

/// A configuration value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    /// Placeholder for a value of the given type that is not known yet
    Unknown(Type),
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Object(IndexMap<String, Value>),
}

static NULL: Value = Value::Null;

impl Value {
    pub fn string(s: impl Into<String>) -> Value {
        Value::String(s.into())
    }

    pub fn object<K: Into<String>>(attrs: impl IntoIterator<Item = (K, Value)>) -> Value {
        Value::Object(attrs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown(_))
    }

    /// Returns true if neither this value nor any nested value is unknown.
    pub fn is_wholly_known(&self) -> bool {
        match self {
            Value::Unknown(_) => false,
            Value::List(items) => items.iter().all(Value::is_wholly_known),
            Value::Object(attrs) => attrs.values().all(Value::is_wholly_known),
            _ => true,
        }
    }

    /// Returns true only for `Value::Bool(true)`.
    pub fn is_true(&self) -> bool {
        matches!(self, Value::Bool(true))
    }

    /// Returns the named attribute of an object, or null when the value is
    /// not an object or has no such attribute.
    pub fn attr(&self, name: &str) -> &Value {
        match self {
            Value::Object(attrs) => attrs.get(name).unwrap_or(&NULL),
            _ => &NULL,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(attrs) => Some(attrs),
            _ => None,
        }
    }

    /// Collects the string elements of a list, skipping anything else.
    pub fn string_list(&self) -> Vec<String> {
        self.as_list()
            .unwrap_or_default()
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    /// Name of the value's kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Unknown(_) => "unknown",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Object(_) => "object",
        }
    }

    /// Converts the value to its JSON counterpart.
    ///
    /// Whole numbers become JSON integers. Unknown values have no JSON
    /// representation and become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null | Value::Unknown(_) => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(attrs) => serde_json::Value::Object(
                attrs
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Unknown(ty) => write!(f, "(unknown {ty})"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Object(attrs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in attrs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k} = {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_on_non_objects_is_null() {
        assert!(Value::Null.attr("x").is_null());
        assert!(Value::string("a").attr("x").is_null());

        let obj = Value::object([("name", Value::string("cred"))]);
        assert_eq!(obj.attr("name").as_str(), Some("cred"));
        assert!(obj.attr("missing").is_null());
    }

    #[test]
    fn test_default_is_null() {
        assert!(Value::default().is_null());
    }

    #[test]
    fn test_wholly_known() {
        let known = Value::object([("a", Value::List(vec![Value::Number(1.0)]))]);
        assert!(known.is_wholly_known());

        let nested_unknown = Value::object([("a", Value::List(vec![Value::Unknown(Type::Number)]))]);
        assert!(!nested_unknown.is_wholly_known());
    }

    #[test]
    fn test_to_json_numbers() {
        assert_eq!(Value::Number(3.0).to_json(), serde_json::json!(3));
        assert_eq!(Value::Number(1.5).to_json(), serde_json::json!(1.5));
    }

    #[test]
    fn test_to_json_keeps_attribute_order() {
        let obj = Value::object([
            ("kind", Value::string("Secret")),
            ("apiVersion", Value::string("v1")),
        ]);
        let json = serde_json::to_string(&obj.to_json()).unwrap();
        assert_eq!(json, r#"{"kind":"Secret","apiVersion":"v1"}"#);
    }

    #[test]
    fn test_string_list() {
        let list = Value::List(vec![Value::string("a"), Value::Null, Value::string("b")]);
        assert_eq!(list.string_list(), ["a", "b"]);
        assert!(Value::Null.string_list().is_empty());
    }
}
