//! Configuration schemas.
//!
//! A [`Spec`] describes the attributes and nested blocks a component accepts
//! and the shape of the value its body decodes to. Specs nest: an object
//! spec maps result attribute names to child specs, block specs carry the
//! spec of the block's own body.
//!
//! # Examples
//!
//! ```
//! # use bdl_core::schema::Spec;
//! # use bdl_ast::Type;
//! let spec = Spec::object([
//!     ("arn", Spec::required_attr("arn", Type::String)),
//!     ("region", Spec::optional_attr("region", Type::String)),
//! ]);
//! assert_eq!(spec.attribute_names(), ["arn", "region"]);
//! ```

use bdl_ast::{Diagnostics, Type, Value};
use indexmap::IndexMap;
use std::fmt;

/// Validation hook attached to a spec.
///
/// Receives the decoded, wholly known, non-null value and returns the
/// problems found. Diagnostics without a subject are attached to the
/// validated attribute.
pub type ValidateFn = fn(&Value) -> Diagnostics;

#[derive(Clone)]
pub enum Spec {
    /// Decodes to an object with one attribute per child spec.
    Object(IndexMap<String, Spec>),
    /// A single `name = expr` attribute, converted to `ty`.
    Attr {
        name: String,
        ty: Type,
        required: bool,
    },
    /// A single nested block. Decodes to null when absent.
    Block {
        type_name: String,
        nested: Box<Spec>,
        required: bool,
    },
    /// Any number of nested blocks of one type. Decodes to a list.
    /// A `max_items` of 0 means unbounded.
    BlockList {
        type_name: String,
        nested: Box<Spec>,
        min_items: usize,
        max_items: usize,
    },
    /// A label of the enclosing block.
    BlockLabel { index: usize, name: String },
    /// Replaces a null result with `default`.
    Default { wrapped: Box<Spec>, default: Value },
    /// Runs `func` on the result of `wrapped`.
    Validate { wrapped: Box<Spec>, func: ValidateFn },
}

impl Spec {
    pub fn object<'a>(children: impl IntoIterator<Item = (&'a str, Spec)>) -> Spec {
        Spec::Object(
            children
                .into_iter()
                .map(|(k, s)| (k.to_string(), s))
                .collect(),
        )
    }

    pub fn required_attr(name: &str, ty: Type) -> Spec {
        Spec::Attr {
            name: name.to_string(),
            ty,
            required: true,
        }
    }

    pub fn optional_attr(name: &str, ty: Type) -> Spec {
        Spec::Attr {
            name: name.to_string(),
            ty,
            required: false,
        }
    }

    pub fn block(type_name: &str, nested: Spec, required: bool) -> Spec {
        Spec::Block {
            type_name: type_name.to_string(),
            nested: Box::new(nested),
            required,
        }
    }

    pub fn block_list(type_name: &str, nested: Spec, min_items: usize, max_items: usize) -> Spec {
        Spec::BlockList {
            type_name: type_name.to_string(),
            nested: Box::new(nested),
            min_items,
            max_items,
        }
    }

    pub fn label(index: usize, name: &str) -> Spec {
        Spec::BlockLabel {
            index,
            name: name.to_string(),
        }
    }

    pub fn with_default(self, default: Value) -> Spec {
        Spec::Default {
            wrapped: Box::new(self),
            default,
        }
    }

    pub fn validated(self, func: ValidateFn) -> Spec {
        Spec::Validate {
            wrapped: Box::new(self),
            func,
        }
    }

    /// Attribute names consumed from the body this spec is applied to.
    pub fn attribute_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_content(&mut names, &mut Vec::new());
        names
    }

    /// Block types consumed from the body this spec is applied to.
    pub fn block_types(&self) -> Vec<&str> {
        let mut types = Vec::new();
        self.collect_content(&mut Vec::new(), &mut types);
        types
    }

    /// Number of labels a block decoded with this spec must carry.
    pub fn label_names(&self) -> Vec<&str> {
        let mut labels: Vec<(usize, &str)> = Vec::new();
        self.collect_labels(&mut labels);
        labels.sort_by_key(|(index, _)| *index);
        labels.into_iter().map(|(_, name)| name).collect()
    }

    fn collect_content<'a>(&'a self, attrs: &mut Vec<&'a str>, blocks: &mut Vec<&'a str>) {
        match self {
            Spec::Object(children) => children
                .values()
                .for_each(|c| c.collect_content(attrs, blocks)),
            Spec::Attr { name, .. } => attrs.push(name),
            Spec::Block { type_name, .. } | Spec::BlockList { type_name, .. } => {
                blocks.push(type_name)
            }
            Spec::BlockLabel { .. } => {}
            Spec::Default { wrapped, .. } | Spec::Validate { wrapped, .. } => {
                wrapped.collect_content(attrs, blocks)
            }
        }
    }

    fn collect_labels<'a>(&'a self, labels: &mut Vec<(usize, &'a str)>) {
        match self {
            Spec::Object(children) => children.values().for_each(|c| c.collect_labels(labels)),
            Spec::BlockLabel { index, name } => labels.push((*index, name)),
            Spec::Default { wrapped, .. } | Spec::Validate { wrapped, .. } => {
                wrapped.collect_labels(labels)
            }
            Spec::Attr { .. } | Spec::Block { .. } | Spec::BlockList { .. } => {}
        }
    }
}

impl fmt::Debug for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spec::Object(children) => f.debug_map().entries(children.iter()).finish(),
            Spec::Attr { name, ty, required } => f
                .debug_struct("Attr")
                .field("name", name)
                .field("ty", ty)
                .field("required", required)
                .finish(),
            Spec::Block {
                type_name,
                nested,
                required,
            } => f
                .debug_struct("Block")
                .field("type_name", type_name)
                .field("nested", nested)
                .field("required", required)
                .finish(),
            Spec::BlockList {
                type_name,
                nested,
                min_items,
                max_items,
            } => f
                .debug_struct("BlockList")
                .field("type_name", type_name)
                .field("nested", nested)
                .field("min_items", min_items)
                .field("max_items", max_items)
                .finish(),
            Spec::BlockLabel { index, name } => f
                .debug_struct("BlockLabel")
                .field("index", index)
                .field("name", name)
                .finish(),
            Spec::Default { wrapped, default } => f
                .debug_struct("Default")
                .field("wrapped", wrapped)
                .field("default", default)
                .finish(),
            Spec::Validate { wrapped, .. } => {
                f.debug_struct("Validate").field("wrapped", wrapped).finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route_spec() -> Spec {
        Spec::object([
            ("name", Spec::label(0, "name")),
            ("to", Spec::required_attr("to", Type::Dynamic)),
        ])
    }

    #[test]
    fn test_content_is_collected_through_wrappers() {
        let spec = Spec::object([
            (
                "tls",
                Spec::optional_attr("tls", Type::Dynamic).validated(|_| Diagnostics::new()),
            ),
            (
                "entrypoint",
                Spec::optional_attr("entrypoint", Type::String).with_default(Value::string("main")),
            ),
            ("route", Spec::block_list("route", route_spec(), 1, 0)),
        ]);

        assert_eq!(spec.attribute_names(), ["tls", "entrypoint"]);
        assert_eq!(spec.block_types(), ["route"]);
    }

    #[test]
    fn test_label_names_sorted_by_index() {
        let spec = Spec::object([
            ("second", Spec::label(1, "key")),
            ("first", Spec::label(0, "name")),
        ]);
        assert_eq!(spec.label_names(), ["name", "key"]);
        assert!(route_spec().attribute_names().contains(&"to"));
    }
}
