//! Evaluation context.
//!
//! Holds the variables expressions are evaluated against: one object per
//! component category, mapping identifiers to event destinations, e.g.
//!
//! ```text
//! target = { my_sns = { ref = { ... } } }
//! ```
//!
//! plus the function table and the directory relative `file()` paths are
//! resolved against.

use crate::address::destination_type;
use crate::funcs;
use bdl_ast::{ComponentCategory, Traversal, Type, Value};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Implementation of a builtin function.
///
/// Receives the base directory of the document and the arguments, already
/// converted to the declared parameter types and wholly known.
pub type FunctionImpl = fn(&Path, &[Value]) -> Result<Value, String>;

#[derive(Debug, Clone)]
pub struct Param {
    pub name: &'static str,
    pub ty: Type,
}

#[derive(Debug, Clone)]
pub struct Function {
    pub params: Vec<Param>,
    pub return_type: Type,
    pub imp: FunctionImpl,
}

#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    variables: IndexMap<String, Value>,
    functions: IndexMap<&'static str, Function>,
    base_dir: PathBuf,
}

impl EvalContext {
    /// A context with the builtin functions and no variables.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            variables: IndexMap::new(),
            functions: funcs::builtins(),
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    /// Records the event address of a component.
    pub fn add_address(&mut self, category: ComponentCategory, identifier: &str, address: Value) {
        let entry = self
            .variables
            .entry(category.as_str().to_string())
            .or_insert_with(|| Value::Object(IndexMap::new()));
        if let Value::Object(addresses) = entry {
            addresses.insert(identifier.to_string(), address);
        }
    }

    pub fn address(&self, category: ComponentCategory, identifier: &str) -> Option<&Value> {
        self.variables
            .get(category.as_str())?
            .as_object()?
            .get(identifier)
    }

    /// Binds an unknown destination to the component `reference` points at,
    /// unless an address is already known.
    ///
    /// Returns true when a placeholder was injected. References that do not
    /// name a referenceable component are left alone.
    pub fn ensure_placeholder(&mut self, reference: &Traversal) -> bool {
        let Some((category, identifier)) = block_reference(reference) else {
            return false;
        };
        if self.address(category, identifier).is_some() {
            return false;
        }
        self.add_address(category, identifier, Value::Unknown(destination_type()));
        true
    }
}

/// Splits a component reference such as `target.my_sns` into its category
/// and identifier.
pub fn block_reference(reference: &Traversal) -> Option<(ComponentCategory, &str)> {
    let category = ComponentCategory::from_tag(reference.root_name())?;
    if !category.is_referenceable() {
        return None;
    }
    Some((category, reference.first_attr()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::destination;
    use bdl_ast::{Span, Step};

    fn reference(root: &str, id: &str) -> Traversal {
        Traversal::new(root, vec![Step::Attr(id.to_string())], Span::zero(0))
    }

    #[test]
    fn test_addresses_grouped_by_category() {
        let mut ctx = EvalContext::new("");
        let dst = destination("v1", "Service", "svc");
        ctx.add_address(ComponentCategory::Target, "svc", dst.clone());
        ctx.add_address(ComponentCategory::Target, "other", Value::Null);

        assert_eq!(ctx.address(ComponentCategory::Target, "svc"), Some(&dst));
        assert_eq!(ctx.variable("target").unwrap().as_object().unwrap().len(), 2);
        assert!(ctx.address(ComponentCategory::Channel, "svc").is_none());
    }

    #[test]
    fn test_placeholder_injected_once() {
        let mut ctx = EvalContext::new("");
        assert!(ctx.ensure_placeholder(&reference("channel", "c")));
        assert!(!ctx.ensure_placeholder(&reference("channel", "c")));
        assert_eq!(
            ctx.address(ComponentCategory::Channel, "c"),
            Some(&Value::Unknown(destination_type()))
        );
    }

    #[test]
    fn test_non_component_references_ignored() {
        let mut ctx = EvalContext::new("");
        assert!(!ctx.ensure_placeholder(&reference("secret", "creds")));
        assert!(!ctx.ensure_placeholder(&reference("function", "f")));
        assert!(!ctx.ensure_placeholder(&Traversal::new("target", vec![], Span::zero(0))));
        assert!(ctx.variable("function").is_none());
    }

    #[test]
    fn test_builtins_registered() {
        let ctx = EvalContext::new("/tmp");
        assert!(ctx.function("file").is_some());
        assert!(ctx.function("secret_name").is_some());
        assert_eq!(ctx.base_dir(), Path::new("/tmp"));
    }
}
