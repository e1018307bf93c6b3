//! Registry of component implementations.

use crate::translation::ComponentImpl;
use bdl_ast::ComponentCategory;
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

/// Component implementations keyed by (category, type).
#[derive(Default, Clone)]
pub struct Registry {
    impls: IndexMap<(ComponentCategory, String), Rc<dyn ComponentImpl>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `imp` for components of the given category and type,
    /// replacing any previous registration.
    pub fn register(
        &mut self,
        category: ComponentCategory,
        kind: &str,
        imp: impl ComponentImpl + 'static,
    ) -> &mut Self {
        self.impls
            .insert((category, kind.to_string()), Rc::new(imp));
        self
    }

    pub fn get(&self, category: ComponentCategory, kind: &str) -> Option<Rc<dyn ComponentImpl>> {
        self.impls.get(&(category, kind.to_string())).cloned()
    }

    /// Categories whose components can be referenced from expressions.
    pub fn referenceable_categories(&self) -> &'static [ComponentCategory] {
        &ComponentCategory::REFERENCEABLE
    }

    /// Registered types of a category, in registration order.
    pub fn kinds(&self, category: ComponentCategory) -> impl Iterator<Item = &str> {
        self.impls
            .keys()
            .filter(move |(c, _)| *c == category)
            .map(|(_, k)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.impls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.impls.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.impls.keys().map(|(c, k)| format!("{c}.{k}")))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Inert;
    impl ComponentImpl for Inert {}

    #[test]
    fn test_lookup_by_category_and_type() {
        let mut registry = Registry::new();
        registry
            .register(ComponentCategory::Source, "kafka", Inert)
            .register(ComponentCategory::Target, "kafka", Inert)
            .register(ComponentCategory::Target, "aws_sns", Inert);

        assert_eq!(registry.len(), 3);
        assert!(registry.get(ComponentCategory::Source, "kafka").is_some());
        assert!(registry.get(ComponentCategory::Channel, "kafka").is_none());
        assert_eq!(
            registry.kinds(ComponentCategory::Target).collect::<Vec<_>>(),
            ["kafka", "aws_sns"]
        );
        assert_eq!(format!("{registry:?}"), r#"["source.kafka", "target.kafka", "target.aws_sns"]"#);
        assert!(!registry.referenceable_categories().contains(&ComponentCategory::Function));
    }
}
