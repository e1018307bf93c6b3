//! Addresses of messaging components.

use crate::category::ComponentCategory;
use std::fmt;

/// Uniquely names a messaging component of a Bridge.
///
/// Displays as `category.type.identifier`, e.g. `target.aws_sns.my_topic`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessagingComponent {
    pub category: ComponentCategory,
    pub identifier: String,
    /// Component type selector, e.g. `kafka`
    pub kind: String,
}

impl MessagingComponent {
    pub fn new(
        category: ComponentCategory,
        kind: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            category,
            identifier: identifier.into(),
            kind: kind.into(),
        }
    }

    /// The expression that references this component, e.g. `target.my_topic`.
    pub fn reference(&self) -> String {
        format!("{}.{}", self.category, self.identifier)
    }
}

impl fmt::Display for MessagingComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.category, self.kind, self.identifier)
    }
}
