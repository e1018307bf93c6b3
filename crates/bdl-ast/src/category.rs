//! Component categories.

use std::fmt;
use std::str::FromStr;

/// Category of a Bridge component.
///
/// The category is also the root name under which components are referenced
/// from expressions, e.g. `target.my_sns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentCategory {
    Channel,
    Router,
    Transformer,
    Source,
    Target,
    /// Reserved. Functions are not Bridge components and can not be referenced.
    Function,
}

impl ComponentCategory {
    pub const ALL: [ComponentCategory; 6] = [
        ComponentCategory::Channel,
        ComponentCategory::Router,
        ComponentCategory::Transformer,
        ComponentCategory::Source,
        ComponentCategory::Target,
        ComponentCategory::Function,
    ];

    /// Categories whose components may appear in references.
    pub const REFERENCEABLE: [ComponentCategory; 5] = [
        ComponentCategory::Channel,
        ComponentCategory::Router,
        ComponentCategory::Transformer,
        ComponentCategory::Source,
        ComponentCategory::Target,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentCategory::Channel => "channel",
            ComponentCategory::Router => "router",
            ComponentCategory::Transformer => "transformer",
            ComponentCategory::Source => "source",
            ComponentCategory::Target => "target",
            ComponentCategory::Function => "function",
        }
    }

    /// Parses a category tag as it appears in block types and references.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == tag)
    }

    pub fn is_referenceable(self) -> bool {
        Self::REFERENCEABLE.contains(&self)
    }

    /// Position of the category along a typical event flow.
    ///
    /// Used to order otherwise unordered components deterministically:
    /// channel < source < transformer < router < target.
    pub fn rank(self) -> u8 {
        match self {
            ComponentCategory::Channel => 0,
            ComponentCategory::Source => 1,
            ComponentCategory::Transformer => 2,
            ComponentCategory::Router => 3,
            ComponentCategory::Target => 4,
            ComponentCategory::Function => 5,
        }
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("unknown component category {s:?}"))
    }
}
