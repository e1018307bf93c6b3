//! Bridge-wide delivery defaults.
//!
//! Declared in the `delivery` block of the `bridge` block:
//!
//! ```text
//! bridge "b" {
//!   delivery {
//!     retries          = 2
//!     backoff_delay    = "PT0.5S"
//!     backoff_policy   = "exponential"
//!     dead_letter_sink = target.dls
//!   }
//! }
//! ```

use crate::address::destination_type;
use crate::schema::Spec;
use bdl_ast::{Diagnostic, Diagnostics, Type, Value};

const BACKOFF_POLICIES: [&str; 2] = ["linear", "exponential"];

pub fn delivery_spec() -> Spec {
    Spec::object([
        ("retries", Spec::optional_attr("retries", Type::Number)),
        (
            "backoff_delay",
            Spec::optional_attr("backoff_delay", Type::String),
        ),
        (
            "backoff_policy",
            Spec::optional_attr("backoff_policy", Type::String).validated(validate_backoff_policy),
        ),
        (
            "dead_letter_sink",
            Spec::optional_attr("dead_letter_sink", destination_type()),
        ),
    ])
}

fn validate_backoff_policy(v: &Value) -> Diagnostics {
    match v.as_str() {
        Some(policy) if BACKOFF_POLICIES.contains(&policy) => Diagnostics::new(),
        _ => Diagnostic::error(
            "Invalid backoff policy",
            format!(
                "The backoff policy must be one of {}.",
                BACKOFF_POLICIES.join(", ")
            ),
        )
        .into(),
    }
}

/// Read-only accessor over the decoded delivery defaults.
///
/// Values that are absent or not known yet read as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BridgeGlobals {
    delivery: Value,
}

impl BridgeGlobals {
    pub fn new(delivery: Value) -> Self {
        Self { delivery }
    }

    pub fn retries(&self) -> Option<i64> {
        let n = self.delivery.attr("retries").as_number()?;
        (n.fract() == 0.0).then_some(n as i64)
    }

    pub fn backoff_delay(&self) -> Option<&str> {
        self.delivery.attr("backoff_delay").as_str()
    }

    pub fn backoff_policy(&self) -> Option<&str> {
        self.delivery.attr("backoff_policy").as_str()
    }

    pub fn dead_letter_sink(&self) -> Option<&Value> {
        let dls = self.delivery.attr("dead_letter_sink");
        (!dls.is_null() && dls.is_wholly_known()).then_some(dls)
    }

    pub fn is_empty(&self) -> bool {
        self.retries().is_none()
            && self.backoff_delay().is_none()
            && self.backoff_policy().is_none()
            && self.dead_letter_sink().is_none()
    }
}
