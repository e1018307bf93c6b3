//! Safe decoding.
//!
//! Components are evaluated after the components they reference, so their
//! addresses are normally in the context by the time they are decoded. Inside
//! a reference cycle that is impossible: some member must be decoded before
//! the address of another is known.
//!
//! The functions here first try a plain decode. When it fails, they bind an
//! unknown destination to every component reference that has no address yet
//! and decode again. The result is then marked incomplete: it is good enough
//! to compute the component's own address, but not to translate it.

use crate::context::{EvalContext, block_reference};
use crate::decode::{decode, variables};
use crate::eval::traverse_abs;
use crate::schema::Spec;
use bdl_ast::{Body, Diagnostics, Traversal, Value};
use tracing::trace;

/// Outcome of a safe decode or traversal.
#[derive(Debug, Clone)]
pub struct SafeValue {
    pub value: Value,
    /// False when the plain decode failed, whether or not placeholders
    /// could be injected.
    pub complete: bool,
    pub diags: Diagnostics,
}

/// Decodes `body`, falling back to placeholder destinations for
/// component references that can not be resolved yet.
pub fn decode_safe(body: &Body, spec: &Spec, ctx: &EvalContext) -> SafeValue {
    let (value, diags) = decode(body, spec, ctx);
    if !diags.has_errors() {
        return SafeValue {
            value,
            complete: true,
            diags,
        };
    }

    let refs = filter_block_refs(variables(body, spec));
    let mut scratch = ctx.clone();
    let injected = refs
        .iter()
        .filter(|r| scratch.ensure_placeholder(r))
        .count();
    if injected == 0 {
        return SafeValue {
            value,
            complete: false,
            diags,
        };
    }

    trace!(injected, "decoding with placeholder destinations");
    let (value, diags) = decode(body, spec, &scratch);
    SafeValue {
        value,
        complete: false,
        diags,
    }
}

/// Evaluates an absolute traversal with the same placeholder fallback as
/// [`decode_safe`].
pub fn traverse_abs_safe(traversal: &Traversal, ctx: &EvalContext) -> SafeValue {
    let (value, diags) = traverse_abs(traversal, ctx);
    if !diags.has_errors() {
        return SafeValue {
            value,
            complete: true,
            diags,
        };
    }

    let mut scratch = ctx.clone();
    if !scratch.ensure_placeholder(traversal) {
        return SafeValue {
            value,
            complete: false,
            diags,
        };
    }

    trace!(%traversal, "traversing with a placeholder destination");
    let (value, diags) = traverse_abs(traversal, &scratch);
    SafeValue {
        value,
        complete: false,
        diags,
    }
}

/// Keeps the traversals that reference a component, e.g. `target.my_sns`.
pub fn filter_block_refs(vars: Vec<Traversal>) -> Vec<Traversal> {
    vars.into_iter()
        .filter(|v| block_reference(v).is_some())
        .collect()
}
