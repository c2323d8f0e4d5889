//! Conflict resolution between simultaneously active rules.

use std::cmp::Ordering;

use tracing::trace;

use crate::rule::Rule;

/// Total order used to pick a winner among active rules.
///
/// Byte-wise ascending on the trimmed reference token, then on the config
/// key, then on the window text.
pub fn priority_order(a: &Rule, b: &Rule) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| a.key.cmp(&b.key))
        .then_with(|| a.period().cmp(b.period()))
}

/// Pick the winning rule among the active ones.
///
/// Returns `None` when no rule is active; the caller then falls back to
/// the default count.
pub fn resolve(mut active: Vec<Rule>) -> Option<Rule> {
    if active.len() > 1 {
        active.sort_by(priority_order);
        trace!(
            candidates = active.len(),
            winner = %active[0].key,
            "resolved conflicting periods"
        );
    }
    active.into_iter().next()
}
