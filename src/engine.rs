use std::collections::BTreeMap;

use tracing::debug;

use crate::context::{AttrValue, Context};
use crate::flag::{DefaultValue, FlagRecord};
use crate::hash;

/// Evaluate one flag against an already-merged context.
///
/// The decision order is fixed: attribute conditions filter first, then a
/// percentage rollout (a hard decision when it applies), then the default.
pub fn evaluate(flag: &FlagRecord, context: &Context, flag_name: &str) -> bool {
    if let Some(conditions) = &flag.conditions {
        if !conditions_match(conditions, context) {
            debug!(flag = flag_name, "condition filter rejected");
            return false;
        }
    }

    if let Some(decision) = rollout_decision(flag, context, flag_name) {
        debug!(flag = flag_name, decision, "rollout decided");
        return decision;
    }

    match &flag.default {
        DefaultValue::Bool(b) => *b,
        DefaultValue::Predicate(f) => f(context),
    }
}

/// True when every defined condition matches the context by equality. The
/// `percentage` key belongs to rollout configuration and is never treated
/// as an equality condition.
fn conditions_match(conditions: &BTreeMap<String, AttrValue>, context: &Context) -> bool {
    conditions
        .iter()
        .filter(|(key, _)| key.as_str() != "percentage")
        .all(|(key, expected)| context.get(key).as_ref() == Some(expected))
}

/// Percentage rollout, when configured and applicable.
///
/// Returns `Some(bucket < percentage)` when the flag carries an in-range
/// rollout percentage and the context carries a non-empty user id; `None`
/// otherwise, letting evaluation fall through to the default. A percentage
/// outside [0, 100] deactivates the rollout rather than erroring.
fn rollout_decision(flag: &FlagRecord, context: &Context, flag_name: &str) -> Option<bool> {
    let percentage = flag.rollout_percentage?;
    if !(0.0..=100.0).contains(&percentage) {
        return None;
    }
    let user_id = context.user_id.as_deref().filter(|id| !id.is_empty())?;
    Some(f64::from(assign_user_to_bucket(user_id, flag_name)) < percentage)
}

/// The bucket in [0, 100) a user/flag pair deterministically hashes to.
pub fn assign_user_to_bucket(user_id: &str, flag_name: &str) -> u32 {
    hash::bucket(&format!("{user_id}{flag_name}"))
}
