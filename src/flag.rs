use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::{AttrValue, Context};

/// A flag's default: either a plain boolean or a predicate over the merged
/// evaluation context. The two are matched explicitly at evaluation time.
#[derive(Clone)]
pub enum DefaultValue {
    Bool(bool),
    Predicate(Arc<dyn Fn(&Context) -> bool + Send + Sync>),
}

impl DefaultValue {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Context) -> bool + Send + Sync + 'static,
    {
        DefaultValue::Predicate(Arc::new(f))
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Bool(b) => write!(f, "Bool({b})"),
            DefaultValue::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}

impl From<bool> for DefaultValue {
    fn from(b: bool) -> Self {
        DefaultValue::Bool(b)
    }
}

// Predicates have no useful equality; two records compare equal only when
// both defaults are booleans (or the same Arc).
impl PartialEq for DefaultValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DefaultValue::Bool(a), DefaultValue::Bool(b)) => a == b,
            (DefaultValue::Predicate(a), DefaultValue::Predicate(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// The stored definition of one flag.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagRecord {
    pub default: DefaultValue,
    /// Attribute equality conditions; every entry must match the merged
    /// context for the flag to evaluate past the condition filter.
    pub conditions: Option<BTreeMap<String, AttrValue>>,
    /// Percentage of users (by deterministic bucket) the flag is force-on
    /// for. Values outside [0, 100] deactivate the rollout entirely.
    pub rollout_percentage: Option<f64>,
}

impl FlagRecord {
    pub fn new(default: impl Into<DefaultValue>) -> Self {
        Self {
            default: default.into(),
            conditions: None,
            rollout_percentage: None,
        }
    }

    pub fn with_condition(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.conditions
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_rollout_percentage(mut self, percentage: f64) -> Self {
        self.rollout_percentage = Some(percentage);
        self
    }
}

/// Plain structural form of a flag record for the persistence boundary.
/// Predicate defaults are not serializable and are stored as absent; loading
/// an absent default yields `false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedFlag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<BTreeMap<String, AttrValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollout_percentage: Option<f64>,
}

impl From<&FlagRecord> for SerializedFlag {
    fn from(record: &FlagRecord) -> Self {
        SerializedFlag {
            default_value: match record.default {
                DefaultValue::Bool(b) => Some(b),
                DefaultValue::Predicate(_) => None,
            },
            conditions: record.conditions.clone(),
            rollout_percentage: record.rollout_percentage,
        }
    }
}

impl From<SerializedFlag> for FlagRecord {
    fn from(stored: SerializedFlag) -> Self {
        FlagRecord {
            default: DefaultValue::Bool(stored.default_value.unwrap_or(false)),
            conditions: stored.conditions,
            rollout_percentage: stored.rollout_percentage,
        }
    }
}
