use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single context attribute value. Conditions compare these by equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Str(String),
    Num(f64),
    Bool(bool),
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Str(s)
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Num(n)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

/// Evaluation-time facts about the current request/user.
///
/// The reserved attributes are typed fields; every other string key lives in
/// `extra` and is compared by equality when referenced by a flag condition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "userRole", skip_serializing_if = "Option::is_none")]
    pub user_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, AttrValue>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_id(mut self, id: impl Into<String>) -> Self {
        self.user_id = Some(id.into());
        self
    }

    pub fn with_user_role(mut self, role: impl Into<String>) -> Self {
        self.user_role = Some(role.into());
        self
    }

    pub fn with_environment(mut self, env: impl Into<String>) -> Self {
        self.environment = Some(env.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(key.into(), value.into());
        self
    }

    /// Look up an attribute by its wire name. Reserved names resolve to the
    /// typed fields; anything else goes through the open-ended map.
    pub fn get(&self, key: &str) -> Option<AttrValue> {
        match key {
            "userId" => self.user_id.clone().map(AttrValue::Str),
            "userRole" => self.user_role.clone().map(AttrValue::Str),
            "environment" => self.environment.clone().map(AttrValue::Str),
            "region" => self.region.clone().map(AttrValue::Str),
            "percentage" => self.percentage.map(AttrValue::Num),
            other => self.extra.get(other).cloned(),
        }
    }

    /// Set an attribute by its wire name, routing reserved names to the
    /// typed fields. A non-string value for a string-typed reserved name
    /// falls back to the open-ended map.
    pub fn set(&mut self, key: String, value: AttrValue) {
        match (key.as_str(), &value) {
            ("userId", AttrValue::Str(s)) => self.user_id = Some(s.clone()),
            ("userRole", AttrValue::Str(s)) => self.user_role = Some(s.clone()),
            ("environment", AttrValue::Str(s)) => self.environment = Some(s.clone()),
            ("region", AttrValue::Str(s)) => self.region = Some(s.clone()),
            ("percentage", AttrValue::Num(n)) => self.percentage = Some(*n),
            _ => {
                self.extra.insert(key, value);
            }
        }
    }

    /// Shallow merge: for each key present in both, `local` wins. Neither
    /// input is modified; the result is a new value.
    pub fn merge(global: &Context, local: &Context) -> Context {
        let mut extra = global.extra.clone();
        extra.extend(local.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        Context {
            user_id: local.user_id.clone().or_else(|| global.user_id.clone()),
            user_role: local.user_role.clone().or_else(|| global.user_role.clone()),
            environment: local
                .environment
                .clone()
                .or_else(|| global.environment.clone()),
            region: local.region.clone().or_else(|| global.region.clone()),
            percentage: local.percentage.or(global.percentage),
            extra,
        }
    }
}
