use std::collections::HashMap;

use tracing::warn;

use crate::context::Context;
use crate::engine;
use crate::errors::{FlagError, Result};
use crate::flag::FlagRecord;

/// In-memory flag registry: a name → record map plus one global context
/// merged beneath any per-call local context.
///
/// The registry owns its state exclusively and does no internal locking; a
/// multi-threaded host wraps it in a lock or swaps immutable snapshots.
#[derive(Debug, Default)]
pub struct FeatureFlags {
    flags: HashMap<String, FlagRecord>,
    global_context: Context,
}

impl FeatureFlags {
    /// Build a registry from an initial flag set (may be empty).
    pub fn new(flags: HashMap<String, FlagRecord>) -> Self {
        Self {
            flags,
            global_context: Context::default(),
        }
    }

    /// Look up one flag. Never fails; absent flags are `None`.
    pub fn get(&self, name: &str) -> Option<&FlagRecord> {
        self.flags.get(name)
    }

    /// Full copy of the flag map; caller mutation cannot touch the registry.
    pub fn list(&self) -> HashMap<String, FlagRecord> {
        self.flags.clone()
    }

    /// Insert or wholesale-replace a flag. No partial merge with any
    /// existing record.
    pub fn set(&mut self, name: impl Into<String>, record: FlagRecord) {
        self.flags.insert(name.into(), record);
    }

    /// Remove a flag; removing an absent name is a no-op.
    pub fn delete(&mut self, name: &str) {
        self.flags.remove(name);
    }

    /// Replace the global context.
    pub fn set_global_context(&mut self, context: Context) {
        self.global_context = context;
    }

    /// Copy of the global context; mutating it cannot affect evaluations.
    pub fn global_context(&self) -> Context {
        self.global_context.clone()
    }

    /// Evaluate a flag against the global context merged with an optional
    /// local one (local wins on key collisions).
    ///
    /// A missing flag is an error, except when the merged context says
    /// `environment == "production"`: a live user-facing path must never
    /// fail on a typo, so that case degrades to a warning and `false`.
    pub fn is_enabled(&self, name: &str, local: Option<&Context>) -> Result<bool> {
        let context = match local {
            Some(local) => Context::merge(&self.global_context, local),
            None => self.global_context.clone(),
        };

        let Some(flag) = self.flags.get(name) else {
            if context.environment.as_deref() == Some("production") {
                warn!(flag = name, "feature flag not found");
                return Ok(false);
            }
            return Err(FlagError::FlagNotFound(name.to_string()));
        };

        Ok(engine::evaluate(flag, &context, name))
    }

    /// The rollout bucket the engine would compute for this user/flag pair.
    /// Exposed for diagnostics and tests.
    pub fn assign_user_to_bucket(&self, user_id: &str, flag_name: &str) -> u32 {
        engine::assign_user_to_bucket(user_id, flag_name)
    }
}
