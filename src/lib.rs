pub mod errors;
pub mod context;
pub mod flag;
pub mod engine;
pub mod registry;
pub mod storage;   // persistence boundary; no evaluation logic lives here
mod hash;

use std::collections::{BTreeMap, HashMap};

use errors::Result;

/// Build a registry from a store's contents. Predicate defaults cannot be
/// stored, so everything loaded carries a plain boolean default.
pub fn registry_from_store(store: &dyn FlagStore) -> Result<FeatureFlags> {
    let flags = store
        .load()?
        .into_iter()
        .map(|(name, stored)| (name, FlagRecord::from(stored)))
        .collect();
    Ok(FeatureFlags::new(flags))
}

/// Persist a registry's flags. Lossy for predicate defaults, which are
/// stored as absent and load back as `false`.
pub fn save_registry(store: &dyn FlagStore, registry: &FeatureFlags) -> Result<()> {
    let flags: BTreeMap<String, SerializedFlag> = registry
        .list()
        .iter()
        .map(|(name, record)| (name.clone(), SerializedFlag::from(record)))
        .collect();
    store.save(&flags)
}

/// Convenience: one-shot evaluation against an ad-hoc flag set.
pub fn is_enabled(
    flags: HashMap<String, FlagRecord>,
    name: &str,
    local: Option<&context::Context>,
) -> Result<bool> {
    FeatureFlags::new(flags).is_enabled(name, local)
}

/// Re-export the most-used types for users who don't need the module paths.
pub use context::{AttrValue, Context};
pub use errors::FlagError;
pub use flag::{DefaultValue, FlagRecord, SerializedFlag};
pub use registry::FeatureFlags;
pub use storage::{FlagStore, JsonFileStore};
