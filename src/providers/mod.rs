pub mod loader;
pub mod registry;

pub use loader::{ProviderEntry, ProviderLoader};
pub use registry::{DataStoreProviders, RegistryError};

use crate::store::{DataStore, StoreClass};
use anyhow::Result;

/// Describes one pluggable kind of store.
///
/// Instances are created once per process by discovery. `validate` runs right
/// after creation and a failure keeps the provider out of the registry for
/// good; `init` and `reset` may run any number of times afterwards.
pub trait DataStoreProvider: Send + Sync {
    fn id(&self) -> &str;

    fn store_classes(&self) -> Vec<StoreClass>;

    fn init(&self) -> Result<()> {
        Ok(())
    }

    fn reset(&self) -> Result<()> {
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn handles(&self, store: &dyn DataStore) -> bool {
        self.store_classes().iter().any(|class| class.matches(store))
    }
}
