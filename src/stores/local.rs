use crate::providers::{DataStoreProvider, ProviderEntry};
use crate::store::{DataStore, StoreClass};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::path::PathBuf;

/// A directory on this machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalStore {
    pub root: PathBuf,
}

impl DataStore for LocalStore {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct LocalProvider;

impl DataStoreProvider for LocalProvider {
    fn id(&self) -> &str {
        "local"
    }

    fn store_classes(&self) -> Vec<StoreClass> {
        vec![StoreClass::of::<LocalStore>()]
    }
}

fn create() -> Box<dyn DataStoreProvider> {
    Box::new(LocalProvider)
}

inventory::submit! {
    ProviderEntry { factory: create }
}
