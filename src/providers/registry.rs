use super::DataStoreProvider;
use crate::ids;
use crate::issues::{ErrorEvent, ErrorSink};
use crate::store::{DataStore, StoreClass, StoreCodec};
use anyhow::anyhow;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Store providers are not loaded yet")]
    Uninitialized,

    #[error("Store providers are already loaded")]
    AlreadyLoaded,

    #[error("Unknown store class: {0}")]
    UnknownStoreClass(String),
}

/// The set of active store providers.
///
/// Loaded exactly once, then read-only. Lookups before [`load`](Self::load)
/// fail with [`RegistryError::Uninitialized`]. When ids or store classes
/// overlap, the provider discovered first wins.
pub struct DataStoreProviders {
    all: OnceCell<Vec<Arc<dyn DataStoreProvider>>>,
    codec: Arc<RwLock<StoreCodec>>,
    sink: Arc<dyn ErrorSink>,
}

impl DataStoreProviders {
    pub fn new(codec: Arc<RwLock<StoreCodec>>, sink: Arc<dyn ErrorSink>) -> Self {
        Self {
            all: OnceCell::new(),
            codec,
            sink,
        }
    }

    /// Validates every discovered provider, keeps the ones that pass, then
    /// registers their store classes with the codec.
    pub fn load<I>(&self, source: I) -> Result<&[Arc<dyn DataStoreProvider>], RegistryError>
    where
        I: IntoIterator<Item = Box<dyn DataStoreProvider>>,
    {
        if self.all.get().is_some() {
            return Err(RegistryError::AlreadyLoaded);
        }

        log::info!("Loading store providers ...");
        let active: Vec<Arc<dyn DataStoreProvider>> = source
            .into_iter()
            .filter_map(|provider| self.try_activate(provider))
            .collect();
        warn_on_overlaps(&active);

        self.all.set(active).map_err(|_| RegistryError::AlreadyLoaded)?;
        let all = self.all()?;

        self.register_store_classes(all);
        log::info!("Loaded {} store provider(s)", all.len());
        Ok(all)
    }

    fn try_activate(&self, provider: Box<dyn DataStoreProvider>) -> Option<Arc<dyn DataStoreProvider>> {
        match guarded(|| provider.validate()) {
            Ok(()) => {
                log::debug!("Activated store provider: {}", provider.id());
                Some(Arc::from(provider))
            }
            Err(e) => {
                let e = e.context(format!("Store provider {} failed validation", provider.id()));
                ErrorEvent::from_error(e).handle(self.sink.as_ref());
                None
            }
        }
    }

    fn register_store_classes(&self, providers: &[Arc<dyn DataStoreProvider>]) {
        let mut codec = self.codec.write().unwrap_or_else(PoisonError::into_inner);
        for provider in providers {
            for class in provider.store_classes() {
                if let Err(e) = codec.register_subtype(&class) {
                    ErrorEvent::from_error(e).handle(self.sink.as_ref());
                }
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.all.get().is_some()
    }

    pub fn all(&self) -> Result<&[Arc<dyn DataStoreProvider>], RegistryError> {
        self.all
            .get()
            .map(Vec::as_slice)
            .ok_or(RegistryError::Uninitialized)
    }

    pub fn ids(&self) -> Result<Vec<String>, RegistryError> {
        Ok(self.all()?.iter().map(|p| p.id().to_string()).collect())
    }

    pub fn init(&self) -> Result<(), RegistryError> {
        self.fan_out("init", |provider| provider.init())
    }

    pub fn reset(&self) -> Result<(), RegistryError> {
        self.fan_out("reset", |provider| provider.reset())
    }

    fn fan_out<F>(&self, hook: &str, call: F) -> Result<(), RegistryError>
    where
        F: Fn(&dyn DataStoreProvider) -> anyhow::Result<()>,
    {
        for provider in self.all()? {
            if let Err(e) = guarded(|| call(provider.as_ref())) {
                let e = e.context(format!("Store provider {} failed to {}", provider.id(), hook));
                ErrorEvent::from_error(e).omit().handle(self.sink.as_ref());
            }
        }
        Ok(())
    }

    pub fn by_id(&self, id: &str) -> Result<Option<Arc<dyn DataStoreProvider>>, RegistryError> {
        Ok(self
            .all()?
            .iter()
            .find(|p| ids::same_id(p.id(), id))
            .cloned())
    }

    pub fn by_store_if_present(
        &self,
        store: &dyn DataStore,
    ) -> Result<Option<Arc<dyn DataStoreProvider>>, RegistryError> {
        Ok(self.all()?.iter().find(|p| p.handles(store)).cloned())
    }

    pub fn by_store(&self, store: &dyn DataStore) -> Result<Arc<dyn DataStoreProvider>, RegistryError> {
        self.by_store_if_present(store)?
            .ok_or_else(|| RegistryError::UnknownStoreClass(store.store_type_name().to_string()))
    }
}

/// Runs a provider hook, turning a panic into an ordinary error.
fn guarded<F>(hook: F) -> anyhow::Result<()>
where
    F: FnOnce() -> anyhow::Result<()>,
{
    panic::catch_unwind(AssertUnwindSafe(hook))
        .unwrap_or_else(|payload| Err(panic_error(payload.as_ref())))
}

fn panic_error(payload: &(dyn Any + Send)) -> anyhow::Error {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    anyhow!("panicked: {}", message)
}

fn warn_on_overlaps(providers: &[Arc<dyn DataStoreProvider>]) {
    let mut seen = HashSet::new();
    let mut owners: HashMap<StoreClass, String> = HashMap::new();

    for provider in providers {
        if !seen.insert(ids::id_key(provider.id())) {
            log::warn!("Duplicate store provider id {}, the earlier provider wins", provider.id());
        }

        for class in provider.store_classes() {
            match owners.get(&class) {
                Some(owner) => log::warn!(
                    "Store class {} is claimed by {} and {}, {} wins",
                    class.tag(),
                    owner,
                    provider.id(),
                    owner
                ),
                None => {
                    owners.insert(class, provider.id().to_string());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issues::LogSink;
    use anyhow::bail;
    use serde::{Deserialize, Serialize};
    use std::any::Any;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Serialize, Deserialize)]
    struct TapeStore {
        drive: String,
    }

    impl DataStore for TapeStore {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct TapeProvider {
        id: &'static str,
        inits: Arc<AtomicUsize>,
    }

    impl DataStoreProvider for TapeProvider {
        fn id(&self) -> &str {
            self.id
        }

        fn store_classes(&self) -> Vec<StoreClass> {
            vec![StoreClass::of::<TapeStore>()]
        }

        fn init(&self) -> anyhow::Result<()> {
            self.inits.fetch_add(1, Ordering::SeqCst);
            bail!("tape drive offline")
        }
    }

    fn registry() -> DataStoreProviders {
        DataStoreProviders::new(Arc::new(RwLock::new(StoreCodec::new())), Arc::new(LogSink))
    }

    fn tape(id: &'static str, inits: &Arc<AtomicUsize>) -> Box<dyn DataStoreProvider> {
        Box::new(TapeProvider {
            id,
            inits: inits.clone(),
        })
    }

    #[test]
    fn reads_before_load_fail_with_uninitialized() {
        let registry = registry();
        let store = TapeStore { drive: "st0".into() };

        assert!(!registry.is_loaded());
        assert_eq!(registry.all().err(), Some(RegistryError::Uninitialized));
        assert_eq!(registry.by_id("tape").err(), Some(RegistryError::Uninitialized));
        assert_eq!(registry.by_store_if_present(&store).err(), Some(RegistryError::Uninitialized));
        assert_eq!(registry.by_store(&store).err(), Some(RegistryError::Uninitialized));
        assert_eq!(registry.init(), Err(RegistryError::Uninitialized));
        assert_eq!(registry.reset(), Err(RegistryError::Uninitialized));
    }

    #[test]
    fn second_load_is_rejected_and_keeps_first_set() {
        // Arrange
        let inits = Arc::new(AtomicUsize::new(0));
        let registry = registry();
        registry.load(vec![tape("tape", &inits)]).unwrap();

        // Act
        let second = registry.load(vec![tape("other", &inits)]);

        // Assert
        assert_eq!(second.err(), Some(RegistryError::AlreadyLoaded));
        assert_eq!(registry.ids().unwrap(), vec!["tape"]);
    }

    #[test]
    fn duplicate_ids_resolve_to_first_discovered() {
        let inits = Arc::new(AtomicUsize::new(0));
        let registry = registry();
        registry.load(vec![tape("tape", &inits), tape("TAPE", &inits)]).unwrap();

        let found = registry.by_id("Tape").unwrap().unwrap();

        assert_eq!(found.id(), "tape");
        assert_eq!(registry.all().unwrap().len(), 2);
    }

    #[test]
    fn failing_init_is_counted_once_per_fan_out() {
        let inits = Arc::new(AtomicUsize::new(0));
        let registry = registry();
        registry.load(vec![tape("a", &inits), tape("b", &inits)]).unwrap();

        registry.init().unwrap();
        registry.init().unwrap();

        assert_eq!(inits.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn guarded_turns_panics_into_errors() {
        type Hook = Box<dyn FnOnce() -> anyhow::Result<()>>;
        let cases: Vec<(Hook, Option<&str>)> = vec![
            (Box::new(|| -> anyhow::Result<()> { Ok(()) }), None),
            (Box::new(|| -> anyhow::Result<()> { bail!("plain failure") }), Some("plain failure")),
            (Box::new(|| -> anyhow::Result<()> { panic!("static message") }), Some("panicked: static message")),
            (Box::new(|| -> anyhow::Result<()> { panic!("formatted {}", 7) }), Some("panicked: formatted 7")),
        ];

        for (hook, expected) in cases {
            let message = guarded(hook).err().map(|e| e.to_string());
            assert_eq!(message.as_deref(), expected);
        }
    }

    #[test]
    fn load_registers_store_classes_with_codec() {
        let codec = Arc::new(RwLock::new(StoreCodec::new()));
        let registry = DataStoreProviders::new(codec.clone(), Arc::new(LogSink));
        let inits = Arc::new(AtomicUsize::new(0));

        registry.load(vec![tape("a", &inits), tape("b", &inits)]).unwrap();

        let codec = codec.read().unwrap();
        assert_eq!(codec.len(), 1);
        assert!(codec.is_registered("TapeStore"));
    }
}
