pub mod codec;
pub mod config;

pub use codec::{CodecError, StoreCodec};
pub use config::{NamedStore, StoreConfigManager};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A configured connection or resource.
///
/// The registry only ever classifies stores by their runtime type, so the
/// whole contract is exposing that type through [`DataStore::as_any`].
pub trait DataStore: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn store_type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

pub fn store_type_id(store: &dyn DataStore) -> TypeId {
    store.as_any().type_id()
}

type EncodeFn = fn(&dyn DataStore) -> Result<Value, CodecError>;
type DecodeFn = fn(Value) -> Result<Box<dyn DataStore>, CodecError>;

/// Type token for a concrete store type.
///
/// The tag is the type's own short name. Providers and the codec both derive
/// it from here, so a class always maps to the same tag in both places.
#[derive(Clone, Copy)]
pub struct StoreClass {
    type_id: TypeId,
    type_name: &'static str,
    tag: &'static str,
    encode: EncodeFn,
    decode: DecodeFn,
}

impl StoreClass {
    pub fn of<T>() -> Self
    where
        T: DataStore + Serialize + DeserializeOwned,
    {
        let type_name = std::any::type_name::<T>();
        Self {
            type_id: TypeId::of::<T>(),
            type_name,
            tag: short_type_name(type_name),
            encode: encode_as::<T>,
            decode: decode_as::<T>,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn matches(&self, store: &dyn DataStore) -> bool {
        self.type_id == store_type_id(store)
    }

    pub(crate) fn encode(&self, store: &dyn DataStore) -> Result<Value, CodecError> {
        (self.encode)(store)
    }

    pub(crate) fn decode(&self, value: Value) -> Result<Box<dyn DataStore>, CodecError> {
        (self.decode)(value)
    }
}

impl fmt::Debug for StoreClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreClass")
            .field("type_name", &self.type_name)
            .field("tag", &self.tag)
            .finish()
    }
}

impl PartialEq for StoreClass {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for StoreClass {}

impl Hash for StoreClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

fn short_type_name(type_name: &'static str) -> &'static str {
    type_name.rsplit("::").next().unwrap_or(type_name)
}

fn encode_as<T: DataStore + Serialize>(store: &dyn DataStore) -> Result<Value, CodecError> {
    let concrete = store
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| CodecError::UnregisteredType(store.store_type_name().to_string()))?;
    Ok(serde_json::to_value(concrete)?)
}

fn decode_as<T: DataStore + DeserializeOwned>(value: Value) -> Result<Box<dyn DataStore>, CodecError> {
    let store: T = serde_json::from_value(value)?;
    Ok(Box::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize)]
    struct MemoryStore {
        capacity: u32,
    }

    impl DataStore for MemoryStore {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct OtherStore;

    impl DataStore for OtherStore {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn tag_is_short_type_name() {
        let class = StoreClass::of::<MemoryStore>();
        assert_eq!(class.tag(), "MemoryStore");
        assert!(class.type_name().ends_with("::MemoryStore"));
    }

    #[test]
    fn short_type_name_cases() {
        let cases = [
            ("linkdeck::stores::LocalStore", "LocalStore"),
            ("LocalStore", "LocalStore"),
            ("a::b", "b"),
        ];

        for (input, expected) in cases {
            assert_eq!(short_type_name(input), expected, "input: {}", input);
        }
    }

    #[test]
    fn matches_uses_runtime_type() {
        let class = StoreClass::of::<MemoryStore>();
        let boxed: Box<dyn DataStore> = Box::new(MemoryStore { capacity: 1 });

        assert!(class.matches(boxed.as_ref()));
        assert!(!class.matches(&OtherStore));
    }

    #[test]
    fn classes_compare_by_type() {
        assert_eq!(StoreClass::of::<MemoryStore>(), StoreClass::of::<MemoryStore>());
        assert_ne!(StoreClass::of::<MemoryStore>(), StoreClass::of::<OtherStore>());
    }

    #[test]
    fn store_type_name_dispatches_to_concrete_type() {
        let boxed: Box<dyn DataStore> = Box::new(OtherStore);
        assert!(boxed.store_type_name().ends_with("OtherStore"));
    }

    #[test]
    fn encode_rejects_store_of_another_class() {
        let class = StoreClass::of::<MemoryStore>();
        let result = class.encode(&OtherStore);
        assert!(matches!(result, Err(CodecError::UnregisteredType(_))));
    }
}
