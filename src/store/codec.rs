use super::{store_type_id, DataStore, StoreClass};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;

pub const TAG_FIELD: &str = "type";

static SHARED: Lazy<Arc<RwLock<StoreCodec>>> = Lazy::new(|| Arc::new(RwLock::new(StoreCodec::new())));

/// The process-wide codec. Written during provider discovery, read afterwards.
pub fn shared() -> Arc<RwLock<StoreCodec>> {
    SHARED.clone()
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Store tag {tag} is already bound to {existing}, refusing to rebind it to {rejected}")]
    TagConflict {
        tag: String,
        existing: String,
        rejected: String,
    },

    #[error("Store type {0} has no registered tag")]
    UnregisteredType(String),

    #[error("Unknown store tag: {0}")]
    UnknownTag(String),

    #[error("Store value has no \"type\" field")]
    MissingTag,

    #[error("Store value for {0} is not a JSON object")]
    NotAnObject(String),

    #[error("Store {0} has its own \"type\" field, which would clash with the tag")]
    ReservedField(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Tag table for polymorphic store (de)serialization.
///
/// Encoded stores are JSON objects carrying their tag in a `"type"` field
/// next to their own fields.
#[derive(Debug, Default)]
pub struct StoreCodec {
    classes: HashMap<&'static str, StoreClass>,
    tags: HashMap<TypeId, &'static str>,
}

impl StoreCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `class.tag()` to `class`. Registering the same class again is a no-op.
    pub fn register_subtype(&mut self, class: &StoreClass) -> Result<(), CodecError> {
        if let Some(existing) = self.classes.get(class.tag()) {
            if existing == class {
                return Ok(());
            }
            return Err(CodecError::TagConflict {
                tag: class.tag().to_string(),
                existing: existing.type_name().to_string(),
                rejected: class.type_name().to_string(),
            });
        }

        log::debug!("Registered store tag {} -> {}", class.tag(), class.type_name());
        self.classes.insert(class.tag(), *class);
        self.tags.insert(class.type_id(), class.tag());
        Ok(())
    }

    pub fn tag_of(&self, type_id: TypeId) -> Option<&'static str> {
        self.tags.get(&type_id).copied()
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.classes.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn encode(&self, store: &dyn DataStore) -> Result<Value, CodecError> {
        let tag = self
            .tag_of(store_type_id(store))
            .ok_or_else(|| CodecError::UnregisteredType(store.store_type_name().to_string()))?;
        let class = self
            .classes
            .get(tag)
            .ok_or_else(|| CodecError::UnknownTag(tag.to_string()))?;

        let mut value = class.encode(store)?;
        let Value::Object(fields) = &mut value else {
            return Err(CodecError::NotAnObject(tag.to_string()));
        };
        if fields.contains_key(TAG_FIELD) {
            return Err(CodecError::ReservedField(tag.to_string()));
        }
        fields.insert(TAG_FIELD.to_string(), Value::String(tag.to_string()));
        Ok(value)
    }

    pub fn decode(&self, value: Value) -> Result<Box<dyn DataStore>, CodecError> {
        let Value::Object(mut fields) = value else {
            return Err(CodecError::NotAnObject("store value".to_string()));
        };

        let tag = match fields.remove(TAG_FIELD) {
            Some(Value::String(tag)) => tag,
            _ => return Err(CodecError::MissingTag),
        };

        let class = self
            .classes
            .get(tag.as_str())
            .ok_or(CodecError::UnknownTag(tag))?;
        class.decode(Value::Object(fields))
    }
}
