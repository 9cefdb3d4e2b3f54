//! Operations over a selection of browser entries.
//!
//! A [`BrowserActionProvider`] builds a [`BrowserAction`] bound to an
//! [`ActionContext`] and its own parameters. Mutating actions refresh the
//! model once they are done, however many entries they touched.

mod executor;
mod new_directory;
mod new_file;

pub use executor::ActionExecutor;
pub use new_directory::{NewDirectoryAction, NewDirectoryActionProvider};
pub use new_file::{NewFileAction, NewFileActionProvider, NewFileParams};

use super::{BrowserEntry, BrowserModel};
use crate::fs::{FilePath, FileSystem};
use crate::{ids, paths};
use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Action {0} modifies files and is not allowed in read-only mode")]
    ReadOnly(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Invalid file name: {0:?}")]
    InvalidName(String),
}

#[derive(Clone)]
pub struct ActionContext {
    model: Arc<dyn BrowserModel>,
    entries: Vec<BrowserEntry>,
}

impl ActionContext {
    pub fn new(model: Arc<dyn BrowserModel>, entries: Vec<BrowserEntry>) -> Self {
        Self { model, entries }
    }

    pub fn model(&self) -> &dyn BrowserModel {
        self.model.as_ref()
    }

    pub fn entries(&self) -> &[BrowserEntry] {
        &self.entries
    }
}

pub trait BrowserActionProvider: Send + Sync {
    fn id(&self) -> &'static str;

    fn create(&self, context: ActionContext, params: Value) -> Result<Box<dyn BrowserAction>>;
}

pub trait BrowserAction: Send + Sync {
    fn id(&self) -> &'static str;

    fn context(&self) -> &ActionContext;

    fn is_mutation(&self) -> bool {
        false
    }

    fn execute_impl(&self) -> Result<()>;
}

pub struct ActionRegistry {
    providers: Vec<Box<dyn BrowserActionProvider>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(NewFileActionProvider));
        registry.register(Box::new(NewDirectoryActionProvider));
        registry
    }

    pub fn register(&mut self, provider: Box<dyn BrowserActionProvider>) {
        self.providers.push(provider);
    }

    pub fn providers(&self) -> &[Box<dyn BrowserActionProvider>] {
        &self.providers
    }

    pub fn by_id(&self, id: &str) -> Option<&dyn BrowserActionProvider> {
        self.providers
            .iter()
            .find(|p| ids::same_id(p.id(), id))
            .map(|p| p.as_ref())
    }

    pub fn create(&self, id: &str, context: ActionContext, params: Value) -> Result<Box<dyn BrowserAction>> {
        let provider = self
            .by_id(id)
            .ok_or_else(|| ActionError::UnknownAction(id.to_string()))?;
        provider.create(context, params)
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn checked_name(name: String) -> Result<String, ActionError> {
    if !paths::is_safe_path_component(&name) {
        return Err(ActionError::InvalidName(name));
    }
    Ok(name)
}

/// Runs `create` for `name` inside every selected directory, then refreshes.
/// Other entries are skipped. The first failure is returned as is, without
/// a refresh.
fn create_in_directories<F>(context: &ActionContext, name: &str, create: F) -> Result<()>
where
    F: Fn(&dyn FileSystem, &FilePath) -> Result<()>,
{
    let model = context.model();
    for entry in context.entries() {
        if !entry.is_directory() {
            continue;
        }

        let target = entry.path().join(name);
        create(model.file_system(), &target)?;
    }
    model.refresh_sync()
}
