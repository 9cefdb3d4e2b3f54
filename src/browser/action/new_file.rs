use super::{checked_name, create_in_directories, ActionContext, BrowserAction, BrowserActionProvider};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct NewFileParams {
    pub name: String,
}

pub struct NewFileActionProvider;

impl BrowserActionProvider for NewFileActionProvider {
    fn id(&self) -> &'static str {
        "newFile"
    }

    fn create(&self, context: ActionContext, params: Value) -> Result<Box<dyn BrowserAction>> {
        let params: NewFileParams = serde_json::from_value(params).context("Invalid newFile parameters")?;
        Ok(Box::new(NewFileAction::new(context, params)?))
    }
}

/// Creates an empty file called `name` in every selected directory.
pub struct NewFileAction {
    context: ActionContext,
    name: String,
}

impl NewFileAction {
    pub fn new(context: ActionContext, params: NewFileParams) -> Result<Self> {
        Ok(Self {
            context,
            name: checked_name(params.name)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl BrowserAction for NewFileAction {
    fn id(&self) -> &'static str {
        "newFile"
    }

    fn context(&self) -> &ActionContext {
        &self.context
    }

    fn is_mutation(&self) -> bool {
        true
    }

    fn execute_impl(&self) -> Result<()> {
        create_in_directories(&self.context, &self.name, |fs, file| fs.touch(file))
    }
}
