use super::{checked_name, create_in_directories, ActionContext, BrowserAction, BrowserActionProvider, NewFileParams};
use anyhow::{Context, Result};
use serde_json::Value;

pub struct NewDirectoryActionProvider;

impl BrowserActionProvider for NewDirectoryActionProvider {
    fn id(&self) -> &'static str {
        "newDirectory"
    }

    fn create(&self, context: ActionContext, params: Value) -> Result<Box<dyn BrowserAction>> {
        let params: NewFileParams =
            serde_json::from_value(params).context("Invalid newDirectory parameters")?;
        Ok(Box::new(NewDirectoryAction::new(context, params.name)?))
    }
}

pub struct NewDirectoryAction {
    context: ActionContext,
    name: String,
}

impl NewDirectoryAction {
    pub fn new(context: ActionContext, name: String) -> Result<Self> {
        Ok(Self {
            context,
            name: checked_name(name)?,
        })
    }
}

impl BrowserAction for NewDirectoryAction {
    fn id(&self) -> &'static str {
        "newDirectory"
    }

    fn context(&self) -> &ActionContext {
        &self.context
    }

    fn is_mutation(&self) -> bool {
        true
    }

    fn execute_impl(&self) -> Result<()> {
        create_in_directories(&self.context, &self.name, |fs, dir| fs.mkdirs(dir))
    }
}
