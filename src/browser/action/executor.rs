use super::{ActionError, BrowserAction};
use anyhow::Result;

pub struct ActionExecutor {
    read_only: bool,
}

impl ActionExecutor {
    pub fn new(read_only: bool) -> Self {
        Self { read_only }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Runs the action on the caller's thread. Errors from the action are
    /// returned untouched; entries changed before the failure stay changed.
    pub fn execute(&self, action: &dyn BrowserAction) -> Result<()> {
        if self.read_only && action.is_mutation() {
            return Err(ActionError::ReadOnly(action.id().to_string()).into());
        }

        log::info!(
            "Executing action {} on {} selected entries",
            action.id(),
            action.context().entries().len()
        );
        action.execute_impl()
    }
}

impl Default for ActionExecutor {
    fn default() -> Self {
        Self::new(false)
    }
}
