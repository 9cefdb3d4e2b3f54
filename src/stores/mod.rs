mod local;
mod ssh;

pub use local::{LocalProvider, LocalStore};
pub use ssh::{SshProvider, SshStore};
