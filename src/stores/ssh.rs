use crate::providers::{DataStoreProvider, ProviderEntry};
use crate::store::{DataStore, StoreClass};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::path::{Path, PathBuf};

const SSH_BINARY: &str = if cfg!(windows) { "ssh.exe" } else { "ssh" };

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SshStore {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub user: Option<String>,
}

fn default_port() -> u16 {
    22
}

impl SshStore {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            user: None,
        }
    }

    pub fn destination(&self) -> String {
        match &self.user {
            Some(user) => format!("{}@{}", user, self.host),
            None => self.host.clone(),
        }
    }
}

impl DataStore for SshStore {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Connections go through the system OpenSSH client, so the provider only
/// validates when one is on `PATH`.
pub struct SshProvider {
    search_path: Option<std::ffi::OsString>,
}

impl SshProvider {
    pub fn new() -> Self {
        Self {
            search_path: std::env::var_os("PATH"),
        }
    }

    fn find_client(&self) -> Option<PathBuf> {
        let search_path = self.search_path.as_ref()?;
        std::env::split_paths(search_path)
            .map(|dir| dir.join(SSH_BINARY))
            .find(|candidate| is_file(candidate))
    }
}

impl Default for SshProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}

impl DataStoreProvider for SshProvider {
    fn id(&self) -> &str {
        "ssh"
    }

    fn store_classes(&self) -> Vec<StoreClass> {
        vec![StoreClass::of::<SshStore>()]
    }

    fn validate(&self) -> Result<()> {
        match self.find_client() {
            Some(client) => {
                log::debug!("Using ssh client at {:?}", client);
                Ok(())
            }
            None => anyhow::bail!("No {} executable found on PATH", SSH_BINARY),
        }
    }
}

fn create() -> Box<dyn DataStoreProvider> {
    Box::new(SshProvider::new())
}

inventory::submit! {
    ProviderEntry { factory: create }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn provider_with_path(path: Option<&Path>) -> SshProvider {
        SshProvider {
            search_path: path.map(|p| p.as_os_str().to_os_string()),
        }
    }

    #[test]
    fn destination_includes_user_when_set() {
        let cases = [
            (None, "example.org"),
            (Some("deploy"), "deploy@example.org"),
        ];

        for (user, expected) in cases {
            let store = SshStore {
                user: user.map(String::from),
                ..SshStore::new("example.org")
            };
            assert_eq!(store.destination(), expected, "user: {:?}", user);
        }
    }

    #[test]
    fn port_defaults_when_missing() {
        let store: SshStore = serde_json::from_str(r#"{"host": "h"}"#).unwrap();
        assert_eq!(store.port, 22);
        assert_eq!(store.user, None);
    }

    #[test]
    fn validate_fails_without_client_on_path() {
        let empty = TempDir::new().unwrap();

        assert!(provider_with_path(None).validate().is_err());
        assert!(provider_with_path(Some(empty.path())).validate().is_err());
    }

    #[test]
    fn validate_succeeds_when_client_is_found() {
        let bin = TempDir::new().unwrap();
        fs::write(bin.path().join(SSH_BINARY), "").unwrap();

        assert!(provider_with_path(Some(bin.path())).validate().is_ok());
    }

    #[test]
    fn validate_ignores_directory_named_like_client() {
        let bin = TempDir::new().unwrap();
        fs::create_dir(bin.path().join(SSH_BINARY)).unwrap();

        assert!(provider_with_path(Some(bin.path())).validate().is_err());
    }
}
