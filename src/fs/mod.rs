mod local;

pub use local::LocalFileSystem;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A `/`-separated path on some file system, local or remote.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilePath(String);

impl FilePath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn join(&self, name: &str) -> FilePath {
        if self.0.is_empty() {
            return FilePath::new(name);
        }
        if self.0.ends_with('/') {
            FilePath(format!("{}{}", self.0, name))
        } else {
            FilePath(format!("{}/{}", self.0, name))
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.0
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
    }

    pub fn to_local(&self) -> PathBuf {
        PathBuf::from(&self.0)
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FilePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for FilePath {
    fn from(path: &Path) -> Self {
        Self(path.to_string_lossy().replace('\\', "/"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Directory,
    Link,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: FilePath,
    pub kind: FileKind,
}

impl FileEntry {
    pub fn new(path: impl Into<FilePath>, kind: FileKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

pub trait FileSystem: Send + Sync {
    /// Creates an empty file. Existing files are left as they are.
    fn touch(&self, path: &FilePath) -> Result<()>;

    fn mkdirs(&self, path: &FilePath) -> Result<()>;

    fn list(&self, dir: &FilePath) -> Result<Vec<FileEntry>>;
}
