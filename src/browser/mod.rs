pub mod action;
mod model;

pub use model::FileBrowserModel;

use crate::fs::{FileEntry, FileKind, FilePath, FileSystem};
use anyhow::Result;

/// A file listed in the browser. Actions only ever read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserEntry {
    raw: FileEntry,
}

impl BrowserEntry {
    pub fn new(raw: FileEntry) -> Self {
        Self { raw }
    }

    pub fn raw_file_entry(&self) -> &FileEntry {
        &self.raw
    }

    pub fn path(&self) -> &FilePath {
        &self.raw.path
    }

    pub fn kind(&self) -> FileKind {
        self.raw.kind
    }

    pub fn is_directory(&self) -> bool {
        self.raw.kind == FileKind::Directory
    }
}

impl From<FileEntry> for BrowserEntry {
    fn from(raw: FileEntry) -> Self {
        Self::new(raw)
    }
}

pub trait BrowserModel: Send + Sync {
    fn file_system(&self) -> &dyn FileSystem;

    /// Blocks until the model's view matches the file system again.
    fn refresh_sync(&self) -> Result<()>;
}
