use super::{BrowserEntry, BrowserModel};
use crate::events::{AppEvent, EventBus};
use crate::fs::{FileEntry, FilePath, FileSystem};
use anyhow::Result;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Directory currently shown and what it contained at the last refresh.
struct Listing {
    path: FilePath,
    entries: Vec<FileEntry>,
}

pub struct FileBrowserModel {
    fs: Arc<dyn FileSystem>,
    listing: RwLock<Listing>,
    events: Option<Arc<EventBus>>,
}

impl FileBrowserModel {
    pub fn new(fs: Arc<dyn FileSystem>, start: FilePath) -> Self {
        Self {
            fs,
            listing: RwLock::new(Listing {
                path: start,
                entries: Vec::new(),
            }),
            events: None,
        }
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn current_path(&self) -> FilePath {
        self.read_listing().path.clone()
    }

    pub fn entries(&self) -> Vec<BrowserEntry> {
        self.read_listing()
            .entries
            .iter()
            .cloned()
            .map(BrowserEntry::new)
            .collect()
    }

    /// Lists `path` and makes it current. The path and its entries change
    /// together under one lock.
    pub fn cd(&self, path: FilePath) -> Result<()> {
        let count = {
            let mut listing = self.write_listing();
            let entries = self.fs.list(&path)?;
            let count = entries.len();
            *listing = Listing {
                path: path.clone(),
                entries,
            };
            count
        };
        self.publish(&path, count);
        Ok(())
    }

    fn read_listing(&self) -> RwLockReadGuard<'_, Listing> {
        self.listing.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_listing(&self) -> RwLockWriteGuard<'_, Listing> {
        self.listing.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, path: &FilePath, count: usize) {
        log::debug!("Refreshed {} ({} entries)", path, count);
        if let Some(events) = &self.events {
            events.send(AppEvent::EntriesChanged {
                path: path.to_string(),
                count,
            });
        }
    }
}

impl BrowserModel for FileBrowserModel {
    fn file_system(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    fn refresh_sync(&self) -> Result<()> {
        let (path, count) = {
            let mut listing = self.write_listing();
            let entries = self.fs.list(&listing.path)?;
            listing.entries = entries;
            (listing.path.clone(), listing.entries.len())
        };
        self.publish(&path, count);
        Ok(())
    }
}
