use super::{FileEntry, FileKind, FilePath, FileSystem};
use anyhow::{Context, Result};
use std::fs;

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn touch(&self, path: &FilePath) -> Result<()> {
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.to_local())
            .with_context(|| format!("Failed to create file {}", path))?;
        Ok(())
    }

    fn mkdirs(&self, path: &FilePath) -> Result<()> {
        fs::create_dir_all(path.to_local())
            .with_context(|| format!("Failed to create directory {}", path))
    }

    fn list(&self, dir: &FilePath) -> Result<Vec<FileEntry>> {
        let entries = fs::read_dir(dir.to_local())
            .with_context(|| format!("Failed to read directory {}", dir))?;

        let mut listed: Vec<FileEntry> = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let kind = e.file_type().ok().map(|t| {
                    if t.is_symlink() {
                        FileKind::Link
                    } else if t.is_dir() {
                        FileKind::Directory
                    } else if t.is_file() {
                        FileKind::File
                    } else {
                        FileKind::Other
                    }
                })?;
                let name = e.file_name().to_string_lossy().to_string();
                Some(FileEntry::new(dir.join(&name), kind))
            })
            .collect();

        listed.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(listed)
    }
}
