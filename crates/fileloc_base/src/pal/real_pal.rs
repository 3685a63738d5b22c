use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::{FilelocError, FilelocResult, error::ErrorKind};

use super::FilePath;
use super::traits::{DirEntry, EntryKind, FileStat, Pal, ReadSeek};

/// Concrete PAL implementation using the real filesystem via std::fs.
///
/// All file paths are resolved relative to a configured base directory.
/// Symbolic links are not followed.
#[derive(Debug)]
pub struct RealPal {
    base_dir: PathBuf,
}

impl RealPal {
    /// Create a new RealPal with the given base directory.
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a FilePath to an absolute filesystem path.
    fn resolve_path(&self, path: &FilePath) -> PathBuf {
        self.base_dir.join(path.as_path())
    }
}

fn file_error(path: PathBuf, source: std::io::Error) -> Box<FilelocError> {
    Box::new(FilelocError::new(ErrorKind::FileError { path, source }))
}

fn entry_kind(file_type: fs::FileType) -> EntryKind {
    if file_type.is_file() {
        EntryKind::File
    } else if file_type.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::Other
    }
}

fn unix_timestamp(modified: std::io::Result<SystemTime>) -> u64 {
    modified
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
}

fn file_stat(metadata: &fs::Metadata) -> FileStat {
    FileStat {
        kind: entry_kind(metadata.file_type()),
        size: metadata.len(),
        timestamp: unix_timestamp(metadata.modified()),
    }
}

impl Pal for RealPal {
    #[instrument(skip(self), fields(path = %path))]
    fn stat(&self, path: &FilePath) -> FilelocResult<Option<FileStat>> {
        let resolved = self.resolve_path(path);
        match fs::symlink_metadata(&resolved) {
            Ok(metadata) => {
                let stat = file_stat(&metadata);
                debug!(kind = ?stat.kind, size = stat.size, resolved = %resolved.display(), "stat");
                Ok(Some(stat))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(resolved = %resolved.display(), "no entry");
                Ok(None)
            }
            Err(e) => {
                debug!(error = %e, "failed to stat");
                Err(file_error(resolved, e))
            }
        }
    }

    #[instrument(skip(self), fields(path = %path))]
    fn list_directory(&self, path: &FilePath) -> FilelocResult<Vec<DirEntry>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "listing directory");

        if !resolved.is_dir() {
            debug!("directory not found");
            return Err(file_error(
                resolved,
                std::io::Error::new(std::io::ErrorKind::NotFound, "directory not found"),
            ));
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&resolved).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                debug!(error = %e, "error listing directory");
                file_error(
                    e.path()
                        .map(|p| p.to_path_buf())
                        .unwrap_or_else(|| resolved.clone()),
                    std::io::Error::other(e.to_string()),
                )
            })?;
            let metadata = entry
                .metadata()
                .map_err(|e| file_error(entry.path().to_path_buf(), std::io::Error::other(e.to_string())))?;
            let basename = entry.file_name().to_string_lossy().into_owned();
            entries.push(DirEntry::new(basename, file_stat(&metadata)));
        }

        debug!(count = entries.len(), "directory listed");
        Ok(entries)
    }

    #[instrument(skip(self), fields(path = %path))]
    fn read_file(&self, path: &FilePath) -> FilelocResult<Box<dyn ReadSeek + 'static>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "opening file for reading");
        let file = fs::File::open(&resolved).map_err(|e| {
            debug!(error = %e, "failed to open file");
            file_error(resolved, e)
        })?;
        debug!("file opened successfully");
        Ok(Box::new(file))
    }

    #[instrument(skip(self, content), fields(path = %path, len = content.len()))]
    fn write_file(&self, path: &FilePath, content: &[u8]) -> FilelocResult<()> {
        let resolved = self.resolve_path(path);
        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                debug!(error = %e, "failed to create parent directories");
                file_error(parent.to_path_buf(), e)
            })?;
        }
        fs::write(&resolved, content).map_err(|e| {
            debug!(error = %e, "failed to write file");
            file_error(resolved, e)
        })?;
        debug!("file written successfully");
        Ok(())
    }
}
