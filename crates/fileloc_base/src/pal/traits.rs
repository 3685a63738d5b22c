use std::io::{Read, Seek};
use std::sync::Arc;

use crate::FilelocResult;
use crate::error::{ErrorKind, FilelocError};

use super::file_path::{FilePath, split_basename};

/// Trait combining Read + Seek for file operations.
///
/// Lets implementations hand out real files or in-memory buffers alike.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// Kind of a directory entry as reported by the adapter.
///
/// Symbolic links are not followed and are reported as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

impl EntryKind {
    pub fn is_file(self) -> bool {
        self == EntryKind::File
    }
}

/// Result of a successful `stat`: the entry exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub kind: EntryKind,
    /// Size in bytes
    pub size: u64,
    /// Modification time, seconds since the Unix epoch
    pub timestamp: u64,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub kind: EntryKind,
    /// Full file name, e.g. `notes.txt`
    pub basename: String,
    /// File name without extension, e.g. `notes`
    pub filename: String,
    /// Extension without the dot, e.g. `txt`; empty when there is none
    pub extension: String,
    pub size: u64,
    pub timestamp: u64,
}

impl DirEntry {
    /// Builds an entry for `basename`, deriving filename and extension from it.
    pub fn new(basename: impl Into<String>, stat: FileStat) -> Self {
        let basename = basename.into();
        let (filename, extension) = split_basename(&basename);
        Self {
            kind: stat.kind,
            filename: filename.to_string(),
            extension: extension.to_string(),
            basename,
            size: stat.size,
            timestamp: stat.timestamp,
        }
    }
}

/// Platform Abstraction Layer (PAL) trait providing storage operations.
///
/// All paths are relative to the implementation's base directory. Two
/// implementations are provided:
/// - `RealPal`: the local filesystem via `std::fs`
/// - `MockPal`: in-memory storage for testing
pub trait Pal: std::fmt::Debug + Send + Sync + 'static {
    /// Look up the entry at `path`; `Ok(None)` if nothing exists there.
    fn stat(&self, path: &FilePath) -> FilelocResult<Option<FileStat>>;

    /// List the direct children of the directory at `path` (no recursion).
    ///
    /// Order is whatever the implementation produces natively.
    fn list_directory(&self, path: &FilePath) -> FilelocResult<Vec<DirEntry>>;

    /// Open a file for reading.
    fn read_file(&self, path: &FilePath) -> FilelocResult<Box<dyn ReadSeek + 'static>>;

    /// Replace the content of the file at `path` with `content`, creating it if needed.
    fn write_file(&self, path: &FilePath, content: &[u8]) -> FilelocResult<()>;

    /// Check if something exists at the given path.
    fn file_exists(&self, path: &FilePath) -> FilelocResult<bool> {
        Ok(self.stat(path)?.is_some())
    }

    /// Read the entire file into memory.
    fn read_file_to_end(&self, path: &FilePath) -> FilelocResult<Vec<u8>> {
        let mut reader = self.read_file(path)?;
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents).map_err(|e| {
            Box::new(FilelocError::new(ErrorKind::FileError {
                path: path.as_path().to_path_buf(),
                source: e,
            }))
        })?;
        Ok(contents)
    }

    /// Read entire file contents as a UTF-8 string.
    fn read_file_to_string(&self, path: &FilePath) -> FilelocResult<String> {
        let contents = self.read_file_to_end(path)?;
        String::from_utf8(contents).map_err(|_e| crate::err!("File is not valid UTF-8: {}", path))
    }
}

/// Handle to a PAL implementation, enabling shared ownership.
///
/// Internally wraps `Arc<dyn Pal>`; clones share the same implementation.
///
/// # Examples
///
/// ```no_run
/// use fileloc_base::{RealPal, PalHandle};
///
/// let pal = PalHandle::new(RealPal::new("/srv/files".into()));
/// let pal_clone = pal.clone();
/// ```
#[derive(Debug, Clone)]
pub struct PalHandle(Arc<dyn Pal>);

impl PalHandle {
    pub fn new(pal: impl Pal + 'static) -> Self {
        Self(Arc::new(pal))
    }
}

impl std::ops::Deref for PalHandle {
    type Target = dyn Pal;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}
