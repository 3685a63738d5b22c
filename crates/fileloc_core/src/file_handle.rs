/* 📖 # How does a FileHandle load its metadata?

A handle starts in one of two states:
- materialized: built from a complete metadata record (this is what listings produce)
- name-only: built from a bare file name, metadata unknown

The first metadata accessor on a name-only handle asks the owning location for
the file and copies its metadata over. That happens at most once: the lock
serializes concurrent callers and the OnceLock publishes the result. A failed
load leaves the handle name-only, so a later accessor tries again.

Content is never cached: every `content()` call reads through the location.
*/

use std::sync::OnceLock;

use parking_lot::Mutex;
use tracing::{debug, instrument};

use fileloc_base::{ErrorKind, FilelocError, FilelocResult};

use crate::file_info::{FileInfo, RecordKind};
use crate::file_location::FileLocation;

/// Metadata of a regular file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// Full file name, with extension
    pub basename: String,
    /// File name without extension
    pub name: String,
    /// Extension without the dot, empty if there is none
    pub ext: String,
    /// Size in bytes
    pub size: u64,
    /// Modification time, seconds since the Unix epoch
    pub timestamp: u64,
}

/// One file of a [`FileLocation`].
#[derive(Debug)]
pub struct FileHandle<'a> {
    location: &'a FileLocation,
    basename: String,
    metadata: OnceLock<FileMetadata>,
    loading: Mutex<()>,
}

fn missing_key(key: &str) -> Box<FilelocError> {
    Box::new(FilelocError::validation(format!(
        "Missing key {} in file info",
        key
    )))
}

impl<'a> FileHandle<'a> {
    /// Creates a materialized handle from a complete metadata record.
    pub fn from_info(location: &'a FileLocation, info: FileInfo) -> FilelocResult<Self> {
        let metadata = validate_info(info)?;
        Ok(Self {
            location,
            basename: metadata.basename.clone(),
            metadata: OnceLock::from(metadata),
            loading: Mutex::new(()),
        })
    }

    /// Creates a name-only handle; metadata is loaded on first access.
    pub fn from_name(location: &'a FileLocation, basename: impl Into<String>) -> FilelocResult<Self> {
        let basename = basename.into();
        if basename.is_empty() {
            return Err(Box::new(FilelocError::validation(
                "File name must not be empty",
            )));
        }
        Ok(Self {
            location,
            basename,
            metadata: OnceLock::new(),
            loading: Mutex::new(()),
        })
    }

    /// Whether the metadata is available without touching the storage.
    pub fn is_loaded(&self) -> bool {
        self.metadata.get().is_some()
    }

    pub fn metadata(&self) -> FilelocResult<&FileMetadata> {
        if let Some(metadata) = self.metadata.get() {
            return Ok(metadata);
        }
        let _guard = self.loading.lock();
        if let Some(metadata) = self.metadata.get() {
            return Ok(metadata);
        }
        self.load()?;
        self.metadata
            .get()
            .ok_or_else(|| Box::new(FilelocError::illegal_state("File metadata missing after load")))
    }

    pub fn basename(&self) -> FilelocResult<&str> {
        Ok(&self.metadata()?.basename)
    }

    pub fn name(&self) -> FilelocResult<&str> {
        Ok(&self.metadata()?.name)
    }

    pub fn ext(&self) -> FilelocResult<&str> {
        Ok(&self.metadata()?.ext)
    }

    pub fn size(&self) -> FilelocResult<u64> {
        Ok(self.metadata()?.size)
    }

    pub fn timestamp(&self) -> FilelocResult<u64> {
        Ok(self.metadata()?.timestamp)
    }

    /// Reads the current content of the file as UTF-8 text.
    pub fn content(&self) -> FilelocResult<String> {
        let bytes = self.content_bytes()?;
        String::from_utf8(bytes).map_err(|_e| {
            self.read_error(Box::new(FilelocError::message("content is not valid UTF-8")))
        })
    }

    /// Reads the current content of the file.
    #[instrument(skip(self), fields(basename = %self.basename))]
    pub fn content_bytes(&self) -> FilelocResult<Vec<u8>> {
        self.location.read_file(&self.basename).map_err(|e| {
            if matches!(e.kind(), ErrorKind::Config { .. }) {
                e
            } else {
                self.read_error(e)
            }
        })
    }

    pub(crate) fn into_metadata(self) -> Option<FileMetadata> {
        self.metadata.into_inner()
    }

    fn read_error(&self, cause: Box<FilelocError>) -> Box<FilelocError> {
        let url = self
            .location
            .file_url(&self.basename)
            .unwrap_or_else(|_| self.basename.clone());
        debug!(%url, error = %cause, "failed to read file content");
        Box::new(FilelocError::new(ErrorKind::Read { url }).caused_by(cause))
    }

    /// Fetches the metadata from the location. Callers hold the loading lock.
    #[instrument(skip(self), fields(basename = %self.basename))]
    fn load(&self) -> FilelocResult<()> {
        if self.is_loaded() {
            return Err(Box::new(FilelocError::illegal_state("File is already loaded")));
        }

        let fetched = match self.location.get_file(&self.basename)? {
            Some(file) => file,
            None => {
                let url = self.location.file_url(&self.basename)?;
                debug!(%url, "file is not available");
                return Err(Box::new(FilelocError::not_found(url)));
            }
        };
        let metadata = fetched
            .into_metadata()
            .ok_or_else(|| Box::new(FilelocError::illegal_state("Fetched file is not loaded")))?;

        self.metadata
            .set(metadata)
            .map_err(|_| Box::new(FilelocError::illegal_state("File is already loaded")))?;
        debug!("file metadata loaded");
        Ok(())
    }
}

fn validate_info(info: FileInfo) -> FilelocResult<FileMetadata> {
    // checked in the order the keys are documented
    let kind = info.kind.ok_or_else(|| missing_key("kind"))?;
    let timestamp = info.timestamp.ok_or_else(|| missing_key("timestamp"))?;
    let size = info.size.ok_or_else(|| missing_key("size"))?;
    let basename = info.basename.ok_or_else(|| missing_key("basename"))?;
    let ext = info.extension.ok_or_else(|| missing_key("extension"))?;
    let name = info.filename.ok_or_else(|| missing_key("filename"))?;

    if kind != RecordKind::File {
        return Err(Box::new(FilelocError::validation(format!(
            "File is required, '{}' is of kind {:?}",
            basename, kind
        ))));
    }
    let size = u64::try_from(size)
        .map_err(|_| Box::new(FilelocError::validation(format!("Invalid size {}", size))))?;
    let timestamp = u64::try_from(timestamp).map_err(|_| {
        Box::new(FilelocError::validation(format!(
            "Invalid timestamp {}",
            timestamp
        )))
    })?;

    let consistent = if ext.is_empty() {
        basename == name
    } else {
        basename.strip_suffix(ext.as_str()).and_then(|rest| rest.strip_suffix('.')) == Some(name.as_str())
    };
    if !consistent {
        return Err(Box::new(FilelocError::validation(format!(
            "Inconsistent file info: basename '{}' does not match name '{}' and extension '{}'",
            basename, name, ext
        ))));
    }

    Ok(FileMetadata {
        basename,
        name,
        ext,
        size,
        timestamp,
    })
}
