use serde_derive::Deserialize;

use fileloc_base::{DirEntry, EntryKind};

/// Kind of entry as carried by a metadata record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    File,
    Dir,
    Other,
}

impl From<EntryKind> for RecordKind {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::File => RecordKind::File,
            EntryKind::Directory => RecordKind::Dir,
            EntryKind::Other => RecordKind::Other,
        }
    }
}

/// Raw metadata record describing one file, as produced by a directory listing.
///
/// Every field is optional so that incomplete records can be represented and
/// rejected by [`FileHandle::from_info`](crate::FileHandle::from_info).
/// Sizes and timestamps are signed for the same reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileInfo {
    #[serde(alias = "type")]
    pub kind: Option<RecordKind>,
    pub timestamp: Option<i64>,
    pub size: Option<i64>,
    pub basename: Option<String>,
    pub extension: Option<String>,
    pub filename: Option<String>,
}

impl From<&DirEntry> for FileInfo {
    fn from(entry: &DirEntry) -> Self {
        Self {
            kind: Some(entry.kind.into()),
            timestamp: Some(i64::try_from(entry.timestamp).unwrap_or(i64::MAX)),
            size: Some(i64::try_from(entry.size).unwrap_or(i64::MAX)),
            basename: Some(entry.basename.clone()),
            extension: Some(entry.extension.clone()),
            filename: Some(entry.filename.clone()),
        }
    }
}
