use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::FilelocError;
use crate::FilelocResult;
use crate::error::ErrorKind;

use super::FilePath;
use super::traits::{DirEntry, EntryKind, FileStat, Pal, ReadSeek};

/// Timestamp given to files added without an explicit one.
pub const DEFAULT_MOCK_TIMESTAMP: u64 = 1_700_000_000;

/// In-memory PAL implementation for testing.
///
/// Files and directories live in hash maps; nothing touches the real
/// filesystem. Listing order follows the hash map and is therefore unspecified,
/// just like a real directory listing.
///
/// # Examples
///
/// ```
/// use fileloc_base::{MockPal, Pal, FilePath};
///
/// let mock = MockPal::new();
/// mock.add_file(FilePath::from("test.txt"), b"content".to_vec());
/// let content = mock.read_file_to_string(&FilePath::from("test.txt")).unwrap();
/// assert_eq!(content, "content");
/// ```
#[derive(Debug, Clone)]
pub struct MockPal {
    files: Arc<Mutex<HashMap<FilePath, MockFile>>>,
    directories: Arc<Mutex<HashSet<FilePath>>>,
    fail_writes: Arc<AtomicBool>,
}

#[derive(Debug, Clone)]
struct MockFile {
    content: Vec<u8>,
    timestamp: u64,
}

impl MockPal {
    /// Create a new empty MockPal.
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            directories: Arc::new(Mutex::new(HashSet::new())),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Add a file to the mock storage.
    pub fn add_file(&self, path: FilePath, content: Vec<u8>) {
        self.add_file_with_timestamp(path, content, DEFAULT_MOCK_TIMESTAMP);
    }

    pub fn add_file_with_timestamp(&self, path: FilePath, content: Vec<u8>, timestamp: u64) {
        self.files
            .lock()
            .unwrap()
            .insert(path.normalized(), MockFile { content, timestamp });
    }

    /// Add a directory to the mock storage.
    pub fn add_directory(&self, path: FilePath) {
        self.directories.lock().unwrap().insert(path.normalized());
    }

    pub fn remove_file(&self, path: &FilePath) {
        self.files.lock().unwrap().remove(&path.normalized());
    }

    /// Make every subsequent `write_file` fail, as a full or read-only disk would.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Content currently stored for `path`, if any.
    pub fn file_content(&self, path: &FilePath) -> Option<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(&path.normalized())
            .map(|file| file.content.clone())
    }

    fn not_found(path: &FilePath) -> Box<FilelocError> {
        Box::new(FilelocError::new(ErrorKind::FileError {
            path: path.as_path().to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path),
            ),
        }))
    }
}

impl Default for MockPal {
    fn default() -> Self {
        Self::new()
    }
}

impl Pal for MockPal {
    fn stat(&self, path: &FilePath) -> FilelocResult<Option<FileStat>> {
        let path = path.normalized();
        if let Some(file) = self.files.lock().unwrap().get(&path) {
            return Ok(Some(FileStat {
                kind: EntryKind::File,
                size: file.content.len() as u64,
                timestamp: file.timestamp,
            }));
        }
        if path == FilePath::root() || self.directories.lock().unwrap().contains(&path) {
            return Ok(Some(FileStat {
                kind: EntryKind::Directory,
                size: 0,
                timestamp: DEFAULT_MOCK_TIMESTAMP,
            }));
        }
        Ok(None)
    }

    fn list_directory(&self, path: &FilePath) -> FilelocResult<Vec<DirEntry>> {
        let dir = path.normalized();
        if dir != FilePath::root() && !self.directories.lock().unwrap().contains(&dir) {
            return Err(Self::not_found(&dir));
        }
        let is_child = |candidate: &FilePath| candidate.parent().as_ref() == Some(&dir);

        let mut entries: Vec<DirEntry> = self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|(file_path, _)| is_child(*file_path))
            .filter_map(|(file_path, file)| {
                let stat = FileStat {
                    kind: EntryKind::File,
                    size: file.content.len() as u64,
                    timestamp: file.timestamp,
                };
                file_path.file_name().map(|name| DirEntry::new(name, stat))
            })
            .collect();
        entries.extend(
            self.directories
                .lock()
                .unwrap()
                .iter()
                .filter(|dir_path| is_child(*dir_path))
                .filter_map(|dir_path| {
                    let stat = FileStat {
                        kind: EntryKind::Directory,
                        size: 0,
                        timestamp: DEFAULT_MOCK_TIMESTAMP,
                    };
                    dir_path.file_name().map(|name| DirEntry::new(name, stat))
                }),
        );
        Ok(entries)
    }

    fn read_file(&self, path: &FilePath) -> FilelocResult<Box<dyn ReadSeek + 'static>> {
        let files = self.files.lock().unwrap();
        let content = files
            .get(&path.normalized())
            .ok_or_else(|| Self::not_found(path))?
            .content
            .clone();
        Ok(Box::new(Cursor::new(content)))
    }

    fn write_file(&self, path: &FilePath, content: &[u8]) -> FilelocResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Box::new(FilelocError::new(ErrorKind::FileError {
                path: path.as_path().to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "writes are disabled",
                ),
            })));
        }
        self.add_file(path.clone(), content.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_file() {
        let pal = MockPal::new();
        pal.add_file_with_timestamp(FilePath::from("test.txt"), b"content".to_vec(), 42);

        let stat = pal.stat(&FilePath::from("test.txt")).unwrap();
        assert_eq!(
            stat,
            Some(FileStat {
                kind: EntryKind::File,
                size: 7,
                timestamp: 42
            })
        );
    }

    #[test]
    fn test_stat_directory_and_missing() {
        let pal = MockPal::new();
        pal.add_directory(FilePath::from("sub"));

        let stat = pal.stat(&FilePath::from("sub")).unwrap().unwrap();
        assert_eq!(stat.kind, EntryKind::Directory);
        assert_eq!(pal.stat(&FilePath::from("missing.txt")).unwrap(), None);
    }

    #[test]
    fn test_read_file() {
        let pal = MockPal::new();
        pal.add_file(FilePath::from("test.txt"), b"hello world".to_vec());

        let result = pal.read_file_to_string(&FilePath::from("test.txt")).unwrap();
        assert_eq!(result, "hello world");
    }

    #[test]
    fn test_read_file_not_found() {
        let pal = MockPal::new();
        assert!(pal.read_file(&FilePath::from("nonexistent.txt")).is_err());
    }

    #[test]
    fn test_write_file() {
        let pal = MockPal::new();
        pal.write_file(&FilePath::from("new.txt"), b"test content")
            .unwrap();

        assert_eq!(
            pal.file_content(&FilePath::from("new.txt")),
            Some(b"test content".to_vec())
        );
    }

    #[test]
    fn test_write_file_failure() {
        let pal = MockPal::new();
        pal.set_fail_writes(true);

        assert!(pal.write_file(&FilePath::from("new.txt"), b"x").is_err());
        assert_eq!(pal.file_content(&FilePath::from("new.txt")), None);
    }

    #[test]
    fn test_list_directory_direct_children_only() {
        let pal = MockPal::new();
        pal.add_file(FilePath::from("a.txt"), b"a".to_vec());
        pal.add_file(FilePath::from("b.md"), b"bb".to_vec());
        pal.add_directory(FilePath::from("sub"));
        pal.add_file(FilePath::from("sub/c.txt"), b"ccc".to_vec());

        let mut entries = pal.list_directory(&FilePath::root()).unwrap();
        entries.sort_by(|a, b| a.basename.cmp(&b.basename));
        let names: Vec<_> = entries.iter().map(|e| (e.basename.as_str(), e.kind)).collect();
        assert_eq!(
            names,
            vec![
                ("a.txt", EntryKind::File),
                ("b.md", EntryKind::File),
                ("sub", EntryKind::Directory),
            ]
        );

        let nested = pal.list_directory(&FilePath::from("sub")).unwrap();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].basename, "c.txt");
        assert_eq!(nested[0].size, 3);
    }

    #[test]
    fn test_list_directory_unknown() {
        let pal = MockPal::new();
        assert!(pal.list_directory(&FilePath::from("nowhere")).is_err());
    }
}
