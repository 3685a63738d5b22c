use std::path::{MAIN_SEPARATOR, PathBuf};
use std::sync::OnceLock;

use tracing::{debug, instrument, warn};

use fileloc_base::pal::split_basename;
use fileloc_base::{FilePath, FilelocError, FilelocResult, PalHandle};

use crate::config::{LocationConfig, create_pal};
use crate::file_handle::FileHandle;
use crate::file_info::{FileInfo, RecordKind};
use crate::filter::ExtensionFilter;

/// A configured directory whose files can be listed, inspected, read and written.
///
/// The storage adapter is created from the configuration on first use and
/// reused afterwards.
///
/// # Examples
///
/// ```no_run
/// use fileloc_core::{FileLocation, LocationConfig};
///
/// let location = FileLocation::new(LocationConfig::local("/srv/files"));
/// for file in location.list_files(["txt", "md"])? {
///     println!("{} ({} bytes)", file.basename()?, file.size()?);
/// }
/// # Ok::<(), Box<fileloc_base::FilelocError>>(())
/// ```
#[derive(Debug)]
pub struct FileLocation {
    config: LocationConfig,
    pal: OnceLock<PalHandle>,
}

impl FileLocation {
    pub fn new(config: LocationConfig) -> Self {
        Self {
            config,
            pal: OnceLock::new(),
        }
    }

    /// Uses `pal` as the storage adapter instead of creating one from the configuration.
    pub fn with_pal(config: LocationConfig, pal: PalHandle) -> Self {
        Self {
            config,
            pal: OnceLock::from(pal),
        }
    }

    fn pal(&self) -> FilelocResult<&PalHandle> {
        if let Some(pal) = self.pal.get() {
            return Ok(pal);
        }
        let pal = create_pal(&self.config)?;
        Ok(self.pal.get_or_init(|| pal))
    }

    /// The base directory of this location.
    pub fn location_path(&self) -> FilelocResult<PathBuf> {
        self.config.location_path()
    }

    /// Full path of `file_name` inside this location, for diagnostics.
    pub fn file_url(&self, file_name: &str) -> FilelocResult<String> {
        let base = self.location_path()?;
        Ok(format!(
            "{}{}{}",
            base.display(),
            MAIN_SEPARATOR,
            file_name.trim_start_matches(['/', '\\'])
        ))
    }

    /// Looks up a regular file by its path relative to the location.
    ///
    /// Returns `Ok(None)` if nothing exists under that name or the entry is not
    /// a regular file.
    #[instrument(skip(self))]
    pub fn get_file(&self, file_name: &str) -> FilelocResult<Option<FileHandle<'_>>> {
        if file_name.is_empty() {
            return Err(Box::new(FilelocError::validation("File name must not be empty")));
        }

        let stat = match self.pal()?.stat(&FilePath::from(file_name))? {
            Some(stat) if stat.kind.is_file() => stat,
            other => {
                debug!(kind = ?other.map(|s| s.kind), "not a regular file");
                return Ok(None);
            }
        };

        let (name, ext) = split_basename(file_name);
        let info = FileInfo {
            kind: Some(RecordKind::File),
            timestamp: Some(i64::try_from(stat.timestamp).unwrap_or(i64::MAX)),
            size: Some(i64::try_from(stat.size).unwrap_or(i64::MAX)),
            basename: Some(file_name.to_string()),
            extension: Some(ext.to_string()),
            filename: Some(name.to_string()),
        };
        FileHandle::from_info(self, info).map(Some)
    }

    /// Reads the whole content of `file_name`; adapter errors are returned unchanged.
    #[instrument(skip(self))]
    pub fn read_file(&self, file_name: &str) -> FilelocResult<Vec<u8>> {
        self.pal()?.read_file_to_end(&FilePath::from(file_name))
    }

    /// Replaces the content of `file_name`.
    ///
    /// A failed write is reported as `Ok(false)`; only an unusable configuration is an error.
    #[instrument(skip(self, content))]
    pub fn put_file(&self, file_name: &str, content: impl AsRef<[u8]>) -> FilelocResult<bool> {
        let pal = self.pal()?;
        match pal.write_file(&FilePath::from(file_name), content.as_ref()) {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!(error = %e, "failed to write file");
                Ok(false)
            }
        }
    }

    /// Lists the regular files of the location, in the adapter's order.
    #[instrument(skip(self, filter))]
    pub fn list_files(&self, filter: impl Into<ExtensionFilter>) -> FilelocResult<Vec<FileHandle<'_>>> {
        let filter = filter.into();
        filter.validate()?;

        let entries = self.pal()?.list_directory(&FilePath::root())?;
        let files = entries
            .iter()
            .filter(|entry| entry.kind.is_file() && filter.matches(&entry.extension))
            .map(|entry| FileHandle::from_info(self, FileInfo::from(entry)))
            .collect::<FilelocResult<Vec<_>>>()?;

        debug!(?filter, total = entries.len(), matched = files.len(), "files listed");
        Ok(files)
    }

    /// Like [`list_files`](Self::list_files), keeping only files whose name
    /// (without extension) starts with `name_prefix`.
    #[instrument(skip(self, filter))]
    pub fn list_files_with_prefix(
        &self,
        name_prefix: &str,
        filter: impl Into<ExtensionFilter>,
    ) -> FilelocResult<Vec<FileHandle<'_>>> {
        let mut files = Vec::new();
        for file in self.list_files(filter)? {
            if file.name()?.starts_with(name_prefix) {
                files.push(file);
            }
        }
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fileloc_base::{ErrorKind, MockPal};

    fn mock_location() -> (MockPal, FileLocation) {
        let pal = MockPal::new();
        pal.add_file_with_timestamp(FilePath::from("file1.txt"), b"MIT License file1".to_vec(), 10);
        pal.add_file_with_timestamp(FilePath::from("file2.md"), b"MIT License file2".to_vec(), 20);
        pal.add_file_with_timestamp(
            FilePath::from("other_file1.md"),
            b"MIT License other_file1".to_vec(),
            30,
        );
        pal.add_file_with_timestamp(
            FilePath::from("other_file2.txt"),
            b"MIT License other_file2".to_vec(),
            40,
        );
        pal.add_directory(FilePath::from("nested.txt"));
        pal.add_file(FilePath::from("nested.txt/inner.txt"), b"inner".to_vec());
        let location = FileLocation::with_pal(LocationConfig::local("/mock"), PalHandle::new(pal.clone()));
        (pal, location)
    }

    fn sorted_basenames(files: &[FileHandle<'_>]) -> Vec<String> {
        let mut names: Vec<String> = files
            .iter()
            .map(|file| file.basename().unwrap().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_list_files_skips_directories() {
        let (_pal, location) = mock_location();
        let files = location.list_files(ExtensionFilter::Any).unwrap();
        assert_eq!(
            sorted_basenames(&files),
            ["file1.txt", "file2.md", "other_file1.md", "other_file2.txt"]
        );
        assert!(files.iter().all(|file| file.is_loaded()));
    }

    #[test]
    fn test_list_files_single_extension() {
        let (_pal, location) = mock_location();
        let files = location.list_files("txt").unwrap();
        assert_eq!(sorted_basenames(&files), ["file1.txt", "other_file2.txt"]);
        assert!(files.iter().all(|file| file.ext().unwrap() == "txt"));
    }

    #[test]
    fn test_list_files_extension_set() {
        let (_pal, location) = mock_location();
        assert_eq!(location.list_files(["txt", "md"]).unwrap().len(), 4);
        assert_eq!(location.list_files(["md", "rs"]).unwrap().len(), 2);
        assert!(location.list_files(["rs"]).unwrap().is_empty());
    }

    #[test]
    fn test_list_files_without_extension() {
        let pal = MockPal::new();
        pal.add_file(FilePath::from("LICENSE"), b"MIT License".to_vec());
        pal.add_file(FilePath::from("a.txt"), b"a".to_vec());
        let location = FileLocation::with_pal(LocationConfig::local("/mock"), PalHandle::new(pal));

        let files = location.list_files("").unwrap();
        assert_eq!(sorted_basenames(&files), ["LICENSE"]);
        assert_eq!(files[0].ext().unwrap(), "");

        let files = location.list_files(["", "txt"]).unwrap();
        assert_eq!(sorted_basenames(&files), ["LICENSE", "a.txt"]);
    }

    #[test]
    fn test_list_files_invalid_filter() {
        let (_pal, location) = mock_location();
        let err = location.list_files(".txt").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Validation { .. }));
    }

    #[test]
    fn test_list_files_with_prefix() {
        let (_pal, location) = mock_location();
        let files = location.list_files_with_prefix("other_", None::<&str>).unwrap();
        assert_eq!(sorted_basenames(&files), ["other_file1.md", "other_file2.txt"]);

        let files = location.list_files_with_prefix("other_", "txt").unwrap();
        assert_eq!(sorted_basenames(&files), ["other_file2.txt"]);
        assert_eq!(files[0].size().unwrap(), 23);
        assert_eq!(files[0].timestamp().unwrap(), 40);
    }

    #[test]
    fn test_list_files_with_prefix_is_case_sensitive() {
        let (_pal, location) = mock_location();
        assert!(location.list_files_with_prefix("OTHER_", ExtensionFilter::Any).unwrap().is_empty());
        assert_eq!(location.list_files_with_prefix("", ExtensionFilter::Any).unwrap().len(), 4);
    }

    #[test]
    fn test_get_file() {
        let (_pal, location) = mock_location();
        let file = location.get_file("file2.md").unwrap().expect("file2.md exists");
        assert_eq!(file.name().unwrap(), "file2");
        assert_eq!(file.ext().unwrap(), "md");
        assert_eq!(file.size().unwrap(), 17);
        assert_eq!(file.timestamp().unwrap(), 20);
    }

    #[test]
    fn test_get_file_absent_or_not_a_file() {
        let (_pal, location) = mock_location();
        assert!(location.get_file("missing.txt").unwrap().is_none());
        assert!(location.get_file("nested.txt").unwrap().is_none());
    }

    #[test]
    fn test_get_file_nested_name() {
        let (_pal, location) = mock_location();
        let file = location.get_file("nested.txt/inner.txt").unwrap().expect("nested file exists");
        assert_eq!(file.basename().unwrap(), "nested.txt/inner.txt");
        assert_eq!(file.ext().unwrap(), "txt");
        assert_eq!(file.size().unwrap(), 5);
        assert_eq!(file.content().unwrap(), "inner");

        assert!(location.get_file("nested.txt/missing.txt").unwrap().is_none());
    }

    #[test]
    fn test_nested_name_behaves_like_top_level() {
        let (_pal, location) = mock_location();
        assert!(location.put_file("sub/a.txt", "abc").unwrap());
        assert_eq!(location.read_file("sub/a.txt").unwrap(), b"abc");

        let handle = FileHandle::from_name(&location, "sub/a.txt").unwrap();
        assert_eq!(handle.size().unwrap(), 3);
        assert_eq!(handle.name().unwrap(), "sub/a");
        assert_eq!(handle.content().unwrap(), "abc");
    }

    #[test]
    fn test_get_file_rejects_empty_name() {
        let (_pal, location) = mock_location();
        let err = location.get_file("").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Validation { .. }));
    }

    #[test]
    fn test_read_file() {
        let (_pal, location) = mock_location();
        assert_eq!(location.read_file("file1.txt").unwrap(), b"MIT License file1");
        assert!(location.read_file("missing.txt").is_err());
    }

    #[test]
    fn test_put_file() {
        let (pal, location) = mock_location();
        assert!(location.put_file("new.txt", "fresh content").unwrap());
        assert_eq!(pal.file_content(&FilePath::from("new.txt")), Some(b"fresh content".to_vec()));

        let file = location.get_file("new.txt").unwrap().unwrap();
        assert_eq!(file.content().unwrap(), "fresh content");
    }

    #[test]
    fn test_put_file_failure_returns_false() {
        let (pal, location) = mock_location();
        pal.set_fail_writes(true);
        assert!(!location.put_file("new.txt", b"x").unwrap());
        assert!(location.get_file("new.txt").unwrap().is_none());
    }

    #[test]
    fn test_file_url() {
        let (_pal, location) = mock_location();
        let expected = format!("/mock{}file1.txt", MAIN_SEPARATOR);
        assert_eq!(location.file_url("file1.txt").unwrap(), expected);
        assert_eq!(location.file_url("//file1.txt").unwrap(), expected);
    }

    #[test]
    fn test_invalid_config_fails_on_use() {
        let location = FileLocation::new(LocationConfig::default());
        for err in [
            location.location_path().unwrap_err(),
            location.list_files(ExtensionFilter::Any).unwrap_err(),
            location.put_file("a.txt", "a").unwrap_err(),
        ] {
            assert!(matches!(err.kind(), ErrorKind::Config { .. }), "{:?}", err);
        }
    }
}
