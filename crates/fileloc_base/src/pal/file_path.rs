use relative_path::{RelativePath, RelativePathBuf};
use std::path::Path;

/* 📖 # Why use RelativePathBuf for FilePath?

Every PAL path is relative to the adapter's base directory. Wrapping
RelativePathBuf makes that explicit in the type and keeps absolute system paths
out of adapter calls.
*/

/// Type-safe wrapper for file paths relative to the PAL base directory.
///
/// # Examples
///
/// ```
/// use fileloc_base::FilePath;
///
/// let path1 = FilePath::from("notes/todo.txt");
/// let path2 = FilePath::from(String::from("file1.txt"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilePath(RelativePathBuf);

impl FilePath {
    /// The base directory itself.
    pub fn root() -> Self {
        Self(RelativePathBuf::new())
    }

    pub fn as_relative(&self) -> &RelativePath {
        &self.0
    }

    /// Converts to a regular Path, without the base directory.
    pub fn as_path(&self) -> &Path {
        Path::new(self.as_relative().as_str())
    }

    /// Resolves `.` and `..` components; the base directory normalizes to an empty path.
    pub fn normalized(&self) -> Self {
        Self(self.0.normalize())
    }

    /// Last component of the path, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name()
    }

    /// Directory containing this path; top-level entries have the root as parent.
    pub fn parent(&self) -> Option<FilePath> {
        self.0.parent().map(FilePath::from)
    }
}

/// Split a basename into name and extension.
///
/// The extension is whatever follows the last `.`. Without a `.`, or with
/// nothing after the last one, the whole basename is the name and the extension
/// is empty, so `name + "." + ext` (or just `name`) always reassembles the basename.
/// Dots in leading directory components of a nested name do not count.
pub fn split_basename(basename: &str) -> (&str, &str) {
    match basename.rsplit_once('.') {
        Some((name, ext)) if !ext.is_empty() && !ext.contains(['/', '\\']) => (name, ext),
        _ => (basename, ""),
    }
}

impl From<&str> for FilePath {
    fn from(s: &str) -> Self {
        Self(RelativePathBuf::from(s))
    }
}

impl From<String> for FilePath {
    fn from(s: String) -> Self {
        Self(RelativePathBuf::from(s))
    }
}

impl From<RelativePathBuf> for FilePath {
    fn from(p: RelativePathBuf) -> Self {
        Self(p)
    }
}

impl From<&RelativePath> for FilePath {
    fn from(p: &RelativePath) -> Self {
        Self(p.to_relative_path_buf())
    }
}

impl std::fmt::Display for FilePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<RelativePath> for FilePath {
    fn as_ref(&self) -> &RelativePath {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_path_from_str() {
        let path = FilePath::from("notes/todo.txt");
        assert_eq!(path.as_path(), Path::new("notes/todo.txt"));
    }

    #[test]
    fn test_file_path_root_is_empty() {
        assert_eq!(FilePath::root().to_string(), "");
        assert_eq!(FilePath::from(".").normalized(), FilePath::root());
    }

    #[test]
    fn test_file_path_parent_and_name() {
        let path = FilePath::from("notes/todo.txt");
        assert_eq!(path.file_name(), Some("todo.txt"));
        assert_eq!(path.parent(), Some(FilePath::from("notes")));
        assert_eq!(FilePath::from("todo.txt").parent(), Some(FilePath::root()));
    }

    #[test]
    fn test_split_basename() {
        assert_eq!(split_basename("file1.txt"), ("file1", "txt"));
        assert_eq!(split_basename("archive.tar.gz"), ("archive.tar", "gz"));
        assert_eq!(split_basename("LICENSE"), ("LICENSE", ""));
        assert_eq!(split_basename(".bashrc"), ("", "bashrc"));
        assert_eq!(split_basename("trailing."), ("trailing.", ""));
        assert_eq!(split_basename("docs/notes.md"), ("docs/notes", "md"));
        assert_eq!(split_basename("conf.d/README"), ("conf.d/README", ""));
    }
}
