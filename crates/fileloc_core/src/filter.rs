use std::collections::BTreeSet;
use std::str::FromStr;

use fileloc_base::{FilelocError, FilelocResult};

/// Restricts a listing to files with certain extensions.
///
/// Extensions are compared exactly (case-sensitive, without the leading dot).
/// The empty extension `""` selects files without one, such as `LICENSE`.
/// An empty set places no restriction, same as `Any`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExtensionFilter {
    #[default]
    Any,
    Single(String),
    Set(BTreeSet<String>),
}

impl ExtensionFilter {
    /// Checks every extension in the filter.
    ///
    /// Entries must not start with `.` and must not contain a path separator.
    pub fn validate(&self) -> FilelocResult<()> {
        match self {
            ExtensionFilter::Any => Ok(()),
            ExtensionFilter::Single(ext) => validate_extension(ext),
            ExtensionFilter::Set(exts) => exts.iter().try_for_each(|ext| validate_extension(ext)),
        }
    }

    pub fn matches(&self, extension: &str) -> bool {
        match self {
            ExtensionFilter::Any => true,
            ExtensionFilter::Single(ext) => ext == extension,
            ExtensionFilter::Set(exts) => exts.is_empty() || exts.contains(extension),
        }
    }
}

fn validate_extension(ext: &str) -> FilelocResult<()> {
    if ext.starts_with('.') {
        return Err(Box::new(FilelocError::validation(format!(
            "Invalid extension filter: '{}' must be given without the leading dot",
            ext
        ))));
    }
    if ext.contains(['/', '\\']) {
        return Err(Box::new(FilelocError::validation(format!(
            "Invalid extension filter: '{}' contains a path separator",
            ext
        ))));
    }
    Ok(())
}

impl From<&str> for ExtensionFilter {
    fn from(ext: &str) -> Self {
        ExtensionFilter::Single(ext.to_string())
    }
}

impl From<String> for ExtensionFilter {
    fn from(ext: String) -> Self {
        ExtensionFilter::Single(ext)
    }
}

impl From<&[&str]> for ExtensionFilter {
    fn from(exts: &[&str]) -> Self {
        ExtensionFilter::Set(exts.iter().map(|ext| ext.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ExtensionFilter {
    fn from(exts: [&str; N]) -> Self {
        ExtensionFilter::from(&exts[..])
    }
}

impl From<Vec<String>> for ExtensionFilter {
    fn from(exts: Vec<String>) -> Self {
        ExtensionFilter::Set(exts.into_iter().collect())
    }
}

impl From<BTreeSet<String>> for ExtensionFilter {
    fn from(exts: BTreeSet<String>) -> Self {
        ExtensionFilter::Set(exts)
    }
}

impl<T: Into<ExtensionFilter>> From<Option<T>> for ExtensionFilter {
    fn from(filter: Option<T>) -> Self {
        filter.map(Into::into).unwrap_or_default()
    }
}

/// Parses a comma-separated list such as `txt,md`; an empty string means `Any`.
/// Empty items inside a list select files without extension.
impl FromStr for ExtensionFilter {
    type Err = Box<FilelocError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let exts: Vec<&str> = s.split(',').map(str::trim).collect();
        let filter = match exts.as_slice() {
            [""] => ExtensionFilter::Any,
            [single] => ExtensionFilter::from(*single),
            many => ExtensionFilter::from(many),
        };
        filter.validate()?;
        Ok(filter)
    }
}
