use std::path::{MAIN_SEPARATOR, PathBuf};

use serde_derive::Deserialize;
use tracing::{debug, instrument};

use fileloc_base::{FilePath, FilelocError, FilelocResult, PalHandle, RealPal, ResultExt};

/// Kind of storage a location points at. Only local directories are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Local,
}

/// Where a [`FileLocation`](crate::FileLocation) lives.
///
/// If both are set, `path` is relative to `root`. Either one alone is used as
/// the base directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LocationConfig {
    #[serde(rename = "type", default)]
    pub location_type: Option<LocationType>,
    #[serde(default)]
    pub root: String,
    #[serde(default)]
    pub path: String,
}

const SEPARATORS: [char; 2] = ['/', '\\'];

impl LocationConfig {
    pub fn local(root: impl Into<String>) -> Self {
        Self {
            location_type: Some(LocationType::Local),
            root: root.into(),
            path: String::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Computes the base directory of the location.
    pub fn location_path(&self) -> FilelocResult<PathBuf> {
        match self.location_type {
            None => Err(Box::new(FilelocError::config("missing key \"type\""))),
            Some(LocationType::Local) => self.local_path(),
        }
    }

    fn local_path(&self) -> FilelocResult<PathBuf> {
        if self.root.is_empty() && self.path.is_empty() {
            return Err(Box::new(FilelocError::config(
                "location of type \"local\" needs a root or a path",
            )));
        }

        let (root, path) = if self.root.is_empty() {
            (self.path.as_str(), "")
        } else {
            (self.root.as_str(), self.path.as_str())
        };
        let root = root.trim_end_matches(SEPARATORS);
        let path = path.trim_start_matches(SEPARATORS);

        if path.is_empty() {
            Ok(PathBuf::from(root))
        } else {
            Ok(PathBuf::from(format!("{}{}{}", root, MAIN_SEPARATOR, path)))
        }
    }
}

/// Creates the storage adapter for `config`.
#[instrument(skip(config))]
pub fn create_pal(config: &LocationConfig) -> FilelocResult<PalHandle> {
    let base_dir = config.location_path()?;
    debug!(base_dir = %base_dir.display(), "creating local adapter");
    Ok(PalHandle::new(RealPal::new(base_dir)))
}

/// Load a location configuration from a TOML file.
///
/// ```toml
/// type = "local"
/// root = "/srv/data"
/// path = "incoming"
/// ```
#[instrument(skip(pal), fields(path = %path))]
pub fn load_location_config(pal: &PalHandle, path: &FilePath) -> FilelocResult<LocationConfig> {
    let text = pal
        .read_file_to_string(path)
        .with_context(|| format!("Failed to read location config {}", path))?;
    let config: LocationConfig = toml::from_str(&text).map_err(|e| {
        debug!(error = %e, "failed to parse location config");
        Box::new(FilelocError::config(format!("{}: {}", path, e.message())))
    })?;
    debug!(?config, "location config loaded");
    Ok(config)
}
