/* 📖 # How is fileloc_core organized?

A `FileLocation` is built from a `LocationConfig` and hands out `FileHandle`s
for the regular files directly inside its base directory. Handles produced by
a listing carry their metadata already; handles built from a bare name fetch
it from the location on first access.

All storage access goes through the PAL from fileloc_base, so every operation
here can be tested against `MockPal`.
*/

pub mod config;
pub mod file_handle;
pub mod file_info;
pub mod file_location;
pub mod filter;

pub use config::{LocationConfig, LocationType, create_pal, load_location_config};
pub use file_handle::{FileHandle, FileMetadata};
pub use file_info::{FileInfo, RecordKind};
pub use file_location::FileLocation;
pub use filter::ExtensionFilter;
