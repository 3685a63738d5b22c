/* 📖 # What does fileloc_base contain?

The pieces every other fileloc crate builds on: the error type, tracing setup,
and the Platform Abstraction Layer (PAL) through which all storage access goes.
*/

pub mod error;
pub mod pal;
pub mod tracing;

pub use error::{ErrorKind, FilelocError, FilelocResult, ResultExt};
pub use pal::{DirEntry, EntryKind, FilePath, FileStat, MockPal, Pal, PalHandle, RealPal, ReadSeek};
