/* 📖 # What is the Platform Abstraction Layer?

The PAL is the storage adapter seam: a trait with primitive stat, list, read and
write operations against a base directory. `RealPal` maps it onto the local
filesystem, `MockPal` keeps everything in memory for deterministic tests.
Code above this layer only ever talks to `PalHandle`.
*/

mod file_path;
pub mod mock;
pub mod real_pal;
mod traits;

pub use file_path::{FilePath, split_basename};
pub use mock::MockPal;
pub use real_pal::RealPal;
pub use traits::{DirEntry, EntryKind, FileStat, Pal, PalHandle, ReadSeek};
