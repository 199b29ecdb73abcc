//! Image sources for the bingo pipeline.
//!
//! - [`FilesystemImageSource`]: photos stored as `<taxon_id>.<ext>` in a directory
//!
//! The in-memory source from `bingo-traits` is re-exported for convenience.

mod filesystem;

pub use filesystem::FilesystemImageSource;

pub use bingo_traits::InMemoryImageSource;
