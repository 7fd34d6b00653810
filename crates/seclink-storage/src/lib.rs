//! # seclink-storage
//!
//! Everything that touches the shared files directory: resolving a
//! requested relative path without letting it escape the root, streaming a
//! resolved file back to a caller, listing shareable files, and saving
//! uploads.

pub mod mime;
pub mod root;

pub use root::{ByteStream, FileEntry, FileRoot, SharedFile};
