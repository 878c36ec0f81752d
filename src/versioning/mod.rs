//! Versioning layer
//!
//! Path resolution under a [`Version`](crate::Version), the post-save
//! consistency check, and the filesystem primitives both read through.

pub mod consistency;
pub mod resolver;
pub mod store;

pub use consistency::check_paths_consistency;
pub use resolver::{versioned_path, VersionedPathResolver};
pub use store::{is_absent, LocalFs, MemoryStore, VersionStore};
