//! Flat-file snapshot cache.
//!
//! Each target owns one plain text file holding the last normalized fragment
//! seen for it. Comparison and rewrite happen under an advisory file lock.

pub mod snapshots;

pub use crate::Error;

pub use snapshots::{Comparison, SnapshotFile};
