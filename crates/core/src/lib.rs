//! Core types and shared functionality for sizewatch.
//!
//! This crate provides:
//! - Flat-file snapshot cache with advisory locking
//! - Unified error types
//! - Configuration structures
//! - Target and check outcome types

pub mod cache;
pub mod check;
pub mod config;
pub mod error;
pub mod target;

pub use cache::{Comparison, SnapshotFile};
pub use check::{CheckOutcome, CheckResult};
pub use config::{AppConfig, ChatConfig, ConfigError, EmailConfig};
pub use error::{Error, error_chain};
pub use target::{SizeCode, Target};
