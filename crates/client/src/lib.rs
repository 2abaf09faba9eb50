//! Client code for sizewatch.
//!
//! This crate provides the HTTP fetch, size fragment extraction, notification
//! transports and the check pipeline that ties them to the snapshot cache.

pub mod extract;
pub mod fetch;
pub mod monitor;
pub mod notify;

pub use extract::{Extraction, Extractor, SizeExtractor, normalize_fragment};
pub use fetch::{FetchClient, FetchConfig, FetchResponse};
pub use monitor::Monitor;
pub use notify::{ChatTransport, DispatchReport, EmailTransport, Notification, Notifier, NotifyError, Transport};
