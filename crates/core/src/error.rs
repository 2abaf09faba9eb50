//! Unified error types for sizewatch.
//!
//! Display strings carry a stable code prefix so log lines can be grepped by
//! failure class.

use std::io;

/// Unified error type for the check pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., unknown size code).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// The HTTP request could not be completed (DNS, connect, body read).
    #[error("FETCH_FAILED: {0}")]
    FetchFailed(String),

    /// The size fragment or the product name could not be located.
    #[error("EXTRACT_FAILED: {0}")]
    ExtractFailed(String),

    /// Reading, locking or writing the snapshot file failed.
    #[error("CACHE_ERROR: {context}: {source}")]
    Cache {
        context: String,
        #[source]
        source: io::Error,
    },
}

/// Render an error followed by its `source()` chain, `outer: inner: root`.
///
/// A cause already printed at the end of the previous message is not repeated.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !rendered.ends_with(&text) {
            rendered.push_str(": ");
            rendered.push_str(&text);
        }
        source = cause.source();
    }

    rendered
}

impl Error {
    pub(crate) fn cache(context: impl Into<String>, source: io::Error) -> Self {
        Error::Cache { context: context.into(), source }
    }
}
