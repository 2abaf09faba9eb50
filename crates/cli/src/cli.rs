//! Command-line arguments: one target per invocation.

use std::path::PathBuf;

use clap::Parser;
use sizewatch_core::{Error, SizeCode, Target};

/// Watch a product page for availability changes of one size.
#[derive(Debug, Parser)]
#[command(name = "sizewatch", version)]
pub struct Args {
    /// Product page URL, including the colour variant query string
    pub url: String,

    /// File holding the last-seen availability text for this target
    pub cache_path: PathBuf,

    /// Colour name used in notifications
    pub colour_name: String,

    /// Size to watch: 2XS, XS, S, M, L, XL or 2XL (case-insensitive)
    pub size: SizeCode,
}

impl Args {
    pub fn target(&self) -> Result<Target, Error> {
        Target::new(&self.url, &self.cache_path, &self.colour_name, self.size)
    }
}
