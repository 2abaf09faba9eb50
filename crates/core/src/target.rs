//! The monitored target: one product page, one size, one cache file.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use url::Url;

use crate::Error;

/// Size codes a product page can list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeCode {
    Xxs,
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
}

impl SizeCode {
    pub const ALL: [SizeCode; 7] =
        [SizeCode::Xxs, SizeCode::Xs, SizeCode::S, SizeCode::M, SizeCode::L, SizeCode::Xl, SizeCode::Xxl];

    /// The code as it appears in the page's size attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            SizeCode::Xxs => "2XS",
            SizeCode::Xs => "XS",
            SizeCode::S => "S",
            SizeCode::M => "M",
            SizeCode::L => "L",
            SizeCode::Xl => "XL",
            SizeCode::Xxl => "2XL",
        }
    }
}

impl fmt::Display for SizeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeCode {
    type Err = Error;

    /// Parses a size code case-insensitively (`m`, `2xl`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        SizeCode::ALL
            .into_iter()
            .find(|code| code.as_str() == upper)
            .ok_or_else(|| {
                Error::InvalidInput(format!("unknown size {s:?}, expected one of 2XS, XS, S, M, L, XL, 2XL"))
            })
    }
}

/// One (url, cache path, label, size) configuration being monitored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub url: Url,
    pub cache_path: PathBuf,
    /// Human label for the variant, usually the colour name.
    pub label: String,
    pub size: SizeCode,
}

impl Target {
    /// Build a target, requiring an absolute http(s) URL.
    pub fn new(url: &str, cache_path: impl Into<PathBuf>, label: impl Into<String>, size: SizeCode) -> Result<Self, Error> {
        let url = Url::parse(url.trim()).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
        match url.scheme() {
            "http" | "https" => {}
            scheme => return Err(Error::InvalidUrl(format!("unsupported scheme: {scheme}"))),
        }

        Ok(Self { url, cache_path: cache_path.into(), label: label.into(), size })
    }
}
