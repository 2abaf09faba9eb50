//! Size fragment and product name extraction.
//!
//! ### Stable Abstraction
//! - Uses the `Extractor` trait so the selection engine can be swapped without
//!   touching the check pipeline.
//!
//! ### Selection
//! - The availability fragment is the first element whose size attribute
//!   (default `data-product-size`) equals the requested size code.
//! - The product name is the first element matching a CSS selector.
//! - Both must be present, otherwise extraction fails as a whole.

pub mod normalize;

pub use normalize::{normalize_fragment, normalize_name};

use scraper::{Html, Selector};
use sizewatch_core::{AppConfig, Error, SizeCode};

/// Result of extracting one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Product display name
    pub product: String,
    /// Normalized availability text for the requested size
    pub fragment: String,
}

/// Stable extractor trait for product pages.
pub trait Extractor: Send + Sync {
    /// Extract the product name and the normalized fragment for `size`.
    fn extract(&self, html: &str, size: SizeCode) -> Result<Extraction, Error>;
}

/// Extractor backed by `scraper` CSS selection.
#[derive(Debug)]
pub struct SizeExtractor {
    size_attribute: String,
    product_selector: Selector,
}

impl SizeExtractor {
    /// Create an extractor for the given size attribute and product name selector.
    pub fn new(size_attribute: &str, product_name_selector: &str) -> Result<Self, Error> {
        let product_selector = Selector::parse(product_name_selector)
            .map_err(|e| Error::InvalidInput(format!("invalid product name selector {product_name_selector:?}: {e}")))?;

        Ok(Self { size_attribute: size_attribute.to_string(), product_selector })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        Self::new(&config.size_attribute, &config.product_name_selector)
    }

    fn size_selector(&self, size: SizeCode) -> Result<Selector, Error> {
        let css = format!("[{}=\"{}\"]", self.size_attribute, size.as_str());
        Selector::parse(&css).map_err(|e| Error::InvalidInput(format!("invalid size selector {css:?}: {e}")))
    }
}

impl Default for SizeExtractor {
    fn default() -> Self {
        Self {
            size_attribute: "data-product-size".to_string(),
            product_selector: Selector::parse(".productDescription__productName").expect("invalid selector"),
        }
    }
}

impl Extractor for SizeExtractor {
    fn extract(&self, html: &str, size: SizeCode) -> Result<Extraction, Error> {
        let document = Html::parse_document(html);

        let product = document
            .select(&self.product_selector)
            .next()
            .map(|el| normalize_name(&el.text().collect::<String>()))
            .ok_or_else(|| Error::ExtractFailed("product name element not found".into()))?;

        let size_selector = self.size_selector(size)?;
        let fragment = document
            .select(&size_selector)
            .next()
            .map(|el| normalize_fragment(&el.text().collect::<String>()))
            .ok_or_else(|| {
                Error::ExtractFailed(format!("no element with {}=\"{}\"", self.size_attribute, size.as_str()))
            })?;

        Ok(Extraction { product, fragment })
    }
}
