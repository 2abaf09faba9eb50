//! The check pipeline: fetch → extract → compare against the snapshot.
//!
//! A non-2xx response stops the pipeline before extraction and before the
//! snapshot is touched. Any other failure on the way becomes a processing
//! error; nothing is retried within one check.

use sizewatch_core::{AppConfig, CheckOutcome, CheckResult, Comparison, Error, SnapshotFile, Target};

use crate::extract::{Extractor, SizeExtractor};
use crate::fetch::{FetchClient, FetchConfig};

/// Runs checks for targets with one fetch client and one extractor.
pub struct Monitor {
    fetch: FetchClient,
    extractor: Box<dyn Extractor>,
}

impl Monitor {
    pub fn new(fetch: FetchClient, extractor: Box<dyn Extractor>) -> Self {
        Self { fetch, extractor }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let fetch = FetchClient::new(FetchConfig::from(config))?;
        let extractor = SizeExtractor::from_config(config)?;
        Ok(Self::new(fetch, Box::new(extractor)))
    }

    /// Check one target and classify the result.
    pub async fn check(&self, target: &Target) -> CheckOutcome {
        let response = match self.fetch.fetch(&target.url).await {
            Ok(response) => response,
            Err(e) => return CheckOutcome::ProcessingError(e),
        };

        if !response.is_success() {
            tracing::debug!("{} answered {}, skipping extraction", target.url, response.status);
            return CheckOutcome::FetchError { status: response.status.as_u16() };
        }

        self.compare(target, &response.body).await.into()
    }

    async fn compare(&self, target: &Target, html: &str) -> Result<CheckResult, Error> {
        let extraction = self.extractor.extract(html, target.size)?;

        let snapshot = SnapshotFile::new(&target.cache_path);
        let fragment = extraction.fragment.clone();
        let comparison = tokio::task::spawn_blocking(move || snapshot.compare_and_store(&fragment))
            .await
            .map_err(|e| Error::Cache { context: "snapshot task".into(), source: std::io::Error::other(e) })??;

        tracing::debug!("{} size {}: {:?}", extraction.product, target.size, comparison);

        Ok(match comparison {
            Comparison::Created => CheckResult::Unchanged { product: extraction.product, baseline: true },
            Comparison::Unchanged => CheckResult::Unchanged { product: extraction.product, baseline: false },
            Comparison::Changed => CheckResult::Changed { product: extraction.product, text: extraction.fragment },
        })
    }
}
