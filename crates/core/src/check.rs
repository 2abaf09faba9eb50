//! Classified result of one check invocation.

use crate::Error;

/// A successful check, compared against the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    /// Fragment equals the snapshot. `baseline` is set when no snapshot existed
    /// and this check created it.
    Unchanged { product: String, baseline: bool },

    /// Fragment differs from the snapshot, which now holds `text`.
    Changed { product: String, text: String },
}

impl CheckResult {
    pub fn product(&self) -> &str {
        match self {
            CheckResult::Unchanged { product, .. } | CheckResult::Changed { product, .. } => product,
        }
    }
}

/// Outcome of one fetch-extract-compare run.
///
/// `FetchError` is the expected failure (the page answered with a non-2xx
/// status); `ProcessingError` covers everything that went wrong on the way.
#[derive(Debug)]
pub enum CheckOutcome {
    Ok(CheckResult),
    FetchError { status: u16 },
    ProcessingError(Error),
}

impl From<Result<CheckResult, Error>> for CheckOutcome {
    fn from(result: Result<CheckResult, Error>) -> Self {
        match result {
            Ok(r) => CheckOutcome::Ok(r),
            Err(e) => CheckOutcome::ProcessingError(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_accessor() {
        let unchanged = CheckResult::Unchanged { product: "Grail 6".into(), baseline: false };
        let changed = CheckResult::Changed { product: "Grail 7".into(), text: "Sold out".into() };
        assert_eq!(unchanged.product(), "Grail 6");
        assert_eq!(changed.product(), "Grail 7");
    }

    #[test]
    fn test_outcome_from_result() {
        let ok: CheckOutcome = Ok(CheckResult::Unchanged { product: "p".into(), baseline: true }).into();
        assert!(matches!(ok, CheckOutcome::Ok(CheckResult::Unchanged { baseline: true, .. })));

        let err: CheckOutcome = Err(Error::ExtractFailed("missing".into())).into();
        assert!(matches!(err, CheckOutcome::ProcessingError(Error::ExtractFailed(_))));
    }
}
