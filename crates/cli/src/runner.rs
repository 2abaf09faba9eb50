//! Turns one check outcome into notifications and a log record.
//!
//! | outcome          | notify | severity |
//! |------------------|--------|----------|
//! | processing error | yes    | critical |
//! | non-2xx fetch    | yes    | error    |
//! | unchanged        | no     | info     |
//! | changed          | yes    | info     |
//!
//! A failed dispatch never propagates. It is folded into the record instead.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sizewatch_client::{DispatchReport, Monitor, Notification, Notifier};
use sizewatch_core::{AppConfig, CheckOutcome, CheckResult, Error, Target, error_chain};

const APP_TITLE: &str = "Stock Alert";
const NOTIFY_FAILED: &str = "Error occurred also while sending the notification";
const CHANGE_NOT_SENT: &str = "Webpage change detected but an error occurred while sending the notification";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
    Critical,
}

/// What one invocation wrote to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub severity: Severity,
    pub message: String,
    pub detail: Option<String>,
}

impl LogRecord {
    fn info(message: String) -> Self {
        Self { severity: Severity::Info, message, detail: None }
    }

    fn emit(&self) {
        let detail = self.detail.as_deref().unwrap_or_default();
        match self.severity {
            Severity::Info => tracing::info!("{}", self.message),
            Severity::Error => tracing::error!(detail, "{}", self.message),
            Severity::Critical => tracing::error!(critical = true, detail, "{}", self.message),
        }
    }
}

/// Binds one target to the check pipeline and the notifier.
pub struct Runner {
    target: Target,
    monitor: Monitor,
    notifier: Notifier,
}

impl Runner {
    pub fn new(target: Target, monitor: Monitor, notifier: Notifier) -> Self {
        Self { target, monitor, notifier }
    }

    pub fn from_config(target: Target, config: &AppConfig) -> Result<Self> {
        let monitor = Monitor::from_config(config).context("building check pipeline")?;
        let notifier = Notifier::from_config(config).context("building notification transports")?;
        Ok(Self::new(target, monitor, notifier))
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Run one check, notify as needed, log and return the record.
    pub async fn run_once(&self) -> LogRecord {
        let outcome = self.monitor.check(&self.target).await;
        let record = self.handle(outcome).await;
        record.emit();
        record
    }

    async fn handle(&self, outcome: CheckOutcome) -> LogRecord {
        match outcome {
            CheckOutcome::ProcessingError(err) => self.on_processing_error(&err).await,
            CheckOutcome::FetchError { status } => self.on_fetch_error(status).await,
            CheckOutcome::Ok(CheckResult::Unchanged { product, baseline }) => {
                let Target { label, .. } = &self.target;
                if baseline {
                    LogRecord::info(format!("Baseline recorded for {product} {label}"))
                } else {
                    LogRecord::info(format!("No change for {product} {label}"))
                }
            }
            CheckOutcome::Ok(CheckResult::Changed { product, text }) => self.on_changed(&product, &text).await,
        }
    }

    async fn on_processing_error(&self, err: &Error) -> LogRecord {
        let Target { url, label, size, .. } = &self.target;
        let message = format!("*Error occurred during the execution of the check for {label} - Size: {size}* - url: {url}");

        let report = self.notifier.dispatch(&Notification::plain(message.as_str())).await;
        let (message, detail) = append_failure(message, error_chain(err), &report);

        LogRecord { severity: Severity::Critical, message, detail: Some(detail) }
    }

    async fn on_fetch_error(&self, status: u16) -> LogRecord {
        let Target { url, label, size, .. } = &self.target;
        let message =
            format!("Error occurred while fetching the webpage, non 2XX response {label} - Size: {size} - url: {url}");

        let notification = Notification::plain(format!("*Error - {APP_TITLE}*\n\n{message}"));
        let report = self.notifier.dispatch(&notification).await;
        let (message, detail) = append_failure(message, format!("status {status}"), &report);

        LogRecord { severity: Severity::Error, message, detail: Some(detail) }
    }

    async fn on_changed(&self, product: &str, text: &str) -> LogRecord {
        let header = change_header(product, &self.target);
        let notification = Notification::markdown(format!("{header}\n\n{text}")).with_link(self.target.url.clone());
        let report = self.notifier.dispatch(&notification).await;

        if report.is_ok() {
            return LogRecord::info(header.replace('\n', " "));
        }

        LogRecord {
            severity: Severity::Error,
            message: CHANGE_NOT_SENT.to_string(),
            detail: Some(format!("{}; {}", header.replace('\n', " "), report.failure_summary())),
        }
    }
}

/// Run the check once, or repeatedly with `interval` between runs when
/// `endless` is set. `max_iterations` bounds endless mode; `None` runs until
/// the process is stopped. Returns the number of iterations started.
///
/// Each iteration is its own task. A panic inside one is logged without a
/// classification and the loop carries on.
pub async fn run_loop(runner: Arc<Runner>, endless: bool, interval: Duration, max_iterations: Option<usize>) -> usize {
    let mut iterations = 0;

    loop {
        let task = tokio::spawn({
            let runner = Arc::clone(&runner);
            async move { runner.run_once().await }
        });
        iterations += 1;

        if let Err(e) = task.await {
            tracing::error!("{e}");
        }

        if !endless || max_iterations.is_some_and(|max| iterations >= max) {
            return iterations;
        }

        tokio::time::sleep(interval).await;
    }
}

fn change_header(product: &str, target: &Target) -> String {
    format!(
        "*~~~ CHANGE DETECTED FOR {} ~~~*\nColour: {} - Size: {}",
        product.to_uppercase(),
        target.label.to_uppercase(),
        target.size
    )
}

fn append_failure(message: String, detail: String, report: &DispatchReport) -> (String, String) {
    if report.is_ok() {
        (message, detail)
    } else {
        (format!("{message} - {NOTIFY_FAILED}"), format!("{detail}; {}", report.failure_summary()))
    }
}
