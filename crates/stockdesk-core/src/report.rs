//! Transaction report controller

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{ClientResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::list::RefreshOutcome;
use crate::models::TransactionReport;
use crate::notify::{Notification, Notifier};
use crate::transport::{fetch_json, ApiRequest, Transport};
use crate::types::DateRange;

pub const REPORT_PATH: &str = "/transactions/reports";

#[derive(Default)]
struct ReportState {
    range: DateRange,
    report: Option<TransactionReport>,
}

/// Most/least sold transactions within a date range.
///
/// Range changes fetch immediately. Failures keep the previous report.
pub struct ReportController {
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    logger: Arc<dyn ErrorLogger>,
    state: Mutex<ReportState>,
    issued: AtomicU64,
}

impl ReportController {
    pub fn new(transport: Arc<dyn Transport>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            transport,
            notifier,
            logger: Arc::new(DefaultErrorLogger),
            state: Mutex::new(ReportState::default()),
            issued: AtomicU64::new(0),
        }
    }

    pub fn with_error_logger(mut self, logger: Arc<dyn ErrorLogger>) -> Self {
        self.logger = logger;
        self
    }

    fn lock(&self) -> MutexGuard<'_, ReportState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn range(&self) -> DateRange {
        self.lock().range.clone()
    }

    /// Last successfully fetched report
    pub fn report(&self) -> Option<TransactionReport> {
        self.lock().report.clone()
    }

    pub async fn set_range(&self, range: DateRange) -> ClientResult<RefreshOutcome> {
        self.lock().range = range;
        self.refresh().await
    }

    pub async fn refresh(&self) -> ClientResult<RefreshOutcome> {
        let request = ApiRequest::get(REPORT_PATH, self.lock().range.to_query());
        let token = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        let result = fetch_json::<TransactionReport>(self.transport.as_ref(), request).await;

        let mut state = self.lock();
        let latest = self.issued.load(Ordering::SeqCst);
        if latest != token {
            drop(state);
            self.logger.log_debug(
                &format!("discarding stale report (latest token is {})", latest),
                &ErrorContext::new("report").with_path(REPORT_PATH).with_token(token),
            );
            return Ok(RefreshOutcome::Discarded);
        }

        match result {
            Ok(report) => {
                let count = report.most_transactions.len() + report.least_transactions.len();
                state.report = Some(report);
                Ok(RefreshOutcome::Applied { count })
            }
            Err(error) => {
                drop(state);
                let context = ErrorContext::new("report")
                    .with_path(REPORT_PATH)
                    .with_token(token);
                self.logger.log_error(&error, &context);
                self.notifier.notify(Notification::fetch_failed(&error));
                Err(error)
            }
        }
    }
}
