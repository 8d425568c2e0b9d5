//! List controller: filter + sort state, server-side fetches, and
//! re-fetch after mutation
//!
//! One controller exists per collection ([`Items`](crate::Items),
//! [`Transactions`](crate::Transactions)). Every fetch is stamped with a
//! monotonic token; a response that comes back after a newer fetch was
//! issued is discarded instead of overwriting newer results.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use crate::error::{ClientError, ClientResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::notify::{Notification, Notifier};
use crate::query::join_query;
use crate::resource::Resource;
use crate::transport::{fetch_empty, fetch_json, ApiRequest, Transport};
use crate::types::{FilterSet, SortSpec};

/// What a completed fetch did to the controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Records replaced with `count` fresh ones
    Applied { count: usize },
    /// A newer fetch was issued meanwhile; this response was dropped
    Discarded,
}

struct ListState<T> {
    filters: FilterSet,
    sort: SortSpec,
    records: Vec<T>,
}

/// Per-collection list state and operations
pub struct ListController<R: Resource> {
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    logger: Arc<dyn ErrorLogger>,
    state: Mutex<ListState<R::Record>>,
    issued: AtomicU64,
    applied: watch::Sender<u64>,
    _resource: PhantomData<R>,
}

impl<R: Resource> ListController<R> {
    pub fn new(transport: Arc<dyn Transport>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            transport,
            notifier,
            logger: Arc::new(DefaultErrorLogger),
            state: Mutex::new(ListState {
                filters: FilterSet::new(),
                sort: SortSpec::default(),
                records: Vec::new(),
            }),
            issued: AtomicU64::new(0),
            applied: watch::channel(0).0,
            _resource: PhantomData,
        }
    }

    pub fn with_error_logger(mut self, logger: Arc<dyn ErrorLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Initial filters, committed without fetching
    pub fn with_filters(self, filters: FilterSet) -> Self {
        self.lock().filters = filters;
        self
    }

    /// Initial sort, committed without fetching
    pub fn with_sort(self, sort: SortSpec) -> Self {
        self.lock().sort = sort;
        self
    }

    fn lock(&self) -> MutexGuard<'_, ListState<R::Record>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Records from the last applied fetch, in server order
    pub fn records(&self) -> Vec<R::Record> {
        self.lock().records.clone()
    }

    pub fn filters(&self) -> FilterSet {
        self.lock().filters.clone()
    }

    pub fn sort(&self) -> SortSpec {
        self.lock().sort.clone()
    }

    /// Encoded filters followed by the encoded sort spec
    pub fn query(&self) -> String {
        let state = self.lock();
        join_query([state.filters.to_query(), state.sort.to_query()])
    }

    /// Token of the most recently issued fetch
    pub fn latest_token(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Bumped every time fetched records replace the visible ones
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.applied.subscribe()
    }

    /// First fetch when the view appears
    pub async fn mount(&self) -> ClientResult<RefreshOutcome> {
        self.refresh().await
    }

    /// Fetch with the committed filters and sort.
    ///
    /// On failure the previous records stay, one notification is emitted,
    /// and the error is returned. There is no retry.
    pub async fn refresh(&self) -> ClientResult<RefreshOutcome> {
        let request = ApiRequest::get(R::PATH, self.query());
        let token = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        let result = fetch_json::<Vec<R::Record>>(self.transport.as_ref(), request).await;

        let mut state = self.lock();
        let latest = self.latest_token();
        if latest != token {
            drop(state);
            self.logger.log_debug(
                &format!("discarding stale response (latest token is {})", latest),
                &ErrorContext::new("refresh").with_path(R::PATH).with_token(token),
            );
            return Ok(RefreshOutcome::Discarded);
        }

        match result {
            Ok(records) => {
                let count = records.len();
                state.records = records;
                drop(state);
                self.applied.send_modify(|applied| *applied += 1);
                Ok(RefreshOutcome::Applied { count })
            }
            Err(error) => {
                drop(state);
                self.report(
                    ErrorContext::new("refresh").with_path(R::PATH).with_token(token),
                    &error,
                    Notification::fetch_failed(&error),
                );
                Err(error)
            }
        }
    }

    /// Commit a settled filter set and fetch
    pub async fn apply_filters(&self, filters: FilterSet) -> ClientResult<RefreshOutcome> {
        self.lock().filters = filters;
        self.refresh().await
    }

    /// Column-header click: toggle the sort on `field` and fetch
    pub async fn sort_by(&self, field: &str) -> ClientResult<RefreshOutcome> {
        self.lock().sort.toggle(field);
        self.refresh().await
    }

    pub async fn set_sort(&self, sort: SortSpec) -> ClientResult<RefreshOutcome> {
        self.lock().sort = sort;
        self.refresh().await
    }

    /// Fetch a single record; list state is not touched
    pub async fn fetch(&self, id: u64) -> ClientResult<R::Record> {
        let path = R::record_path(id);
        let result = fetch_json(self.transport.as_ref(), ApiRequest::get(path.clone(), "")).await;

        result.map_err(|error| {
            self.report(
                ErrorContext::new("fetch").with_path(path),
                &error,
                Notification::fetch_failed(&error),
            );
            error
        })
    }

    /// POST a new record, then refresh.
    ///
    /// Returns the created record when the server echoed one back. The
    /// draft is only borrowed, so a failed attempt leaves it intact.
    pub async fn create(&self, draft: &R::Draft) -> ClientResult<Option<R::Record>> {
        let context = ErrorContext::new("create").with_path(R::PATH);

        let response = match ApiRequest::post_json(R::PATH, draft) {
            Ok(request) => self.send_checked(request).await,
            Err(error) => Err(error),
        };
        let response = match response {
            Ok(response) => response,
            Err(error) => {
                self.report(context, &error, Notification::post_failed(&error));
                return Err(error);
            }
        };

        let created = if response.trim().is_empty() {
            None
        } else {
            match serde_json::from_str::<R::Record>(&response) {
                Ok(record) => Some(record),
                Err(e) => {
                    log::warn!("{} created but response was not a {}: {}", R::PATH, R::NOUN, e);
                    None
                }
            }
        };

        self.notifier
            .notify(Notification::success(format!("Successfully created {}", R::NOUN)));
        // refresh reports its own failures
        let _ = self.refresh().await;

        Ok(created)
    }

    /// DELETE a record, then refresh once
    pub async fn delete(&self, id: u64) -> ClientResult<()> {
        let path = R::record_path(id);

        let request = ApiRequest::delete(path.clone());
        if let Err(error) = fetch_empty(self.transport.as_ref(), request).await {
            self.report(
                ErrorContext::new("delete").with_path(path),
                &error,
                Notification::post_failed(&error),
            );
            return Err(error);
        }

        self.notifier
            .notify(Notification::success(format!("Successfully deleted {}", R::NOUN)));
        let _ = self.refresh().await;

        Ok(())
    }

    async fn send_checked(&self, request: ApiRequest) -> ClientResult<String> {
        log::debug!("{}", request);
        let response = self.transport.send(request).await?.error_for_status()?;
        Ok(response.body)
    }

    fn report(&self, context: ErrorContext, error: &ClientError, notification: Notification) {
        self.logger.log_error(error, &context);
        self.notifier.notify(notification);
    }
}
