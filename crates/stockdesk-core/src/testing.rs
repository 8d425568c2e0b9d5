//! Scripted transport for controller tests

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ClientError, ErrorCode, ErrorContext, ErrorLogger};
use crate::transport::{ApiRequest, ApiResponse, Method, Transport, TransportError};

#[derive(Clone)]
struct Scripted {
    delay: Duration,
    reply: Result<ApiResponse, TransportError>,
}

#[derive(Default)]
struct Route {
    queue: VecDeque<Scripted>,
    last: Option<Scripted>,
}

/// Answers requests from per-target queues.
///
/// Once a target's queue runs dry the last served reply repeats;
/// unscripted targets get a 404.
#[derive(Default)]
pub(crate) struct FakeTransport {
    routes: Mutex<HashMap<String, Route>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn reply(&self, method: Method, target: &str, status: u16, body: &str) {
        self.reply_after(Duration::ZERO, method, target, status, body);
    }

    pub(crate) fn reply_after(
        &self,
        delay: Duration,
        method: Method,
        target: &str,
        status: u16,
        body: &str,
    ) {
        self.script(method, target, delay, Ok(ApiResponse::new(status, body)));
    }

    pub(crate) fn fail(&self, method: Method, target: &str, message: &str) {
        self.script(method, target, Duration::ZERO, Err(TransportError::new(message)));
    }

    fn script(
        &self,
        method: Method,
        target: &str,
        delay: Duration,
        reply: Result<ApiResponse, TransportError>,
    ) {
        self.routes
            .lock()
            .unwrap()
            .entry(format!("{} {}", method, target))
            .or_default()
            .queue
            .push_back(Scripted { delay, reply });
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// `METHOD target` of every request, in order
    pub(crate) fn log(&self) -> Vec<String> {
        self.requests().iter().map(|r| r.to_string()).collect()
    }

    pub(crate) fn count(&self, method: Method) -> usize {
        self.requests().iter().filter(|r| r.method == method).count()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let key = request.to_string();
        self.requests.lock().unwrap().push(request);

        let scripted = {
            let mut routes = self.routes.lock().unwrap();
            routes.get_mut(&key).and_then(|route| {
                if let Some(next) = route.queue.pop_front() {
                    route.last = Some(next);
                }
                route.last.clone()
            })
        };
        let (delay, reply) = match scripted {
            Some(scripted) => (scripted.delay, scripted.reply),
            None => (Duration::ZERO, Ok(ApiResponse::new(404, ""))),
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply
    }
}

/// Keeps every logged error and debug line
#[derive(Default)]
pub(crate) struct RecordingLogger {
    errors: Mutex<Vec<(ErrorCode, ErrorContext)>>,
    debug: Mutex<Vec<(String, ErrorContext)>>,
}

impl RecordingLogger {
    pub(crate) fn errors(&self) -> Vec<(ErrorCode, ErrorContext)> {
        self.errors.lock().unwrap().clone()
    }

    pub(crate) fn debug(&self) -> Vec<(String, ErrorContext)> {
        self.debug.lock().unwrap().clone()
    }
}

impl ErrorLogger for RecordingLogger {
    fn log_error(&self, error: &ClientError, context: &ErrorContext) {
        self.errors.lock().unwrap().push((error.code(), context.clone()));
    }

    fn log_debug(&self, message: &str, context: &ErrorContext) {
        self.debug
            .lock()
            .unwrap()
            .push((message.to_string(), context.clone()));
    }
}

pub(crate) const SOAP_JSON: &str =
    r#"[{"id":1,"name":"Soap","stock":10,"type":"Pembersih","createdAt":"2024-01-01"}]"#;

pub(crate) const TWO_ITEMS_JSON: &str = r#"[
    {"id":1,"name":"Soap","stock":10,"type":"Pembersih","createdAt":"2024-01-01"},
    {"id":5,"name":"Kopi","stock":3,"type":"Konsumsi","createdAt":"2024-01-02"}
]"#;
