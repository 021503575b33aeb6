//! Scripted in-memory transport for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::FetchError;
use crate::transport::{ConnectionSettings, Connector, HttpResponse, HttpTransport};

type Scripted = Result<HttpResponse, FetchError>;

#[derive(Default)]
struct Route {
    once: VecDeque<Scripted>,
    always: Option<Scripted>,
}

/// Transport answering from per-path scripts.
///
/// One-shot responses are served first, in order; then the persistent
/// response. Unscripted paths answer `404 Not Found`.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, Route>>,
    calls: Mutex<Vec<String>>,
}

impl MockTransport {
    /// Create an empty transport.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer every request to `path` with `result`.
    pub fn respond(&self, path: &str, result: Scripted) -> &Self {
        self.routes.lock().entry(path.to_string()).or_default().always = Some(result);
        self
    }

    /// Answer the next request to `path` with `result`.
    pub fn respond_once(&self, path: &str, result: Scripted) -> &Self {
        self.routes
            .lock()
            .entry(path.to_string())
            .or_default()
            .once
            .push_back(result);
        self
    }

    /// Paths requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Number of requests to `path`.
    pub fn call_count(&self, path: &str) -> usize {
        self.calls.lock().iter().filter(|p| p.as_str() == path).count()
    }

    /// Number of requests overall.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, path: &str) -> Result<HttpResponse, FetchError> {
        self.calls.lock().push(path.to_string());

        let mut routes = self.routes.lock();
        match routes.get_mut(path) {
            Some(route) => match route.once.pop_front() {
                Some(result) => result,
                None => route
                    .always
                    .clone()
                    .unwrap_or_else(|| Ok(HttpResponse::new(404, ""))),
            },
            None => Ok(HttpResponse::new(404, "")),
        }
    }
}

/// Connector handing out one shared [`MockTransport`].
pub struct MockConnector {
    transport: Arc<MockTransport>,
    connects: AtomicUsize,
    last_settings: Mutex<Option<ConnectionSettings>>,
}

impl MockConnector {
    /// Wrap a transport.
    pub fn new(transport: Arc<MockTransport>) -> Arc<Self> {
        Arc::new(Self {
            transport,
            connects: AtomicUsize::new(0),
            last_settings: Mutex::new(None),
        })
    }

    /// How many transports were built.
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Settings used for the most recent build.
    pub fn last_settings(&self) -> Option<ConnectionSettings> {
        self.last_settings.lock().clone()
    }
}

impl Connector for MockConnector {
    fn connect(&self, settings: &ConnectionSettings) -> Result<Arc<dyn HttpTransport>, FetchError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        *self.last_settings.lock() = Some(settings.clone());
        let transport: Arc<dyn HttpTransport> = self.transport.clone();
        Ok(transport)
    }
}

/// `200 OK` with a JSON body.
pub fn ok_json(value: Value) -> Scripted {
    Ok(HttpResponse::json(200, &value))
}

/// Bare status with an empty body.
pub fn status(code: u16) -> Scripted {
    Ok(HttpResponse::new(code, ""))
}

/// Connection refused before any response.
pub fn refused() -> Scripted {
    Err(FetchError::ConnectionRefused {
        base_url: "https://api.example.com".to_string(),
    })
}
