//! Test doubles for the external collaborators

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;

use crate::error::{Result, UpdateError};
use crate::http::{HttpResponse, HttpTransport};
use crate::update_store::Clock;
use crate::usage::{MeteringApi, UsageReport};

/// Serves canned responses by URL; unknown URLs fail with `Network`
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, (StatusCode, String)>>,
    requests: Mutex<Vec<String>>,
    last_headers: Mutex<Option<HeaderMap>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, status: StatusCode, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), (status, body.to_string()));
    }

    pub fn clear(&self, url: &str) {
        self.routes.lock().unwrap().remove(url);
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|requested| requested.as_str() == url)
            .count()
    }

    pub fn last_headers(&self) -> Option<HeaderMap> {
        self.last_headers.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(url.to_string());
        *self.last_headers.lock().unwrap() = Some(headers);

        // Let overlapping callers interleave at the await point
        tokio::task::yield_now().await;

        let route = self.routes.lock().unwrap().get(url).cloned();
        route
            .map(|(status, body)| HttpResponse::new(status, body))
            .ok_or_else(|| UpdateError::Network(format!("connection refused: {url}")))
    }
}

/// Metering client returning queued results, then failing
#[derive(Default)]
pub struct ScriptedMetering {
    results: Mutex<VecDeque<Result<Option<UsageReport>>>>,
    calls: AtomicUsize,
}

impl ScriptedMetering {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, result: Result<Option<UsageReport>>) {
        self.results.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MeteringApi for ScriptedMetering {
    async fn usage(&self) -> Result<Option<UsageReport>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(UpdateError::Network("metering unavailable".to_string())))
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self(AtomicI64::new(now_ms))
    }

    pub fn advance(&self, ms: i64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}
