//! Scripted geolocation host for testing and development

use crate::geolocation::{
    GeoError, GeoReading, GeoResult, GeolocationProvider, PositionFuture, PositionOptions,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted answer to a single request
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Resolve after `delay` with the given result
    Reply {
        result: GeoResult<GeoReading>,
        delay: Duration,
    },
    /// Never resolve, like a host that ignores the request
    NoReply,
}

impl MockResponse {
    pub fn success(lat: f64, lon: f64, accuracy_m: f64) -> Self {
        MockResponse::Reply {
            result: Ok(GeoReading::new(lat, lon, accuracy_m)),
            delay: Duration::ZERO,
        }
    }

    pub fn failure(error: GeoError) -> Self {
        MockResponse::Reply {
            result: Err(error),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(self, delay: Duration) -> Self {
        match self {
            MockResponse::Reply { result, .. } => MockResponse::Reply { result, delay },
            MockResponse::NoReply => MockResponse::NoReply,
        }
    }
}

#[derive(Debug, Default)]
struct MockInner {
    responses: VecDeque<MockResponse>,
    last_options: Option<PositionOptions>,
}

/// Mock geolocation host.
/// Clones share the same script, so a test can keep a handle after moving one
/// into a view.
#[derive(Debug, Clone)]
pub struct MockGeolocation {
    available: Arc<AtomicBool>,
    requests: Arc<AtomicU32>,
    inner: Arc<Mutex<MockInner>>,
}

impl Default for MockGeolocation {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGeolocation {
    /// Create an available mock host with an empty script
    pub fn new() -> Self {
        Self {
            available: Arc::new(AtomicBool::new(true)),
            requests: Arc::new(AtomicU32::new(0)),
            inner: Arc::new(Mutex::new(MockInner::default())),
        }
    }

    /// Create a mock host that exposes no geolocation capability
    pub fn unavailable() -> Self {
        let mock = Self::new();
        mock.set_available(false);
        mock
    }

    /// Queue the answer for the next request
    pub fn push_response(&self, response: MockResponse) {
        self.lock().responses.push_back(response);
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of requests issued against this host
    pub fn request_count(&self) -> u32 {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn queued_response_count(&self) -> usize {
        self.lock().responses.len()
    }

    /// Options passed with the most recent request
    pub fn last_options(&self) -> Option<PositionOptions> {
        self.lock().last_options.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl GeolocationProvider for MockGeolocation {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn current_position(&self, options: &PositionOptions) -> PositionFuture {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let response = {
            let mut inner = self.lock();
            inner.last_options = Some(options.clone());
            inner.responses.pop_front()
        };

        match response {
            Some(MockResponse::Reply { result, delay }) => Box::pin(async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result.map(GeoReading::stamped_now)
            }),
            Some(MockResponse::NoReply) => Box::pin(std::future::pending::<GeoResult<GeoReading>>()),
            // Unscripted request behaves like a host with no fix
            None => Box::pin(async { Err::<GeoReading, _>(GeoError::position_unavailable()) }),
        }
    }
}
