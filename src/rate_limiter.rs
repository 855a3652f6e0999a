use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use log::debug;

/// Sliding-window limiter keyed by caller identifier
#[derive(Clone)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    state: Arc<Mutex<HashMap<String, Vec<Instant>>>>,
}

impl RateLimiter {
    /// Allows `max_requests` calls per identifier within any `window`
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            state: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Records a call for `identifier`; returns true when the call must be rejected
    ///
    /// Rejected calls are not recorded, so a caller regains capacity as soon as
    /// its oldest accepted call leaves the window.
    pub async fn is_rate_limited(&self, identifier: &str) -> bool {
        self.check_at(identifier, Instant::now()).await
    }

    async fn check_at(&self, identifier: &str, now: Instant) -> bool {
        let mut state = self.state.lock().await;
        let requests = state.entry(identifier.to_string()).or_default();

        requests.retain(|&t| now.saturating_duration_since(t) < self.window);

        if requests.len() >= self.max_requests {
            debug!("Rate limit reached for {}", identifier);
            return true;
        }

        requests.push(now);
        false
    }

    /// Drops identifiers with no calls inside the window
    pub async fn prune(&self) {
        let now = Instant::now();
        let mut state = self.state.lock().await;
        state.retain(|_, requests| {
            requests.retain(|&t| now.saturating_duration_since(t) < self.window);
            !requests.is_empty()
        });
    }
}
