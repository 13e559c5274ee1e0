use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

/// Entries are purged lazily once the table grows past this size.
const PURGE_THRESHOLD: usize = 4096;

/// Fixed-window request counter, keyed by (scope, client identity).
///
/// The window resets entirely once it elapses; it is never slid or
/// extended. The check-and-increment runs as one critical section, so
/// "at most `limit` accepted requests per window per identity" holds
/// under concurrent requests.
pub struct RateLimiter {
    windows: Mutex<HashMap<(String, String), Window>>,
}

struct Window {
    count: u32,
    reset_at: Instant,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Returns `true` when the identity is over the limit for this scope.
    ///
    /// Records the attempt as a side effect unless it is already over
    /// the limit. A `limit` of 0 disables limiting for the scope.
    pub fn is_limited(&self, scope: &str, identity: &str, limit: u32, window: Duration) -> bool {
        if limit == 0 {
            return false;
        }

        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap();

        if windows.len() > PURGE_THRESHOLD {
            windows.retain(|_, w| w.reset_at > now);
        }

        let entry = windows
            .entry((scope.to_string(), identity.to_string()))
            .or_insert(Window {
                count: 0,
                reset_at: now + window,
            });

        if now >= entry.reset_at {
            entry.count = 0;
            entry.reset_at = now + window;
        }

        if entry.count >= limit {
            debug!("Rate limit hit: scope={scope} identity={identity}");
            return true;
        }

        entry.count += 1;
        false
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
