//! Fixed-interval polling of asynchronous provider operations.

use crate::error::{Error, Result};
use serde_json::Value;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default delay between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Terminal status value, compared case-insensitively.
pub const DONE_STATUS: &str = "done";

/// Returns true when an operation status payload has reached the terminal state.
///
/// A payload without a string `status` field is still pending.
#[must_use]
pub fn is_done(status: &Value) -> bool {
    status
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|value| value.eq_ignore_ascii_case(DONE_STATUS))
}

/// Blocking poller that re-queries an operation until it is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Poller {
    /// Deadline measured from the first status check; `None` waits forever
    pub timeout: Option<Duration>,

    /// Delay between status checks
    pub interval: Duration,
}

impl Poller {
    /// Create a poller with the given interval and no deadline.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            timeout: None,
            interval,
        }
    }

    /// Set an optional deadline.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Call `fetch` until it yields a done status, returning that payload.
    ///
    /// Errors from `fetch` propagate immediately.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationTimeout`] once a pending observation is made
    /// after the deadline has elapsed.
    pub fn wait<F>(&self, mut fetch: F) -> Result<Value>
    where
        F: FnMut() -> Result<Value>,
    {
        let started_at = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            let status = fetch()?;
            if is_done(&status) {
                return Ok(status);
            }

            attempt += 1;
            let elapsed = started_at.elapsed();
            debug!(attempt, ?elapsed, status = ?status.get("status"), "Operation pending");

            if let Some(timeout) = self.timeout {
                if elapsed > timeout {
                    let last = status
                        .get("status")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown");
                    return Err(Error::OperationTimeout(format!(
                        "still `{last}` after {elapsed:?} (timeout {timeout:?})"
                    )));
                }
            }

            thread::sleep(self.interval);
        }
    }
}

impl Default for Poller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}
