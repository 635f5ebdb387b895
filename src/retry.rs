// Bounded retry with exponential backoff.
// Wraps async operations whose failures may be transient (rate limits, 5xx).

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::Result;

/// Retry schedule for a fallible async operation.
///
/// An operation runs at most `retries + 1` times. Only errors classified as
/// transient are retried; anything terminal (not-found, auth) propagates
/// immediately. Between attempts the policy sleeps with a strictly increasing
/// delay: `initial_delay * backoff`, multiplied again each round.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure.
    pub retries: u32,
    /// Base delay, multiplied by `backoff` before the first sleep.
    pub initial_delay: Duration,
    /// Multiplicative backoff factor, > 1.
    pub backoff: f64,
    /// Re-raise the last error after exhausting attempts instead of
    /// swallowing it into a `None` result.
    pub raise_on_exhaust: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            initial_delay: Duration::from_millis(500),
            backoff: 2.0,
            raise_on_exhaust: true,
        }
    }
}

impl RetryPolicy {
    /// Schedule used for storefront lookups: the store rate-limits hard, so
    /// back off on a scale of tens of seconds, and swallow exhaustion so the
    /// caller can fall back to library-only data.
    pub fn storefront() -> Self {
        Self {
            retries: 3,
            initial_delay: Duration::from_secs(20),
            backoff: 1.5,
            raise_on_exhaust: false,
        }
    }

    /// The sleep durations this policy would use, in order.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        let mut delay = self.initial_delay;
        std::iter::repeat_with(move || {
            delay = delay.mul_f64(self.backoff);
            delay
        })
        .take(self.retries as usize)
    }

    /// Run `op` under this policy.
    ///
    /// Returns `Ok(Some(v))` on success, `Ok(None)` when attempts are
    /// exhausted in swallow mode, and `Err` for terminal errors or exhaustion
    /// in raise mode.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<Option<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut delays = self.delays();

        loop {
            match op().await {
                Ok(value) => return Ok(Some(value)),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) => match delays.next() {
                    Some(delay) => {
                        debug!(error = %e, ?delay, "transient failure, backing off");
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        if self.raise_on_exhaust {
                            return Err(e);
                        }
                        debug!(error = %e, "retry budget exhausted, giving up");
                        return Ok(None);
                    }
                },
            }
        }
    }
}
