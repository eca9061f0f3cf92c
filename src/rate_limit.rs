//! Minimum-interval gate for outbound requests.
//!
//! The interval is measured from the end of the previous call to the start
//! of the next one. Waiting is a blocking sleep on the calling thread.

use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_completed: Option<Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_completed: None,
        }
    }

    /// Allows at most `per_second` dispatches per second.
    ///
    /// Non-positive or non-finite rates disable the gate.
    pub fn from_rate(per_second: f64) -> Self {
        let min_interval = if per_second.is_finite() && per_second > 0.0 {
            Duration::from_secs_f64(1.0 / per_second)
        } else {
            Duration::ZERO
        };
        Self::new(min_interval)
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Blocks until the minimum interval has passed since the last completed call.
    pub fn acquire(&mut self) {
        if let Some(last) = self.last_completed {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait);
                thread::sleep(wait);
            }
        }
    }

    /// Marks the end of a call; the next `acquire` measures from here.
    pub fn complete(&mut self) {
        self.last_completed = Some(Instant::now());
    }

    /// Runs `f` inside the gate.
    pub fn call<T>(&mut self, f: impl FnOnce() -> T) -> T {
        self.acquire();
        let result = f();
        self.complete();
        result
    }
}
