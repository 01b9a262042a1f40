//! Floor-interval rate limiting for high frequency notifications.

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

/// Coalesces calls so that at most one value is released per window.
///
/// The first call opens a window of `interval` length and is held. Later
/// calls inside the window replace the held value, so the value released at
/// the window boundary is always the last one received.
///
/// There is no timer behind this: the owner polls it from its frame loop.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    interval: Duration,
    window_end: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    /// Create a throttle with the given floor interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            window_end: None,
            pending: None,
        }
    }

    /// Whether a value is waiting for its window to close.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the open window closes, if one is open.
    pub fn deadline(&self) -> Option<Instant> {
        self.window_end
    }

    /// Offer a value at `now`.
    ///
    /// Returns a value only when a previous window had already expired
    /// without being polled; that stale value must be executed right away.
    pub fn call(&mut self, now: Instant, value: T) -> Option<T> {
        let overdue = match self.window_end {
            Some(end) if now >= end => self.take(),
            _ => None,
        };

        if self.window_end.is_none() {
            self.window_end = Some(now + self.interval);
        }
        self.pending = Some(value);
        overdue
    }

    /// Release the held value if its window has closed by `now`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.window_end {
            Some(end) if now >= end => self.take(),
            _ => None,
        }
    }

    /// Release the held value immediately, closing the window.
    pub fn flush(&mut self) -> Option<T> {
        self.take()
    }

    /// Drop the held value and close the window.
    pub fn cancel(&mut self) {
        self.window_end = None;
        self.pending = None;
    }

    fn take(&mut self) -> Option<T> {
        self.window_end = None;
        self.pending.take()
    }
}
