//! Throttled handle redraws on layout churn.

use crate::throttle::Throttle;

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

/// Default floor interval between redraws (about 5 per second).
pub const DEFAULT_REDRAW_INTERVAL_MS: u64 = 200;

/// Two independent redraw triggers: editor UI updates and viewport resizes.
///
/// Each method answers whether the focused resizer should redraw now.
#[derive(Debug, Clone)]
pub struct RedrawScheduler {
    ui_updates: Throttle<()>,
    viewport_resizes: Throttle<()>,
}

impl RedrawScheduler {
    /// Create a scheduler with the same floor interval for both triggers.
    pub fn new(interval: Duration) -> Self {
        Self {
            ui_updates: Throttle::new(interval),
            viewport_resizes: Throttle::new(interval),
        }
    }

    /// Record an editor UI update.
    pub fn ui_update(&mut self, at: Instant) -> bool {
        self.ui_updates.call(at, ()).is_some()
    }

    /// Record a viewport resize.
    pub fn viewport_resize(&mut self, at: Instant) -> bool {
        self.viewport_resizes.call(at, ()).is_some()
    }

    /// Whether either trigger's window closed by `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        let ui = self.ui_updates.poll(now).is_some();
        let viewport = self.viewport_resizes.poll(now).is_some();
        ui || viewport
    }

    /// Earliest moment a held trigger is due.
    pub fn deadline(&self) -> Option<Instant> {
        match (self.ui_updates.deadline(), self.viewport_resizes.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Drop any held triggers.
    pub fn cancel(&mut self) {
        self.ui_updates.cancel();
        self.viewport_resizes.cancel();
    }
}

impl Default for RedrawScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_REDRAW_INTERVAL_MS))
    }
}
