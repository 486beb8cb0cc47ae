#![forbid(unsafe_code)]

//! Frame clock converting frame timestamps into tick deltas.

use std::time::Duration;

use web_time::Instant;

/// Turns successive frame timestamps into `dt` values for `tick`.
///
/// The first frame after creation or [`reset`](SheetClock::reset) yields a
/// zero delta.
#[derive(Debug, Clone, Copy, Default)]
pub struct SheetClock {
    last: Option<Instant>,
}

impl SheetClock {
    /// Create a clock with no prior frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta since the previous frame, recording `now` as the new frame.
    ///
    /// Timestamps earlier than the previous frame yield a zero delta.
    pub fn delta(&mut self, now: Instant) -> Duration {
        let dt = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last = Some(now);
        dt
    }

    /// Forget the previous frame.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
