#![forbid(unsafe_code)]

//! A single timed tween between two scalar values.
//!
//! # Invariants
//!
//! 1. `value()` equals `from` at zero elapsed time and `to` once complete.
//! 2. Progress is `elapsed / duration`, clamped to `[0.0, 1.0]`.
//! 3. A zero-duration transition is complete immediately and reports `to`.

use std::time::Duration;

use super::easing::Easing;

/// Identity of a started transition, used to match completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(u64);

impl TransitionId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw counter value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Tween from `from` to `to` over `duration` with an easing curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    id: TransitionId,
    from: f64,
    to: f64,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl Transition {
    pub(crate) fn new(
        id: TransitionId,
        from: f64,
        to: f64,
        duration: Duration,
        easing: Easing,
    ) -> Self {
        Self {
            id,
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing,
        }
    }

    /// Identity of this transition.
    #[inline]
    pub fn id(&self) -> TransitionId {
        self.id
    }

    /// Start value.
    #[inline]
    pub fn from(&self) -> f64 {
        self.from
    }

    /// Target value.
    #[inline]
    pub fn to(&self) -> f64 {
        self.to
    }

    /// Total duration.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Easing curve.
    #[inline]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Advance by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    /// Whether the tween has reached its target.
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Linear progress in `[0.0, 1.0]`.
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Current interpolated value.
    pub fn value(&self) -> f64 {
        if self.is_complete() {
            return self.to;
        }
        let eased = self.easing.apply(self.progress());
        self.from + (self.to - self.from) * eased
    }

    /// Time elapsed past the end of the tween.
    pub fn overshoot(&self) -> Duration {
        self.elapsed.saturating_sub(self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);

    fn tween(from: f64, to: f64, duration: Duration, easing: Easing) -> Transition {
        Transition::new(TransitionId::new(1), from, to, duration, easing)
    }

    #[test]
    fn linear_midpoint() {
        let mut t = tween(0.0, 400.0, MS_100, Easing::Linear);
        assert_eq!(t.value(), 0.0);
        t.tick(Duration::from_millis(50));
        assert!((t.value() - 200.0).abs() < 1e-9);
        assert!(!t.is_complete());
    }

    #[test]
    fn completes_at_target() {
        let mut t = tween(400.0, 0.0, MS_100, Easing::ExpoOut);
        t.tick(MS_100);
        assert!(t.is_complete());
        assert_eq!(t.value(), 0.0);
    }

    #[test]
    fn overshoot_tracks_excess_time() {
        let mut t = tween(0.0, 1.0, MS_100, Easing::Linear);
        t.tick(Duration::from_millis(130));
        assert_eq!(t.overshoot(), Duration::from_millis(30));
        assert_eq!(t.progress(), 1.0);
    }

    #[test]
    fn zero_duration_is_immediately_complete() {
        let t = tween(0.0, 1.0, Duration::ZERO, Easing::Linear);
        assert!(t.is_complete());
        assert_eq!(t.value(), 1.0);
        assert_eq!(t.progress(), 1.0);
    }

    #[test]
    fn spring_tween_passes_target() {
        let mut t = tween(0.0, 100.0, Duration::from_millis(500), Easing::Spring);
        let mut peak = 0.0f64;
        for _ in 0..49 {
            t.tick(Duration::from_millis(10));
            peak = peak.max(t.value());
        }
        assert!(peak > 100.0, "spring tween should overshoot, peak {peak}");
    }
}
