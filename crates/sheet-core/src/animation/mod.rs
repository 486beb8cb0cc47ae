#![forbid(unsafe_code)]

//! Tick-driven animation primitives for bottom sheets.
//!
//! - [`Easing`]: the linear, exponential ease-out, and spring curves.
//! - [`Transition`]: a single timed tween identified by a [`TransitionId`].
//! - [`Channel`]: a scalar with at most one in-flight transition.
//! - [`AnimationDriver`]: the four sheet channels and their named builders.
//! - [`SheetClock`]: frame timestamps to tick deltas.
//!
//! The host advances everything by calling `tick(dt)` once per frame.
//! Completion is reported by value rather than by callback: `tick` returns
//! the [`Completion`]s that finished, and a caller waiting for a particular
//! transition compares ids.

mod channel;
mod clock;
mod driver;
mod easing;
mod transition;

pub use channel::{Channel, ChannelKind, Channels};
pub use clock::SheetClock;
pub use driver::{AnimationDriver, Completion, SheetTimings};
pub use easing::Easing;
pub use transition::{Transition, TransitionId};

/// Visual style of sheet transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AnimationStyle {
    /// Content height slides with an exponential ease-out.
    #[default]
    Slide,
    /// Content height overshoots and settles, over a longer duration.
    Spring,
    /// Opacity only; heights are written instantly.
    Fade,
}

impl AnimationStyle {
    /// Curve for content height and translation, or `None` when those
    /// channels are not animated.
    #[must_use]
    pub fn easing(self) -> Option<Easing> {
        match self {
            Self::Slide => Some(Easing::ExpoOut),
            Self::Spring => Some(Easing::Spring),
            Self::Fade => None,
        }
    }

    /// Whether this is the opacity-only style.
    #[inline]
    #[must_use]
    pub fn is_fade(self) -> bool {
        matches!(self, Self::Fade)
    }
}
