#![forbid(unsafe_code)]

//! The four-channel animation driver behind a bottom sheet.
//!
//! [`AnimationDriver`] owns the container height, content height, vertical
//! translation, and backdrop opacity channels. Each `to_*` builder starts a
//! transition immediately and returns its [`TransitionId`]; completions come
//! back from [`tick`](AnimationDriver::tick) as [`Completion`] records.
//!
//! # Invariants
//!
//! 1. Container and content heights are never negative.
//! 2. Content height never exceeds the content limit (the outer container
//!    height, kept current by the owner).
//! 3. Backdrop opacity is unbounded; drag tracking may push it outside
//!    `[0, 1]` and renderers clamp.
//! 4. Under [`AnimationStyle::Fade`], content height and translation are
//!    written instantly and never animate.
//! 5. A superseded transition never reports completion.

use std::time::Duration;

use super::channel::{Channel, ChannelKind, Channels};
use super::easing::Easing;
use super::transition::{Transition, TransitionId};
use super::AnimationStyle;

// ---------------------------------------------------------------------------
// Timings
// ---------------------------------------------------------------------------

/// Tunable durations for sheet transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SheetTimings {
    /// Outer wrapper show/hide (linear).
    #[cfg_attr(feature = "serde", serde(with = "millis"))]
    pub container: Duration,
    /// Backdrop fade in/out (linear).
    #[cfg_attr(feature = "serde", serde(with = "millis"))]
    pub backdrop: Duration,
    /// Base content-height duration.
    #[cfg_attr(feature = "serde", serde(with = "millis"))]
    pub content: Duration,
    /// Added on top of the content duration for the spring style.
    #[cfg_attr(feature = "serde", serde(with = "millis"))]
    pub spring_extra: Duration,
    /// Vertical translation.
    #[cfg_attr(feature = "serde", serde(with = "millis"))]
    pub translate: Duration,
}

impl Default for SheetTimings {
    fn default() -> Self {
        Self {
            container: Duration::from_millis(100),
            backdrop: Duration::from_millis(300),
            content: Duration::from_millis(300),
            spring_extra: Duration::from_millis(200),
            translate: Duration::from_millis(300),
        }
    }
}

impl SheetTimings {
    /// Create the default timings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Timings with every duration zero (instant transitions).
    pub fn instant() -> Self {
        Self {
            container: Duration::ZERO,
            backdrop: Duration::ZERO,
            content: Duration::ZERO,
            spring_extra: Duration::ZERO,
            translate: Duration::ZERO,
        }
    }

    /// Set the container duration.
    pub fn container(mut self, duration: Duration) -> Self {
        self.container = duration;
        self
    }

    /// Set the backdrop duration.
    pub fn backdrop(mut self, duration: Duration) -> Self {
        self.backdrop = duration;
        self
    }

    /// Set the base content duration.
    pub fn content(mut self, duration: Duration) -> Self {
        self.content = duration;
        self
    }

    /// Set the spring-style extra content duration.
    pub fn spring_extra(mut self, duration: Duration) -> Self {
        self.spring_extra = duration;
        self
    }

    /// Set the translation duration.
    pub fn translate(mut self, duration: Duration) -> Self {
        self.translate = duration;
        self
    }
}

#[cfg(feature = "serde")]
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis().min(u128::from(u64::MAX)) as u64)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// A transition that ran to completion during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// Channel the transition ran on.
    pub channel: ChannelKind,
    /// Identity returned when the transition started.
    pub id: TransitionId,
}

/// Owns the sheet's four animation channels.
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    container_height: Channel,
    content_height: Channel,
    translate_y: Channel,
    backdrop_opacity: Channel,
    style: AnimationStyle,
    timings: SheetTimings,
    next_id: u64,
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new(SheetTimings::default())
    }
}

impl AnimationDriver {
    /// Create a driver at rest with every channel at zero.
    pub fn new(timings: SheetTimings) -> Self {
        Self {
            container_height: Channel::bounded(0.0, 0.0, f64::INFINITY),
            content_height: Channel::bounded(0.0, 0.0, f64::INFINITY),
            translate_y: Channel::new(0.0),
            backdrop_opacity: Channel::new(0.0),
            style: AnimationStyle::default(),
            timings,
            next_id: 0,
        }
    }

    /// Set the animation style (builder pattern).
    #[must_use]
    pub fn with_style(mut self, style: AnimationStyle) -> Self {
        self.style = style;
        self
    }

    /// Current animation style.
    #[inline]
    pub fn style(&self) -> AnimationStyle {
        self.style
    }

    /// Change the animation style. In-flight transitions keep their curve.
    pub fn set_style(&mut self, style: AnimationStyle) {
        self.style = style;
    }

    /// Current timings.
    #[inline]
    pub fn timings(&self) -> &SheetTimings {
        &self.timings
    }

    /// Replace the timings. Applies to transitions started afterwards.
    pub fn set_timings(&mut self, timings: SheetTimings) {
        self.timings = timings;
    }

    /// Upper bound for the content height channel.
    pub fn content_limit(&self) -> f64 {
        self.content_height.max()
    }

    /// Set the upper bound for the content height channel.
    pub fn set_content_limit(&mut self, limit: f64) {
        self.content_height.set_max(limit);
    }

    /// Borrow a channel.
    pub fn channel(&self, kind: ChannelKind) -> &Channel {
        match kind {
            ChannelKind::ContainerHeight => &self.container_height,
            ChannelKind::ContentHeight => &self.content_height,
            ChannelKind::TranslateY => &self.translate_y,
            ChannelKind::BackdropOpacity => &self.backdrop_opacity,
        }
    }

    fn channel_mut(&mut self, kind: ChannelKind) -> &mut Channel {
        match kind {
            ChannelKind::ContainerHeight => &mut self.container_height,
            ChannelKind::ContentHeight => &mut self.content_height,
            ChannelKind::TranslateY => &mut self.translate_y,
            ChannelKind::BackdropOpacity => &mut self.backdrop_opacity,
        }
    }

    /// Current value of a channel.
    #[inline]
    pub fn value(&self, kind: ChannelKind) -> f64 {
        self.channel(kind).value()
    }

    /// Where a channel is heading (its current value when at rest).
    #[inline]
    pub fn target(&self, kind: ChannelKind) -> f64 {
        self.channel(kind).target()
    }

    /// Write a channel immediately, dropping its in-flight transition.
    pub fn set(&mut self, kind: ChannelKind, value: f64) {
        self.channel_mut(kind).set(value);
    }

    /// Channels with a transition in flight.
    pub fn animating(&self) -> Channels {
        ChannelKind::ALL
            .into_iter()
            .filter(|kind| self.channel(*kind).is_animating())
            .fold(Channels::empty(), |acc, kind| acc | kind.mask())
    }

    /// Whether every channel is at rest.
    pub fn is_idle(&self) -> bool {
        self.animating().is_empty()
    }

    /// Animate the outer wrapper height (short, linear).
    pub fn to_container_height(&mut self, value: f64) -> TransitionId {
        let duration = self.timings.container;
        self.start(ChannelKind::ContainerHeight, value, duration, Easing::Linear)
    }

    /// Animate the backdrop opacity (medium, linear).
    pub fn to_backdrop_opacity(&mut self, value: f64) -> TransitionId {
        let duration = self.timings.backdrop;
        self.start(ChannelKind::BackdropOpacity, value, duration, Easing::Linear)
    }

    /// Animate the content height.
    ///
    /// `duration` defaults to the base content duration; the spring style
    /// adds its extra on top. Under the fade style the value is written
    /// instantly and `None` is returned.
    pub fn to_content_height(
        &mut self,
        value: f64,
        duration: Option<Duration>,
    ) -> Option<TransitionId> {
        let Some(easing) = self.style.easing() else {
            self.set(ChannelKind::ContentHeight, value);
            return None;
        };
        let mut duration = duration.unwrap_or(self.timings.content);
        if self.style == AnimationStyle::Spring {
            duration = duration.saturating_add(self.timings.spring_extra);
        }
        Some(self.start(ChannelKind::ContentHeight, value, duration, easing))
    }

    /// Animate the vertical translation. Written instantly under the fade
    /// style, returning `None`.
    pub fn to_translate_y(&mut self, value: f64) -> Option<TransitionId> {
        let Some(easing) = self.style.easing() else {
            self.set(ChannelKind::TranslateY, value);
            return None;
        };
        let duration = self.timings.translate;
        Some(self.start(ChannelKind::TranslateY, value, duration, easing))
    }

    /// Advance all channels by `dt`, returning transitions that completed.
    pub fn tick(&mut self, dt: Duration) -> Vec<Completion> {
        let mut done = Vec::new();
        for kind in ChannelKind::ALL {
            if let Some(id) = self.channel_mut(kind).tick(dt) {
                done.push(Completion { channel: kind, id });
            }
        }
        done
    }

    fn start(
        &mut self,
        kind: ChannelKind,
        to: f64,
        duration: Duration,
        easing: Easing,
    ) -> TransitionId {
        self.next_id = self.next_id.wrapping_add(1);
        let id = TransitionId::new(self.next_id);
        let channel = self.channel_mut(kind);
        let from = channel.value();
        channel.start(Transition::new(id, from, to, duration, easing));
        #[cfg(feature = "tracing")]
        tracing::trace!(
            message = "animation.start",
            channel = ?kind,
            from,
            to,
            duration_ms = duration.as_millis() as u64,
            easing = ?easing
        );
        id
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
