#![forbid(unsafe_code)]

//! Animatable scalar channels.
//!
//! A [`Channel`] holds a current value and at most one in-flight
//! [`Transition`]. Starting a transition or writing a value directly drops
//! whatever was in flight; the dropped transition never completes.

use std::time::Duration;

use bitflags::bitflags;

use super::transition::{Transition, TransitionId};

/// The four channels a sheet animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Height of the outer wrapper (backdrop region plus sheet).
    ContainerHeight,
    /// Height of the sheet body.
    ContentHeight,
    /// Vertical translation of the sheet body.
    TranslateY,
    /// Opacity of the dimming backdrop.
    BackdropOpacity,
}

impl ChannelKind {
    /// All channels, in driver order.
    pub const ALL: [Self; 4] = [
        Self::ContainerHeight,
        Self::ContentHeight,
        Self::TranslateY,
        Self::BackdropOpacity,
    ];

    /// The single-bit mask for this channel.
    #[must_use]
    pub const fn mask(self) -> Channels {
        match self {
            Self::ContainerHeight => Channels::CONTAINER_HEIGHT,
            Self::ContentHeight => Channels::CONTENT_HEIGHT,
            Self::TranslateY => Channels::TRANSLATE_Y,
            Self::BackdropOpacity => Channels::BACKDROP_OPACITY,
        }
    }
}

bitflags! {
    /// Set of channels, e.g. those with a transition in flight.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Channels: u8 {
        const CONTAINER_HEIGHT = 0b0001;
        const CONTENT_HEIGHT = 0b0010;
        const TRANSLATE_Y = 0b0100;
        const BACKDROP_OPACITY = 0b1000;
    }
}

/// A continuously varying scalar with an optional in-flight transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    value: f64,
    min: f64,
    max: f64,
    transition: Option<Transition>,
}

impl Channel {
    /// Unbounded channel starting at `value`.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            value,
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            transition: None,
        }
    }

    /// Channel whose values are clamped to `[min, max]`.
    #[must_use]
    pub fn bounded(value: f64, min: f64, max: f64) -> Self {
        let mut channel = Self {
            value,
            min,
            max: max.max(min),
            transition: None,
        };
        channel.value = channel.clamp(value);
        channel
    }

    /// Current value.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Value the channel is heading to: the in-flight target, or the
    /// current value when at rest.
    pub fn target(&self) -> f64 {
        self.transition
            .as_ref()
            .map_or(self.value, |t| self.clamp(t.to()))
    }

    /// The in-flight transition, if any.
    #[inline]
    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// Whether a transition is in flight.
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Upper bound.
    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Change the upper bound, re-clamping the current value.
    pub fn set_max(&mut self, max: f64) {
        self.max = max.max(self.min);
        self.value = self.clamp(self.value);
    }

    /// Write a value directly, dropping any in-flight transition.
    pub fn set(&mut self, value: f64) {
        self.transition = None;
        self.value = self.clamp(value);
    }

    /// Replace any in-flight transition with `transition`.
    ///
    /// The new transition takes over from the current value.
    pub fn start(&mut self, transition: Transition) {
        self.value = self.clamp(transition.value());
        self.transition = Some(transition);
    }

    /// Advance the in-flight transition. Returns its id when it completes.
    pub fn tick(&mut self, dt: Duration) -> Option<TransitionId> {
        let transition = self.transition.as_mut()?;
        transition.tick(dt);
        let value = transition.value();
        let done = transition.is_complete().then(|| transition.id());
        self.value = self.clamp(value);
        if done.is_some() {
            self.transition = None;
        }
        done
    }

    #[inline]
    fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min.max(0.0).min(self.max);
        }
        value.clamp(self.min, self.max)
    }
}
