// Forbid unsafe in production; deny (with targeted allows) in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: height resolution, animation channels, and gesture arbitration for
//! bottom sheets.
//!
//! # Role
//! `sheet-core` holds the pieces of a bottom sheet that know nothing about
//! the sheet's open/closed lifecycle. `sheet-widgets` composes them into the
//! `BottomSheet` state machine.
//!
//! # Primary responsibilities
//! - **height**: turn a declarative [`HeightSpec`] into a clamped pixel value
//!   and track the outer container across viewport changes.
//! - **animation**: the four-channel [`AnimationDriver`], tick-driven tweens,
//!   easing curves, and id-based completion reporting.
//! - **gesture**: the [`GestureArbiter`] that decides drag ownership between
//!   the sheet and nested scrollables and writes live drag feedback.
//!
//! # How it fits in the system
//! The host delivers frames, pointer input, layout measurements, and keyboard
//! notifications to the widget; the widget routes them here. Nothing in this
//! crate allocates per frame beyond the completion list or performs I/O.

pub mod animation;
pub mod error;
pub mod gesture;
pub mod height;

pub use animation::{
    AnimationDriver, AnimationStyle, Channel, ChannelKind, Channels, Completion, Easing,
    SheetClock, SheetTimings, Transition, TransitionId,
};
pub use error::HeightParseError;
pub use gesture::{
    ArbiterConfig, GestureArbiter, GestureOutcome, GestureRegion, PointerEvent, ReleaseDecision,
    SurfaceId,
};
pub use height::{
    ContainerHeight, ContainerSpec, HANDLE_BAR_ALLOWANCE, HeightSpec, resolve,
    resolve_with_allowance,
};
