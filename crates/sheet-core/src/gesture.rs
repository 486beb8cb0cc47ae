#![forbid(unsafe_code)]

//! Gesture arbitration: decides whether the sheet owns a drag and turns the
//! drag into live channel feedback.
//!
//! [`GestureArbiter`] consumes raw [`PointerEvent`]s from two registered
//! regions, the handle bar and the content surface. The handle bar is always
//! the sheet's (unless disabled). The content surface is the sheet's only when
//! the deepest touched element is the surface itself, identified by the
//! [`SurfaceId`] cached on first layout; any other target is a nested
//! scrollable and the gesture is left to it.
//!
//! # State Machine
//!
//! `Idle → Pending (down) → Captured (move accepted) → Idle (up/cancel)`.
//! A pending gesture re-checks ownership on every move until captured.
//!
//! # Invariants
//!
//! 1. A gesture that is never captured touches no channel.
//! 2. Only downward movement (positive `dy`) produces feedback.
//! 3. While captured, backdrop opacity is `1 - dy / resolved` (unclamped) and,
//!    except under the fade style, content height is `resolved - dy`.
//! 4. On release the sheet closes iff drag-to-close is enabled and
//!    `dy >= resolved / 3`; otherwise it snaps back.
//!
//! # Failure Modes
//!
//! - Moves before the first layout (no cached surface) are inert on the
//!   content surface.
//! - A zero resolved height produces no opacity feedback (no division).

use crate::animation::{AnimationDriver, ChannelKind};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Opaque, stable identity of a rendered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    /// Wrap a platform node identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The platform node identifier.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Region a gesture started in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureRegion {
    /// The drag affordance at the top of the sheet.
    HandleBar,
    /// The sheet body.
    Content,
}

/// Raw pointer input delivered by the host.
///
/// `y` is the vertical position in pixels, growing downward. `target` is the
/// deepest element under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer pressed inside a registered region.
    Down {
        region: GestureRegion,
        target: SurfaceId,
        y: f64,
    },
    /// Pointer moved while pressed.
    Move { target: SurfaceId, y: f64 },
    /// Pointer released.
    Up { y: f64 },
    /// The platform took the gesture away.
    Cancel,
}

/// What to do when a captured drag is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseDecision {
    /// Run the full close sequence.
    Close,
    /// Return to the resting open geometry.
    SnapBack,
}

/// Result of feeding one event to the arbiter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// No gesture in progress; the event was ignored.
    Idle,
    /// A press was recorded; ownership not decided yet.
    Pending,
    /// The move belongs to someone else (nested scrollable or disabled region).
    Yielded,
    /// The sheet owns the drag; `dy` is the offset from the press.
    Tracking { dy: f64 },
    /// A captured drag ended.
    Released { dy: f64, decision: ReleaseDecision },
}

/// Arbitration switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArbiterConfig {
    /// Never capture drags on the content surface.
    pub disable_body_panning: bool,
    /// Never capture drags on the handle bar.
    pub disable_handle_bar_panning: bool,
    /// Close when a drag is released past the threshold.
    pub close_on_drag_down: bool,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            disable_body_panning: false,
            disable_handle_bar_panning: false,
            close_on_drag_down: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveGesture {
    region: GestureRegion,
    start_y: f64,
    dy: f64,
    captured: bool,
}

// ---------------------------------------------------------------------------
// GestureArbiter
// ---------------------------------------------------------------------------

/// Stateful drag interpreter for one sheet.
#[derive(Debug, Clone, Default)]
pub struct GestureArbiter {
    config: ArbiterConfig,
    surface: Option<SurfaceId>,
    active: Option<ActiveGesture>,
}

impl GestureArbiter {
    /// Create an arbiter with the given configuration.
    #[must_use]
    pub fn new(config: ArbiterConfig) -> Self {
        Self {
            config,
            surface: None,
            active: None,
        }
    }

    /// Current configuration.
    #[inline]
    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    /// Replace the configuration.
    pub fn set_config(&mut self, config: ArbiterConfig) {
        self.config = config;
    }

    /// Cache the content surface identity from the first layout.
    ///
    /// Later calls are ignored. Returns `true` if this call captured it.
    pub fn capture_surface(&mut self, id: SurfaceId) -> bool {
        if self.surface.is_some() {
            return false;
        }
        self.surface = Some(id);
        true
    }

    /// The cached content surface identity.
    #[inline]
    pub fn surface(&self) -> Option<SurfaceId> {
        self.surface
    }

    /// Forget the cached surface (unmount).
    pub fn clear_surface(&mut self) {
        self.surface = None;
        self.active = None;
    }

    /// Whether a captured drag is in progress.
    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.active.is_some_and(|g| g.captured)
    }

    /// Drop any in-progress gesture without touching channels.
    pub fn reset(&mut self) {
        self.active = None;
    }

    /// Ownership rule for a move in `region` whose deepest target is `target`.
    pub fn should_capture(&self, region: GestureRegion, target: SurfaceId) -> bool {
        match region {
            GestureRegion::HandleBar => !self.config.disable_handle_bar_panning,
            GestureRegion::Content => {
                !self.config.disable_body_panning && self.surface == Some(target)
            }
        }
    }

    /// Feed one pointer event.
    ///
    /// While captured, moves write backdrop opacity and content height on
    /// `driver` immediately. A snap-back release restores them; a close
    /// release leaves the close sequence to the caller.
    pub fn process(
        &mut self,
        event: &PointerEvent,
        resolved_height: f64,
        driver: &mut AnimationDriver,
    ) -> GestureOutcome {
        match *event {
            PointerEvent::Down { region, y, .. } => {
                self.active = Some(ActiveGesture {
                    region,
                    start_y: y,
                    dy: 0.0,
                    captured: false,
                });
                GestureOutcome::Pending
            }
            PointerEvent::Move { target, y } => self.on_move(target, y, resolved_height, driver),
            PointerEvent::Up { y } => {
                let Some(mut gesture) = self.active.take() else {
                    return GestureOutcome::Idle;
                };
                if !gesture.captured {
                    return GestureOutcome::Idle;
                }
                gesture.dy = y - gesture.start_y;
                let decision = self.release_decision(gesture.dy, resolved_height);
                if decision == ReleaseDecision::SnapBack {
                    snap_back(resolved_height, driver);
                }
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    message = "gesture.release",
                    dy = gesture.dy,
                    resolved_height,
                    decision = ?decision
                );
                GestureOutcome::Released {
                    dy: gesture.dy,
                    decision,
                }
            }
            PointerEvent::Cancel => {
                let Some(gesture) = self.active.take() else {
                    return GestureOutcome::Idle;
                };
                if !gesture.captured {
                    return GestureOutcome::Idle;
                }
                snap_back(resolved_height, driver);
                GestureOutcome::Released {
                    dy: gesture.dy,
                    decision: ReleaseDecision::SnapBack,
                }
            }
        }
    }

    /// Close iff drag-to-close is enabled and `dy` reaches a third of the
    /// resolved height.
    pub fn release_decision(&self, dy: f64, resolved_height: f64) -> ReleaseDecision {
        if self.config.close_on_drag_down && dy >= resolved_height / 3.0 {
            ReleaseDecision::Close
        } else {
            ReleaseDecision::SnapBack
        }
    }

    fn on_move(
        &mut self,
        target: SurfaceId,
        y: f64,
        resolved_height: f64,
        driver: &mut AnimationDriver,
    ) -> GestureOutcome {
        let Some(gesture) = self.active else {
            // Move without a recorded press: start tracking from here.
            self.active = Some(ActiveGesture {
                region: GestureRegion::Content,
                start_y: y,
                dy: 0.0,
                captured: false,
            });
            return self.on_move(target, y, resolved_height, driver);
        };

        if !gesture.captured {
            if !self.should_capture(gesture.region, target) {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    message = "gesture.yield",
                    region = ?gesture.region,
                    surface = target.raw()
                );
                return GestureOutcome::Yielded;
            }
            #[cfg(feature = "tracing")]
            tracing::trace!(message = "gesture.capture", region = ?gesture.region);
        }

        let dy = y - gesture.start_y;
        self.active = Some(ActiveGesture {
            dy,
            captured: true,
            ..gesture
        });

        if dy > 0.0 {
            track(dy, resolved_height, driver);
        }
        GestureOutcome::Tracking { dy }
    }
}

/// Live drag feedback for a downward offset.
fn track(dy: f64, resolved_height: f64, driver: &mut AnimationDriver) {
    if resolved_height > 0.0 {
        driver.set(ChannelKind::BackdropOpacity, 1.0 - dy / resolved_height);
    }
    if !driver.style().is_fade() {
        driver.set(ChannelKind::ContentHeight, resolved_height - dy);
    }
}

/// Restore the resting open geometry after an aborted drag.
fn snap_back(resolved_height: f64, driver: &mut AnimationDriver) {
    driver.set(ChannelKind::BackdropOpacity, 1.0);
    if !driver.style().is_fade() {
        driver.to_content_height(resolved_height, None);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
