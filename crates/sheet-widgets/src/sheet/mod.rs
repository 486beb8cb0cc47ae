#![forbid(unsafe_code)]

//! The bottom sheet lifecycle controller.
//!
//! [`BottomSheet`] owns the open/closed state of one sheet and sequences the
//! four animation channels of its [`AnimationDriver`] for open, close, drag,
//! keyboard, and geometry changes. The host drives it with frame ticks,
//! pointer events, layout measurements, and keyboard notifications, and
//! reads back a [`SheetView`] each frame.
//!
//! # State Machine
//!
//! `Closed ⇄ Open`. There are no transient opening/closing states: `open()`
//! and `close()` flip the state immediately and the channels catch up.
//!
//! # Invariants
//!
//! 1. The resolved height is recomputed before every open sequence starts.
//! 2. Close is two-phase: the backdrop fades first, and the body collapses
//!    only when that exact fade reports completion. A superseded fade never
//!    collapses the body.
//! 3. `close()` returns with the state already `Closed`, keyboard coordination
//!    deregistered, and any on-screen keyboard dismissed.
//! 4. Pointer input is only interpreted while `Open`.
//!
//! # Failure Modes
//!
//! - A close whose backdrop fade is superseded (by `open()`, or a drag write)
//!   leaves the body at its current height until the next sequence.
//! - Pointer moves on the content surface before [`BottomSheet::on_surface_layout`]
//!   are inert.

pub mod config;
pub mod keyboard;
pub mod render;

pub use config::SheetConfig;
pub use keyboard::{KeyboardCoordinator, KeyboardEvent, KeyboardHost, NoKeyboard};
pub use render::{
    BackdropPosition, BackdropView, DefaultBackdrop, DefaultHandleBar, HandleBarView,
    RenderDelegate, Rgba, SheetFrame, SheetLayer, SheetView,
};

use std::time::Duration;

use sheet_core::{
    AnimationDriver, AnimationStyle, ChannelKind, Completion, ContainerHeight, GestureArbiter,
    GestureOutcome, PointerEvent, ReleaseDecision, SheetClock, SurfaceId, TransitionId,
    resolve_with_allowance,
};
use web_time::Instant;

// ---------------------------------------------------------------------------
// State and events
// ---------------------------------------------------------------------------

/// Authoritative open/closed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetState {
    /// Hidden, or collapsing after a close.
    #[default]
    Closed,
    /// Shown, or animating open.
    Open,
}

impl SheetState {
    /// Whether the sheet is open.
    #[inline]
    pub fn is_open(self) -> bool {
        self == Self::Open
    }
}

/// Lifecycle notification for the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SheetEvent {
    /// `open()` ran.
    Opened,
    /// `close()` ran (for any reason).
    Closed,
    /// The body-collapse phase of a close started.
    Collapsed,
    /// A captured drag ended.
    DragReleased {
        /// Final offset from the press.
        dy: f64,
        /// Whether the release closed the sheet.
        closing: bool,
    },
}

// ---------------------------------------------------------------------------
// BottomSheet
// ---------------------------------------------------------------------------

/// A draggable, animatable bottom sheet.
#[derive(Debug)]
pub struct BottomSheet {
    config: SheetConfig,
    state: SheetState,
    outer: ContainerHeight,
    resolved: f64,
    driver: AnimationDriver,
    arbiter: GestureArbiter,
    keyboard: KeyboardCoordinator,
    pending_collapse: Option<TransitionId>,
    events: Vec<SheetEvent>,
    reduced_motion: bool,
    clock: SheetClock,
    mounted: bool,
}

impl BottomSheet {
    /// Create a closed sheet inside a viewport of the given height.
    pub fn new(config: SheetConfig, viewport_height: f64) -> Self {
        let outer = ContainerHeight::new(config.container, viewport_height);
        let mut driver =
            AnimationDriver::new(config.timings).with_style(config.effective_style(false));
        driver.set_content_limit(outer.current());
        let arbiter = GestureArbiter::new(config.arbiter());
        let mut sheet = Self {
            config,
            state: SheetState::Closed,
            outer,
            resolved: 0.0,
            driver,
            arbiter,
            keyboard: KeyboardCoordinator::new(),
            pending_collapse: None,
            events: Vec::new(),
            reduced_motion: false,
            clock: SheetClock::new(),
            mounted: false,
        };
        sheet.resolved = sheet.resolve_now();
        sheet
    }

    // --- Accessors ---------------------------------------------------------

    /// Current configuration.
    #[inline]
    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> SheetState {
        self.state
    }

    /// Whether the sheet is open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Whether a host is mounted.
    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Current resolved sheet height.
    #[inline]
    pub fn resolved_height(&self) -> f64 {
        self.resolved
    }

    /// Current outer container height.
    #[inline]
    pub fn outer_height(&self) -> f64 {
        self.outer.current()
    }

    /// Outer container tracker, for hosts that size the measuring view.
    #[inline]
    pub fn container(&self) -> &ContainerHeight {
        &self.outer
    }

    /// The animation driver.
    #[inline]
    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    /// The gesture arbiter.
    #[inline]
    pub fn arbiter(&self) -> &GestureArbiter {
        &self.arbiter
    }

    /// The keyboard coordinator.
    #[inline]
    pub fn keyboard(&self) -> &KeyboardCoordinator {
        &self.keyboard
    }

    /// Whether a close is waiting on its backdrop fade.
    #[inline]
    pub fn is_collapse_pending(&self) -> bool {
        self.pending_collapse.is_some()
    }

    /// Drain queued lifecycle notifications.
    pub fn take_events(&mut self) -> Vec<SheetEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Mounting ----------------------------------------------------------

    /// Attach to a host and start keyboard coordination.
    pub fn mount(&mut self, keyboard: Box<dyn KeyboardHost>) {
        self.keyboard.attach(keyboard);
        self.keyboard.subscribe();
        self.clock.reset();
        self.mounted = true;
    }

    /// Detach from the host, forgetting the cached surface identity.
    pub fn unmount(&mut self) {
        self.keyboard.detach();
        self.arbiter.clear_surface();
        self.clock.reset();
        self.mounted = false;
    }

    // --- Lifecycle ---------------------------------------------------------

    /// Show the sheet.
    ///
    /// Calling this while already open restarts the open sequence.
    pub fn open(&mut self) {
        self.driver.set_content_limit(self.outer.current());
        self.resolved = self.resolve_now();
        let style = self.effective_style();
        self.driver.set_style(style);

        let container = self.container_target();
        self.driver.to_container_height(container);
        let content = self.keyboard.content_target(self.resolved);
        if style.is_fade() {
            self.driver.set(ChannelKind::ContentHeight, content);
            self.driver.to_backdrop_opacity(1.0);
        } else {
            self.driver.to_backdrop_opacity(1.0);
            self.driver.to_content_height(content, None);
        }

        self.pending_collapse = None;
        self.state = SheetState::Open;
        self.keyboard.subscribe();
        self.events.push(SheetEvent::Opened);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "sheet.open",
            style = ?style,
            resolved = self.resolved,
            container
        );
    }

    /// Hide the sheet.
    ///
    /// The state is `Closed` when this returns; the body collapses once the
    /// backdrop fade started here completes.
    pub fn close(&mut self) {
        let fade = self.driver.to_backdrop_opacity(0.0);
        self.pending_collapse = Some(fade);
        self.state = SheetState::Closed;
        self.arbiter.reset();
        self.keyboard.unsubscribe();
        self.keyboard.dismiss();
        self.events.push(SheetEvent::Closed);

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "sheet.close", fade = fade.raw());
    }

    /// Close if open and backdrop presses are enabled. Returns whether it
    /// closed.
    pub fn on_backdrop_press(&mut self) -> bool {
        if !self.is_open() || self.config.hide_backdrop || !self.config.close_on_backdrop_press {
            return false;
        }
        self.close();
        true
    }

    /// Close on the platform back button. Returns `false` when the press was
    /// not consumed and should be routed elsewhere.
    pub fn on_back_press(&mut self) -> bool {
        if !self.is_open() || !self.config.close_on_back_press {
            return false;
        }
        self.close();
        true
    }

    // --- Frames ------------------------------------------------------------

    /// Advance animations by `dt`.
    pub fn tick(&mut self, dt: Duration) -> Vec<Completion> {
        let done = self.driver.tick(dt);
        if let Some(fade) = self.pending_collapse
            && done.iter().any(|c| c.id == fade)
        {
            self.pending_collapse = None;
            self.collapse();
        }
        done
    }

    /// Advance animations to the frame stamped `now`.
    pub fn tick_at(&mut self, now: Instant) -> Vec<Completion> {
        let dt = self.clock.delta(now);
        self.tick(dt)
    }

    fn collapse(&mut self) {
        if self.driver.style().is_fade() {
            self.driver.to_container_height(0.0);
            self.driver.set(ChannelKind::ContentHeight, 0.0);
        } else {
            self.driver.to_content_height(0.0, None);
            self.driver.to_container_height(0.0);
        }
        self.events.push(SheetEvent::Collapsed);

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "sheet.collapse", style = ?self.driver.style());
    }

    // --- External changes --------------------------------------------------

    /// The viewport changed height (resize or orientation change).
    pub fn set_viewport_height(&mut self, height: f64) {
        self.outer.set_viewport(height);
        self.reconcile_geometry();
    }

    /// Layout measurement for a percent outer container. Only the first
    /// measurement is used. Returns whether the outer height changed.
    pub fn on_container_layout(&mut self, measured_height: f64) -> bool {
        let changed = self.outer.measure(measured_height);
        if changed {
            self.reconcile_geometry();
        }
        changed
    }

    /// Replace the configuration, re-deriving geometry.
    pub fn set_config(&mut self, config: SheetConfig) {
        self.outer.set_spec(config.container);
        self.driver.set_timings(config.timings);
        self.arbiter.set_config(config.arbiter());
        self.config = config;
        self.driver.set_style(self.effective_style());
        self.reconcile_geometry();
    }

    /// Host reduced-motion preference.
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
        self.driver.set_style(self.effective_style());
    }

    /// Style in effect after the reduced-motion preference.
    pub fn effective_style(&self) -> AnimationStyle {
        self.config.effective_style(self.reduced_motion)
    }

    fn reconcile_geometry(&mut self) {
        let outer = self.outer.current();
        self.driver.set_content_limit(outer);
        let previous = self.resolved;
        self.resolved = self.resolve_now();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "sheet.resize",
            outer,
            resolved = self.resolved,
            open = self.is_open()
        );

        if !self.is_open() {
            return;
        }
        let container = self.container_target();
        if self.driver.target(ChannelKind::ContainerHeight) != container {
            self.driver.set(ChannelKind::ContainerHeight, container);
        }
        if self.resolved != previous {
            let content = self.keyboard.content_target(self.resolved);
            self.driver.to_content_height(content, None);
        }
    }

    // --- Input -------------------------------------------------------------

    /// First layout of the content surface. Returns `true` if this call
    /// cached the identity.
    pub fn on_surface_layout(&mut self, id: SurfaceId) -> bool {
        self.arbiter.capture_surface(id)
    }

    /// Feed a pointer event from the handle bar or the content surface.
    pub fn on_pointer(&mut self, event: PointerEvent) -> GestureOutcome {
        if !self.is_open() {
            self.arbiter.reset();
            return GestureOutcome::Idle;
        }
        let outcome = self.arbiter.process(&event, self.resolved, &mut self.driver);
        if let GestureOutcome::Released { dy, decision } = outcome {
            let closing = decision == ReleaseDecision::Close;
            self.events.push(SheetEvent::DragReleased { dy, closing });

            #[cfg(feature = "tracing")]
            tracing::debug!(message = "sheet.drag.release", dy, closing);

            if closing {
                self.close();
            }
        }
        outcome
    }

    /// Feed a keyboard notification. Returns the content height being
    /// animated to, if the sheet reacted. Ignored unless open.
    pub fn on_keyboard(&mut self, event: KeyboardEvent) -> Option<f64> {
        if !self.is_open() {
            return None;
        }
        let target = self.keyboard.handle(event, self.resolved)?;
        self.driver.to_content_height(target, None);

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "sheet.keyboard", event = ?event, target);

        Some(target)
    }

    // --- Rendering ---------------------------------------------------------

    /// Current animated geometry, with backdrop opacity clamped for drawing.
    pub fn frame(&self) -> SheetFrame {
        let opacity = self.driver.value(ChannelKind::BackdropOpacity);
        SheetFrame {
            container_height: self.driver.value(ChannelKind::ContainerHeight),
            content_height: self.driver.value(ChannelKind::ContentHeight),
            translate_y: self.driver.value(ChannelKind::TranslateY),
            backdrop_opacity: if opacity.is_nan() {
                0.0
            } else {
                opacity.clamp(0.0, 1.0)
            },
            backdrop_color: self.config.backdrop_color,
        }
    }

    /// Snapshot for drawing one frame.
    pub fn view(&self) -> SheetView {
        SheetView {
            frame: self.frame(),
            state: self.state,
            backdrop_visible: !self.config.hide_backdrop,
            handle_bar_visible: !self.config.hide_handle_bar,
            backdrop_position: self.config.backdrop_position,
        }
    }

    /// Render the handle bar, unless hidden.
    pub fn render_handle_bar<D: RenderDelegate>(&self, delegate: &D) -> Option<D::View> {
        (!self.config.hide_handle_bar).then(|| delegate.render(&self.frame()))
    }

    /// Render the backdrop, unless suppressed.
    pub fn render_backdrop<D: RenderDelegate>(&self, delegate: &D) -> Option<D::View> {
        (!self.config.hide_backdrop).then(|| delegate.render(&self.frame()))
    }

    // --- Internals ---------------------------------------------------------

    fn resolve_now(&self) -> f64 {
        resolve_with_allowance(
            self.config.height,
            self.outer.current(),
            self.config.hide_handle_bar,
            self.config.handle_bar_allowance,
        )
    }

    fn container_target(&self) -> f64 {
        if self.config.hide_backdrop {
            self.resolved
        } else {
            self.outer.current()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::keyboard::tests::RecordingHost;
    use super::*;
    use sheet_core::{Channels, GestureRegion, HeightSpec, SheetTimings};
    #[cfg(feature = "tracing")]
    use std::sync::{Arc, Mutex};
    #[cfg(feature = "tracing")]
    use tracing::Subscriber;
    #[cfg(feature = "tracing")]
    use tracing_subscriber::Layer;
    #[cfg(feature = "tracing")]
    use tracing_subscriber::layer::{Context, SubscriberExt};

    const SURFACE: SurfaceId = SurfaceId::new(3);
    const SETTLE: Duration = Duration::from_millis(1000);

    fn sheet(config: SheetConfig) -> BottomSheet {
        BottomSheet::new(config, 800.0)
    }

    fn settled_open(config: SheetConfig) -> BottomSheet {
        let mut s = sheet(config);
        s.on_surface_layout(SURFACE);
        s.open();
        s.tick(SETTLE);
        s.take_events();
        s
    }

    fn drag(s: &mut BottomSheet, from: f64, to: f64) -> GestureOutcome {
        s.on_pointer(PointerEvent::Down {
            region: GestureRegion::Content,
            target: SURFACE,
            y: from,
        });
        s.on_pointer(PointerEvent::Move {
            target: SURFACE,
            y: to,
        });
        s.on_pointer(PointerEvent::Up { y: to })
    }

    #[test]
    fn starts_closed_and_collapsed() {
        let s = sheet(SheetConfig::default());
        assert_eq!(s.state(), SheetState::Closed);
        assert!(!s.view().is_visible());
        assert_eq!(s.resolved_height(), 800.0 - 24.0);
    }

    #[test]
    fn open_emits_event_and_settles() {
        let mut s = sheet(SheetConfig::new().height(HeightSpec::Pixels(300.0)));
        s.open();
        assert_eq!(s.take_events(), vec![SheetEvent::Opened]);
        s.tick(SETTLE);
        assert!(s.driver().is_idle());
        let f = s.frame();
        assert_eq!(f.container_height, 800.0);
        assert_eq!(f.content_height, 300.0);
        assert_eq!(f.backdrop_opacity, 1.0);
    }

    #[test]
    fn fade_open_sets_content_instantly() {
        let mut s = sheet(
            SheetConfig::new()
                .animation_style(AnimationStyle::Fade)
                .height(HeightSpec::Pixels(300.0)),
        );
        s.open();
        assert_eq!(s.driver().value(ChannelKind::ContentHeight), 300.0);
        assert_eq!(
            s.driver().animating(),
            Channels::CONTAINER_HEIGHT | Channels::BACKDROP_OPACITY
        );
    }

    #[test]
    fn close_events_in_order() {
        let mut s = settled_open(SheetConfig::default());
        s.close();
        assert!(s.is_collapse_pending());
        s.tick(SETTLE);
        assert_eq!(s.take_events(), vec![SheetEvent::Closed, SheetEvent::Collapsed]);
        s.tick(SETTLE);
        assert!(!s.view().is_visible());
    }

    #[test]
    fn reopen_before_fade_cancels_collapse() {
        let mut s = settled_open(SheetConfig::default());
        s.close();
        s.tick(Duration::from_millis(100));
        s.open();
        assert!(!s.is_collapse_pending());
        s.tick(SETTLE);
        assert!(s.take_events().iter().all(|e| *e != SheetEvent::Collapsed));
        assert_eq!(s.frame().container_height, 800.0);
    }

    #[test]
    fn fade_collapse_writes_content_instantly() {
        let mut s = settled_open(SheetConfig::new().animation_style(AnimationStyle::Fade));
        s.close();
        s.tick(Duration::from_millis(300));
        assert_eq!(s.driver().value(ChannelKind::ContentHeight), 0.0);
        assert_eq!(s.driver().animating(), Channels::CONTAINER_HEIGHT);
    }

    #[test]
    fn backdrop_press_respects_config() {
        let mut s = settled_open(SheetConfig::default());
        assert!(s.on_backdrop_press());
        assert!(!s.is_open());
        assert!(!s.on_backdrop_press());

        let mut s = settled_open(SheetConfig::new().close_on_backdrop_press(false));
        assert!(!s.on_backdrop_press());
        assert!(s.is_open());

        let mut s = settled_open(SheetConfig::new().hide_backdrop(true));
        assert!(!s.on_backdrop_press());
    }

    #[test]
    fn back_press_consumed_only_when_closing() {
        let mut s = sheet(SheetConfig::default());
        assert!(!s.on_back_press());
        s.open();
        assert!(s.on_back_press());
        assert_eq!(s.state(), SheetState::Closed);

        let mut s = settled_open(SheetConfig::new().close_on_back_press(false));
        assert!(!s.on_back_press());
    }

    #[test]
    fn drag_release_reports_event() {
        let mut s = settled_open(SheetConfig::new().height(HeightSpec::Pixels(300.0)));
        drag(&mut s, 0.0, 50.0);
        assert_eq!(
            s.take_events(),
            vec![SheetEvent::DragReleased {
                dy: 50.0,
                closing: false
            }]
        );
        drag(&mut s, 0.0, 200.0);
        assert_eq!(
            s.take_events(),
            vec![
                SheetEvent::DragReleased {
                    dy: 200.0,
                    closing: true
                },
                SheetEvent::Closed
            ]
        );
    }

    #[test]
    fn pointer_ignored_while_closed() {
        let mut s = sheet(SheetConfig::default());
        s.on_surface_layout(SURFACE);
        assert_eq!(drag(&mut s, 0.0, 400.0), GestureOutcome::Idle);
        assert_eq!(s.driver().value(ChannelKind::BackdropOpacity), 0.0);
    }

    #[test]
    fn reduced_motion_switches_to_fade() {
        let mut s = sheet(SheetConfig::new().animation_style(AnimationStyle::Spring));
        s.set_reduced_motion(true);
        assert_eq!(s.effective_style(), AnimationStyle::Fade);
        s.open();
        assert!(!s.driver().animating().contains(Channels::CONTENT_HEIGHT));
        s.set_reduced_motion(false);
        assert_eq!(s.driver().style(), AnimationStyle::Spring);
    }

    #[test]
    fn config_change_while_open_retargets_content() {
        let mut s = settled_open(SheetConfig::new().height(HeightSpec::Pixels(300.0)));
        s.set_config(SheetConfig::new().height(HeightSpec::Pixels(500.0)));
        assert_eq!(s.resolved_height(), 500.0);
        assert_eq!(s.driver().target(ChannelKind::ContentHeight), 500.0);
        assert_eq!(s.driver().animating(), Channels::CONTENT_HEIGHT);
    }

    #[test]
    fn hiding_backdrop_while_open_snaps_container() {
        let mut s = settled_open(SheetConfig::new().height(HeightSpec::Pixels(300.0)));
        s.set_config(
            SheetConfig::new()
                .height(HeightSpec::Pixels(300.0))
                .hide_backdrop(true),
        );
        assert_eq!(s.driver().value(ChannelKind::ContainerHeight), 300.0);
        assert!(s.driver().is_idle());
    }

    #[test]
    fn geometry_change_while_closed_only_resolves() {
        let mut s = sheet(SheetConfig::new().height(HeightSpec::Percent(50.0)));
        s.set_viewport_height(400.0);
        assert_eq!(s.resolved_height(), 200.0);
        assert!(s.driver().is_idle());
        assert_eq!(s.frame().container_height, 0.0);
    }

    #[test]
    fn keyboard_subscription_follows_lifecycle() {
        let host = RecordingHost::default();
        let calls = std::rc::Rc::clone(&host.calls);
        let mut s = sheet(SheetConfig::new().height(HeightSpec::Pixels(400.0)));
        s.mount(Box::new(host));
        assert!(s.keyboard().is_subscribed());
        s.open();
        s.close();
        assert!(!s.keyboard().is_subscribed());
        s.open();
        assert!(s.keyboard().is_subscribed());
        s.unmount();
        assert!(!s.keyboard().is_subscribed());
        assert_eq!(
            *calls.borrow(),
            vec!["subscribe", "unsubscribe", "dismiss", "subscribe", "unsubscribe"]
        );
    }

    #[test]
    fn keyboard_while_open_animates_content() {
        let mut s = sheet(SheetConfig::new().height(HeightSpec::Pixels(400.0)));
        s.mount(Box::new(NoKeyboard));
        s.open();
        s.tick(SETTLE);
        assert_eq!(
            s.on_keyboard(KeyboardEvent::Show { height: 150.0 }),
            Some(250.0)
        );
        assert_eq!(s.driver().target(ChannelKind::ContentHeight), 250.0);
        assert_eq!(s.on_keyboard(KeyboardEvent::Hide), Some(400.0));
    }

    #[test]
    fn keyboard_after_close_is_ignored() {
        let mut s = sheet(SheetConfig::new().height(HeightSpec::Pixels(400.0)));
        s.mount(Box::new(NoKeyboard));
        s.open();
        s.close();
        assert_eq!(s.on_keyboard(KeyboardEvent::Show { height: 150.0 }), None);
    }

    #[test]
    fn keyboard_while_closed_never_shapes_open() {
        let mut s = sheet(SheetConfig::new().height(HeightSpec::Pixels(400.0)));
        s.mount(Box::new(NoKeyboard));
        assert_eq!(s.on_keyboard(KeyboardEvent::Show { height: 100.0 }), None);
        s.open();
        assert_eq!(s.driver().target(ChannelKind::ContentHeight), 400.0);

        s.close();
        assert_eq!(s.on_keyboard(KeyboardEvent::Show { height: 100.0 }), None);
        s.open();
        assert_eq!(s.driver().target(ChannelKind::ContentHeight), 400.0);
    }

    #[test]
    fn resize_with_keyboard_up_keeps_keyboard_gap() {
        let mut s = sheet(SheetConfig::new().height(HeightSpec::Percent(50.0)));
        s.mount(Box::new(NoKeyboard));
        s.open();
        s.tick(SETTLE);
        assert_eq!(
            s.on_keyboard(KeyboardEvent::Show { height: 100.0 }),
            Some(300.0)
        );
        s.set_viewport_height(1000.0);
        assert_eq!(s.resolved_height(), 500.0);
        assert_eq!(s.driver().target(ChannelKind::ContentHeight), 400.0);
        s.tick(SETTLE);
        assert_eq!(s.frame().content_height, 400.0);
    }

    #[test]
    fn unmount_forgets_surface() {
        let mut s = settled_open(SheetConfig::default());
        s.unmount();
        assert_eq!(s.arbiter().surface(), None);
        assert!(!s.is_mounted());
        assert!(s.on_surface_layout(SurfaceId::new(99)));
    }

    #[test]
    fn configured_backdrop_color_reaches_default_delegate() {
        let red = Rgba::rgba(255, 0, 0, 255);
        let mut s = sheet(SheetConfig::new().backdrop_color(red));
        s.open();
        s.tick(SETTLE);
        assert_eq!(s.view().frame.backdrop_color, red);
        let backdrop = s.render_backdrop(&DefaultBackdrop::default());
        assert_eq!(backdrop.map(|b| b.color), Some(red));

        s.close();
        s.tick(Duration::from_millis(150));
        let half = s.render_backdrop(&DefaultBackdrop::default());
        assert_eq!(half.map(|b| b.color.a), Some(128));
    }

    #[test]
    fn hidden_chrome_skips_delegates() {
        let s = sheet(SheetConfig::new().hide_handle_bar(true).hide_backdrop(true));
        assert_eq!(s.render_handle_bar(&DefaultHandleBar::default()), None);
        assert_eq!(s.render_backdrop(&DefaultBackdrop::default()), None);
        let s = sheet(SheetConfig::default());
        assert!(s.render_handle_bar(&DefaultHandleBar::default()).is_some());
    }

    #[test]
    fn frame_clamps_drag_opacity() {
        let mut s = settled_open(SheetConfig::new().height(HeightSpec::Pixels(200.0)));
        s.on_pointer(PointerEvent::Down {
            region: GestureRegion::HandleBar,
            target: SURFACE,
            y: 0.0,
        });
        s.on_pointer(PointerEvent::Move {
            target: SURFACE,
            y: 300.0,
        });
        assert!(s.driver().value(ChannelKind::BackdropOpacity) < 0.0);
        assert_eq!(s.frame().backdrop_opacity, 0.0);
    }

    #[test]
    fn tick_at_uses_frame_clock() {
        let mut s = sheet(
            SheetConfig::new()
                .height(HeightSpec::Pixels(300.0))
                .timings(SheetTimings::new().backdrop(Duration::from_millis(100))),
        );
        s.open();
        let t0 = Instant::now();
        assert!(s.tick_at(t0).is_empty());
        let done = s.tick_at(t0 + Duration::from_millis(100));
        assert!(
            done.iter()
                .any(|c| c.channel == ChannelKind::BackdropOpacity)
        );
    }

    // --- Tracing -----------------------------------------------------------

    #[cfg(feature = "tracing")]
    #[derive(Default)]
    struct SheetTraceState {
        messages: Vec<String>,
    }

    #[cfg(feature = "tracing")]
    struct SheetTraceCapture {
        state: Arc<Mutex<SheetTraceState>>,
    }

    #[cfg(feature = "tracing")]
    impl<S> Layer<S> for SheetTraceCapture
    where
        S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            struct Msg {
                message: Option<String>,
            }
            impl tracing::field::Visit for Msg {
                fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                    if field.name() == "message" {
                        self.message = Some(value.to_string());
                    }
                }

                fn record_debug(
                    &mut self,
                    field: &tracing::field::Field,
                    value: &dyn std::fmt::Debug,
                ) {
                    if field.name() == "message" {
                        self.message = Some(format!("{value:?}").trim_matches('"').to_string());
                    }
                }
            }
            let mut msg = Msg { message: None };
            event.record(&mut msg);
            if let Some(message) = msg.message {
                self.state
                    .lock()
                    .expect("sheet trace lock")
                    .messages
                    .push(message);
            }
        }
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn lifecycle_events_traced() {
        let state = Arc::new(Mutex::new(SheetTraceState::default()));
        let subscriber = tracing_subscriber::registry().with(SheetTraceCapture {
            state: Arc::clone(&state),
        });
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut s = sheet(SheetConfig::default());
        s.on_surface_layout(SURFACE);
        s.mount(Box::new(NoKeyboard));
        s.open();
        s.tick(SETTLE);
        s.on_keyboard(KeyboardEvent::Show { height: 100.0 });
        s.set_viewport_height(600.0);
        drag(&mut s, 0.0, 500.0);
        s.tick(SETTLE);

        let snapshot = state.lock().expect("sheet trace lock");
        for expected in [
            "sheet.open",
            "sheet.keyboard",
            "sheet.resize",
            "gesture.capture",
            "sheet.drag.release",
            "sheet.close",
            "sheet.collapse",
        ] {
            assert!(
                snapshot.messages.iter().any(|m| m == expected),
                "expected {expected} event, saw {:?}",
                snapshot.messages
            );
        }
    }
}
