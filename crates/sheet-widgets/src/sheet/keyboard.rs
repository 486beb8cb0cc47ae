#![forbid(unsafe_code)]

//! On-screen keyboard coordination.
//!
//! The platform's keyboard notifications arrive through a [`KeyboardHost`]
//! subscription. While subscribed, [`KeyboardCoordinator::handle`] turns a
//! show/hide notification into the content height the sheet should animate
//! to. The sheet subscribes on mount and on every open, and unsubscribes on
//! every close and on unmount, so nothing reacts after a logical close.
//!
//! Notifications are only handed over while the sheet is open. A keyboard
//! height is therefore never carried across a closed period: every open
//! starts from the full resolved height, and the remembered height only
//! shapes geometry changes that happen while the sheet stays open.

use std::fmt;

/// Keyboard notification from the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyboardEvent {
    /// Keyboard appeared with the given height in pixels.
    Show { height: f64 },
    /// Keyboard went away.
    Hide,
}

/// Platform side of keyboard coordination.
pub trait KeyboardHost {
    /// Start delivering keyboard notifications.
    fn subscribe(&mut self) {}

    /// Stop delivering keyboard notifications.
    fn unsubscribe(&mut self) {}

    /// Force any active on-screen keyboard to close.
    fn dismiss(&mut self);
}

/// Host with no keyboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoKeyboard;

impl KeyboardHost for NoKeyboard {
    fn dismiss(&mut self) {}
}

/// Tracks subscription state and the visible keyboard height.
#[derive(Default)]
pub struct KeyboardCoordinator {
    host: Option<Box<dyn KeyboardHost>>,
    subscribed: bool,
    visible_height: Option<f64>,
}

impl fmt::Debug for KeyboardCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardCoordinator")
            .field("attached", &self.host.is_some())
            .field("subscribed", &self.subscribed)
            .field("visible_height", &self.visible_height)
            .finish()
    }
}

impl KeyboardCoordinator {
    /// Create a detached coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the platform host, replacing (and unsubscribing) any previous one.
    pub fn attach(&mut self, host: Box<dyn KeyboardHost>) {
        self.detach();
        self.host = Some(host);
    }

    /// Unsubscribe and drop the host.
    pub fn detach(&mut self) {
        self.unsubscribe();
        self.host = None;
    }

    /// Whether a host is attached.
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.host.is_some()
    }

    /// Whether notifications are being acted on.
    #[inline]
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Keyboard height while it is up.
    #[inline]
    pub fn keyboard_height(&self) -> Option<f64> {
        self.visible_height
    }

    /// Subscribe if a host is attached and not already subscribed.
    pub fn subscribe(&mut self) {
        if self.subscribed {
            return;
        }
        if let Some(host) = self.host.as_mut() {
            host.subscribe();
            self.subscribed = true;
        }
    }

    /// Unsubscribe and forget the keyboard height.
    pub fn unsubscribe(&mut self) {
        if self.subscribed
            && let Some(host) = self.host.as_mut()
        {
            host.unsubscribe();
        }
        self.subscribed = false;
        self.visible_height = None;
    }

    /// Ask the platform to close the keyboard.
    pub fn dismiss(&mut self) {
        if let Some(host) = self.host.as_mut() {
            host.dismiss();
        }
    }

    /// Content height for `resolved_height` given the visible keyboard.
    pub fn content_target(&self, resolved_height: f64) -> f64 {
        match self.visible_height {
            Some(kb) => (resolved_height - kb).max(0.0),
            None => resolved_height,
        }
    }

    /// React to a notification. Returns the content height to animate to,
    /// or `None` when not subscribed.
    pub fn handle(&mut self, event: KeyboardEvent, resolved_height: f64) -> Option<f64> {
        if !self.subscribed {
            return None;
        }
        match event {
            KeyboardEvent::Show { height } => {
                self.visible_height = Some(if height.is_nan() { 0.0 } else { height.max(0.0) });
            }
            KeyboardEvent::Hide => self.visible_height = None,
        }
        Some(self.content_target(resolved_height))
    }
}
