#![forbid(unsafe_code)]

//! Render delegates and per-frame snapshots.
//!
//! Drawing is the host's job. The sheet hands each delegate a [`SheetFrame`]
//! with the current animated geometry and the delegate produces whatever view
//! type the host renders. [`DefaultHandleBar`] and [`DefaultBackdrop`] cover
//! the common case.

use super::SheetState;

/// Straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Scale alpha by `opacity` (clamped to `[0, 1]`).
    pub fn with_opacity(self, opacity: f64) -> Self {
        let o = if opacity.is_nan() {
            0.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
        Self {
            a: (f64::from(self.a) * o).round() as u8,
            ..self
        }
    }
}

/// Where a custom backdrop sits relative to the sheet body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum BackdropPosition {
    /// Full container, underneath the body.
    #[default]
    BehindContent,
    /// Only the region above the body.
    TopOfContent,
}

/// Current animated geometry handed to render delegates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetFrame {
    /// Outer wrapper height.
    pub container_height: f64,
    /// Sheet body height.
    pub content_height: f64,
    /// Vertical translation of the body.
    pub translate_y: f64,
    /// Backdrop opacity clamped to `[0, 1]`.
    pub backdrop_opacity: f64,
    /// Configured backdrop fill, before opacity.
    pub backdrop_color: Rgba,
}

impl SheetFrame {
    /// Top edge of the body, measured from the top of the wrapper.
    pub fn content_top(&self) -> f64 {
        (self.container_height - self.content_height).max(0.0) + self.translate_y
    }
}

/// A capability that turns the current frame into a host view.
pub trait RenderDelegate {
    /// The view type the host renders.
    type View;

    /// Produce the view for this frame.
    fn render(&self, frame: &SheetFrame) -> Self::View;
}

/// Handle bar drawn by [`DefaultHandleBar`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleBarView {
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub color: Rgba,
    /// Vertical offset, following the body.
    pub top: f64,
}

/// Default pill-shaped handle bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefaultHandleBar {
    pub width: f64,
    pub height: f64,
    pub color: Rgba,
}

impl Default for DefaultHandleBar {
    fn default() -> Self {
        Self {
            width: 40.0,
            height: 5.0,
            color: Rgba::rgb(0xCC, 0xCC, 0xCC),
        }
    }
}

impl RenderDelegate for DefaultHandleBar {
    type View = HandleBarView;

    fn render(&self, frame: &SheetFrame) -> HandleBarView {
        HandleBarView {
            width: self.width,
            height: self.height,
            radius: self.height / 2.0,
            color: self.color,
            top: frame.content_top(),
        }
    }
}

/// Backdrop drawn by [`DefaultBackdrop`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackdropView {
    /// Color with alpha already scaled by the frame opacity.
    pub color: Rgba,
    pub opacity: f64,
}

/// Default flat dimming layer.
///
/// Fills with the frame's configured color unless `color` overrides it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DefaultBackdrop {
    pub color: Option<Rgba>,
}

impl DefaultBackdrop {
    /// Backdrop that ignores the configured color.
    pub const fn with_color(color: Rgba) -> Self {
        Self { color: Some(color) }
    }
}

impl RenderDelegate for DefaultBackdrop {
    type View = BackdropView;

    fn render(&self, frame: &SheetFrame) -> BackdropView {
        let color = self.color.unwrap_or(frame.backdrop_color);
        BackdropView {
            color: color.with_opacity(frame.backdrop_opacity),
            opacity: frame.backdrop_opacity,
        }
    }
}

/// One drawable layer, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SheetLayer {
    /// Dimming layer spanning `[top, top + height)`.
    Backdrop { top: f64, height: f64 },
    /// Sheet body spanning `[top, top + height)`.
    Content { top: f64, height: f64 },
    /// Handle bar at the top of the body.
    HandleBar { top: f64 },
}

/// Snapshot of everything a host needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetView {
    pub frame: SheetFrame,
    pub state: SheetState,
    pub backdrop_visible: bool,
    pub handle_bar_visible: bool,
    pub backdrop_position: BackdropPosition,
}

impl SheetView {
    /// Whether anything is on screen.
    pub fn is_visible(&self) -> bool {
        self.frame.container_height > 0.0
    }

    /// Vertical span `(top, height)` of the backdrop.
    pub fn backdrop_span(&self) -> (f64, f64) {
        match self.backdrop_position {
            BackdropPosition::BehindContent => (0.0, self.frame.container_height),
            BackdropPosition::TopOfContent => (0.0, self.frame.content_top().max(0.0)),
        }
    }

    /// Whether a press at `y` lands on the backdrop rather than the body.
    pub fn hits_backdrop(&self, y: f64) -> bool {
        self.backdrop_visible && y >= 0.0 && y < self.frame.content_top()
    }

    /// Drawable layers, bottom to top.
    pub fn layers(&self) -> Vec<SheetLayer> {
        let mut layers = Vec::with_capacity(3);
        if !self.is_visible() {
            return layers;
        }
        if self.backdrop_visible {
            let (top, height) = self.backdrop_span();
            layers.push(SheetLayer::Backdrop { top, height });
        }
        let top = self.frame.content_top();
        layers.push(SheetLayer::Content {
            top,
            height: self.frame.content_height,
        });
        if self.handle_bar_visible {
            layers.push(SheetLayer::HandleBar { top });
        }
        layers
    }
}
