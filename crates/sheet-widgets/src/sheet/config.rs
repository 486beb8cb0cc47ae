#![forbid(unsafe_code)]

//! Sheet configuration surface.

use sheet_core::{
    AnimationStyle, ArbiterConfig, ContainerSpec, HANDLE_BAR_ALLOWANCE, HeightSpec, SheetTimings,
};

use super::render::{BackdropPosition, Rgba};

/// Configuration for a [`BottomSheet`](super::BottomSheet).
///
/// Every option has a safe default; build with the chained setters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SheetConfig {
    /// Visual style of open/close and drag transitions.
    pub animation_style: AnimationStyle,
    /// Declared sheet height.
    pub height: HeightSpec,
    /// Declared outer container height.
    pub container: ContainerSpec,
    /// Hide the handle bar (and its chrome allowance for `Auto` heights).
    pub hide_handle_bar: bool,
    /// Chrome reserved by a visible handle bar for `Auto` heights.
    pub handle_bar_allowance: f64,
    /// Never capture drags on the sheet body.
    pub disable_body_panning: bool,
    /// Never capture drags on the handle bar.
    pub disable_handle_bar_panning: bool,
    /// Close when a drag is released past a third of the height.
    pub close_on_drag_down: bool,
    /// Close when the backdrop is pressed.
    pub close_on_backdrop_press: bool,
    /// Close on the platform back button.
    pub close_on_back_press: bool,
    /// Suppress the backdrop; the wrapper then only covers the sheet.
    pub hide_backdrop: bool,
    /// Backdrop fill.
    pub backdrop_color: Rgba,
    /// Placement of a custom backdrop.
    pub backdrop_position: BackdropPosition,
    /// Transition durations.
    pub timings: SheetTimings,
    /// Switch to the fade style when the host reports reduced motion.
    pub respect_reduced_motion: bool,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            animation_style: AnimationStyle::Slide,
            height: HeightSpec::Auto,
            container: ContainerSpec::Viewport,
            hide_handle_bar: false,
            handle_bar_allowance: HANDLE_BAR_ALLOWANCE,
            disable_body_panning: false,
            disable_handle_bar_panning: false,
            close_on_drag_down: true,
            close_on_backdrop_press: true,
            close_on_back_press: true,
            hide_backdrop: false,
            backdrop_color: Rgba::rgba(0, 0, 0, 0x80),
            backdrop_position: BackdropPosition::BehindContent,
            timings: SheetTimings::default(),
            respect_reduced_motion: true,
        }
    }
}

impl SheetConfig {
    /// Create a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the animation style.
    pub fn animation_style(mut self, style: AnimationStyle) -> Self {
        self.animation_style = style;
        self
    }

    /// Set the sheet height.
    pub fn height(mut self, height: HeightSpec) -> Self {
        self.height = height;
        self
    }

    /// Set the outer container height.
    pub fn container(mut self, container: ContainerSpec) -> Self {
        self.container = container;
        self
    }

    /// Hide or show the handle bar.
    pub fn hide_handle_bar(mut self, hide: bool) -> Self {
        self.hide_handle_bar = hide;
        self
    }

    /// Set the handle bar chrome allowance.
    pub fn handle_bar_allowance(mut self, allowance: f64) -> Self {
        self.handle_bar_allowance = allowance.max(0.0);
        self
    }

    /// Disable body drags.
    pub fn disable_body_panning(mut self, disable: bool) -> Self {
        self.disable_body_panning = disable;
        self
    }

    /// Disable handle bar drags.
    pub fn disable_handle_bar_panning(mut self, disable: bool) -> Self {
        self.disable_handle_bar_panning = disable;
        self
    }

    /// Enable or disable drag-to-close.
    pub fn close_on_drag_down(mut self, close: bool) -> Self {
        self.close_on_drag_down = close;
        self
    }

    /// Enable or disable close on backdrop press.
    pub fn close_on_backdrop_press(mut self, close: bool) -> Self {
        self.close_on_backdrop_press = close;
        self
    }

    /// Enable or disable close on the back button.
    pub fn close_on_back_press(mut self, close: bool) -> Self {
        self.close_on_back_press = close;
        self
    }

    /// Suppress the backdrop.
    pub fn hide_backdrop(mut self, hide: bool) -> Self {
        self.hide_backdrop = hide;
        self
    }

    /// Set the backdrop color.
    pub fn backdrop_color(mut self, color: Rgba) -> Self {
        self.backdrop_color = color;
        self
    }

    /// Set the custom backdrop position.
    pub fn backdrop_position(mut self, position: BackdropPosition) -> Self {
        self.backdrop_position = position;
        self
    }

    /// Set transition timings.
    pub fn timings(mut self, timings: SheetTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Set whether to respect the reduced-motion preference.
    pub fn respect_reduced_motion(mut self, respect: bool) -> Self {
        self.respect_reduced_motion = respect;
        self
    }

    /// Style actually used, given the host's reduced-motion preference.
    pub fn effective_style(&self, reduced_motion: bool) -> AnimationStyle {
        if reduced_motion && self.respect_reduced_motion {
            AnimationStyle::Fade
        } else {
            self.animation_style
        }
    }

    /// Gesture arbitration switches derived from this configuration.
    pub fn arbiter(&self) -> ArbiterConfig {
        ArbiterConfig {
            disable_body_panning: self.disable_body_panning,
            disable_handle_bar_panning: self.disable_handle_bar_panning,
            close_on_drag_down: self.close_on_drag_down,
        }
    }
}
