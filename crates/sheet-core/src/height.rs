#![forbid(unsafe_code)]

//! Height specifications and their resolution to concrete pixel values.
//!
//! A sheet's height is declared by the host as a [`HeightSpec`] (pixels, a
//! percentage of the outer container, or `Auto`). [`resolve`] turns that
//! declaration into a live pixel value against the current outer container
//! height. The outer container itself is tracked by [`ContainerHeight`],
//! which follows the viewport across orientation changes unless the host
//! pinned it.
//!
//! # Invariants
//!
//! 1. `resolve(..)` always returns a value in `[0, container_height]`.
//! 2. With `Auto`, a visible handle bar reserves a fixed chrome allowance, so
//!    the visible-bar height is strictly smaller than the hidden-bar height
//!    for any positive container.
//! 3. A percent container is measured at most once; afterwards it behaves as
//!    a plain pixel value for the rest of the session.
//!
//! # Failure Modes
//!
//! - NaN or negative container heights are treated as 0.
//! - Out-of-range specs are clamped, never rejected.

use std::fmt;
use std::str::FromStr;

use crate::error::HeightParseError;

/// Pixels reserved for the handle bar chrome when the height is `Auto`.
pub const HANDLE_BAR_ALLOWANCE: f64 = 24.0;

// ---------------------------------------------------------------------------
// HeightSpec
// ---------------------------------------------------------------------------

/// Declarative sheet height supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawHeight", into = "RawHeight")
)]
pub enum HeightSpec {
    /// Absolute height in pixels.
    Pixels(f64),
    /// Percentage (0..100) of the outer container height.
    Percent(f64),
    /// Fill the outer container, minus handle bar chrome when it is shown.
    #[default]
    Auto,
}

impl HeightSpec {
    /// Resolve against a container height with the default chrome allowance.
    #[must_use]
    pub fn resolve(self, container_height: f64, handle_bar_hidden: bool) -> f64 {
        resolve(self, container_height, handle_bar_hidden)
    }
}

impl FromStr for HeightSpec {
    type Err = HeightParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(HeightParseError::Empty);
        }
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        if let Some(pct) = trimmed.strip_suffix('%') {
            return parse_number(pct, trimmed).map(Self::Percent);
        }
        let px = trimmed.strip_suffix("px").unwrap_or(trimmed);
        parse_number(px, trimmed).map(Self::Pixels)
    }
}

impl fmt::Display for HeightSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(n) => write!(f, "{n}"),
            Self::Percent(p) => write!(f, "{p}%"),
            Self::Auto => f.write_str("auto"),
        }
    }
}

fn parse_number(number: &str, input: &str) -> Result<f64, HeightParseError> {
    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| HeightParseError::invalid(input))?;
    if !value.is_finite() {
        return Err(HeightParseError::NonFinite {
            input: input.to_string(),
        });
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Convert a height spec into pixels for the given container.
///
/// Uses [`HANDLE_BAR_ALLOWANCE`] as the `Auto` chrome reservation.
#[must_use]
pub fn resolve(spec: HeightSpec, container_height: f64, handle_bar_hidden: bool) -> f64 {
    resolve_with_allowance(
        spec,
        container_height,
        handle_bar_hidden,
        HANDLE_BAR_ALLOWANCE,
    )
}

/// Like [`resolve`], with an explicit chrome allowance for `Auto`.
#[must_use]
pub fn resolve_with_allowance(
    spec: HeightSpec,
    container_height: f64,
    handle_bar_hidden: bool,
    allowance: f64,
) -> f64 {
    let container = non_negative(container_height);
    let raw = match spec {
        HeightSpec::Pixels(n) => n,
        HeightSpec::Percent(p) => container * p / 100.0,
        HeightSpec::Auto if handle_bar_hidden => container,
        HeightSpec::Auto => container - non_negative(allowance),
    };
    if raw.is_nan() {
        0.0
    } else {
        raw.clamp(0.0, container)
    }
}

#[inline]
fn non_negative(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.max(0.0) }
}

// ---------------------------------------------------------------------------
// Outer container
// ---------------------------------------------------------------------------

/// Declarative outer container height supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawHeight", into = "RawHeight")
)]
pub enum ContainerSpec {
    /// Track the viewport height, including across orientation changes.
    #[default]
    Viewport,
    /// Fixed height in pixels.
    Pixels(f64),
    /// Percentage of the viewport, realized once through a layout measurement.
    Percent(f64),
}

impl FromStr for ContainerSpec {
    type Err = HeightParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("viewport") {
            return Ok(Self::Viewport);
        }
        match trimmed.parse::<HeightSpec>()? {
            HeightSpec::Pixels(n) => Ok(Self::Pixels(n)),
            HeightSpec::Percent(p) => Ok(Self::Percent(p)),
            HeightSpec::Auto => Ok(Self::Viewport),
        }
    }
}

/// Live outer container height derived from a [`ContainerSpec`].
///
/// Starts at the viewport height. A `Percent` spec keeps reporting the
/// viewport until the host delivers the one-shot layout measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerHeight {
    spec: ContainerSpec,
    viewport: f64,
    measured: Option<f64>,
}

impl ContainerHeight {
    /// Create a tracker for `spec` within a viewport of the given height.
    #[must_use]
    pub fn new(spec: ContainerSpec, viewport_height: f64) -> Self {
        Self {
            spec,
            viewport: non_negative(viewport_height),
            measured: None,
        }
    }

    /// The declarative spec.
    #[inline]
    #[must_use]
    pub fn spec(&self) -> ContainerSpec {
        self.spec
    }

    /// Current viewport height.
    #[inline]
    #[must_use]
    pub fn viewport(&self) -> f64 {
        self.viewport
    }

    /// Current outer container height in pixels.
    #[must_use]
    pub fn current(&self) -> f64 {
        match self.spec {
            ContainerSpec::Viewport => self.viewport,
            ContainerSpec::Pixels(n) => non_negative(n),
            ContainerSpec::Percent(_) => self.measured.unwrap_or(self.viewport),
        }
    }

    /// Whether a percent spec is still waiting for its measurement.
    #[must_use]
    pub fn awaiting_measurement(&self) -> bool {
        matches!(self.spec, ContainerSpec::Percent(_)) && self.measured.is_none()
    }

    /// Expected measurement for a percent spec, for hosts that size the
    /// measuring view themselves.
    #[must_use]
    pub fn layout_hint(&self) -> Option<f64> {
        match self.spec {
            ContainerSpec::Percent(p) => {
                Some((self.viewport * p / 100.0).clamp(0.0, self.viewport))
            }
            ContainerSpec::Viewport | ContainerSpec::Pixels(_) => None,
        }
    }

    /// Update the viewport height. Returns `true` if `current()` changed.
    pub fn set_viewport(&mut self, viewport_height: f64) -> bool {
        let before = self.current();
        self.viewport = non_negative(viewport_height);
        self.current() != before
    }

    /// Deliver the layout measurement for a percent spec.
    ///
    /// Only the first measurement is taken; later ones and measurements for
    /// other specs are ignored. Returns `true` if `current()` changed.
    pub fn measure(&mut self, measured_height: f64) -> bool {
        if !self.awaiting_measurement() {
            return false;
        }
        let before = self.current();
        self.measured = Some(non_negative(measured_height));
        self.current() != before
    }

    /// Replace the spec. A different spec discards any prior measurement.
    /// Returns `true` if `current()` changed.
    pub fn set_spec(&mut self, spec: ContainerSpec) -> bool {
        if spec == self.spec {
            return false;
        }
        let before = self.current();
        self.spec = spec;
        self.measured = None;
        self.current() != before
    }
}

// ---------------------------------------------------------------------------
// Serde bridge
// ---------------------------------------------------------------------------

/// Host-facing representation: a bare number or a string such as `"50%"`.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum RawHeight {
    Number(f64),
    Text(String),
}

#[cfg(feature = "serde")]
impl TryFrom<RawHeight> for HeightSpec {
    type Error = HeightParseError;

    fn try_from(raw: RawHeight) -> Result<Self, Self::Error> {
        match raw {
            RawHeight::Number(n) => Ok(Self::Pixels(n)),
            RawHeight::Text(s) => s.parse(),
        }
    }
}

#[cfg(feature = "serde")]
impl From<HeightSpec> for RawHeight {
    fn from(spec: HeightSpec) -> Self {
        match spec {
            HeightSpec::Pixels(n) => Self::Number(n),
            other => Self::Text(other.to_string()),
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<RawHeight> for ContainerSpec {
    type Error = HeightParseError;

    fn try_from(raw: RawHeight) -> Result<Self, Self::Error> {
        match raw {
            RawHeight::Number(n) => Ok(Self::Pixels(n)),
            RawHeight::Text(s) => s.parse(),
        }
    }
}

#[cfg(feature = "serde")]
impl From<ContainerSpec> for RawHeight {
    fn from(spec: ContainerSpec) -> Self {
        match spec {
            ContainerSpec::Viewport => Self::Text("viewport".to_string()),
            ContainerSpec::Pixels(n) => Self::Number(n),
            ContainerSpec::Percent(p) => Self::Text(format!("{p}%")),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_clamped_to_container() {
        assert_eq!(resolve(HeightSpec::Pixels(300.0), 800.0, false), 300.0);
        assert_eq!(resolve(HeightSpec::Pixels(1200.0), 800.0, false), 800.0);
        assert_eq!(resolve(HeightSpec::Pixels(-10.0), 800.0, false), 0.0);
    }

    #[test]
    fn percent_of_container() {
        assert_eq!(resolve(HeightSpec::Percent(50.0), 800.0, false), 400.0);
        assert_eq!(resolve(HeightSpec::Percent(150.0), 800.0, false), 800.0);
        assert_eq!(resolve(HeightSpec::Percent(-5.0), 800.0, false), 0.0);
    }

    #[test]
    fn auto_reserves_handle_bar_chrome() {
        let visible = resolve(HeightSpec::Auto, 800.0, false);
        let hidden = resolve(HeightSpec::Auto, 800.0, true);
        assert_eq!(hidden, 800.0);
        assert_eq!(visible, 800.0 - HANDLE_BAR_ALLOWANCE);
        assert!(visible < hidden);
    }

    #[test]
    fn auto_in_tiny_container_bottoms_out() {
        assert_eq!(resolve(HeightSpec::Auto, 10.0, false), 0.0);
    }

    #[test]
    fn custom_allowance() {
        let h = resolve_with_allowance(HeightSpec::Auto, 500.0, false, 40.0);
        assert_eq!(h, 460.0);
    }

    #[test]
    fn nan_container_is_zero() {
        assert_eq!(resolve(HeightSpec::Pixels(100.0), f64::NAN, false), 0.0);
        assert_eq!(resolve(HeightSpec::Auto, -50.0, true), 0.0);
    }

    #[test]
    fn parse_height_strings() {
        assert_eq!("50%".parse::<HeightSpec>(), Ok(HeightSpec::Percent(50.0)));
        assert_eq!(" 12.5 % ".parse::<HeightSpec>(), Ok(HeightSpec::Percent(12.5)));
        assert_eq!("300".parse::<HeightSpec>(), Ok(HeightSpec::Pixels(300.0)));
        assert_eq!("300px".parse::<HeightSpec>(), Ok(HeightSpec::Pixels(300.0)));
        assert_eq!("AUTO".parse::<HeightSpec>(), Ok(HeightSpec::Auto));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!("".parse::<HeightSpec>(), Err(HeightParseError::Empty));
        assert!(matches!(
            "tall".parse::<HeightSpec>(),
            Err(HeightParseError::InvalidNumber { .. })
        ));
        assert!(matches!(
            "inf%".parse::<HeightSpec>(),
            Err(HeightParseError::NonFinite { .. })
        ));
    }

    #[test]
    fn display_matches_parse() {
        for spec in [
            HeightSpec::Pixels(320.0),
            HeightSpec::Percent(40.0),
            HeightSpec::Auto,
        ] {
            assert_eq!(spec.to_string().parse::<HeightSpec>(), Ok(spec));
        }
    }

    #[test]
    fn container_tracks_viewport() {
        let mut c = ContainerHeight::new(ContainerSpec::Viewport, 800.0);
        assert_eq!(c.current(), 800.0);
        assert!(c.set_viewport(400.0));
        assert_eq!(c.current(), 400.0);
        assert!(!c.set_viewport(400.0));
    }

    #[test]
    fn fixed_container_ignores_viewport() {
        let mut c = ContainerHeight::new(ContainerSpec::Pixels(600.0), 800.0);
        assert!(!c.set_viewport(1024.0));
        assert_eq!(c.current(), 600.0);
    }

    #[test]
    fn percent_container_measured_once() {
        let mut c = ContainerHeight::new(ContainerSpec::Percent(50.0), 800.0);
        assert!(c.awaiting_measurement());
        assert_eq!(c.current(), 800.0);
        assert_eq!(c.layout_hint(), Some(400.0));

        assert!(c.measure(400.0));
        assert_eq!(c.current(), 400.0);
        assert!(!c.awaiting_measurement());

        assert!(!c.measure(123.0));
        assert!(!c.set_viewport(300.0));
        assert_eq!(c.current(), 400.0);
    }

    #[test]
    fn measurement_ignored_for_non_percent() {
        let mut c = ContainerHeight::new(ContainerSpec::Viewport, 800.0);
        assert!(!c.measure(100.0));
        assert_eq!(c.current(), 800.0);
    }

    #[test]
    fn changing_spec_drops_measurement() {
        let mut c = ContainerHeight::new(ContainerSpec::Percent(50.0), 800.0);
        c.measure(400.0);
        assert!(c.set_spec(ContainerSpec::Percent(25.0)));
        assert!(c.awaiting_measurement());
        assert_eq!(c.current(), 800.0);
        assert!(!c.set_spec(ContainerSpec::Percent(25.0)));
    }

    #[test]
    fn parse_container_strings() {
        assert_eq!(
            "viewport".parse::<ContainerSpec>(),
            Ok(ContainerSpec::Viewport)
        );
        assert_eq!(
            "75%".parse::<ContainerSpec>(),
            Ok(ContainerSpec::Percent(75.0))
        );
        assert_eq!(
            "640".parse::<ContainerSpec>(),
            Ok(ContainerSpec::Pixels(640.0))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_accepts_numbers_and_percent_strings() {
        let px: HeightSpec = serde_json::from_str("300").expect("pixels");
        assert_eq!(px, HeightSpec::Pixels(300.0));
        let pct: HeightSpec = serde_json::from_str("\"50%\"").expect("percent");
        assert_eq!(pct, HeightSpec::Percent(50.0));
        let auto: HeightSpec = serde_json::from_str("\"auto\"").expect("auto");
        assert_eq!(auto, HeightSpec::Auto);
        assert!(serde_json::from_str::<HeightSpec>("\"huge\"").is_err());

        let json = serde_json::to_string(&HeightSpec::Percent(40.0)).expect("serialize");
        assert_eq!(json, "\"40%\"");
    }
}
