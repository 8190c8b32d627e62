//! Time-coordinate mapping.
//!
//! Pure conversion between timestamps and linear offsets for a visible
//! window and a zoom factor, independent of any rendering surface.
//!
//! # Mapping
//! - forward: `offset = hours_since(window.start, t) * zoom`
//! - inverse: `t = window.start + (offset / zoom) hours`
//!
//! The inverse rounds to whole milliseconds, so a round trip is exact to
//! within `zoom / 3_600_000` units, far below one offset unit at any
//! allowed zoom.
//!
//! Timestamps outside the window are legal and map to negative offsets or
//! offsets past the content width.

use chrono::{DateTime, Duration, Utc};

use crate::config::{TimelineConfig, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM};
use crate::models::{Operation, TimeSpan};

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Fractional hours from `origin` to `time` (negative if `time` is earlier).
#[inline]
pub fn hours_since(origin: DateTime<Utc>, time: DateTime<Utc>) -> f64 {
    (time - origin).num_milliseconds() as f64 / MS_PER_HOUR
}

/// Forward mapping: timestamp to offset.
#[inline]
pub fn forward_map(window_start: DateTime<Utc>, time: DateTime<Utc>, zoom: f64) -> f64 {
    hours_since(window_start, time) * zoom
}

/// Inverse mapping: offset to timestamp (millisecond precision).
///
/// Saturates at the representable time range.
#[inline]
pub fn inverse_map(window_start: DateTime<Utc>, offset: f64, zoom: f64) -> DateTime<Utc> {
    let ms = (offset / zoom * MS_PER_HOUR).round() as i64;
    Duration::try_milliseconds(ms)
        .and_then(|d| window_start.checked_add_signed(d))
        .unwrap_or(if ms < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

/// Normalizes zoom bounds into a usable `(lo, hi)` pair.
///
/// A bound that is not a positive finite number falls back to its default,
/// and inverted bounds are swapped.
pub fn zoom_bounds(min_zoom: f64, max_zoom: f64) -> (f64, f64) {
    let usable = |z: f64| z.is_finite() && z > 0.0;
    let min = if usable(min_zoom) { min_zoom } else { DEFAULT_MIN_ZOOM };
    let max = if usable(max_zoom) { max_zoom } else { DEFAULT_MAX_ZOOM };
    (min.min(max), min.max(max))
}

/// Clamps `zoom` into normalized bounds. A NaN zoom lands on the lower bound.
pub fn clamp_zoom(zoom: f64, min_zoom: f64, max_zoom: f64) -> f64 {
    let (lo, hi) = zoom_bounds(min_zoom, max_zoom);
    if zoom.is_nan() {
        lo
    } else {
        zoom.clamp(lo, hi)
    }
}

/// Auto-fit zoom: `clamp(available_span / total_hours, min, max)`.
///
/// Returns `None` when the operations cover no time at all.
pub fn fit_zoom(
    earliest: DateTime<Utc>,
    latest: DateTime<Utc>,
    available_span: f64,
    min_zoom: f64,
    max_zoom: f64,
) -> Option<f64> {
    let total_hours = hours_since(earliest, latest);
    if !(total_hours > 0.0 && available_span > 0.0) {
        return None;
    }
    Some(clamp_zoom(available_span / total_hours, min_zoom, max_zoom))
}

/// Part of an operation bar under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarRegion {
    /// Leading edge handle (resize start).
    StartEdge,
    /// Trailing edge handle (resize end).
    EndEdge,
    /// Anywhere else on the bar (drag).
    Body,
}

/// Visible window plus zoom, with clamping bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeScale {
    window: TimeSpan,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
}

impl TimeScale {
    /// Creates a scale with explicit bounds.
    ///
    /// The bounds go through [`zoom_bounds`] and the zoom is clamped to them.
    pub fn new(window: TimeSpan, zoom: f64, min_zoom: f64, max_zoom: f64) -> Self {
        let (min_zoom, max_zoom) = zoom_bounds(min_zoom, max_zoom);
        Self {
            window,
            zoom: clamp_zoom(zoom, min_zoom, max_zoom),
            min_zoom,
            max_zoom,
        }
    }

    /// Creates a scale at the configured default zoom.
    pub fn from_config(window: TimeSpan, config: &TimelineConfig) -> Self {
        Self::new(window, config.default_zoom, config.min_zoom, config.max_zoom)
    }

    /// Current zoom (units per hour).
    #[inline]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Visible window.
    #[inline]
    pub fn window(&self) -> TimeSpan {
        self.window
    }

    /// Zoom bounds after normalization.
    pub fn bounds(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    /// Sets the zoom, clamped to the bounds. Returns the applied value.
    ///
    /// A NaN zoom leaves the current value in place.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        if !zoom.is_nan() {
            self.zoom = clamp_zoom(zoom, self.min_zoom, self.max_zoom);
        }
        self.zoom
    }

    /// Multiplies the zoom by `factor` (clamped).
    pub fn zoom_by(&mut self, factor: f64) -> f64 {
        self.set_zoom(self.zoom * factor)
    }

    /// Replaces the visible window, keeping the zoom.
    pub fn set_window(&mut self, window: TimeSpan) {
        self.window = window;
    }

    /// Moves the window by `steps` window-lengths (negative = earlier).
    pub fn shift_window(&mut self, steps: i32) {
        let delta = self.window.duration() * steps;
        self.window = self.window.shifted(delta);
    }

    /// Offset of `time` relative to the window start.
    #[inline]
    pub fn offset_of(&self, time: DateTime<Utc>) -> f64 {
        forward_map(self.window.start, time, self.zoom)
    }

    /// Timestamp at `offset`.
    #[inline]
    pub fn time_at(&self, offset: f64) -> DateTime<Utc> {
        inverse_map(self.window.start, offset, self.zoom)
    }

    /// Length of a span in offset units.
    pub fn width_of(&self, span: &TimeSpan) -> f64 {
        span.hours() * self.zoom
    }

    /// Width of the whole window in offset units.
    pub fn content_width(&self) -> f64 {
        self.width_of(&self.window)
    }

    /// Auto-fits the zoom so the operations' total span fills `available_span`.
    ///
    /// Returns `false` and leaves the zoom untouched when there is nothing
    /// to fit.
    pub fn fit_to<'a>(
        &mut self,
        operations: impl IntoIterator<Item = &'a Operation>,
        available_span: f64,
    ) -> bool {
        let mut bounds: Option<(DateTime<Utc>, DateTime<Utc>)> = None;
        for op in operations {
            bounds = Some(match bounds {
                None => (op.start_time, op.end_time),
                Some((lo, hi)) => (lo.min(op.start_time), hi.max(op.end_time)),
            });
        }
        let Some((earliest, latest)) = bounds else {
            return false;
        };
        match fit_zoom(earliest, latest, available_span, self.min_zoom, self.max_zoom) {
            Some(zoom) => {
                self.zoom = zoom;
                true
            }
            None => false,
        }
    }

    /// Horizontal scroll offset that places `now` at `lead_margin` from the
    /// left edge. Never negative.
    pub fn scroll_offset_for(&self, now: DateTime<Utc>, lead_margin: f64) -> f64 {
        (self.offset_of(now) - lead_margin).max(0.0)
    }

    /// Rounds `time` to the nearest multiple of `minutes` counted from the
    /// window start.
    pub fn snap(&self, time: DateTime<Utc>, minutes: u32) -> DateTime<Utc> {
        if minutes == 0 {
            return time;
        }
        let step_ms = i64::from(minutes) * 60_000;
        let rel = (time - self.window.start).num_milliseconds();
        let snapped = (rel as f64 / step_ms as f64).round() as i64 * step_ms;
        Duration::try_milliseconds(snapped)
            .and_then(|d| self.window.start.checked_add_signed(d))
            .unwrap_or(time)
    }

    /// Classifies `x` against the bar of `span`.
    ///
    /// Returns `None` when `x` is outside the bar. Edge handles are
    /// `grab_width` wide, but never more than a third of the bar each so
    /// short bars can still be dragged.
    pub fn hit_test(&self, span: &TimeSpan, x: f64, grab_width: f64) -> Option<BarRegion> {
        let left = self.offset_of(span.start);
        let right = self.offset_of(span.end);
        if x < left || x > right {
            return None;
        }
        let handle = grab_width.min((right - left) / 3.0);
        if x - left <= handle {
            Some(BarRegion::StartEdge)
        } else if right - x <= handle {
            Some(BarRegion::EndEdge)
        } else {
            Some(BarRegion::Body)
        }
    }
}
