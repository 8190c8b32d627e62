//! Timeline view configuration.
//!
//! All lengths are in offset units (the host decides whether a unit is a
//! pixel, a point, or a terminal cell). Zoom is expressed in units per hour.

use serde::{Deserialize, Serialize};

/// Zoom bound used when the configured minimum is unusable.
pub(crate) const DEFAULT_MIN_ZOOM: f64 = 10.0;
/// Zoom bound used when the configured maximum is unusable.
pub(crate) const DEFAULT_MAX_ZOOM: f64 = 200.0;

/// Configuration for a [`TimelineView`](crate::view::TimelineView).
///
/// Deserializes with defaults for missing fields, so a host can keep a
/// partial JSON object:
///
/// ```
/// use u_timeline::config::TimelineConfig;
///
/// let config = TimelineConfig::from_json(r#"{"rowHeight": 32.0, "snapMinutes": 15}"#).unwrap();
/// assert_eq!(config.row_height, 32.0);
/// assert_eq!(config.snap_minutes, Some(15));
/// assert_eq!(config.min_zoom, 10.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineConfig {
    /// Lower zoom bound (units per hour).
    pub min_zoom: f64,
    /// Upper zoom bound (units per hour).
    pub max_zoom: f64,
    /// Zoom on mount and after `reset_zoom`.
    pub default_zoom: f64,
    /// Multiplicative step for zoom in / zoom out.
    pub zoom_step: f64,
    /// Height of one lane.
    pub row_height: f64,
    /// Distance kept between the left edge and "now" on initial scroll.
    pub now_lead_margin: f64,
    /// Width of the resize handle at each end of a bar.
    pub edge_grab_width: f64,
    /// Round preview times to this many minutes. `None` = no snapping.
    pub snap_minutes: Option<u32>,
    /// Duration for records that carry neither an end time nor a duration.
    pub default_duration_minutes: i64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            default_zoom: 60.0,
            zoom_step: 1.25,
            row_height: 50.0,
            now_lead_margin: 120.0,
            edge_grab_width: 8.0,
            snap_minutes: None,
            default_duration_minutes: 60,
        }
    }
}

impl TimelineConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sets the zoom bounds.
    pub fn with_zoom_bounds(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    /// Sets the initial zoom.
    pub fn with_default_zoom(mut self, zoom: f64) -> Self {
        self.default_zoom = zoom;
        self
    }

    /// Sets the lane height.
    pub fn with_row_height(mut self, row_height: f64) -> Self {
        self.row_height = row_height;
        self
    }

    /// Sets the "now" lead margin.
    pub fn with_now_lead_margin(mut self, margin: f64) -> Self {
        self.now_lead_margin = margin;
        self
    }

    /// Enables snapping of preview times.
    pub fn with_snap_minutes(mut self, minutes: u32) -> Self {
        self.snap_minutes = Some(minutes);
        self
    }

    /// Checks the configuration for values the view cannot work with.
    ///
    /// Returns every problem found; an empty list means the config is usable.
    /// The view still mounts with a problematic config: unusable zoom bounds
    /// are normalized by [`TimeScale`](crate::timeline::TimeScale).
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if !(self.min_zoom > 0.0 && self.min_zoom < self.max_zoom) {
            problems.push(format!(
                "zoom bounds must satisfy 0 < min < max (got {} .. {})",
                self.min_zoom, self.max_zoom
            ));
        }
        if self.default_zoom < self.min_zoom || self.default_zoom > self.max_zoom {
            problems.push(format!(
                "default zoom {} outside bounds {} .. {}",
                self.default_zoom, self.min_zoom, self.max_zoom
            ));
        }
        if self.zoom_step <= 1.0 {
            problems.push(format!("zoom step must be > 1 (got {})", self.zoom_step));
        }
        if self.row_height <= 0.0 {
            problems.push(format!("row height must be positive (got {})", self.row_height));
        }
        if self.edge_grab_width < 0.0 {
            problems.push("edge grab width must not be negative".to_string());
        }
        if self.snap_minutes == Some(0) {
            problems.push("snap minutes must be positive when set".to_string());
        }
        if self.default_duration_minutes <= 0 {
            problems.push("default duration must be positive".to_string());
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TimelineConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.min_zoom, 10.0);
        assert_eq!(config.max_zoom, 200.0);
    }

    #[test]
    fn test_validate_reports_all_problems() {
        let config = TimelineConfig::default()
            .with_zoom_bounds(100.0, 50.0)
            .with_row_height(0.0);
        let problems = config.validate();
        // bounds, default outside bounds, row height
        assert_eq!(problems.len(), 3);
        assert!(problems.iter().any(|p| p.contains("row height")));
    }

    #[test]
    fn test_from_json_partial() {
        let config = TimelineConfig::from_json(r#"{"maxZoom": 120.0}"#).unwrap();
        assert_eq!(config.max_zoom, 120.0);
        assert_eq!(config.row_height, 50.0);
        assert!(TimelineConfig::from_json("not json").is_err());
    }
}
