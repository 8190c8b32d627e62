//! Vertical scroll synchronization between the label pane and the
//! timeline pane.
//!
//! # Handshake
//! A scroll event from either pane, while not synchronizing, sets the
//! guard, records the offset, and returns a [`ScrollCommand`] telling the
//! host to move the other pane. The echo scroll event that the host's
//! programmatic scroll produces arrives while the guard is set and is only
//! recorded. [`ScrollSync::on_frame`] clears the guard on the next tick.
//!
//! Horizontal scrolling belongs to the timeline pane alone.

use tracing::trace;

/// One of the two linked panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    /// Resource names on the left.
    Labels,
    /// Operation bars on the right.
    Timeline,
}

impl Pane {
    /// The linked pane.
    pub fn other(self) -> Pane {
        match self {
            Pane::Labels => Pane::Timeline,
            Pane::Timeline => Pane::Labels,
        }
    }
}

/// Instruction for the host: set `pane`'s vertical offset to `top`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollCommand {
    pub pane: Pane,
    pub top: f64,
}

/// Guarded two-pane scroll state.
#[derive(Debug, Clone, Default)]
pub struct ScrollSync {
    labels_top: f64,
    timeline_top: f64,
    timeline_left: f64,
    syncing: bool,
}

impl ScrollSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles a vertical scroll event from `source`.
    ///
    /// Returns the command to apply to the other pane, or `None` when the
    /// event is an echo of a sync already in progress.
    pub fn on_scroll(&mut self, source: Pane, top: f64) -> Option<ScrollCommand> {
        self.set_top(source, top);
        if self.syncing {
            trace!(?source, top, "scroll echo ignored");
            return None;
        }
        self.syncing = true;
        let target = source.other();
        self.set_top(target, top);
        Some(ScrollCommand { pane: target, top })
    }

    /// Clears the guard. Call once per frame.
    pub fn on_frame(&mut self) {
        self.syncing = false;
    }

    /// Records a horizontal scroll of the timeline pane.
    pub fn on_horizontal_scroll(&mut self, left: f64) {
        self.timeline_left = left.max(0.0);
    }

    /// Sets the horizontal offset directly (initial "now" positioning).
    pub fn set_left(&mut self, left: f64) {
        self.timeline_left = left.max(0.0);
    }

    /// Vertical offset of `pane`.
    pub fn top(&self, pane: Pane) -> f64 {
        match pane {
            Pane::Labels => self.labels_top,
            Pane::Timeline => self.timeline_top,
        }
    }

    /// Horizontal offset of the timeline pane.
    pub fn left(&self) -> f64 {
        self.timeline_left
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing
    }

    fn set_top(&mut self, pane: Pane, top: f64) {
        match pane {
            Pane::Labels => self.labels_top = top,
            Pane::Timeline => self.timeline_top = top,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drives the sync like a host would: apply commands and feed back the
    /// resulting echo events, counting steps until quiescent.
    fn drive(sync: &mut ScrollSync, source: Pane, top: f64) -> usize {
        let mut steps = 0;
        let mut pending = sync.on_scroll(source, top);
        while let Some(cmd) = pending {
            steps += 1;
            assert!(steps < 10, "scroll echo did not terminate");
            pending = sync.on_scroll(cmd.pane, cmd.top);
        }
        sync.on_frame();
        steps
    }

    #[test]
    fn test_labels_scroll_moves_timeline() {
        let mut sync = ScrollSync::new();
        let before = sync.top(Pane::Timeline);
        let steps = drive(&mut sync, Pane::Labels, 120.0);
        assert_eq!(steps, 1);
        assert_eq!(sync.top(Pane::Timeline) - before, 120.0);
        assert_eq!(sync.top(Pane::Labels), 120.0);
    }

    #[test]
    fn test_timeline_scroll_moves_labels() {
        let mut sync = ScrollSync::new();
        drive(&mut sync, Pane::Labels, 40.0);
        let steps = drive(&mut sync, Pane::Timeline, 40.0 + 75.0);
        assert_eq!(steps, 1);
        assert_eq!(sync.top(Pane::Labels), 115.0);
    }

    #[test]
    fn test_echo_is_suppressed_until_frame() {
        let mut sync = ScrollSync::new();
        let cmd = sync.on_scroll(Pane::Labels, 30.0).unwrap();
        assert_eq!(cmd, ScrollCommand { pane: Pane::Timeline, top: 30.0 });
        assert!(sync.is_syncing());
        assert_eq!(sync.on_scroll(Pane::Timeline, 30.0), None);

        sync.on_frame();
        assert!(!sync.is_syncing());
        assert!(sync.on_scroll(Pane::Timeline, 60.0).is_some());
    }

    #[test]
    fn test_horizontal_scroll_is_independent() {
        let mut sync = ScrollSync::new();
        sync.on_horizontal_scroll(300.0);
        assert_eq!(sync.left(), 300.0);
        assert_eq!(sync.top(Pane::Labels), 0.0);
        assert_eq!(sync.top(Pane::Timeline), 0.0);
        assert!(!sync.is_syncing());

        sync.set_left(-5.0);
        assert_eq!(sync.left(), 0.0);
    }
}
