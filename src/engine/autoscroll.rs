//! Edge-proximity auto-scroll decision.
//!
//! Only the direction is decided here; step size and repeat cadence belong to
//! whoever renders and owns the viewport.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollDirection {
    /// Toward earlier dates (left edge).
    Backward,
    /// Toward later dates (right edge).
    Forward,
}

impl ScrollDirection {
    /// Sign to apply to a day step.
    pub fn sign(&self) -> i64 {
        match self {
            ScrollDirection::Backward => -1,
            ScrollDirection::Forward => 1,
        }
    }
}

/// Horizontal extent of the visible content area, in content pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportBounds {
    pub left: i32,
    pub right: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutoScrollDecision {
    pub should_scroll: bool,
    pub direction: Option<ScrollDirection>,
}

impl AutoScrollDecision {
    pub const IDLE: Self = Self {
        should_scroll: false,
        direction: None,
    };

    fn toward(direction: ScrollDirection) -> Self {
        Self {
            should_scroll: true,
            direction: Some(direction),
        }
    }
}

/// Decides whether a drag near a viewport edge should scroll the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoScroller {
    margin_px: i32,
}

impl AutoScroller {
    pub fn new(margin_px: i32) -> Self {
        Self {
            margin_px: margin_px.max(0),
        }
    }

    pub fn margin_px(&self) -> i32 {
        self.margin_px
    }

    /// Evaluate one pointer position. A pointer past an edge still counts as
    /// near it. When both edges are within the margin the nearer one wins.
    pub fn evaluate(&self, pointer_px: i32, bounds: ViewportBounds) -> AutoScrollDecision {
        let to_left = pointer_px - bounds.left;
        let to_right = bounds.right - pointer_px;
        let near_left = to_left <= self.margin_px;
        let near_right = to_right <= self.margin_px;
        match (near_left, near_right) {
            (true, true) if to_right < to_left => AutoScrollDecision::toward(ScrollDirection::Forward),
            (true, _) => AutoScrollDecision::toward(ScrollDirection::Backward),
            (false, true) => AutoScrollDecision::toward(ScrollDirection::Forward),
            (false, false) => AutoScrollDecision::IDLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: ViewportBounds = ViewportBounds { left: 100, right: 900 };

    #[test]
    fn middle_does_not_scroll() {
        assert_eq!(AutoScroller::new(60).evaluate(500, BOUNDS), AutoScrollDecision::IDLE);
    }

    #[test]
    fn near_edges_scroll_toward_them() {
        let s = AutoScroller::new(60);
        assert_eq!(s.evaluate(150, BOUNDS).direction, Some(ScrollDirection::Backward));
        assert_eq!(s.evaluate(845, BOUNDS).direction, Some(ScrollDirection::Forward));
        assert_eq!(s.evaluate(1200, BOUNDS).direction, Some(ScrollDirection::Forward));
        assert!(!s.evaluate(161, BOUNDS).should_scroll);
    }

    #[test]
    fn narrow_viewport_prefers_nearer_edge() {
        let s = AutoScroller::new(60);
        let narrow = ViewportBounds { left: 0, right: 100 };
        assert_eq!(s.evaluate(70, narrow).direction, Some(ScrollDirection::Forward));
        assert_eq!(s.evaluate(30, narrow).direction, Some(ScrollDirection::Backward));
    }
}
