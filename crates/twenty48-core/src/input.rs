//! Map raw key presses and touch swipes onto board directions.

use crate::engine::Direction;

/// Default minimum swipe displacement, in screen units.
pub const DEFAULT_SWIPE_THRESHOLD: f64 = 50.0;

/// Direction for a browser-style key name (`ArrowLeft`, ...). Other keys
/// are ignored.
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowLeft" => Some(Direction::Left),
        "ArrowRight" => Some(Direction::Right),
        "ArrowUp" => Some(Direction::Up),
        "ArrowDown" => Some(Direction::Down),
        _ => None,
    }
}

/// A point in screen coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Classifies completed touch gestures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeDetector {
    threshold: f64,
}

impl Default for SwipeDetector {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

impl SwipeDetector {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.abs(),
        }
    }

    /// Direction of a swipe from `start` to `end`, or `None` when the
    /// dominant displacement does not exceed the threshold.
    ///
    /// The axis with the larger absolute displacement wins; a tie counts as
    /// vertical.
    pub fn classify(&self, start: Point, end: Point) -> Option<Direction> {
        let dx = start.x - end.x;
        let dy = start.y - end.y;
        if dx.abs() > dy.abs() {
            if dx.abs() <= self.threshold {
                None
            } else if dx > 0.0 {
                Some(Direction::Left)
            } else {
                Some(Direction::Right)
            }
        } else if dy.abs() <= self.threshold {
            None
        } else if dy > 0.0 {
            Some(Direction::Up)
        } else {
            Some(Direction::Down)
        }
    }
}
