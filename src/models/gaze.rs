use serde::{Deserialize, Serialize};
use std::time::Instant;

/// A 2D point. Signal space and screen space share this type; both are
/// normalized so that the visible area spans `[0, 1]` on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One raw reading from the tracker (or the simulator).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazeSample {
    pub point: Point,
    pub timestamp: Instant,
}

impl GazeSample {
    pub fn new(x: f64, y: f64, timestamp: Instant) -> Self {
        Self {
            point: Point::new(x, y),
            timestamp,
        }
    }
}
