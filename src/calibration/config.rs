use serde::{Deserialize, Serialize};

use crate::models::Point;

/// Rendered size of the board, used to express calibration tolerance in pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width_px: f64,
    pub height_px: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width_px: 1280.0,
            height_px: 800.0,
        }
    }
}

impl Viewport {
    /// Pixel distance between two normalized points.
    pub fn pixel_distance(&self, a: &Point, b: &Point) -> f64 {
        let dx = (a.x - b.x) * self.width_px;
        let dy = (a.y - b.y) * self.height_px;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CalibrationGrid {
    /// Corners at 20%/80% plus the center.
    FivePoint,
    /// Corners, edge midpoints and center at 10%/50%/90%, row-major.
    NinePoint,
}

impl Default for CalibrationGrid {
    fn default() -> Self {
        CalibrationGrid::NinePoint
    }
}

impl CalibrationGrid {
    pub fn points(&self) -> Vec<Point> {
        match self {
            CalibrationGrid::FivePoint => vec![
                Point::new(0.2, 0.2),
                Point::new(0.8, 0.2),
                Point::new(0.5, 0.5),
                Point::new(0.2, 0.8),
                Point::new(0.8, 0.8),
            ],
            CalibrationGrid::NinePoint => {
                let stops = [0.1, 0.5, 0.9];
                stops
                    .iter()
                    .flat_map(|&y| stops.iter().map(move |&x| Point::new(x, y)))
                    .collect()
            }
        }
    }
}

/// Per-point acceptance rules for a calibration run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CalibrationConfig {
    /// The observed point must stay strictly inside this radius of the target.
    pub radius_px: f64,
    /// How long it must stay there before the sample is taken.
    pub dwell_ms: u64,
    pub grid: CalibrationGrid,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            radius_px: 50.0,
            dwell_ms: 1000,
            grid: CalibrationGrid::NinePoint,
        }
    }
}
