use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::models::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CalibrationError {
    /// Every observation had the same value on this axis.
    #[error("degenerate calibration: no variance on {axis} axis")]
    Degenerate { axis: Axis },
    #[error("calibration finished without any samples")]
    NoSamples,
}

/// One fixation: where the target was drawn and where the signal said we looked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationSample {
    pub target: Point,
    pub observed: Point,
}

/// Independent per-axis affine transform from signal space to screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationMapping {
    pub scale_x: f64,
    pub offset_x: f64,
    pub scale_y: f64,
    pub offset_y: f64,
}

impl CalibrationMapping {
    pub const IDENTITY: CalibrationMapping = CalibrationMapping {
        scale_x: 1.0,
        offset_x: 0.0,
        scale_y: 1.0,
        offset_y: 0.0,
    };

    /// Min/max normalization over all samples, axis by axis.
    pub fn fit(samples: &[CalibrationSample]) -> Result<Self, CalibrationError> {
        if samples.is_empty() {
            return Err(CalibrationError::NoSamples);
        }

        let (scale_x, offset_x) = fit_axis(
            samples.iter().map(|s| (s.observed.x, s.target.x)),
            Axis::X,
        )?;
        let (scale_y, offset_y) = fit_axis(
            samples.iter().map(|s| (s.observed.y, s.target.y)),
            Axis::Y,
        )?;

        Ok(Self {
            scale_x,
            offset_x,
            scale_y,
            offset_y,
        })
    }

    /// No clamping; out-of-range results are the resolver's concern.
    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            point.x * self.scale_x + self.offset_x,
            point.y * self.scale_y + self.offset_y,
        )
    }
}

fn fit_axis(
    pairs: impl Iterator<Item = (f64, f64)>,
    axis: Axis,
) -> Result<(f64, f64), CalibrationError> {
    let mut signal_min = f64::INFINITY;
    let mut signal_max = f64::NEG_INFINITY;
    let mut target_min = f64::INFINITY;
    let mut target_max = f64::NEG_INFINITY;

    for (signal, target) in pairs {
        signal_min = signal_min.min(signal);
        signal_max = signal_max.max(signal);
        target_min = target_min.min(target);
        target_max = target_max.max(target);
    }

    let signal_range = signal_max - signal_min;
    if !signal_range.is_finite() || signal_range.abs() <= f64::EPSILON {
        return Err(CalibrationError::Degenerate { axis });
    }

    let scale = (target_max - target_min) / signal_range;
    let offset = target_min - signal_min * scale;
    Ok((scale, offset))
}
