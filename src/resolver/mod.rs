//! Point-to-target lookup against the geometry registered for this tick.

use crate::models::{Point, Target, TargetId};

/// Returns the target under `point`, or `None` when the point is off every
/// region (or not finite).
///
/// When regions overlap the smallest one wins; equal areas keep registration
/// order.
pub fn resolve(point: Point, targets: &[Target]) -> Option<TargetId> {
    resolve_target(point, targets).map(|t| t.id.clone())
}

pub fn resolve_target(point: Point, targets: &[Target]) -> Option<&Target> {
    if !point.is_finite() {
        return None;
    }

    targets
        .iter()
        .filter(|t| t.region.contains(&point))
        .fold(None, |best: Option<&Target>, candidate| match best {
            Some(b) if b.region.area() <= candidate.region.area() => Some(b),
            _ => Some(candidate),
        })
}
