pub mod gaze;
pub mod target;

pub use gaze::{GazeSample, Point};
pub use target::{Action, Rect, Target, TargetClass, TargetId};
