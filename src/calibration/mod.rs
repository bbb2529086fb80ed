pub mod config;
pub mod mapping;
pub mod session;

pub use config::{CalibrationConfig, CalibrationGrid, Viewport};
pub use mapping::{Axis, CalibrationError, CalibrationMapping, CalibrationSample};
pub use session::{CalibrationSession, CalibrationStep};
