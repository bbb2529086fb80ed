pub mod controller;
pub mod loop_worker;
pub mod wanderer;

pub use controller::SimulationController;
pub use loop_worker::simulation_loop;
pub use wanderer::GazeWanderer;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfig {
    /// Distance moved per tick, in normalized units.
    pub speed: f64,
    /// A random destination counts as reached inside this radius.
    pub arrive_radius: f64,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            speed: 0.02,
            arrive_radius: 0.05,
            seed: None,
        }
    }
}
