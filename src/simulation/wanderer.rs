use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

use crate::models::{GazeSample, Point};

use super::SimulationConfig;

// Random destinations stay away from the screen edges.
const MARGIN: f64 = 0.1;

/// Synthetic gaze source: drifts toward a random destination at a fixed
/// speed and picks a new one on arrival. A fixation point, when set,
/// replaces the random destination and holds the gaze there.
pub struct GazeWanderer {
    position: Point,
    destination: Point,
    fixation: Option<Point>,
    speed: f64,
    arrive_radius: f64,
    rng: StdRng,
}

impl GazeWanderer {
    pub fn new(config: &SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn seeded(config: &SimulationConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &SimulationConfig, mut rng: StdRng) -> Self {
        let destination = random_point(&mut rng);
        Self {
            position: Point::new(0.5, 0.5),
            destination,
            fixation: None,
            speed: config.speed,
            arrive_radius: config.arrive_radius,
            rng,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn destination(&self) -> Point {
        self.fixation.unwrap_or(self.destination)
    }

    /// Pins the gaze to `point`, or releases it back to wandering.
    pub fn fixate(&mut self, point: Option<Point>) {
        self.fixation = point;
    }

    /// Advances one tick and returns the new position.
    pub fn step(&mut self) -> Point {
        let goal = self.destination();
        let distance = self.position.distance_to(&goal);

        if let Some(fixation) = self.fixation {
            if distance <= self.speed {
                self.position = fixation;
                return self.position;
            }
        } else if distance <= self.arrive_radius {
            self.destination = random_point(&mut self.rng);
            return self.position;
        }

        let dx = (goal.x - self.position.x) / distance;
        let dy = (goal.y - self.position.y) / distance;
        self.position = Point::new(
            self.position.x + dx * self.speed,
            self.position.y + dy * self.speed,
        );
        self.position
    }

    /// Steps and stamps the result as a raw sample.
    pub fn sample(&mut self, now: Instant) -> GazeSample {
        let p = self.step();
        GazeSample::new(p.x, p.y, now)
    }
}

fn random_point(rng: &mut StdRng) -> Point {
    Point::new(
        rng.gen_range(MARGIN..1.0 - MARGIN),
        rng.gen_range(MARGIN..1.0 - MARGIN),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_wanderers_agree() {
        let config = SimulationConfig::default();
        let mut a = GazeWanderer::seeded(&config, 7);
        let mut b = GazeWanderer::seeded(&config, 7);
        for _ in 0..500 {
            assert_eq!(a.step(), b.step());
        }
    }

    #[test]
    fn test_moves_at_fixed_speed_and_stays_on_screen() {
        let config = SimulationConfig::default();
        let mut wanderer = GazeWanderer::seeded(&config, 42);
        let mut prev = wanderer.position();
        for _ in 0..2000 {
            let next = wanderer.step();
            let moved = prev.distance_to(&next);
            assert!(moved <= config.speed + 1e-9);
            assert!((0.0..=1.0).contains(&next.x) && (0.0..=1.0).contains(&next.y));
            prev = next;
        }
    }

    #[test]
    fn test_picks_new_destination_on_arrival() {
        let config = SimulationConfig::default();
        let mut wanderer = GazeWanderer::seeded(&config, 3);
        let first = wanderer.destination();
        let mut changed = false;
        for _ in 0..200 {
            wanderer.step();
            if wanderer.destination() != first {
                changed = true;
                break;
            }
        }
        assert!(changed);
    }

    #[test]
    fn test_fixation_holds_position() {
        let config = SimulationConfig::default();
        let mut wanderer = GazeWanderer::seeded(&config, 1);
        let target = Point::new(0.9, 0.1);
        wanderer.fixate(Some(target));
        for _ in 0..100 {
            wanderer.step();
        }
        assert_eq!(wanderer.position(), target);
        assert_eq!(wanderer.step(), target);

        wanderer.fixate(None);
        assert_ne!(wanderer.destination(), target);
    }

    #[test]
    fn test_sitting_on_destination_stays_finite() {
        let config = SimulationConfig {
            arrive_radius: 0.0,
            ..SimulationConfig::default()
        };
        let mut wanderer = GazeWanderer::seeded(&config, 5);
        let destination = wanderer.destination();
        wanderer.fixate(Some(destination));
        for _ in 0..100 {
            wanderer.step();
        }
        assert_eq!(wanderer.position(), destination);

        wanderer.fixate(None);
        let next = wanderer.step();
        assert!(next.is_finite());
        assert_ne!(wanderer.destination(), destination);
    }
}
