//! Canonical initial body sets used by demos, benches and tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SimulationConfig;
use crate::core::{Body, Boundary, Point2, SimulationState, Vector2};
use crate::error::Result;

/// Mass given to every body of the random scenarios.
pub const RANDOM_BODY_MASS: f64 = 10.0;

/// Initial bodies and the boundary they live in.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub bodies: Vec<Body>,
    pub boundary: Boundary,
}

impl Scenario {
    /// Two bodies at rest, the right one twice as heavy.
    pub fn two_bodies() -> Result<Self> {
        Ok(Self {
            boundary: Boundary::centered(4.0)?,
            bodies: vec![
                Body::new(0, Point2::new(-0.1, 0.0), Vector2::ZERO, 1.0)?,
                Body::new(1, Point2::new(0.1, 0.0), Vector2::ZERO, 2.0)?,
            ],
        })
    }

    /// A heavy body at the origin flanked by two light ones.
    pub fn three_bodies() -> Result<Self> {
        Ok(Self {
            boundary: Boundary::centered(1.0)?,
            bodies: vec![
                Body::new(0, Point2::ORIGIN, Vector2::ZERO, 10.0)?,
                Body::new(1, Point2::new(0.2, 0.0), Vector2::ZERO, 1.0)?,
                Body::new(2, Point2::new(-0.2, 0.0), Vector2::ZERO, 1.0)?,
            ],
        })
    }

    pub fn some_bodies(seed: u64) -> Result<Self> {
        Self::random(100, Boundary::centered(4.0)?, seed)
    }

    pub fn many_bodies(seed: u64) -> Result<Self> {
        Self::random(1000, Boundary::centered(6.0)?, seed)
    }

    pub fn custom(count: usize, seed: u64) -> Result<Self> {
        Self::random(count, Boundary::centered(10.0)?, seed)
    }

    /// `count` equal-mass bodies at rest, scattered over a quarter-size patch of `boundary`.
    pub fn random(count: usize, boundary: Boundary, seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let bodies = (0..count as u64)
            .map(|id| {
                let x = boundary.x0() * 0.25 + rng.gen::<f64>() * boundary.width() * 0.25;
                let y = boundary.y0() * 0.25 + rng.gen::<f64>() * boundary.height() * 0.25;
                Body::new(id, Point2::new(x, y), Vector2::ZERO, RANDOM_BODY_MASS)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { bodies, boundary })
    }

    pub fn into_state(self, config: &SimulationConfig) -> Result<SimulationState> {
        SimulationState::new(self.bodies, self.boundary, config)
    }
}
