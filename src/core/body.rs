use serde::Serialize;

use super::types::{BodyId, Boundary, Point2, Vector2};
use crate::dynamics::forces;
use crate::error::{Result, SimError};

/// Point mass moving under pairwise repulsion and friction.
///
/// Identity is the `id` alone: two bodies with the same id compare equal
/// whatever their kinematic state. `mass` is fixed and strictly positive.
#[derive(Debug, Clone, Serialize)]
pub struct Body {
    id: BodyId,
    mass: f64,
    pub position: Point2,
    pub velocity: Vector2,
    pub acceleration: Vector2,
}

impl PartialEq for Body {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Body {}

impl Body {
    /// Creates a body with zero acceleration. Fails unless `mass` is positive and finite.
    pub fn new(id: u64, position: Point2, velocity: Vector2, mass: f64) -> Result<Self> {
        let id = BodyId(id);
        if !(mass.is_finite() && mass > 0.0) {
            return Err(SimError::invalid_config(format!(
                "body {id} has non-positive mass {mass}"
            )));
        }
        if !position.is_finite() || !velocity.is_finite() {
            return Err(SimError::invalid_config(format!(
                "body {id} has a non-finite initial state"
            )));
        }
        Ok(Self {
            id,
            mass,
            position,
            velocity,
            acceleration: Vector2::ZERO,
        })
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn distance_from(&self, other: &Body) -> f64 {
        self.position.distance(other.position)
    }

    /// Repulsive force exerted on `self` by `other`.
    ///
    /// Fails with [`SimError::DegenerateDistance`] when both bodies occupy the same point.
    pub fn repulsive_force_by(&self, other: &Body) -> Result<Vector2> {
        let force = forces::repulsion(self.position, other.position, other.mass).ok_or(
            SimError::DegenerateDistance {
                body: self.id,
                other: other.id,
            },
        )?;
        if !force.is_finite() {
            return Err(SimError::NonFiniteForce { body: self.id });
        }
        Ok(force)
    }

    pub fn friction_force(&self) -> Vector2 {
        forces::friction(self.velocity)
    }

    /// Sum of the repulsion from every other body in `bodies` plus friction.
    ///
    /// Coincident pairs contribute nothing; any other failure aborts the sum.
    pub fn total_force<'a, I>(&self, bodies: I) -> Result<Vector2>
    where
        I: IntoIterator<Item = &'a Body>,
    {
        let mut total = Vector2::ZERO;
        for other in bodies {
            if other.id == self.id {
                continue;
            }
            match self.repulsive_force_by(other) {
                Ok(force) => total += force,
                Err(SimError::DegenerateDistance { body, other }) => {
                    log::trace!("skipping coincident pair {body} / {other}");
                }
                Err(e) => return Err(e),
            }
        }
        total += self.friction_force();
        if !total.is_finite() {
            return Err(SimError::NonFiniteForce { body: self.id });
        }
        Ok(total)
    }

    pub fn update_acceleration(&mut self, force: Vector2) {
        self.acceleration = force / self.mass;
    }

    pub fn update_velocity(&mut self, dt: f64) {
        self.velocity += self.acceleration * dt;
    }

    pub fn update_position(&mut self, dt: f64) {
        self.position.translate(self.velocity * dt);
    }

    /// Clamps the body into `bounds`, reflecting the velocity component of each crossed axis.
    pub fn resolve_boundary_collision(&mut self, bounds: &Boundary) {
        if self.position.x > bounds.x1() {
            self.position.x = bounds.x1();
            self.velocity.x = -self.velocity.x;
        } else if self.position.x < bounds.x0() {
            self.position.x = bounds.x0();
            self.velocity.x = -self.velocity.x;
        }

        if self.position.y > bounds.y1() {
            self.position.y = bounds.y1();
            self.velocity.y = -self.velocity.y;
        } else if self.position.y < bounds.y0() {
            self.position.y = bounds.y0();
            self.velocity.y = -self.velocity.y;
        }
    }

    /// Field-wise comparison, unlike `==` which only looks at the id.
    pub fn same_state(&self, other: &Body) -> bool {
        self.id == other.id
            && self.mass == other.mass
            && self.position == other.position
            && self.velocity == other.velocity
            && self.acceleration == other.acceleration
    }
}
