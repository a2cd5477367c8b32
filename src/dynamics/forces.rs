use crate::config::{FRICTION_CONST, REPULSIVE_CONST};
use crate::core::types::{Point2, Vector2};

/// Inverse-square repulsion felt at `target` from a source of mass `source_mass` at `source`.
///
/// Points away from the source. Returns `None` when the two points coincide
/// (or are so close that the direction cannot be normalized).
pub fn repulsion(target: Point2, source: Point2, source_mass: f64) -> Option<Vector2> {
    let distance = source.distance(target);
    if distance <= 0.0 {
        return None;
    }
    let direction = source.vector_to(target).try_normalize()?;
    Some(direction * (source_mass * REPULSIVE_CONST / (distance * distance)))
}

/// Linear friction opposing `velocity`.
pub fn friction(velocity: Vector2) -> Vector2 {
    velocity * -FRICTION_CONST
}
