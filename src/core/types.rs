use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Free vector in the simulation plane.
pub type Vector2 = DVec2;

/// Identifier of a body, unique within one simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u64);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for BodyId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Location in the simulation plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Moves the point by `offset`.
    pub fn translate(&mut self, offset: Vector2) {
        *self = (Vector2::from(*self) + offset).into();
    }

    /// Vector pointing from `self` to `to`.
    pub fn vector_to(self, to: Point2) -> Vector2 {
        Vector2::from(to) - Vector2::from(self)
    }

    pub fn distance(self, other: Point2) -> f64 {
        Vector2::from(self).distance(other.into())
    }

    pub fn is_finite(self) -> bool {
        Vector2::from(self).is_finite()
    }
}

impl From<Vector2> for Point2 {
    fn from(v: Vector2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Point2> for Vector2 {
    fn from(p: Point2) -> Self {
        Vector2::new(p.x, p.y)
    }
}

/// Immutable axis-aligned rectangle enclosing the bodies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl Boundary {
    /// Builds a boundary, requiring `x0 < x1` and `y0 < y1`.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Result<Self> {
        let finite = [x0, y0, x1, y1].iter().all(|v| v.is_finite());
        if !finite || x0 >= x1 || y0 >= y1 {
            return Err(SimError::invalid_config(format!(
                "boundary ({x0}, {y0}) - ({x1}, {y1}) is inverted or not finite"
            )));
        }
        Ok(Self { x0, y0, x1, y1 })
    }

    /// Square boundary centred on the origin with the given half extent.
    pub fn centered(half_extent: f64) -> Result<Self> {
        Self::new(-half_extent, -half_extent, half_extent, half_extent)
    }

    pub fn x0(&self) -> f64 {
        self.x0
    }

    pub fn y0(&self) -> f64 {
        self.y0
    }

    pub fn x1(&self) -> f64 {
        self.x1
    }

    pub fn y1(&self) -> f64 {
        self.y1
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// True when `p` lies inside or on the rectangle.
    pub fn contains(&self, p: Point2) -> bool {
        p.x >= self.x0 && p.x <= self.x1 && p.y >= self.y0 && p.y <= self.y1
    }
}
