//! Point and coordinate types for the chunked voxel fields.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// Integer voxel coordinates.
///
/// Used for global cell indices, chunk indices, in-chunk cell indices and
/// neighbor offsets alike. Ordering is lexicographic on `(x, y, z)`, which is
/// the stable processing order used throughout the pipeline.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct GridCoord {
    /// X index
    pub x: i32,
    /// Y index
    pub y: i32,
    /// Z index
    pub z: i32,
}

impl GridCoord {
    /// Origin coordinate
    pub const ZERO: GridCoord = GridCoord { x: 0, y: 0, z: 0 };

    /// Create a new grid coordinate
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Chebyshev distance (max of per-axis distances) - 26-connected metric
    #[inline]
    pub fn chebyshev_distance(&self, other: &GridCoord) -> i32 {
        (self.x - other.x)
            .abs()
            .max((self.y - other.y).abs())
            .max((self.z - other.z).abs())
    }

    /// Manhattan distance to another coordinate
    #[inline]
    pub fn manhattan_distance(&self, other: &GridCoord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()
    }

    /// True if this is the zero vector
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0 && self.z == 0
    }

    /// Convert to a floating-point vector (no scaling)
    #[inline]
    pub fn to_world(self) -> WorldPoint {
        WorldPoint::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

impl Add for GridCoord {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        GridCoord::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for GridCoord {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        GridCoord::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Neg for GridCoord {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        GridCoord::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<i32> for GridCoord {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: i32) -> Self {
        GridCoord::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

/// World coordinates (f32, same unit as the distance field)
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
    /// Z coordinate
    pub z: f32,
}

impl WorldPoint {
    /// Zero point (origin)
    pub const ZERO: WorldPoint = WorldPoint {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a new world point
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: &WorldPoint) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Squared distance (faster, avoids sqrt)
    #[inline]
    pub fn distance_squared(&self, other: &WorldPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Dot product
    #[inline]
    pub fn dot(&self, other: &WorldPoint) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Vector length
    #[inline]
    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, `None` for (near) zero vectors
    #[inline]
    pub fn normalized(&self) -> Option<WorldPoint> {
        let len = self.length();
        if len <= f32::EPSILON {
            return None;
        }
        Some(*self * (1.0 / len))
    }

    /// Angle between two vectors in radians, in `[0, π]`.
    ///
    /// Returns 0 if either vector is (near) zero.
    pub fn angle_to(&self, other: &WorldPoint) -> f32 {
        match (self.normalized(), other.normalized()) {
            (Some(a), Some(b)) => a.dot(&b).clamp(-1.0, 1.0).acos(),
            _ => 0.0,
        }
    }

    /// As an array, for spatial indexing
    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl Add for WorldPoint {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        WorldPoint::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for WorldPoint {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        WorldPoint::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f32> for WorldPoint {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f32) -> Self {
        WorldPoint::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}
