//! 3D Euclidean point value type

use nalgebra::Vector3;
use std::ops::{Add, Neg, Sub};

/// A location or direction in 3D Euclidean space.
///
/// Immutable value type with no normalization constraint; every operation
/// returns a new point. Point tangents are plain displacement 3-vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    coords: Vector3<f64>,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            coords: Vector3::new(x, y, z),
        }
    }

    pub fn origin() -> Self {
        Self {
            coords: Vector3::zeros(),
        }
    }

    /// The underlying coordinate vector.
    #[inline]
    pub fn coords(&self) -> &Vector3<f64> {
        &self.coords
    }
}

impl From<Vector3<f64>> for Point3 {
    fn from(coords: Vector3<f64>) -> Self {
        Self { coords }
    }
}

impl Add for Point3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            coords: self.coords + rhs.coords,
        }
    }
}

impl Sub for Point3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            coords: self.coords - rhs.coords,
        }
    }
}

impl Neg for Point3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            coords: -self.coords,
        }
    }
}
