//! 2D affine transforms applied coordinate-wise to geometries.

use nalgebra::{Matrix2, Vector2};

use super::types::{Coord, Geometry};

/// 2D affine map: `x ↦ M x + t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform {
    pub m: Matrix2<f64>,
    pub t: Vector2<f64>,
}

impl AffineTransform {
    #[inline]
    pub fn identity() -> Self {
        Self {
            m: Matrix2::identity(),
            t: Vector2::zeros(),
        }
    }

    /// Counter-clockwise rotation by `theta` radians about the origin.
    #[inline]
    pub fn rotation(theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self {
            m: Matrix2::new(c, -s, s, c),
            t: Vector2::zeros(),
        }
    }

    /// Rotation by `theta` about `centre`: `x ↦ R (x - c) + c`.
    #[inline]
    pub fn rotation_about(theta: f64, centre: Coord) -> Self {
        let r = Self::rotation(theta);
        Self {
            m: r.m,
            t: centre - r.m * centre,
        }
    }

    #[inline]
    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            m: Matrix2::identity(),
            t: Vector2::new(dx, dy),
        }
    }

    /// `self` followed by `next`.
    #[inline]
    pub fn then(&self, next: &AffineTransform) -> Self {
        Self {
            m: next.m * self.m,
            t: next.m * self.t + next.t,
        }
    }

    /// `self` followed by a translation.
    #[inline]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        self.then(&Self::translation(dx, dy))
    }

    #[inline]
    pub fn apply(&self, c: Coord) -> Coord {
        self.m * c + self.t
    }

    /// A new geometry with every coordinate mapped; `g` is left untouched.
    pub fn transform(&self, g: &Geometry) -> Geometry {
        g.map_coords(&|c| self.apply(c))
    }
}
