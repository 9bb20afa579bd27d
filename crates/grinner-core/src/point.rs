use serde::{Deserialize, Serialize};

/// A position plus orientation in board millimeters.
///
/// Board frame: x grows to the right, y grows downward.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    /// Rotation in degrees.
    pub r: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }

    #[must_use]
    pub fn coords(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Shift this point by `shift`.
    ///
    /// When `relative` is true, `shift` is rotated by the point's current rotation first.
    pub fn shift(&mut self, mut shift: [f64; 2], relative: bool) -> &mut Self {
        if relative {
            shift = rotate_vec(shift, self.r);
        }
        self.x += shift[0];
        self.y += shift[1];
        self
    }
}

/// Rotate `v` by `angle_deg` around the origin.
#[must_use]
pub fn rotate_vec(v: [f64; 2], angle_deg: f64) -> [f64; 2] {
    let a = angle_deg.to_radians();
    let (s, c) = a.sin_cos();
    [v[0] * c - v[1] * s, v[0] * s + v[1] * c]
}
