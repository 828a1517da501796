use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use crate::Axis;

/// A two-component vector of `f32` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// The component-wise positive-infinity vector.
    pub const INFINITY: Self = Self {
        x: f32::INFINITY,
        y: f32::INFINITY,
    };

    /// Construct a vector from components.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Construct a vector with both components set to `v`.
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v }
    }

    /// Build a vector from a main-axis and a cross-axis component.
    pub fn from_axes(main_axis: Axis, main: f32, cross: f32) -> Self {
        match main_axis {
            Axis::X => Self::new(main, cross),
            Axis::Y => Self::new(cross, main),
        }
    }

    /// Return the component along `axis`.
    pub fn axis(self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Return a copy with the component along `axis` replaced.
    pub fn with_axis(self, axis: Axis, v: f32) -> Self {
        match axis {
            Axis::X => Self::new(v, self.y),
            Axis::Y => Self::new(self.x, v),
        }
    }

    /// Component-wise maximum.
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Component-wise minimum.
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Component-wise clamp to `[min, max]`.
    pub fn clamp(self, min: Self, max: Self) -> Self {
        self.max(min).min(max)
    }

    /// Snap a size to the pixel grid. Sizes never round down.
    pub fn ceil(self) -> Self {
        Self::new(self.x.ceil(), self.y.ceil())
    }

    /// Snap a position to the pixel grid.
    pub fn floor(self) -> Self {
        Self::new(self.x.floor(), self.y.floor())
    }

    /// Snap an offset to the pixel grid, to nearest.
    pub fn round(self) -> Self {
        Self::new(self.x.round(), self.y.round())
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Component-wise multiplication, used for per-axis scale factors.
impl Mul<Vec2> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_access() {
        let v = Vec2::new(3.0, 7.0);
        assert_eq!(v.axis(Axis::X), 3.0);
        assert_eq!(v.axis(Axis::Y), 7.0);
        assert_eq!(v.with_axis(Axis::Y, 1.0), Vec2::new(3.0, 1.0));
        assert_eq!(Vec2::from_axes(Axis::Y, 5.0, 2.0), Vec2::new(2.0, 5.0));
    }

    #[test]
    fn snapping() {
        let v = Vec2::new(1.2, 2.5);
        assert_eq!(v.ceil(), Vec2::new(2.0, 3.0));
        assert_eq!(v.floor(), Vec2::new(1.0, 2.0));
        assert_eq!(v.round(), Vec2::new(1.0, 3.0));
    }
}
