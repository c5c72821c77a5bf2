use num::{Float, Num};
use std::fmt::{self, Display};
use std::ops::{Add, Sub};

/// A 2D vector generic over any numeric type.
///
/// Used for scene coordinates: the orbit center and the derived satellite position.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Vec2D<T> {
    /// The x-component of the vector.
    x: T,
    /// The y-component of the vector.
    y: T,
}

impl<T: Copy> Vec2D<T> {
    /// Creates a new vector with the given x and y components.
    pub const fn new(x: T, y: T) -> Self { Self { x, y } }

    /// Returns the x-component of the vector.
    pub const fn x(&self) -> T { self.x }

    /// Returns the y-component of the vector.
    pub const fn y(&self) -> T { self.y }
}

impl<T: Float> Vec2D<T> {
    /// Builds the vector of length `radius` pointing at `angle_degrees`,
    /// measured from the positive x-axis towards positive y.
    pub fn from_polar(radius: T, angle_degrees: T) -> Self {
        let angle_radians = angle_degrees.to_radians();
        Self::new(radius * angle_radians.cos(), radius * angle_radians.sin())
    }

    /// Computes the magnitude (absolute value) of the vector.
    pub fn abs(&self) -> T { self.x.hypot(self.y) }

    /// Computes the Euclidean distance between the current vector and another vector.
    pub fn euclid_distance(&self, other: &Self) -> T { (*self - *other).abs() }

    /// Whether both components are within `tol` of `other`.
    #[cfg(test)]
    pub fn approx_eq(&self, other: &Self, tol: T) -> bool {
        (self.x - other.x).abs() <= tol && (self.y - other.y).abs() <= tol
    }
}

impl<T: Num> Add for Vec2D<T> {
    type Output = Vec2D<T>;

    fn add(self, rhs: Self) -> Self::Output { Vec2D { x: self.x + rhs.x, y: self.y + rhs.y } }
}

impl<T: Num> Sub for Vec2D<T> {
    type Output = Vec2D<T>;

    fn sub(self, rhs: Self) -> Self::Output { Vec2D { x: self.x - rhs.x, y: self.y - rhs.y } }
}

impl<T: Display> Display for Vec2D<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.2}, {:.2}]", self.x, self.y)
    }
}
