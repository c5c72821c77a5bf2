use std::fmt;

/// The `(orbital_speed, altitude)` pair that drives the simulation.
///
/// Both fields always travel together. A frame that cannot supply both
/// never produces a `ParamSet`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct ParamSet {
    /// Angular advance per tick, in degrees.
    orbital_speed: i32,
    /// Orbit radius around the scene center, in pixels.
    altitude: i32,
}

impl ParamSet {
    pub const DEFAULT: ParamSet = ParamSet::new(2, 10);

    pub const fn new(orbital_speed: i32, altitude: i32) -> Self { Self { orbital_speed, altitude } }
    pub fn orbital_speed(&self) -> i32 { self.orbital_speed }
    pub fn altitude(&self) -> i32 { self.altitude }
}

impl Default for ParamSet {
    fn default() -> Self { Self::DEFAULT }
}

impl From<(i32, i32)> for ParamSet {
    fn from(value: (i32, i32)) -> Self { Self::new(value.0, value.1) }
}

impl fmt::Display for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[speed {} deg/tick, altitude {}]", self.orbital_speed, self.altitude)
    }
}
