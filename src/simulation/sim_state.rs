use super::vec2d::Vec2D;
use crate::telemetry::ParamSet;

/// Angle and parameters of the simulated satellite.
///
/// The angle accumulates without reduction; the trigonometry in
/// [`SimState::position`] takes care of the periodicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimState {
    /// Degrees travelled since startup.
    angle: i64,
    params: ParamSet,
}

impl SimState {
    /// Fixed center of the scene the satellite orbits.
    pub const CENTER: Vec2D<f64> = Vec2D::new(300.0, 300.0);

    pub fn new() -> Self { Self::with(0, ParamSet::DEFAULT) }

    pub fn with(angle: i64, params: ParamSet) -> Self { Self { angle, params } }

    pub fn angle(&self) -> i64 { self.angle }
    pub fn params(&self) -> ParamSet { self.params }

    /// Same angle, new parameters.
    #[must_use]
    pub fn retarget(&self, params: ParamSet) -> Self { Self::with(self.angle, params) }

    /// One tick: adopts `params` and moves the angle forward by their orbital speed.
    #[must_use]
    pub fn advance(&self, params: ParamSet) -> Self {
        Self::with(self.angle.wrapping_add(i64::from(params.orbital_speed())), params)
    }

    /// `CENTER + altitude * (cos, sin)(angle)`.
    #[allow(clippy::cast_precision_loss)]
    pub fn position(&self) -> Vec2D<f64> {
        Self::CENTER + Vec2D::from_polar(f64::from(self.params.altitude()), self.angle as f64)
    }
}

impl Default for SimState {
    fn default() -> Self { Self::new() }
}
