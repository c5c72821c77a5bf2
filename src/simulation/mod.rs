mod frame;
mod orbit_loop;
mod sim_state;
pub(crate) mod vec2d;
#[cfg(test)]
mod tests;

pub use frame::{Frame, FrameSink, LogFrameSink};
pub use orbit_loop::OrbitLoop;
pub use sim_state::SimState;
