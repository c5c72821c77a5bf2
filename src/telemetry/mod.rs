//! The client side of the telemetry link: connecting to the producer over a
//! Unix domain socket, decoding its comma-separated frames and handing valid
//! parameter sets to the render loop without ever stalling it. The producer
//! side (`feed`) lives here too, since it shares the wire format.

pub mod codec;
mod connector;
mod feed;
mod param_set;
mod session;

pub use connector::{ConnectionError, Connector};
pub use feed::TelemetryFeed;
pub use param_set::ParamSet;
pub use session::{LinkState, TelemetrySession};
