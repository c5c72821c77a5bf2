use super::{Frame, FrameSink, SimState};
use crate::config::SimConfig;
use crate::telemetry::{LinkState, TelemetrySession};
use crate::{info, log, warn};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Drives the tick loop: delay, fetch telemetry, draw, advance.
///
/// The only suspension points are the frame delay and the bounded readiness
/// check inside [`TelemetrySession::fetch`].
pub struct OrbitLoop<S: FrameSink> {
    state: SimState,
    session: TelemetrySession,
    sink: S,
    frame_delay: Duration,
    max_ticks: Option<u64>,
    c_tok: CancellationToken,
}

impl<S: FrameSink> OrbitLoop<S> {
    pub fn new(session: TelemetrySession, sink: S, config: &SimConfig, c_tok: CancellationToken) -> Self {
        Self {
            state: SimState::new(),
            session,
            sink,
            frame_delay: config.frame_delay(),
            max_ticks: config.max_ticks(),
            c_tok,
        }
    }

    pub fn state(&self) -> SimState { self.state }
    pub fn sink(&self) -> &S { &self.sink }
    pub fn session(&self) -> &TelemetrySession { &self.session }

    /// One iteration without the frame delay.
    pub async fn tick(&mut self, tick: u64) {
        let params = self.session.fetch(self.state.params()).await;
        let observed = self.state.retarget(params);
        self.sink.draw(&Frame::new(tick, SimState::CENTER, observed.position(), params));
        self.state = self.state.advance(params);
    }

    /// Runs until cancelled or until `max_ticks` ticks have been drawn, then
    /// shuts the telemetry session down.
    ///
    /// # Returns
    /// The number of ticks executed.
    pub async fn run(&mut self) -> u64 {
        if self.session.is_live() {
            info!("Starting orbit loop with live telemetry");
        } else {
            info!("Starting orbit loop without telemetry, using {}", self.state.params());
        }
        let mut ticks = 0;
        while self.max_ticks.is_none_or(|max| ticks < max) {
            tokio::select! {
                () = self.c_tok.cancelled() => {
                    info!("Quitting...");
                    break;
                }
                () = tokio::time::sleep(self.frame_delay) => {}
            }
            self.tick(ticks).await;
            ticks += 1;
        }
        log!("Orbit loop stopped after {ticks} ticks at angle {}", self.state.angle());
        if let LinkState::Closed(fault) = self.session.state() {
            warn!("Telemetry was lost during the run ({fault:?}), last parameters {}", self.state.params());
        }
        self.session.shutdown();
        ticks
    }
}
