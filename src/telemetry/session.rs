use super::{ConnectionError, Connector, ParamSet, codec};
use crate::config::SimConfig;
use crate::{error, event, info, log, warn};
use std::{
    io::{self, ErrorKind},
    path::PathBuf,
    time::Duration,
};
use strum_macros::Display;
use tokio::net::UnixStream;

/// Why a session stopped reading.
#[derive(Debug, Display)]
pub enum LinkFault {
    /// Zero-byte read, the source hung up.
    PeerClosed,
    /// Any read error other than would-block.
    FatalRead(io::Error),
}

#[derive(Debug, Display)]
pub enum LinkState {
    /// Never connected. The simulation runs on whatever parameters it already has.
    Detached,
    Live,
    /// Was connected, no further reads are attempted.
    Closed(LinkFault),
    /// Torn down by [`TelemetrySession::shutdown`].
    Shutdown,
}

/// Explicit context for the telemetry side of the render loop.
///
/// Owns the channel handle, the read buffer and the teardown of the socket path.
/// There is no reconnection: once the link leaves [`LinkState::Live`] it stays down.
#[derive(Debug)]
pub struct TelemetrySession {
    stream: Option<UnixStream>,
    state: LinkState,
    buffer: Vec<u8>,
    poll_timeout: Duration,
    socket_path: PathBuf,
}

impl TelemetrySession {
    /// A single read is treated as a complete frame, so this caps the frame size.
    pub const READ_BUF_LEN: usize = 1024;

    /// Runs the connector once and wraps the outcome.
    ///
    /// A failed connection yields a detached session, unless the config demands
    /// telemetry, in which case the error is handed back so startup can abort.
    ///
    /// # Errors
    /// The [`ConnectionError`] from the connector if `require_telemetry` is set.
    pub async fn establish(config: &SimConfig) -> Result<Self, ConnectionError> {
        match Connector::from_config(config).connect().await {
            Ok(stream) => Ok(Self::live(stream, config)),
            Err(e) if config.require_telemetry() => Err(e),
            Err(e) => {
                warn!("Continuing without telemetry ({}), default parameters stay in effect", e.describe());
                Ok(Self::detached(config))
            }
        }
    }

    pub fn live(stream: UnixStream, config: &SimConfig) -> Self {
        Self::with_state(Some(stream), LinkState::Live, config)
    }

    pub fn detached(config: &SimConfig) -> Self { Self::with_state(None, LinkState::Detached, config) }

    fn with_state(stream: Option<UnixStream>, state: LinkState, config: &SimConfig) -> Self {
        Self {
            stream,
            state,
            buffer: vec![0u8; Self::READ_BUF_LEN],
            poll_timeout: config.poll_timeout(),
            socket_path: config.socket_path().clone(),
        }
    }

    pub fn state(&self) -> &LinkState { &self.state }
    pub fn is_live(&self) -> bool { matches!(self.state, LinkState::Live) }

    /// Polls the channel once and returns the parameters for this tick.
    ///
    /// Never waits longer than `poll_timeout`. Every path that yields no valid
    /// frame (no data, transient errors, incomplete frames, a dead link) returns
    /// `previous` unchanged.
    pub async fn fetch(&mut self, previous: ParamSet) -> ParamSet {
        let Some(stream) = self.stream.as_ref() else {
            return previous;
        };
        let readiness = tokio::time::timeout(self.poll_timeout, stream.readable()).await;
        match readiness {
            Err(_) => {
                event!("No telemetry this tick, keeping {previous}");
                previous
            }
            Ok(Err(e)) => {
                warn!("Readiness check on telemetry socket failed: {e}");
                previous
            }
            Ok(Ok(())) => self.read_frame(previous),
        }
    }

    /// Exactly one non-blocking read, one decode attempt.
    fn read_frame(&mut self, previous: ParamSet) -> ParamSet {
        let Some(stream) = self.stream.as_ref() else {
            return previous;
        };
        match stream.try_read(&mut self.buffer) {
            Ok(0) => {
                self.close(LinkFault::PeerClosed);
                previous
            }
            Ok(n) => {
                let raw = &self.buffer[..n];
                if let Some(params) = codec::decode(raw) {
                    event!("Received telemetry {params}");
                    params
                } else {
                    warn!(
                        "Discarding incomplete telemetry frame {:?}",
                        String::from_utf8_lossy(raw)
                    );
                    previous
                }
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                event!("Spurious readiness on telemetry socket");
                previous
            }
            Err(e) => {
                self.close(LinkFault::FatalRead(e));
                previous
            }
        }
    }

    fn close(&mut self, fault: LinkFault) {
        match &fault {
            LinkFault::PeerClosed => warn!("Telemetry connection closed by peer, freezing parameters"),
            LinkFault::FatalRead(e) => error!("Telemetry read failed ({e}), freezing parameters"),
        }
        self.stream = None;
        self.state = LinkState::Closed(fault);
    }

    /// Closes the channel if still open and removes the socket path.
    ///
    /// Safe to call more than once, only the first call has an effect.
    pub fn shutdown(&mut self) {
        if matches!(self.state, LinkState::Shutdown) {
            return;
        }
        self.state = LinkState::Shutdown;
        if self.stream.take().is_some() {
            log!("Closed telemetry channel");
        }
        match std::fs::remove_file(&self.socket_path) {
            Ok(()) => info!("Removed socket path {}", self.socket_path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => (),
            Err(e) => warn!("Could not remove socket path {}: {e}", self.socket_path.display()),
        }
    }
}
