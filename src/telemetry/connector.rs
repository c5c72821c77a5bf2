use crate::config::SimConfig;
use crate::{error, info, warn};
use std::{
    io::{self, ErrorKind},
    path::PathBuf,
    time::Duration,
};
use strum_macros::Display;
use tokio::net::UnixStream;

/// Failure to obtain a channel to the telemetry source.
#[derive(Debug, Display)]
pub enum ConnectionError {
    /// The source never started listening. Carries the number of retries spent.
    RetriesExhausted(u32),
    /// A transport error that retrying would not fix (permissions, bad path, ...).
    Refused(io::Error),
}

impl ConnectionError {
    /// Human-readable cause, for startup logs.
    pub fn describe(&self) -> String {
        match self {
            ConnectionError::RetriesExhausted(retries) => {
                format!("source not listening after {retries} retries")
            }
            ConnectionError::Refused(e) => format!("connection refused by transport: {e}"),
        }
    }
}

impl std::error::Error for ConnectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConnectionError::Refused(e) => Some(e),
            ConnectionError::RetriesExhausted(_) => None,
        }
    }
}

/// Opens the Unix domain stream to the telemetry source with bounded retries.
///
/// Only meant for the startup phase: the backoff sleeps would otherwise stall
/// the render loop.
#[derive(Debug, Clone)]
pub struct Connector {
    path: PathBuf,
    max_retries: u32,
    backoff: Duration,
}

impl Connector {
    pub fn new(path: impl Into<PathBuf>, max_retries: u32, backoff: Duration) -> Self {
        Self { path: path.into(), max_retries, backoff }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.socket_path().clone(), config.max_retries(), config.retry_backoff())
    }

    /// Nobody listening yet, or the listener's backlog is momentarily full.
    fn is_retryable(err: &io::Error) -> bool {
        matches!(
            err.kind(),
            ErrorKind::NotFound | ErrorKind::ConnectionRefused | ErrorKind::WouldBlock
        )
    }

    /// Connects to the source, making at most `1 + max_retries` attempts with
    /// `backoff` between them.
    ///
    /// The returned stream is non-blocking and owned by the caller, who is
    /// responsible for closing it exactly once.
    ///
    /// # Errors
    /// [`ConnectionError::RetriesExhausted`] once the retry budget is spent,
    /// [`ConnectionError::Refused`] immediately on any non-retryable error.
    pub async fn connect(&self) -> Result<UnixStream, ConnectionError> {
        let mut retries = 0;
        loop {
            info!("Attempting to connect to telemetry source at {}", self.path.display());
            match UnixStream::connect(&self.path).await {
                Ok(stream) => {
                    info!("Connection to telemetry source established");
                    return Ok(stream);
                }
                Err(e) if Self::is_retryable(&e) => {
                    if retries >= self.max_retries {
                        error!("Telemetry source unreachable after {retries} retries: {e}");
                        return Err(ConnectionError::RetriesExhausted(retries));
                    }
                    retries += 1;
                    warn!(
                        "Telemetry source not ready ({e}), retry {retries}/{} in {}ms",
                        self.max_retries,
                        self.backoff.as_millis()
                    );
                    tokio::time::sleep(self.backoff).await;
                }
                Err(e) => {
                    error!("Error connecting to telemetry socket: {e}");
                    return Err(ConnectionError::Refused(e));
                }
            }
        }
    }
}
