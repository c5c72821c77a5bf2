use super::{ParamSet, codec};
use crate::{error, info, log, warn};
use itertools::Itertools;
use std::{
    io::{self, ErrorKind},
    path::PathBuf,
};
use strum_macros::Display;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{UnixListener, UnixStream},
};

#[derive(Debug, Display)]
pub enum FeedError {
    Bind(io::Error),
    Send(io::Error),
    Parse(String),
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::Bind(e) | FeedError::Send(e) => Some(e),
            FeedError::Parse(_) => None,
        }
    }
}

/// The producer end of the socket: listens on the path and pushes parameter
/// sets to a single client.
#[derive(Debug)]
pub struct TelemetryFeed {
    listener: UnixListener,
    conn: Option<UnixStream>,
}

impl TelemetryFeed {
    /// Binds a listener at `path`, replacing a stale socket file left behind by an earlier run.
    ///
    /// # Errors
    /// [`FeedError::Bind`] if the stale file cannot be removed or binding fails.
    pub fn bind(path: impl Into<PathBuf>) -> Result<Self, FeedError> {
        let path = path.into();
        match std::fs::remove_file(&path) {
            Ok(()) => log!("Removed stale socket at {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => (),
            Err(e) => return Err(FeedError::Bind(e)),
        }
        info!("Creating socket path in {}", path.display());
        let listener = UnixListener::bind(&path).map_err(FeedError::Bind)?;
        info!("Socket created. Listening for incoming connections");
        Ok(Self { listener, conn: None })
    }

    #[cfg(test)]
    pub fn is_connected(&self) -> bool { self.conn.is_some() }

    /// Sends one parameter set, accepting the client first if there is none.
    ///
    /// A failed write drops the connection, so the next call waits for a new client.
    ///
    /// # Errors
    /// [`FeedError::Send`] if accepting or writing fails.
    pub async fn send(&mut self, params: ParamSet) -> Result<(), FeedError> {
        let mut conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                let (conn, _) = self.listener.accept().await.map_err(FeedError::Send)?;
                info!("Accepted new connection");
                conn
            }
        };
        match conn.write_all(codec::encode(params).as_bytes()).await {
            Ok(()) => {
                self.conn = Some(conn);
                Ok(())
            }
            Err(e) => {
                warn!("Lost simulation client: {e}");
                Err(FeedError::Send(e))
            }
        }
    }

    /// Parses an operator line such as `"5 120"` or `"5,120"`.
    ///
    /// Unlike the simulation-side decoder this is strict: exactly two integers.
    ///
    /// # Errors
    /// [`FeedError::Parse`] carrying the offending line.
    pub fn parse_line(line: &str) -> Result<ParamSet, FeedError> {
        let parse_err = || FeedError::Parse(line.to_string());
        let (speed, altitude) = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|field| !field.is_empty())
            .collect_tuple::<(&str, &str)>()
            .ok_or_else(parse_err)?;
        Ok(ParamSet::new(
            speed.parse().map_err(|_| parse_err())?,
            altitude.parse().map_err(|_| parse_err())?,
        ))
    }

    /// Forwards every valid line of `input` until it reaches EOF.
    ///
    /// Malformed lines and failed sends are logged and skipped.
    ///
    /// # Errors
    /// [`FeedError::Send`] if reading `input` itself fails.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<u64, FeedError> {
        let mut lines = input.lines();
        let mut sent = 0;
        while let Some(line) = lines.next_line().await.map_err(FeedError::Send)? {
            if line.trim().is_empty() {
                continue;
            }
            match Self::parse_line(&line) {
                Ok(params) => match self.send(params).await {
                    Ok(()) => {
                        log!("Sent {params}");
                        sent += 1;
                    }
                    Err(e) => error!("Error sending data: {e:?}"),
                },
                Err(FeedError::Parse(bad)) => warn!("Skipping malformed input line {bad:?}"),
                Err(e) => warn!("Skipping input line: {e:?}"),
            }
        }
        Ok(sent)
    }

    /// [`Self::run`] over standard input.
    ///
    /// # Errors
    /// See [`Self::run`].
    pub async fn run_stdin(&mut self) -> Result<u64, FeedError> {
        self.run(BufReader::new(tokio::io::stdin())).await
    }
}
