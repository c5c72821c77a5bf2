use crate::{info, warn};
use std::{env, path::PathBuf, str::FromStr, time::Duration};
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, IntoStaticStr};

/// Environment variables understood by [`SimConfig::from_env`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
pub enum EnvVar {
    #[strum(serialize = "ORBITSIM_SOCKET_PATH")]
    SocketPath,
    #[strum(serialize = "ORBITSIM_MAX_RETRIES")]
    MaxRetries,
    #[strum(serialize = "ORBITSIM_RETRY_BACKOFF_MS")]
    RetryBackoff,
    #[strum(serialize = "ORBITSIM_POLL_TIMEOUT_MS")]
    PollTimeout,
    #[strum(serialize = "ORBITSIM_FRAME_DELAY_MS")]
    FrameDelay,
    #[strum(serialize = "ORBITSIM_MAX_TICKS")]
    MaxTicks,
    #[strum(serialize = "ORBITSIM_REQUIRE_TELEMETRY")]
    RequireTelemetry,
}

impl EnvVar {
    pub fn key(self) -> &'static str { self.into() }

    /// Parses `raw`, falling back to `default` if it is absent or malformed.
    fn parse_or<T: FromStr>(self, raw: Option<&str>, default: T) -> T {
        match raw {
            None => default,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Ignoring malformed {}={raw:?}, using default", self.key());
                default
            }),
        }
    }

    fn millis_or(self, raw: Option<&str>, default: Duration) -> Duration {
        let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(self.parse_or(raw, default_ms))
    }

    /// `1/true/yes/on` and `0/false/no/off`, case-insensitive. Anything else warns and is `false`.
    fn flag(self, raw: Option<&str>) -> bool {
        match raw.map(str::to_ascii_lowercase).as_deref() {
            None | Some("0" | "false" | "no" | "off") => false,
            Some("1" | "true" | "yes" | "on") => true,
            Some(other) => {
                warn!("Ignoring malformed {}={other:?}, treating as off", self.key());
                false
            }
        }
    }
}

/// Immutable runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct SimConfig {
    socket_path: PathBuf,
    max_retries: u32,
    retry_backoff: Duration,
    poll_timeout: Duration,
    frame_delay: Duration,
    max_ticks: Option<u64>,
    require_telemetry: bool,
    /// Variables that were present (and non-empty) in the lookup.
    overridden: Vec<EnvVar>,
}

impl SimConfig {
    pub const DEF_SOCKET_PATH: &'static str = "/tmp/data_socket";
    pub const DEF_MAX_RETRIES: u32 = 3;
    pub const DEF_RETRY_BACKOFF: Duration = Duration::from_secs(1);
    pub const DEF_POLL_TIMEOUT: Duration = Duration::from_millis(10);
    pub const DEF_FRAME_DELAY: Duration = Duration::from_millis(10);

    pub fn from_env() -> Self { Self::from_lookup(|key| env::var(key).ok()) }

    /// Builds the config from `lookup`, which maps a variable name to its raw value.
    ///
    /// Empty values count as unset. Malformed values fall back to the default
    /// with a warning. A tick limit of `0` means unbounded.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let values: Vec<(EnvVar, String)> = EnvVar::iter()
            .filter_map(|var| {
                let raw = lookup(var.key())?;
                let trimmed = raw.trim();
                (!trimmed.is_empty()).then(|| (var, trimmed.to_string()))
            })
            .collect();
        let raw = |var: EnvVar| values.iter().find(|(v, _)| *v == var).map(|(_, s)| s.as_str());

        Self {
            socket_path: raw(EnvVar::SocketPath)
                .map_or_else(|| PathBuf::from(Self::DEF_SOCKET_PATH), PathBuf::from),
            max_retries: EnvVar::MaxRetries.parse_or(raw(EnvVar::MaxRetries), Self::DEF_MAX_RETRIES),
            retry_backoff: EnvVar::RetryBackoff.millis_or(raw(EnvVar::RetryBackoff), Self::DEF_RETRY_BACKOFF),
            poll_timeout: EnvVar::PollTimeout.millis_or(raw(EnvVar::PollTimeout), Self::DEF_POLL_TIMEOUT),
            frame_delay: EnvVar::FrameDelay.millis_or(raw(EnvVar::FrameDelay), Self::DEF_FRAME_DELAY),
            max_ticks: Some(EnvVar::MaxTicks.parse_or(raw(EnvVar::MaxTicks), 0u64)).filter(|t| *t > 0),
            require_telemetry: EnvVar::RequireTelemetry.flag(raw(EnvVar::RequireTelemetry)),
            overridden: values.iter().map(|(var, _)| *var).collect(),
        }
    }

    pub fn log_summary(&self) {
        info!(
            "Socket {} | {} retries every {}ms | poll {}ms | frame {}ms | ticks {}",
            self.socket_path.display(),
            self.max_retries,
            self.retry_backoff.as_millis(),
            self.poll_timeout.as_millis(),
            self.frame_delay.as_millis(),
            self.max_ticks.map_or_else(|| "unbounded".to_string(), |t| t.to_string())
        );
        if !self.overridden.is_empty() {
            let keys: Vec<&str> = self.overridden.iter().map(|var| var.key()).collect();
            info!("Overridden from environment: {}", keys.join(", "));
        }
    }

    pub fn socket_path(&self) -> &PathBuf { &self.socket_path }
    pub fn max_retries(&self) -> u32 { self.max_retries }
    pub fn retry_backoff(&self) -> Duration { self.retry_backoff }
    pub fn poll_timeout(&self) -> Duration { self.poll_timeout }
    pub fn frame_delay(&self) -> Duration { self.frame_delay }
    pub fn max_ticks(&self) -> Option<u64> { self.max_ticks }
    pub fn require_telemetry(&self) -> bool { self.require_telemetry }
}

#[cfg(test)]
impl SimConfig {
    /// Defaults with a caller-provided socket path, independent of the environment.
    pub fn with_socket_path(path: impl Into<PathBuf>) -> Self {
        Self { socket_path: path.into(), ..Self::from_lookup(|_| None) }
    }

    pub fn overridden(&self) -> &[EnvVar] { &self.overridden }

    #[must_use]
    pub fn retries(mut self, max_retries: u32, backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff = backoff;
        self
    }

    #[must_use]
    pub fn timing(mut self, poll_timeout: Duration, frame_delay: Duration) -> Self {
        self.poll_timeout = poll_timeout;
        self.frame_delay = frame_delay;
        self
    }

    #[must_use]
    pub fn tick_limit(mut self, max_ticks: Option<u64>) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    #[must_use]
    pub fn telemetry_required(mut self, required: bool) -> Self {
        self.require_telemetry = required;
        self
    }
}
