//! Engine tunables and session parameters.
//!
//! Loading these from disk belongs to the application; with the `serde`
//! feature both types derive `Serialize`/`Deserialize` so any format
//! crate can do it.

use std::time::Duration;

use crate::split::DEFAULT_BUDGET;
use crate::util::MAX_LINE_LEN;

/// Engine tunables.
///
/// ```
/// use std::time::Duration;
/// use slirc_client::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_message_delay(Duration::from_millis(200))
///     .with_max_nick_retries(None);
/// assert_eq!(config.reconnect_delay, Duration::from_secs(5));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClientConfig {
    /// Interval between two queued (non-urgent) lines.
    pub message_delay: Duration,
    /// Backoff after a failed connect or a dropped session.
    pub reconnect_delay: Duration,
    /// Lower bound of the randomized liveness window.
    pub idle_timeout_min: Duration,
    /// Upper bound of the randomized liveness window.
    pub idle_timeout_max: Duration,
    /// Text encoding label for the wire (`encoding_rs` labels).
    pub encoding: String,
    /// Appended to the nickname on `nicknameinuse`.
    pub nick_suffix: String,
    /// Cap on consecutive nickname retries; `None` retries forever.
    pub max_nick_retries: Option<u32>,
    /// Enable TCP keepalive on the socket.
    pub tcp_keepalive: bool,
    /// Default QUIT reason.
    pub quit_message: String,
    /// Maximum outgoing line length, CRLF included.
    pub max_line_len: usize,
    /// Payload budget used when splitting PRIVMSG/NOTICE bodies.
    pub split_budget: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            message_delay: Duration::from_millis(500),
            reconnect_delay: Duration::from_secs(5),
            idle_timeout_min: Duration::from_secs(250),
            idle_timeout_max: Duration::from_secs(325),
            encoding: "utf-8".to_owned(),
            nick_suffix: "_".to_owned(),
            max_nick_retries: Some(8),
            tcp_keepalive: true,
            quit_message: "Sayonara <3".to_owned(),
            max_line_len: MAX_LINE_LEN,
            split_budget: DEFAULT_BUDGET,
        }
    }
}

impl ClientConfig {
    /// Set the queue drain interval.
    pub fn with_message_delay(mut self, delay: Duration) -> Self {
        self.message_delay = delay;
        self
    }

    /// Set the reconnect backoff.
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Set the liveness window. The bounds are swapped if reversed.
    pub fn with_idle_timeout(mut self, min: Duration, max: Duration) -> Self {
        self.idle_timeout_min = min.min(max);
        self.idle_timeout_max = min.max(max);
        self
    }

    /// Set the wire encoding label.
    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = label.into();
        self
    }

    /// Set the nickname retry suffix.
    pub fn with_nick_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.nick_suffix = suffix.into();
        self
    }

    /// Set the nickname retry cap.
    pub fn with_max_nick_retries(mut self, retries: Option<u32>) -> Self {
        self.max_nick_retries = retries;
        self
    }

    /// Enable or disable TCP keepalive.
    pub fn with_tcp_keepalive(mut self, enabled: bool) -> Self {
        self.tcp_keepalive = enabled;
        self
    }

    /// Set the default QUIT reason.
    pub fn with_quit_message(mut self, message: impl Into<String>) -> Self {
        self.quit_message = message.into();
        self
    }

    /// Draw an idle timeout uniformly from the liveness window.
    pub fn random_idle_timeout(&self) -> Duration {
        use rand::Rng;

        let min = self.idle_timeout_min.as_millis() as u64;
        let max = self.idle_timeout_max.as_millis() as u64;
        if max <= min {
            return self.idle_timeout_min;
        }
        Duration::from_millis(rand::thread_rng().gen_range(min..max))
    }
}

/// Where and as whom to connect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectParams {
    /// Server hostname or address.
    pub server: String,
    /// Server port.
    pub port: u16,
    /// Desired nickname.
    pub nick: String,
    /// Username (ident).
    pub user: String,
    /// Real name / GECOS.
    pub realname: String,
}

impl ConnectParams {
    /// Bundle session parameters.
    pub fn new(
        server: impl Into<String>,
        port: u16,
        nick: impl Into<String>,
        user: impl Into<String>,
        realname: impl Into<String>,
    ) -> Self {
        ConnectParams {
            server: server.into(),
            port,
            nick: nick.into(),
            user: user.into(),
            realname: realname.into(),
        }
    }
}
