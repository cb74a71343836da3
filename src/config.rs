//! Dashboard configuration.
//!
//! Configuration comes from environment variables and is then overridden by
//! command-line arguments. There is no config file.
//!
//! # Example
//!
//! ```
//! use guild_dash::config::DashboardConfig;
//!
//! let config = DashboardConfig::default()
//!     .with_base_url("http://localhost:8080")
//!     .with_guild_id("123456789012345678");
//! assert_eq!(config.location_path(), "/dashboard/123456789012345678");
//! ```

use std::time::Duration;

/// Environment variable holding the panel base URL.
pub const ENV_URL: &str = "GUILD_DASH_URL";
/// Environment variable holding the panel session cookie.
pub const ENV_SESSION: &str = "GUILD_DASH_SESSION";
/// Environment variable holding the guild to open.
pub const ENV_GUILD: &str = "GUILD_DASH_GUILD";

/// Interval between liveness pings.
pub const PING_INTERVAL: Duration = Duration::from_secs(30);

/// How long a toast stays visible.
pub const TOAST_DURATION: Duration = Duration::from_millis(3000);

/// Realtime transport flavours, tried in order on each connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    WebSocket,
    Polling,
}

impl TransportKind {
    /// Value of the Engine.IO `transport` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            TransportKind::WebSocket => "websocket",
            TransportKind::Polling => "polling",
        }
    }
}

/// Options handed to the transport when the controller initializes it.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportOptions {
    pub transports: Vec<TransportKind>,
    /// Whether the transport reconnects on its own after a failure
    pub reconnection: bool,
    /// First retry delay
    pub reconnection_delay: Duration,
    /// Upper bound of the retry delay
    pub reconnection_delay_max: Duration,
    /// Retries before the transport gives up
    pub reconnection_attempts: u32,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            transports: vec![TransportKind::WebSocket, TransportKind::Polling],
            reconnection: true,
            reconnection_delay: Duration::from_millis(1000),
            reconnection_delay_max: Duration::from_millis(5000),
            reconnection_attempts: 5,
        }
    }
}

impl TransportOptions {
    /// Delay before retry number `attempt` (1-based): doubles from the
    /// initial delay and is capped at the maximum.
    pub fn reconnect_delay(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        let delay = self.reconnection_delay.saturating_mul(1u32 << shift);
        delay.min(self.reconnection_delay_max)
    }
}

/// Top-level dashboard configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Base URL of the control panel (e.g. `http://localhost:8080`)
    pub base_url: Option<String>,
    /// Value of the panel's `session` cookie
    pub session_cookie: Option<String>,
    /// Guild shown in the detail panel
    pub guild_id: Option<String>,
    /// Run without the terminal UI
    pub headless: bool,
    pub transport: TransportOptions,
    pub ping_interval: Duration,
    /// Display ceiling for consecutive connect errors
    pub max_reconnect_attempts: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            session_cookie: None,
            guild_id: None,
            headless: false,
            transport: TransportOptions::default(),
            ping_interval: PING_INTERVAL,
            max_reconnect_attempts: 5,
        }
    }
}

impl DashboardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    pub fn with_guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = Some(guild_id.into());
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_ping_interval(mut self, interval: Duration) -> Self {
        self.ping_interval = interval;
        self
    }

    pub fn with_transport(mut self, transport: TransportOptions) -> Self {
        self.transport = transport;
        self
    }

    /// Build from `GUILD_DASH_*` environment variables. Empty values count as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();
        if let Some(url) = read(ENV_URL) {
            config = config.with_base_url(url);
        }
        if let Some(session) = read(ENV_SESSION) {
            config = config.with_session_cookie(session);
        }
        if let Some(guild) = read(ENV_GUILD) {
            config = config.with_guild_id(guild);
        }
        config
    }

    /// Navigation path the dashboard is "on".
    pub fn location_path(&self) -> String {
        match &self.guild_id {
            Some(id) => format!("/dashboard/{}", id),
            None => "/dashboard".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_transport_options_default() {
        let options = TransportOptions::default();
        assert_eq!(
            options.transports,
            vec![TransportKind::WebSocket, TransportKind::Polling]
        );
        assert!(options.reconnection);
        assert_eq!(options.reconnection_delay, Duration::from_millis(1000));
        assert_eq!(options.reconnection_delay_max, Duration::from_millis(5000));
        assert_eq!(options.reconnection_attempts, 5);
    }

    #[test]
    fn test_reconnect_delay_is_capped() {
        let options = TransportOptions::default();
        assert_eq!(options.reconnect_delay(1), Duration::from_millis(1000));
        assert_eq!(options.reconnect_delay(2), Duration::from_millis(2000));
        assert_eq!(options.reconnect_delay(3), Duration::from_millis(4000));
        assert_eq!(options.reconnect_delay(4), Duration::from_millis(5000));
        assert_eq!(options.reconnect_delay(40), Duration::from_millis(5000));
    }

    #[test]
    fn test_dashboard_config_default() {
        let config = DashboardConfig::default();
        assert!(config.base_url.is_none());
        assert!(!config.headless);
        assert_eq!(config.ping_interval, Duration::from_secs(30));
        assert_eq!(config.max_reconnect_attempts, 5);
        assert_eq!(config.location_path(), "/dashboard");
    }

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let config = DashboardConfig::new().with_base_url("http://panel.local/");
        assert_eq!(config.base_url.as_deref(), Some("http://panel.local"));
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (ENV_URL, "https://panel.example.com"),
            (ENV_SESSION, "abc"),
            (ENV_GUILD, "  "),
        ]
        .into_iter()
        .collect();
        let config = DashboardConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.base_url.as_deref(), Some("https://panel.example.com"));
        assert_eq!(config.session_cookie.as_deref(), Some("abc"));
        assert!(config.guild_id.is_none());
    }
}
