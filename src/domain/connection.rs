//! Connection state management.
//!
//! This module provides [`ConnectionState`], the two-state status of the
//! realtime link, and [`ReconnectCounter`], the connect-error count that pins
//! the status indicator to disconnected once it reaches its ceiling.

/// Status of the realtime connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    /// Class applied to the status indicator.
    pub fn indicator_class(&self) -> &'static str {
        match self {
            ConnectionState::Connected => "status-online",
            ConnectionState::Disconnected => "status-offline",
        }
    }

    /// Text shown in the status indicator.
    pub fn indicator_text(&self) -> &'static str {
        match self {
            ConnectionState::Connected => "Connected",
            ConnectionState::Disconnected => "Disconnected",
        }
    }
}

/// Count of consecutive connect errors.
///
/// Reset on every successful connect. Reaching the ceiling does not stop the
/// transport from retrying; it only tells the owner to show disconnected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectCounter {
    attempts: u32,
    max: u32,
}

impl ReconnectCounter {
    pub fn new(max: u32) -> Self {
        Self { attempts: 0, max }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    /// Record a connect error. Returns true once the ceiling is reached.
    pub fn record_failure(&mut self) -> bool {
        self.attempts = self.attempts.saturating_add(1);
        self.is_exhausted()
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max
    }
}

impl Default for ReconnectCounter {
    fn default() -> Self {
        Self::new(5)
    }
}
