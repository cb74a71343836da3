//! Display surface trait abstraction.
//!
//! The controller never owns the display; it writes text and classes to
//! elements addressed by id, and shows transient toasts. Elements the
//! surface does not have are skipped by callers.

use std::fmt;

/// Element ids known to the dashboard.
pub mod element {
    pub const CONNECTION_STATUS: &str = "connection-status";
    pub const STAT_GUILDS: &str = "stat-guilds";
    pub const STAT_USERS: &str = "stat-users";
    pub const STAT_LATENCY: &str = "stat-latency";
    pub const STAT_STATUS: &str = "stat-status";
    pub const TOAST: &str = "toast";
}

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Success => "success",
            ToastKind::Warning => "warning",
            ToastKind::Error => "error",
        }
    }
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for the display the controller reflects its state into.
pub trait DisplaySurface: Send + Sync {
    /// Whether an element with this id exists.
    fn has_element(&self, id: &str) -> bool;

    /// Replace the element's text.
    fn set_text(&self, id: &str, text: &str);

    /// Replace the element's class list.
    fn set_class(&self, id: &str, class: &str);

    /// Show a transient notification.
    fn show_toast(&self, message: &str, kind: ToastKind);
}
