//! Dashboard view state
//!
//! An in-memory display surface: addressable elements holding text and a
//! class list, plus the current toast. Rendering reads a snapshot so the UI
//! never holds the lock.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::TOAST_DURATION;
use crate::traits::surface::element;
use crate::traits::{DisplaySurface, ToastKind};

// ============================================================================
// Elements
// ============================================================================

/// Text and class of one element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElementView {
    pub text: String,
    pub class: String,
}

impl ElementView {
    fn new(text: &str, class: &str) -> Self {
        Self {
            text: text.to_string(),
            class: class.to_string(),
        }
    }

    /// Whether the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.class.split_whitespace().any(|c| c == class)
    }
}

// ============================================================================
// Toast
// ============================================================================

/// A transient notification
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
}

impl Toast {
    pub fn is_visible(&self, now: Instant, duration: Duration) -> bool {
        now.saturating_duration_since(self.shown_at) < duration
    }

    /// `toast toast-<kind> show` while visible, `toast toast-<kind>` after.
    pub fn class(&self, visible: bool) -> String {
        if visible {
            format!("toast toast-{} show", self.kind)
        } else {
            format!("toast toast-{}", self.kind)
        }
    }
}

// ============================================================================
// DashboardView
// ============================================================================

#[derive(Debug)]
pub struct DashboardView {
    elements: Mutex<HashMap<String, ElementView>>,
    toast: Mutex<Option<Toast>>,
    toast_duration: Duration,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardView {
    /// A view with every dashboard element, showing disconnected.
    pub fn new() -> Self {
        let mut elements = HashMap::new();
        elements.insert(
            element::CONNECTION_STATUS.to_string(),
            ElementView::new("Disconnected", "status-offline"),
        );
        for id in [
            element::STAT_GUILDS,
            element::STAT_USERS,
            element::STAT_LATENCY,
        ] {
            elements.insert(id.to_string(), ElementView::new("-", "stat-value"));
        }
        elements.insert(
            element::STAT_STATUS.to_string(),
            ElementView::new("-", "stat-value"),
        );
        elements.insert(element::TOAST.to_string(), ElementView::new("", "toast"));

        Self {
            elements: Mutex::new(elements),
            toast: Mutex::new(None),
            toast_duration: TOAST_DURATION,
        }
    }

    pub fn with_toast_duration(mut self, duration: Duration) -> Self {
        self.toast_duration = duration;
        self
    }

    pub fn element(&self, id: &str) -> Option<ElementView> {
        self.elements.lock().ok().and_then(|e| e.get(id).cloned())
    }

    pub fn toast(&self) -> Option<Toast> {
        self.toast.lock().ok().and_then(|t| t.clone())
    }

    /// Copy of everything the UI draws, with the toast class resolved at `now`.
    pub fn snapshot_at(&self, now: Instant) -> DashboardSnapshot {
        let get = |id: &str| self.element(id).unwrap_or_default();
        let toast = self.toast().map(|toast| {
            let visible = toast.is_visible(now, self.toast_duration);
            let view = ElementView {
                text: toast.message.clone(),
                class: toast.class(visible),
            };
            (toast, view)
        });

        DashboardSnapshot {
            connection: get(element::CONNECTION_STATUS),
            guilds: get(element::STAT_GUILDS),
            users: get(element::STAT_USERS),
            latency: get(element::STAT_LATENCY),
            status: get(element::STAT_STATUS),
            toast,
        }
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.snapshot_at(Instant::now())
    }
}

impl DisplaySurface for DashboardView {
    fn has_element(&self, id: &str) -> bool {
        self.elements
            .lock()
            .map(|e| e.contains_key(id))
            .unwrap_or(false)
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Ok(mut elements) = self.elements.lock() {
            if let Some(element) = elements.get_mut(id) {
                element.text = text.to_string();
            }
        }
    }

    fn set_class(&self, id: &str, class: &str) {
        if let Ok(mut elements) = self.elements.lock() {
            if let Some(element) = elements.get_mut(id) {
                element.class = class.to_string();
            }
        }
    }

    fn show_toast(&self, message: &str, kind: ToastKind) {
        let toast = Toast {
            message: message.to_string(),
            kind,
            shown_at: Instant::now(),
        };
        self.set_text(element::TOAST, message);
        self.set_class(element::TOAST, &toast.class(true));
        if let Ok(mut slot) = self.toast.lock() {
            *slot = Some(toast);
        }
    }
}

/// Everything the dashboard draws in one frame
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub connection: ElementView,
    pub guilds: ElementView,
    pub users: ElementView,
    pub latency: ElementView,
    pub status: ElementView,
    /// The last toast and its resolved element state
    pub toast: Option<(Toast, ElementView)>,
}

impl DashboardSnapshot {
    /// The toast while it is still showing.
    pub fn visible_toast(&self) -> Option<&(Toast, ElementView)> {
        self.toast.as_ref().filter(|(_, view)| view.has_class("show"))
    }
}
