//! Display surface that writes every change to the log.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::info;

use crate::traits::{DisplaySurface, ToastKind};

/// Every element exists; unchanged writes are not logged.
#[derive(Debug, Default)]
pub struct LogSurface {
    last: Mutex<HashMap<String, String>>,
}

impl LogSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `value` differs from the last value written under `key`.
    fn changed(&self, key: String, value: &str) -> bool {
        match self.last.lock() {
            Ok(mut last) => last.insert(key, value.to_string()).as_deref() != Some(value),
            Err(_) => true,
        }
    }
}

impl DisplaySurface for LogSurface {
    fn has_element(&self, _id: &str) -> bool {
        true
    }

    fn set_text(&self, id: &str, text: &str) {
        if self.changed(format!("{}#text", id), text) {
            info!(element = id, text, "Display updated");
        }
    }

    fn set_class(&self, id: &str, class: &str) {
        if self.changed(format!("{}#class", id), class) {
            info!(element = id, class, "Display class updated");
        }
    }

    fn show_toast(&self, message: &str, kind: ToastKind) {
        info!(%kind, message, "Toast");
    }
}
