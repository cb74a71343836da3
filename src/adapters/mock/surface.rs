//! Recording display surface.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::traits::surface::element;
use crate::traits::{DisplaySurface, ToastKind};

/// A single element's state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementState {
    pub text: String,
    pub class: String,
    /// Number of writes (text or class) to this element
    pub writes: usize,
}

/// In-memory surface recording every write, for tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    elements: Mutex<HashMap<String, ElementState>>,
    toasts: Mutex<Vec<(String, ToastKind)>>,
}

impl RecordingSurface {
    /// A surface with no elements at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A surface with the standard dashboard elements.
    pub fn dashboard() -> Self {
        Self::with_elements(&[
            element::CONNECTION_STATUS,
            element::STAT_GUILDS,
            element::STAT_USERS,
            element::STAT_LATENCY,
            element::STAT_STATUS,
            element::TOAST,
        ])
    }

    pub fn with_elements(ids: &[&str]) -> Self {
        let surface = Self::default();
        if let Ok(mut elements) = surface.elements.lock() {
            for id in ids {
                elements.insert(id.to_string(), ElementState::default());
            }
        }
        surface
    }

    pub fn element(&self, id: &str) -> Option<ElementState> {
        self.elements.lock().ok().and_then(|e| e.get(id).cloned())
    }

    pub fn text(&self, id: &str) -> Option<String> {
        self.element(id).map(|e| e.text)
    }

    pub fn class(&self, id: &str) -> Option<String> {
        self.element(id).map(|e| e.class)
    }

    pub fn toasts(&self) -> Vec<(String, ToastKind)> {
        self.toasts.lock().map(|t| t.clone()).unwrap_or_default()
    }

    pub fn last_toast(&self) -> Option<(String, ToastKind)> {
        self.toasts().pop()
    }
}

impl DisplaySurface for RecordingSurface {
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
                element.writes += 1;
            }
        }
    }

    fn set_class(&self, id: &str, class: &str) {
        if let Ok(mut elements) = self.elements.lock() {
            if let Some(element) = elements.get_mut(id) {
                element.class = class.to_string();
                element.writes += 1;
            }
        }
    }

    fn show_toast(&self, message: &str, kind: ToastKind) {
        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.push((message.to_string(), kind));
        }
    }
}
