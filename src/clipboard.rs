//! Copying text to the clipboard.
//!
//! Two interchangeable strategies sit behind [`ClipboardWriter`]: the system
//! clipboard through `arboard`, and an OSC 52 escape sequence that asks the
//! terminal to set its clipboard (works over SSH). [`select_clipboard_writer`]
//! picks one at startup.

use std::io::{self, Write};
use std::sync::Mutex;

use arboard::Clipboard;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tracing::{debug, error};

use crate::traits::{DisplaySurface, ToastKind};

/// Error type for clipboard operations
#[derive(Debug)]
pub enum ClipboardError {
    /// Failed to access the clipboard
    ClipboardAccess(String),
    /// Failed to write the escape sequence to the terminal
    Terminal(String),
}

impl std::fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardError::ClipboardAccess(msg) => write!(f, "Clipboard error: {}", msg),
            ClipboardError::Terminal(msg) => write!(f, "Terminal write failed: {}", msg),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// A way of putting text on the clipboard.
pub trait ClipboardWriter: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// The OS clipboard (NSPasteboard on macOS, X11/Wayland on Linux).
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    /// Whether the OS clipboard can be opened at all.
    pub fn is_available() -> bool {
        Clipboard::new().is_ok()
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            Clipboard::new().map_err(|e| ClipboardError::ClipboardAccess(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::ClipboardAccess(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "system"
    }
}

/// Sets the terminal's clipboard with an OSC 52 escape sequence.
pub struct Osc52Clipboard<W: Write + Send> {
    out: Mutex<W>,
}

impl Osc52Clipboard<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> Option<W> {
        self.out.into_inner().ok()
    }
}

/// `ESC ] 52 ; c ; <base64> BEL`
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", BASE64.encode(text))
}

impl<W: Write + Send> ClipboardWriter for Osc52Clipboard<W> {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut out = self
            .out
            .lock()
            .map_err(|e| ClipboardError::Terminal(e.to_string()))?;
        out.write_all(osc52_sequence(text).as_bytes())
            .and_then(|_| out.flush())
            .map_err(|e| ClipboardError::Terminal(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "osc52"
    }
}

/// Pick the clipboard strategy for this session.
///
/// Over SSH the local machine's clipboard is the one the user wants, so the
/// terminal escape is used; otherwise the system clipboard when it opens.
pub fn select_clipboard_writer() -> Box<dyn ClipboardWriter> {
    let over_ssh =
        std::env::var_os("SSH_TTY").is_some() || std::env::var_os("SSH_CONNECTION").is_some();
    let writer: Box<dyn ClipboardWriter> = if !over_ssh && SystemClipboard::is_available() {
        Box::new(SystemClipboard)
    } else {
        Box::new(Osc52Clipboard::stdout())
    };
    debug!(strategy = writer.name(), "Selected clipboard strategy");
    writer
}

/// Copy `text` and report the outcome with a toast.
pub fn copy_to_clipboard(
    writer: &dyn ClipboardWriter,
    text: &str,
    surface: &dyn DisplaySurface,
) -> bool {
    match writer.write_text(text) {
        Ok(()) => {
            surface.show_toast("Copied to clipboard!", ToastKind::Success);
            true
        }
        Err(e) => {
            error!(error = %e, strategy = writer.name(), "Failed to copy");
            surface.show_toast("Failed to copy", ToastKind::Error);
            false
        }
    }
}
