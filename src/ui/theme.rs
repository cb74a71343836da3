//! Color theme constants for the dashboard
//!
//! Defines the minimal dark palette and maps element classes to colors.

use ratatui::style::Color;

use crate::traits::ToastKind;

// ============================================================================
// Minimal Dark Color Theme
// ============================================================================

/// Primary border color - dark gray for minimal aesthetic
pub const COLOR_BORDER: Color = Color::DarkGray;

/// Accent color - white for highlights and important elements
pub const COLOR_ACCENT: Color = Color::White;

/// Header text color
pub const COLOR_HEADER: Color = Color::White;

/// Dim text for less important info
pub const COLOR_DIM: Color = Color::DarkGray;

/// Online / success - green #04B575
pub const COLOR_SUCCESS: Color = Color::Rgb(4, 181, 117);

pub const COLOR_ERROR: Color = Color::Red;

pub const COLOR_WARNING: Color = Color::Yellow;

/// Info toasts - blue #007ACC
pub const COLOR_INFO: Color = Color::Rgb(0, 122, 204);

/// Discord blurple for the guild panel title
pub const COLOR_GUILD: Color = Color::Rgb(88, 101, 242);

// ============================================================================
// Class mapping
// ============================================================================

/// Color for an element class list (`status-online`, `stat-value status-idle`, ...).
pub fn status_color(class: &str) -> Color {
    let status = class
        .split_whitespace()
        .find_map(|c| c.strip_prefix("status-"));
    match status {
        Some("online") => COLOR_SUCCESS,
        Some("offline") | Some("dnd") => COLOR_ERROR,
        Some("idle") => COLOR_WARNING,
        Some(_) => COLOR_ACCENT,
        None => COLOR_ACCENT,
    }
}

pub fn toast_color(kind: ToastKind) -> Color {
    match kind {
        ToastKind::Info => COLOR_INFO,
        ToastKind::Success => COLOR_SUCCESS,
        ToastKind::Warning => COLOR_WARNING,
        ToastKind::Error => COLOR_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_color() {
        assert_eq!(status_color("status-online"), COLOR_SUCCESS);
        assert_eq!(status_color("status-offline"), COLOR_ERROR);
        assert_eq!(status_color("stat-value status-idle"), COLOR_WARNING);
        assert_eq!(status_color("stat-value"), COLOR_ACCENT);
    }
}
