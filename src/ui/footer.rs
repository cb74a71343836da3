//! Bottom lines: toast, id input and key hints

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::context::RenderContext;
use super::theme::{toast_color, COLOR_ACCENT, COLOR_DIM, COLOR_ERROR, COLOR_SUCCESS};
use crate::view_state::IdInput;

pub fn render_toast(frame: &mut Frame, area: Rect, ctx: &RenderContext) {
    let Some((toast, _)) = ctx.snapshot.visible_toast() else {
        return;
    };
    let line = Line::styled(
        format!(" {} ", toast.message),
        Style::default()
            .fg(toast_color(toast.kind))
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(Paragraph::new(line), area);
}

pub fn render_input(frame: &mut Frame, area: Rect, input: &IdInput) {
    let (marker, color) = match input.valid {
        Some(true) => ("\u{2713}", COLOR_SUCCESS),
        Some(false) => ("\u{2717}", COLOR_ERROR),
        None => (" ", COLOR_DIM),
    };
    let line = Line::from(vec![
        Span::styled(format!(" {}: ", input.kind.label()), Style::default().fg(COLOR_DIM)),
        Span::styled(input.value.clone(), Style::default().fg(COLOR_ACCENT)),
        Span::styled("\u{2588}", Style::default().fg(COLOR_ACCENT)),
        Span::styled(format!(" {}", marker), Style::default().fg(color)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Key hints for the current mode.
pub fn footer_hint(ctx: &RenderContext) -> &'static str {
    if ctx.input.is_some() {
        "enter save  esc cancel"
    } else if ctx.guild_id.is_some() {
        "q quit  p ping  r reload  m members  [ ] page  y copy id  c channel  o role"
    } else {
        "q quit  p ping"
    }
}

pub fn render_hints(frame: &mut Frame, area: Rect, ctx: &RenderContext) {
    let line = Line::styled(format!(" {}", footer_hint(ctx)), Style::default().fg(COLOR_DIM));
    frame.render_widget(Paragraph::new(line), area);
}
