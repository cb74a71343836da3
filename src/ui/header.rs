//! Header: title, panel URL and the connection indicator

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::context::RenderContext;
use super::theme::{status_color, COLOR_BORDER, COLOR_DIM, COLOR_HEADER};

pub fn render(frame: &mut Frame, area: Rect, ctx: &RenderContext) {
    let connection = &ctx.snapshot.connection;
    let indicator = if connection.has_class("status-online") {
        '\u{25CF}'
    } else {
        '\u{25CB}'
    };
    let color = status_color(&connection.class);

    let mut spans = vec![
        Span::styled(
            " guild-dash ",
            Style::default().fg(COLOR_HEADER).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            ctx.base_url.unwrap_or("offline"),
            Style::default().fg(COLOR_DIM),
        ),
        Span::raw("   "),
        Span::styled(format!("{} {}", indicator, connection.text), Style::default().fg(color)),
    ];
    if let Some(rtt) = ctx.round_trip {
        spans.push(Span::styled(
            format!("  rtt {}ms", rtt.as_millis()),
            Style::default().fg(COLOR_DIM),
        ));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(COLOR_BORDER));
    let paragraph = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Left)
        .block(block);
    frame.render_widget(paragraph, area);
}
