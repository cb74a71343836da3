//! The four live stat cards

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::context::RenderContext;
use super::theme::{status_color, COLOR_BORDER, COLOR_DIM};
use crate::view_state::ElementView;

pub fn render(frame: &mut Frame, area: Rect, ctx: &RenderContext) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let snapshot = ctx.snapshot;
    render_card(frame, cards[0], "Guilds", &snapshot.guilds, None);
    render_card(frame, cards[1], "Users", &snapshot.users, None);
    render_card(frame, cards[2], "Latency", &snapshot.latency, Some("ms"));
    render_card(frame, cards[3], "Status", &snapshot.status, None);
}

fn render_card(frame: &mut Frame, area: Rect, title: &str, value: &ElementView, unit: Option<&str>) {
    let text = match unit {
        Some(unit) if !value.text.is_empty() && value.text != "-" => {
            format!("{} {}", value.text, unit)
        }
        _ => value.text.clone(),
    };

    let block = Block::default()
        .title(Line::styled(format!(" {} ", title), Style::default().fg(COLOR_DIM)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_BORDER));
    let paragraph = Paragraph::new(text)
        .style(
            Style::default()
                .fg(status_color(&value.class))
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}
