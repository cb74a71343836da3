//! UI rendering for the dashboard
//!
//! Rendering is a pure function of a [`RenderContext`]: the app assembles one
//! per frame from the view snapshot and its own panel state.
//!
//! ```text
//! header   connection indicator
//! stats    guilds | users | latency | status
//! guild    settings, counts, members
//! toast
//! input    (while editing an id)
//! hints
//! ```

mod context;
mod footer;
mod guild_panel;
mod header;
mod stats;
pub mod theme;

pub use context::RenderContext;
pub use footer::footer_hint;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub fn render(frame: &mut Frame, ctx: &RenderContext) {
    let input_height = if ctx.input.is_some() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(1),
            Constraint::Length(input_height),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(frame, chunks[0], ctx);
    stats::render(frame, chunks[1], ctx);
    guild_panel::render(frame, chunks[2], ctx);
    footer::render_toast(frame, chunks[3], ctx);
    if let Some(input) = ctx.input {
        footer::render_input(frame, chunks[4], input);
    }
    footer::render_hints(frame, chunks[5], ctx);
}
