//! Guild detail panel: settings summary, row counts and the member page

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::context::RenderContext;
use super::theme::{COLOR_ACCENT, COLOR_BORDER, COLOR_DIM, COLOR_ERROR, COLOR_GUILD, COLOR_SUCCESS};
use crate::models::{GuildData, GuildStats, MembersPage};
use crate::utils::{format_count, format_number};

pub fn render(frame: &mut Frame, area: Rect, ctx: &RenderContext) {
    let Some(guild_id) = ctx.guild_id else {
        let hint = Paragraph::new("No guild selected. Start with --guild <id> to open one.")
            .style(Style::default().fg(COLOR_DIM))
            .block(panel_block(" Guild ".to_string()));
        frame.render_widget(hint, area);
        return;
    };

    let mut title = format!(" {} ", ctx.panel.title(guild_id));
    if ctx.panel.is_loading() {
        title.push_str("(loading) ");
    }
    let block = panel_block(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(inner);

    let mut left = settings_lines(guild_id, ctx.panel.data.as_ref());
    left.push(Line::raw(""));
    left.extend(stats_lines(ctx.panel.stats.as_ref()));
    frame.render_widget(Paragraph::new(left), columns[0]);

    frame.render_widget(
        Paragraph::new(member_lines(ctx.panel.members.as_ref())),
        columns[1],
    );
}

fn panel_block(title: String) -> Block<'static> {
    Block::default()
        .title(Line::styled(
            title,
            Style::default().fg(COLOR_GUILD).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_BORDER))
}

fn label_value(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<14}", label), Style::default().fg(COLOR_DIM)),
        Span::styled(value, Style::default().fg(COLOR_ACCENT)),
    ])
}

fn settings_lines(guild_id: &str, data: Option<&GuildData>) -> Vec<Line<'static>> {
    let mut lines = vec![label_value("id", guild_id.to_string())];
    let Some(data) = data else {
        return lines;
    };
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

    lines.push(label_value("prefix", or_dash(&data.prefix)));
    lines.push(label_value("language", or_dash(&data.language)));
    lines.push(label_value("log channel", or_dash(&data.log_channel_id)));
    lines.push(label_value("mute role", or_dash(&data.mute_role_id)));

    let features: Vec<Span<'static>> = data
        .features()
        .into_iter()
        .map(|(name, enabled)| {
            let color = if enabled { COLOR_SUCCESS } else { COLOR_ERROR };
            Span::styled(format!("{} ", name), Style::default().fg(color))
        })
        .collect();
    lines.push(Line::from(features));
    lines
}

fn stats_lines(stats: Option<&GuildStats>) -> Vec<Line<'static>> {
    let Some(stats) = stats else {
        return Vec::new();
    };
    vec![
        label_value("members", format_count(stats.total_members)),
        label_value("warnings", format_number(stats.total_warnings)),
        label_value("tickets", format_number(stats.total_tickets)),
        label_value("giveaways", format_number(stats.total_giveaways)),
        label_value("autoroles", format_number(stats.total_autoroles)),
        label_value("level roles", format_number(stats.total_level_roles)),
    ]
}

fn member_lines(page: Option<&MembersPage>) -> Vec<Line<'static>> {
    let Some(page) = page else {
        return vec![Line::styled(
            "press m to load members",
            Style::default().fg(COLOR_DIM),
        )];
    };

    let mut lines = vec![Line::styled(
        format!(
            "{:>4}  {:<20} {:>6} {:>8} {:>8}",
            "#", "member", "level", "xp", "messages"
        ),
        Style::default().fg(COLOR_DIM),
    )];
    for (i, member) in page.members.iter().enumerate() {
        let rank = page.offset as usize + i + 1;
        lines.push(Line::raw(format!(
            "{:>4}  {:<20} {:>6} {:>8} {:>8}",
            rank,
            member.id,
            member.level,
            format_number(member.xp),
            format_number(member.messages_count)
        )));
    }
    if page.members.is_empty() {
        lines.push(Line::styled("no members on this page", Style::default().fg(COLOR_DIM)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Member;

    #[test]
    fn test_member_lines_rank_from_offset() {
        let page = MembersPage {
            members: vec![Member {
                id: "10".into(),
                xp: 1500,
                ..Default::default()
            }],
            limit: 50,
            offset: 50,
        };
        let lines = member_lines(Some(&page));
        let row: String = lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(row.trim_start().starts_with("51"));
        assert!(row.contains("1.5K"));
    }

    #[test]
    fn test_stats_lines_empty_without_stats() {
        assert!(stats_lines(None).is_empty());
        assert_eq!(stats_lines(Some(&GuildStats::default())).len(), 6);
    }
}
