//! Text escaping and Discord mention rendering.

use once_cell::sync::Lazy;
use regex::Regex;

static USER_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<@!?([0-9]+)>").expect("Invalid user mention regex"));
static ROLE_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<@&([0-9]+)>").expect("Invalid role mention regex"));
static CHANNEL_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<#([0-9]+)>").expect("Invalid channel mention regex"));

/// Escape text for use as an HTML text node.
///
/// Quotes are left alone; a non-breaking space becomes `&nbsp;`.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Replace raw mentions with readable placeholders.
pub fn parse_discord_mentions(text: &str) -> String {
    let text = USER_MENTION.replace_all(text, "@User");
    let text = ROLE_MENTION.replace_all(&text, "@Role");
    CHANNEL_MENTION.replace_all(&text, "#channel").into_owned()
}
