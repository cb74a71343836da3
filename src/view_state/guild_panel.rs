//! Guild detail panel view state

use crate::models::{GuildData, GuildStats, MembersPage};

/// What the guild panel shows for the viewed guild
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GuildPanelState {
    pub data: Option<GuildData>,
    pub stats: Option<GuildStats>,
    pub members: Option<MembersPage>,
    /// Requests started and not yet answered
    pub pending: u32,
}

impl GuildPanelState {
    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    pub fn begin_request(&mut self) {
        self.pending += 1;
    }

    pub fn finish_request(&mut self) {
        self.pending = self.pending.saturating_sub(1);
    }

    /// Display name, falling back to the id.
    pub fn title(&self, guild_id: &str) -> String {
        self.data
            .as_ref()
            .and_then(|d| d.name.clone())
            .unwrap_or_else(|| guild_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_counter() {
        let mut panel = GuildPanelState::default();
        panel.begin_request();
        panel.begin_request();
        panel.finish_request();
        assert!(panel.is_loading());
        panel.finish_request();
        panel.finish_request();
        assert!(!panel.is_loading());
    }

    #[test]
    fn test_title_falls_back_to_id() {
        let mut panel = GuildPanelState::default();
        assert_eq!(panel.title("42"), "42");
        panel.data = Some(GuildData {
            name: Some("Tavern".into()),
            ..Default::default()
        });
        assert_eq!(panel.title("42"), "Tavern");
    }
}
