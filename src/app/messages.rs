//! AppMessage enum for async communication within the application.

use crate::models::{GuildData, GuildStats, MembersPage};

/// Results of spawned work, delivered back to the event loop
#[derive(Debug, Clone, PartialEq)]
pub enum AppMessage {
    /// `GET /api/guilds/{id}` finished (`None` after a failure toast)
    GuildData(Option<GuildData>),
    /// `GET /api/guilds/{id}/stats` finished
    GuildStats(Option<GuildStats>),
    /// `GET /api/guilds/{id}/members` finished
    Members(Option<MembersPage>),
    /// `PATCH /api/guilds/{id}` finished with the server's message
    SettingsSaved(Option<String>),
    /// Debounced validity check of the id being typed
    InputChecked { value: String, valid: bool },
}
