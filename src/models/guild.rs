//! Guild data models
//!
//! Every field tolerates a missing key so a partial or older server response
//! still decodes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Guild list
// ============================================================================

/// A guild the logged-in user can see, from `GET /api/guilds`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct GuildSummary {
    pub id: String,
    pub name: String,
    /// CDN URL of the icon, when the guild has one
    pub icon: Option<String>,
    pub owner: bool,
    pub permissions: u64,
}

impl GuildSummary {
    /// Administrator or Manage Guild.
    pub fn can_manage(&self) -> bool {
        self.owner || self.permissions & 0x8 == 0x8 || self.permissions & 0x20 == 0x20
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct GuildList {
    pub guilds: Vec<GuildSummary>,
}

// ============================================================================
// Guild settings
// ============================================================================

/// Settings of one guild, from `GET /api/guilds/{id}`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct GuildData {
    pub id: String,
    pub name: Option<String>,
    pub prefix: Option<String>,
    pub language: Option<String>,
    pub welcome_enabled: Option<bool>,
    pub welcome_channel_id: Option<String>,
    pub welcome_message: Option<String>,
    pub goodbye_enabled: Option<bool>,
    pub goodbye_channel_id: Option<String>,
    pub goodbye_message: Option<String>,
    pub log_channel_id: Option<String>,
    pub log_events: Option<HashMap<String, bool>>,
    pub level_enabled: Option<bool>,
    pub level_channel_id: Option<String>,
    pub level_message: Option<String>,
    pub moderation_enabled: Option<bool>,
    pub mute_role_id: Option<String>,
    pub tickets_enabled: Option<bool>,
    pub tickets_category_id: Option<String>,
    pub tickets_log_channel_id: Option<String>,
    pub voice_channels_enabled: Option<bool>,
    pub voice_channels_category_id: Option<String>,
    pub voice_channels_template: Option<String>,
}

impl GuildData {
    /// Feature toggles in display order, with their labels.
    pub fn features(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("Welcome", self.welcome_enabled.unwrap_or(false)),
            ("Goodbye", self.goodbye_enabled.unwrap_or(false)),
            ("Levels", self.level_enabled.unwrap_or(false)),
            ("Moderation", self.moderation_enabled.unwrap_or(false)),
            ("Tickets", self.tickets_enabled.unwrap_or(false)),
            ("Voice channels", self.voice_channels_enabled.unwrap_or(false)),
        ]
    }
}

/// Partial settings update for `PATCH /api/guilds/{id}`.
///
/// Only fields that are set are serialized, so the server leaves the rest
/// alone.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GuildSettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub welcome_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub welcome_channel_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goodbye_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goodbye_channel_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_channel_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_channel_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderation_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mute_role_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickets_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickets_log_channel_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_channels_enabled: Option<bool>,
}

impl GuildSettingsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the channel or role field named by an id input.
    ///
    /// Returns false for an unknown field name.
    pub fn set_id_field(&mut self, field: &str, id: u64) -> bool {
        let slot = match field {
            "welcome_channel_id" => &mut self.welcome_channel_id,
            "goodbye_channel_id" => &mut self.goodbye_channel_id,
            "log_channel_id" => &mut self.log_channel_id,
            "level_channel_id" => &mut self.level_channel_id,
            "tickets_log_channel_id" => &mut self.tickets_log_channel_id,
            "mute_role_id" => &mut self.mute_role_id,
            _ => return false,
        };
        *slot = Some(id);
        true
    }
}

/// `{success, message}` body returned by mutating endpoints
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ActionResponse {
    pub success: bool,
    pub message: Option<String>,
}

// ============================================================================
// Stats and members
// ============================================================================

/// Row counts for one guild, from `GET /api/guilds/{id}/stats`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct GuildStats {
    pub total_members: u64,
    pub total_warnings: u64,
    pub total_tickets: u64,
    pub total_giveaways: u64,
    pub total_autoroles: u64,
    pub total_level_roles: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Member {
    pub id: String,
    pub guild_id: String,
    pub xp: u64,
    pub level: u32,
    pub coins: i64,
    pub messages_count: u64,
}

/// A page of members ordered by XP, from `GET /api/guilds/{id}/members`
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct MembersPage {
    pub members: Vec<Member>,
    pub limit: u32,
    pub offset: u32,
}
