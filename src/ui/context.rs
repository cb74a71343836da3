//! Render context for dashboard components

use std::time::Duration;

use crate::view_state::{DashboardSnapshot, GuildPanelState, IdInput};

/// Everything one frame needs, borrowed from the app
pub struct RenderContext<'a> {
    pub snapshot: &'a DashboardSnapshot,
    pub guild_id: Option<&'a str>,
    pub panel: &'a GuildPanelState,
    pub input: Option<&'a IdInput>,
    pub round_trip: Option<Duration>,
    /// Panel URL, `None` when running without a server
    pub base_url: Option<&'a str>,
}
