//! Typed views of the panel's REST responses.

pub mod guild;

pub use guild::{
    ActionResponse, GuildData, GuildList, GuildSettingsUpdate, GuildStats, GuildSummary, Member,
    MembersPage,
};
