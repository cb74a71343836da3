//! View state module for decoupling UI rendering from the controller.
//!
//! The controller writes into [`DashboardView`] through the
//! [`DisplaySurface`](crate::traits::DisplaySurface) trait; the UI reads a
//! [`DashboardSnapshot`] out of it each frame, together with the guild panel
//! and id input state owned by the app.
//!
//! ```text
//! controller --set_text/set_class--> DashboardView --snapshot()--> UI
//! ```

pub mod dashboard_view;
pub mod guild_panel;
pub mod id_input;

pub use dashboard_view::{DashboardSnapshot, DashboardView, ElementView, Toast};
pub use guild_panel::GuildPanelState;
pub use id_input::{IdInput, IdInputKind};
