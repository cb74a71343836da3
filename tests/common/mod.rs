//! Common test utilities for integration tests.
//!
//! # Example
//!
//! ```ignore
//! mod common;
//! use common::{dashboard_config, TEST_GUILD};
//!
//! let config = dashboard_config("http://127.0.0.1:9000").with_guild_id(TEST_GUILD);
//! ```

#![allow(dead_code)]

use std::sync::Arc;

use guild_dash::adapters::mock::{MockConnector, RecordingSurface};
use guild_dash::config::DashboardConfig;
use guild_dash::controller::ConnectionSyncController;
use guild_dash::socketio::{IncomingEvent, StatsSnapshot};

/// A snowflake-shaped guild id.
pub const TEST_GUILD: &str = "123456789012345678";

pub const TEST_SESSION: &str = "test-session-cookie";

/// Config pointing at `base_url` with a session cookie.
pub fn dashboard_config(base_url: &str) -> DashboardConfig {
    DashboardConfig::new()
        .with_base_url(base_url)
        .with_session_cookie(TEST_SESSION)
}

/// A controller wired to a mock connector and a recording surface.
pub fn connected_controller(
    config: &DashboardConfig,
) -> (ConnectionSyncController, Arc<RecordingSurface>, MockConnector) {
    let surface = Arc::new(RecordingSurface::dashboard());
    let connector = MockConnector::new();
    let mut controller = ConnectionSyncController::from_config(config, surface.clone());
    controller.initialize(Some(&connector));
    (controller, surface, connector)
}

/// A stats event as the bot broadcasts it.
pub fn stats_event(guilds: u64, users: u64, latency: u64, status: &str) -> IncomingEvent {
    IncomingEvent::StatsUpdate(
        StatsSnapshot::default()
            .with_guilds(guilds)
            .with_users(users)
            .with_latency(latency)
            .with_status(status),
    )
}
