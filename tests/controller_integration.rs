//! End-to-end tests of the realtime controller against a mock transport.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{connected_controller, dashboard_config, stats_event, TEST_GUILD};
use guild_dash::adapters::mock::MockConnector;
use guild_dash::config::DashboardConfig;
use guild_dash::controller::ConnectionSyncController;
use guild_dash::domain::ConnectionState;
use guild_dash::socketio::{GuildUpdateEvent, IncomingEvent, OutgoingEvent};
use guild_dash::traits::surface::element;
use guild_dash::traits::ToastKind;
use guild_dash::view_state::DashboardView;

#[tokio::test]
async fn test_live_session_updates_dashboard() {
    let config = dashboard_config("http://panel.local");
    let (mut controller, surface, connector) = connected_controller(&config);
    let transport = connector.transport();

    transport.simulate_connect();
    transport.inject_event(stats_event(1_500, 2_400_000, 87, "ONLINE"));
    assert!(controller.tick().await);
    assert!(controller.tick().await);

    assert_eq!(controller.state(), ConnectionState::Connected);
    // Only the user count is grouped
    assert_eq!(surface.text(element::STAT_GUILDS).as_deref(), Some("1500"));
    assert_eq!(
        surface.text(element::STAT_USERS).as_deref(),
        Some("2,400,000")
    );
    assert_eq!(surface.text(element::STAT_LATENCY).as_deref(), Some("87"));
    assert_eq!(surface.text(element::STAT_STATUS).as_deref(), Some("ONLINE"));
    assert_eq!(
        surface.class(element::STAT_STATUS).as_deref(),
        Some("stat-value status-online")
    );

    controller.teardown();
    assert!(transport.is_closed());
}

#[tokio::test]
async fn test_guild_update_only_toasts_on_its_page() {
    let config = dashboard_config("http://panel.local").with_guild_id(TEST_GUILD);
    let (mut controller, surface, connector) = connected_controller(&config);
    let transport = connector.transport();

    transport.inject_event(IncomingEvent::GuildUpdate(GuildUpdateEvent::new(
        "111111111111111111",
    )));
    transport.inject_event(IncomingEvent::GuildUpdate(GuildUpdateEvent::new(TEST_GUILD)));
    assert!(controller.tick().await);
    assert!(controller.tick().await);

    assert_eq!(
        surface.toasts(),
        vec![("Guild settings updated".to_string(), ToastKind::Info)]
    );
}

#[tokio::test]
async fn test_reconnect_ceiling_then_recovery() {
    let config = dashboard_config("http://panel.local");
    let (mut controller, surface, connector) = connected_controller(&config);
    let transport = connector.transport();

    transport.simulate_connect();
    assert!(controller.tick().await);
    for _ in 0..5 {
        transport.simulate_connect_error("connection refused");
        assert!(controller.tick().await);
    }
    assert_eq!(controller.state(), ConnectionState::Disconnected);
    assert_eq!(
        surface.class(element::CONNECTION_STATUS).as_deref(),
        Some("status-offline")
    );

    transport.simulate_connect();
    assert!(controller.tick().await);
    assert_eq!(controller.reconnect_attempts(), 0);
    assert_eq!(
        surface.text(element::CONNECTION_STATUS).as_deref(),
        Some("Connected")
    );
}

#[tokio::test(start_paused = true)]
async fn test_liveness_ping_while_connected() {
    let config = dashboard_config("http://panel.local");
    let surface = Arc::new(DashboardView::new());
    let connector = MockConnector::new();
    let mut controller = ConnectionSyncController::from_config(&config, surface.clone())
        .with_ping_interval(Duration::from_secs(30));
    controller.initialize(Some(&connector));
    let transport = connector.transport();

    transport.simulate_connect();
    assert!(controller.tick().await);
    // Nothing else is queued, so the next wake is the liveness timer
    assert!(controller.tick().await);

    let emitted = transport.emitted();
    assert_eq!(emitted.len(), 1);
    assert!(matches!(emitted[0], OutgoingEvent::Ping(_)));
    assert_eq!(surface.snapshot().connection.text, "Connected");
}

#[tokio::test]
async fn test_without_connector_controller_is_inert() {
    let config = DashboardConfig::new();
    let surface = Arc::new(DashboardView::new());
    let mut controller = ConnectionSyncController::from_config(&config, surface.clone());
    controller.initialize(None);

    assert!(controller.is_inert());
    assert!(!controller.tick().await);
    controller.on_connect();
    controller.on_stats_update(&guild_dash::socketio::StatsSnapshot::default().with_guilds(9));
    assert_eq!(controller.state(), ConnectionState::Disconnected);

    let snapshot = surface.snapshot();
    assert_eq!(snapshot.connection.text, "Disconnected");
    assert_eq!(snapshot.guilds.text, "-");

    controller.teardown();
    controller.teardown();
}
