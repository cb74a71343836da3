//! Connection-status lifecycle and live-stat synchronization.
//!
//! [`ConnectionSyncController`] owns the realtime transport, reflects its
//! status into the display surface, applies inbound stat snapshots and sends
//! a liveness ping every [`PING_INTERVAL`](crate::config::PING_INTERVAL).
//!
//! The controller is driven from a single task: [`tick`](ConnectionSyncController::tick)
//! waits for the next transport event or liveness tick and handles it to
//! completion before returning.
//!
//! # Example
//!
//! ```ignore
//! let mut controller = ConnectionSyncController::from_config(&config, surface);
//! controller.initialize(connector.as_ref().map(|c| c as &dyn Connector));
//! while controller.tick().await {}
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::{DashboardConfig, TransportOptions, PING_INTERVAL};
use crate::domain::{ConnectionState, Location, ReconnectCounter};
use crate::error::TransportError;
use crate::socketio::{GuildUpdateEvent, IncomingEvent, OutgoingEvent, StatsSnapshot, TransportEvent};
use crate::traits::surface::element;
use crate::traits::{Connector, DisplaySurface, ToastKind, Transport};
use crate::utils::{capitalize_first, format_count, format_json_number};

/// What woke the controller up.
enum Wake {
    Event(Option<TransportEvent>),
    Liveness,
}

/// Keeps the dashboard's connection indicator and live stats in step with the
/// realtime transport, and pings it on a fixed interval while connected.
pub struct ConnectionSyncController {
    transport: Option<Arc<dyn Transport>>,
    events: Option<mpsc::Receiver<TransportEvent>>,
    state: ConnectionState,
    reconnect: ReconnectCounter,
    surface: Arc<dyn DisplaySurface>,
    location: Location,
    options: TransportOptions,
    ping_interval: Duration,
    liveness: Option<Interval>,
    last_round_trip: Option<Duration>,
    /// Set when `initialize` found no usable transport
    inert: bool,
}

impl ConnectionSyncController {
    pub fn new(surface: Arc<dyn DisplaySurface>, location: Location) -> Self {
        Self {
            transport: None,
            events: None,
            state: ConnectionState::Disconnected,
            reconnect: ReconnectCounter::new(5),
            surface,
            location,
            options: TransportOptions::default(),
            ping_interval: PING_INTERVAL,
            liveness: None,
            last_round_trip: None,
            inert: false,
        }
    }

    pub fn from_config(config: &DashboardConfig, surface: Arc<dyn DisplaySurface>) -> Self {
        Self::new(surface, Location::new(config.location_path()))
            .with_transport_options(config.transport.clone())
            .with_ping_interval(config.ping_interval)
            .with_max_reconnect_attempts(config.max_reconnect_attempts)
    }

    pub fn with_transport_options(mut self, options: TransportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_ping_interval(mut self, interval: Duration) -> Self {
        self.ping_interval = interval;
        self
    }

    pub fn with_max_reconnect_attempts(mut self, max: u32) -> Self {
        self.reconnect = ReconnectCounter::new(max);
        self
    }

    /// Open the transport and start the liveness timer.
    ///
    /// Without a connector, or when the connector rejects the endpoint, the
    /// controller logs a warning and stays inert.
    pub fn initialize(&mut self, connector: Option<&dyn Connector>) {
        let Some(connector) = connector else {
            warn!("Realtime transport not available, live updates disabled");
            self.inert = true;
            return;
        };

        match connector.connect(&self.options) {
            Ok(handle) => {
                self.transport = Some(handle.transport);
                self.events = Some(handle.events);
                let mut liveness =
                    interval_at(Instant::now() + self.ping_interval, self.ping_interval);
                liveness.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.liveness = Some(liveness);
                info!(transports = ?self.options.transports, "Realtime transport started");
            }
            Err(e) => {
                warn!(error = %e, "Realtime transport not available, live updates disabled");
                self.inert = true;
            }
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn reconnect_attempts(&self) -> u32 {
        self.reconnect.attempts()
    }

    pub fn is_inert(&self) -> bool {
        self.inert
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    /// Round trip measured from the last echoed ping.
    pub fn last_round_trip(&self) -> Option<Duration> {
        self.last_round_trip
    }

    pub fn on_connect(&mut self) {
        if self.inert {
            return;
        }
        info!("Realtime connection established");
        self.reconnect.reset();
        self.set_state(ConnectionState::Connected);
    }

    pub fn on_disconnect(&mut self) {
        if self.inert {
            return;
        }
        info!("Realtime connection lost");
        self.set_state(ConnectionState::Disconnected);
    }

    pub fn on_connect_error(&mut self, err: &TransportError) {
        if self.inert {
            return;
        }
        error!(error = %err, code = err.error_code(), "Realtime connection error");
        if self.reconnect.record_failure() {
            error!(
                attempts = self.reconnect.attempts(),
                "Max reconnection attempts reached"
            );
            self.set_state(ConnectionState::Disconnected);
        }
    }

    pub fn on_guild_update(&mut self, event: &GuildUpdateEvent) {
        if self.inert {
            return;
        }
        debug!(guild_id = %event.guild_id, "Guild updated");
        if event.guild_id.is_empty() {
            return;
        }
        if self.location.guild_id() == Some(event.guild_id.as_str()) {
            self.surface
                .show_toast("Guild settings updated", ToastKind::Info);
        }
    }

    /// Apply the fields present in `snapshot`; the rest stay as they are.
    pub fn on_stats_update(&mut self, snapshot: &StatsSnapshot) {
        if self.inert {
            return;
        }
        debug!(?snapshot, "Stats updated");

        if let Some(guilds) = &snapshot.guilds {
            self.write_text(element::STAT_GUILDS, guilds.as_ref().map(format_json_number));
        }
        if let Some(users) = &snapshot.users {
            self.write_text(element::STAT_USERS, users.map(format_count));
        }
        if let Some(latency) = &snapshot.latency {
            self.write_text(element::STAT_LATENCY, latency.as_ref().map(format_json_number));
        }
        if let Some(status) = &snapshot.status {
            if self.surface.has_element(element::STAT_STATUS) {
                match status {
                    Some(status) => {
                        self.surface
                            .set_text(element::STAT_STATUS, &capitalize_first(status));
                        self.surface.set_class(
                            element::STAT_STATUS,
                            &format!("stat-value status-{}", status.to_lowercase()),
                        );
                    }
                    None => {
                        self.surface.set_text(element::STAT_STATUS, "");
                        self.surface.set_class(element::STAT_STATUS, "stat-value");
                    }
                }
            }
        }
    }

    pub fn on_pong(&mut self, data: &Value) {
        if self.inert {
            return;
        }
        debug!(%data, "Received pong");
        let echoed = data
            .get("data")
            .and_then(|d| d.get("timestamp"))
            .and_then(Value::as_i64);
        if let Some(sent_at) = echoed {
            let elapsed = chrono::Utc::now().timestamp_millis() - sent_at;
            if let Ok(ms) = u64::try_from(elapsed) {
                self.last_round_trip = Some(Duration::from_millis(ms));
                debug!(round_trip_ms = ms, "Ping round trip");
            }
        }
    }

    /// Route a transport event to its handler.
    pub fn handle_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Connected => self.on_connect(),
            TransportEvent::Disconnected { reason } => {
                debug!(%reason, "Disconnect reason");
                self.on_disconnect();
            }
            TransportEvent::ConnectError(err) => self.on_connect_error(&err),
            TransportEvent::Event(IncomingEvent::Pong(data)) => self.on_pong(&data),
            TransportEvent::Event(IncomingEvent::GuildUpdate(event)) => {
                self.on_guild_update(&event)
            }
            TransportEvent::Event(IncomingEvent::StatsUpdate(snapshot)) => {
                self.on_stats_update(&snapshot)
            }
            TransportEvent::Event(IncomingEvent::Other { name, data }) => {
                debug!(event = %name, %data, "Ignoring unhandled event");
            }
        }
    }

    /// Emit a liveness ping when connected. Never queues; failures are logged.
    pub async fn send_ping(&self) {
        if !self.state.is_connected() {
            return;
        }
        let Some(transport) = &self.transport else {
            return;
        };
        let ping = OutgoingEvent::ping(chrono::Utc::now().timestamp_millis());
        if let Err(e) = transport.emit(ping).await {
            warn!(error = %e, "Failed to send ping");
        }
    }

    /// Wait for and handle one transport event or liveness tick.
    ///
    /// Returns false once the event stream has ended or the controller is inert.
    pub async fn tick(&mut self) -> bool {
        let Some(events) = self.events.as_mut() else {
            return false;
        };
        let liveness = self.liveness.as_mut();

        let wake = tokio::select! {
            event = events.recv() => Wake::Event(event),
            _ = next_liveness(liveness) => Wake::Liveness,
        };

        match wake {
            Wake::Event(Some(event)) => {
                self.handle_event(event);
                true
            }
            Wake::Event(None) => {
                debug!("Transport event stream ended");
                self.events = None;
                self.liveness = None;
                false
            }
            Wake::Liveness => {
                self.send_ping().await;
                true
            }
        }
    }

    /// Stop the liveness timer and close the transport. Safe to call twice.
    pub fn teardown(&mut self) {
        self.liveness = None;
        self.events = None;
        if let Some(transport) = self.transport.take() {
            info!("Closing realtime transport");
            transport.close();
        }
    }

    fn set_state(&mut self, state: ConnectionState) {
        self.state = state;
        if self.surface.has_element(element::CONNECTION_STATUS) {
            self.surface
                .set_class(element::CONNECTION_STATUS, state.indicator_class());
            self.surface
                .set_text(element::CONNECTION_STATUS, state.indicator_text());
        }
    }

    fn write_text(&self, id: &str, value: Option<String>) {
        if self.surface.has_element(id) {
            self.surface.set_text(id, value.as_deref().unwrap_or(""));
        }
    }
}

impl Drop for ConnectionSyncController {
    fn drop(&mut self) {
        self.teardown();
    }
}

async fn next_liveness(liveness: Option<&mut Interval>) {
    match liveness {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockConnector, RecordingSurface};
    use serde_json::json;

    fn setup(path: &str) -> (ConnectionSyncController, Arc<RecordingSurface>, MockConnector) {
        let surface = Arc::new(RecordingSurface::dashboard());
        let connector = MockConnector::new();
        let mut controller =
            ConnectionSyncController::new(surface.clone(), Location::new(path));
        controller.initialize(Some(&connector));
        (controller, surface, connector)
    }

    #[tokio::test]
    async fn test_initialize_passes_transport_options() {
        let (_controller, _surface, connector) = setup("/dashboard");
        assert_eq!(connector.connect_calls(), 1);
        let options = connector.last_options().unwrap();
        assert_eq!(options, TransportOptions::default());
        assert_eq!(options.reconnection_attempts, 5);
    }

    #[tokio::test]
    async fn test_connect_updates_indicator() {
        let (mut controller, surface, connector) = setup("/dashboard");
        connector.transport().simulate_connect();
        assert!(controller.tick().await);

        assert_eq!(controller.state(), ConnectionState::Connected);
        assert_eq!(
            surface.class(element::CONNECTION_STATUS).as_deref(),
            Some("status-online")
        );
        assert_eq!(
            surface.text(element::CONNECTION_STATUS).as_deref(),
            Some("Connected")
        );
    }

    #[tokio::test]
    async fn test_disconnect_updates_indicator() {
        let (mut controller, surface, _connector) = setup("/dashboard");
        controller.on_connect();
        controller.on_disconnect();
        assert_eq!(controller.state(), ConnectionState::Disconnected);
        assert_eq!(
            surface.class(element::CONNECTION_STATUS).as_deref(),
            Some("status-offline")
        );
        assert_eq!(
            surface.text(element::CONNECTION_STATUS).as_deref(),
            Some("Disconnected")
        );
    }

    #[tokio::test]
    async fn test_connect_error_ceiling() {
        let (mut controller, surface, _connector) = setup("/dashboard");
        controller.on_connect();
        let err = TransportError::ConnectFailed("refused".into());

        for _ in 0..4 {
            controller.on_connect_error(&err);
        }
        // Below the ceiling the indicator is untouched
        assert_eq!(controller.reconnect_attempts(), 4);
        assert_eq!(
            surface.text(element::CONNECTION_STATUS).as_deref(),
            Some("Connected")
        );

        controller.on_connect_error(&err);
        assert_eq!(controller.state(), ConnectionState::Disconnected);
        assert_eq!(
            surface.text(element::CONNECTION_STATUS).as_deref(),
            Some("Disconnected")
        );

        controller.on_connect();
        assert_eq!(controller.reconnect_attempts(), 0);
    }

    #[tokio::test]
    async fn test_stats_update_touches_only_present_fields() {
        let (mut controller, surface, _connector) = setup("/dashboard");
        let snapshot: StatsSnapshot = serde_json::from_value(json!({"latency": 42})).unwrap();
        controller.on_stats_update(&snapshot);

        assert_eq!(surface.text(element::STAT_LATENCY).as_deref(), Some("42"));
        assert_eq!(surface.element(element::STAT_GUILDS).unwrap().writes, 0);
        assert_eq!(surface.element(element::STAT_USERS).unwrap().writes, 0);
        assert_eq!(surface.element(element::STAT_STATUS).unwrap().writes, 0);
    }

    #[tokio::test]
    async fn test_stats_update_formats_values() {
        let (mut controller, surface, _connector) = setup("/dashboard");
        let snapshot = StatsSnapshot::default()
            .with_guilds(12)
            .with_users(1_234_567)
            .with_status("online");
        controller.on_stats_update(&snapshot);

        assert_eq!(surface.text(element::STAT_GUILDS).as_deref(), Some("12"));
        assert_eq!(surface.text(element::STAT_USERS).as_deref(), Some("1,234,567"));
        assert_eq!(surface.text(element::STAT_STATUS).as_deref(), Some("Online"));
        assert_eq!(
            surface.class(element::STAT_STATUS).as_deref(),
            Some("stat-value status-online")
        );
    }

    #[tokio::test]
    async fn test_stats_update_fractional_latency() {
        let (mut controller, surface, _connector) = setup("/dashboard");
        let event = IncomingEvent::from_socket(
            "stats_update",
            vec![json!({"guilds": 5, "latency": 42.37, "status": "online"})],
        );
        controller.handle_event(TransportEvent::Event(event));

        assert_eq!(surface.text(element::STAT_GUILDS).as_deref(), Some("5"));
        assert_eq!(surface.text(element::STAT_LATENCY).as_deref(), Some("42.37"));
        assert_eq!(surface.text(element::STAT_STATUS).as_deref(), Some("Online"));
    }

    #[tokio::test]
    async fn test_stats_update_null_blanks_element() {
        let (mut controller, surface, _connector) = setup("/dashboard");
        controller.on_stats_update(&StatsSnapshot::default().with_guilds(3));
        let snapshot: StatsSnapshot = serde_json::from_value(json!({"guilds": null})).unwrap();
        controller.on_stats_update(&snapshot);
        assert_eq!(surface.text(element::STAT_GUILDS).as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_stats_update_skips_missing_elements() {
        let surface = Arc::new(RecordingSurface::with_elements(&[element::STAT_GUILDS]));
        let mut controller = ConnectionSyncController::new(surface.clone(), Location::default());
        controller.on_stats_update(&StatsSnapshot::default().with_users(5).with_guilds(2));
        assert_eq!(surface.text(element::STAT_GUILDS).as_deref(), Some("2"));
        assert!(surface.element(element::STAT_USERS).is_none());
    }

    #[tokio::test]
    async fn test_guild_update_matching_guild() {
        let (mut controller, surface, _connector) = setup("/dashboard/123456789012345678");
        controller.on_guild_update(&GuildUpdateEvent::new("123456789012345678"));
        assert_eq!(
            surface.last_toast(),
            Some(("Guild settings updated".to_string(), ToastKind::Info))
        );
    }

    #[tokio::test]
    async fn test_guild_update_ignored_elsewhere() {
        let (mut controller, surface, _connector) = setup("/dashboard/123456789012345678");
        controller.on_guild_update(&GuildUpdateEvent::new("999999999999999999"));
        controller.on_guild_update(&GuildUpdateEvent::new(""));
        controller.set_location(Location::new("/dashboard"));
        controller.on_guild_update(&GuildUpdateEvent::new("123456789012345678"));
        assert!(surface.toasts().is_empty());
    }

    #[tokio::test]
    async fn test_send_ping_only_when_connected() {
        let (mut controller, _surface, connector) = setup("/dashboard");
        let mock = connector.transport();

        controller.send_ping().await;
        assert!(mock.emitted().is_empty());

        controller.on_connect();
        controller.send_ping().await;
        let emitted = mock.emitted();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].name(), "ping");
    }

    #[tokio::test]
    async fn test_send_ping_failure_is_swallowed() {
        let (mut controller, _surface, connector) = setup("/dashboard");
        let mock = connector.transport();
        mock.set_emit_should_fail(true);
        controller.on_connect();
        controller.send_ping().await;
        assert!(mock.emitted().is_empty());
        assert_eq!(controller.state(), ConnectionState::Connected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_liveness_timer_pings() {
        let (mut controller, _surface, connector) = setup("/dashboard");
        let mock = connector.transport();
        mock.simulate_connect();
        assert!(controller.tick().await);

        // Next wake is the 30s liveness tick
        assert!(controller.tick().await);
        assert_eq!(mock.emitted().len(), 1);
    }

    #[tokio::test]
    async fn test_pong_records_round_trip() {
        let (mut controller, _surface, _connector) = setup("/dashboard");
        let sent = chrono::Utc::now().timestamp_millis() - 20;
        controller.on_pong(&json!({"data": {"timestamp": sent}}));
        assert!(controller.last_round_trip().unwrap() >= Duration::from_millis(20));

        controller.on_pong(&json!({"data": "hello"}));
        assert!(controller.last_round_trip().is_some());
    }

    #[tokio::test]
    async fn test_inert_without_connector() {
        let surface = Arc::new(RecordingSurface::dashboard());
        let mut controller = ConnectionSyncController::new(surface.clone(), Location::default());
        controller.initialize(None);

        assert!(controller.is_inert());
        assert!(!controller.tick().await);
        controller.on_connect();
        controller.send_ping().await;
        controller.teardown();
        assert_eq!(controller.state(), ConnectionState::Disconnected);
        assert_eq!(surface.element(element::CONNECTION_STATUS).unwrap().writes, 0);
    }

    #[tokio::test]
    async fn test_teardown_is_idempotent() {
        let (mut controller, _surface, connector) = setup("/dashboard");
        let mock = connector.transport();
        controller.teardown();
        assert!(mock.is_closed());
        controller.teardown();
        assert!(!controller.tick().await);
    }

    #[tokio::test]
    async fn test_drop_closes_transport() {
        let (controller, _surface, connector) = setup("/dashboard");
        let mock = connector.transport();
        drop(controller);
        assert!(mock.is_closed());
    }

    #[tokio::test]
    async fn test_unknown_event_is_ignored() {
        let (mut controller, surface, connector) = setup("/dashboard");
        connector.transport().inject_event(IncomingEvent::Other {
            name: "announcement".into(),
            data: json!({"text": "hi"}),
        });
        assert!(controller.tick().await);
        assert!(surface.toasts().is_empty());
    }
}
