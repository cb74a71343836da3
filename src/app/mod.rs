//! Application state and the terminal event loop.
//!
//! [`App`] owns the controller, the view it writes into and the guild panel.
//! REST calls are spawned and report back through [`AppMessage`]s, so the
//! loop only ever waits on channels.

mod handlers;
mod headless;
mod messages;

pub use headless::run_headless;
pub use messages::AppMessage;

use std::sync::Arc;
use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::{backend::Backend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::{ApiClient, DEFAULT_MEMBERS_LIMIT};
use crate::clipboard::ClipboardWriter;
use crate::config::DashboardConfig;
use crate::controller::ConnectionSyncController;
use crate::traits::{Connector, DisplaySurface, HttpClient};
use crate::ui::{self, RenderContext};
use crate::utils::{validate_channel_id, validate_role_id, Debouncer, Throttle};
use crate::view_state::{DashboardView, GuildPanelState, IdInput, IdInputKind};

/// Redraw cadence; toasts expire between events.
const FRAME_INTERVAL: Duration = Duration::from_millis(250);

/// Minimum spacing between reloads triggered from the keyboard.
const RELOAD_THROTTLE: Duration = Duration::from_millis(1000);

/// Quiet time before the id being typed is checked.
const INPUT_CHECK_DEBOUNCE: Duration = Duration::from_millis(400);

pub struct App {
    pub config: DashboardConfig,
    pub view: Arc<DashboardView>,
    pub controller: ConnectionSyncController,
    /// False once the controller's event stream has ended
    controller_alive: bool,
    pub api: Option<ApiClient>,
    clipboard: Box<dyn ClipboardWriter>,
    pub panel: GuildPanelState,
    pub input: Option<IdInput>,
    pub members_offset: u32,
    pub should_quit: bool,
    message_tx: mpsc::UnboundedSender<AppMessage>,
    message_rx: mpsc::UnboundedReceiver<AppMessage>,
    reload: Throttle<String>,
    input_check: Debouncer<(IdInputKind, String)>,
}

impl App {
    /// Build the app. `http` is only used when a base URL is configured.
    pub fn new(
        config: DashboardConfig,
        http: Arc<dyn HttpClient>,
        clipboard: Box<dyn ClipboardWriter>,
    ) -> Result<Self> {
        let view = Arc::new(DashboardView::new());
        let surface: Arc<dyn DisplaySurface> = view.clone();

        let api = match &config.base_url {
            Some(base_url) => {
                let mut api = ApiClient::new(base_url, http, surface.clone())?;
                if let Some(cookie) = &config.session_cookie {
                    api = api.with_session_cookie(cookie.clone());
                }
                Some(api)
            }
            None => None,
        };

        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let reload = reload_throttle(api.clone(), message_tx.clone());
        let input_check = input_debouncer(message_tx.clone());
        let controller = ConnectionSyncController::from_config(&config, surface);

        Ok(Self {
            config,
            view,
            controller,
            controller_alive: true,
            api,
            clipboard,
            panel: GuildPanelState::default(),
            input: None,
            members_offset: 0,
            should_quit: false,
            message_tx,
            message_rx,
            reload,
            input_check,
        })
    }

    /// Start the realtime link and load the viewed guild.
    pub fn start(&mut self, connector: Option<&dyn Connector>) {
        self.controller.initialize(connector);
        self.reload_guild();
    }

    pub fn guild_id(&self) -> Option<&str> {
        self.config.guild_id.as_deref()
    }

    pub fn surface(&self) -> &dyn DisplaySurface {
        self.view.as_ref()
    }

    /// Run until the user quits.
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()>
    where
        B::Error: Send + Sync + 'static,
    {
        let mut events = EventStream::new();
        let mut frame = tokio::time::interval(FRAME_INTERVAL);

        while !self.should_quit {
            let snapshot = self.view.snapshot();
            let ctx = RenderContext {
                snapshot: &snapshot,
                guild_id: self.config.guild_id.as_deref(),
                panel: &self.panel,
                input: self.input.as_ref(),
                round_trip: self.controller.last_round_trip(),
                base_url: self.config.base_url.as_deref(),
            };
            terminal.draw(|f| ui::render(f, &ctx))?;

            tokio::select! {
                alive = self.controller.tick(), if self.controller_alive => {
                    if !alive {
                        debug!("Controller stopped, dashboard stays up without live updates");
                        self.controller_alive = false;
                    }
                }
                Some(message) = self.message_rx.recv() => self.handle_message(message),
                event = events.next() => match event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key).await;
                    }
                    Some(Ok(Event::Paste(text))) => self.handle_paste(&text),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => self.should_quit = true,
                },
                _ = frame.tick() => {}
            }
        }

        info!("Dashboard closed");
        self.controller.teardown();
        Ok(())
    }

    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::GuildData(data) => {
                self.panel.finish_request();
                if data.is_some() {
                    self.panel.data = data;
                }
            }
            AppMessage::GuildStats(stats) => {
                self.panel.finish_request();
                if stats.is_some() {
                    self.panel.stats = stats;
                }
            }
            AppMessage::Members(page) => {
                self.panel.finish_request();
                if let Some(page) = page {
                    self.members_offset = page.offset;
                    self.panel.members = Some(page);
                }
            }
            AppMessage::SettingsSaved(message) => {
                self.panel.finish_request();
                if message.is_some() {
                    self.reload_guild();
                }
            }
            AppMessage::InputChecked { value, valid } => {
                if let Some(input) = self.input.as_mut().filter(|i| i.value.trim() == value) {
                    input.valid = Some(valid);
                }
            }
        }
    }

    /// Reload guild data and stats, at most once per second.
    pub fn reload_guild(&mut self) {
        let Some(guild_id) = self.config.guild_id.clone() else {
            return;
        };
        if self.api.is_none() {
            return;
        }
        if self.reload.call(guild_id) {
            self.panel.begin_request();
            self.panel.begin_request();
        }
    }

    pub fn load_members(&mut self, offset: u32) {
        let (Some(api), Some(guild_id)) = (self.api.clone(), self.config.guild_id.clone()) else {
            return;
        };
        self.panel.begin_request();
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let page = api
                .load_guild_members(&guild_id, DEFAULT_MEMBERS_LIMIT, offset)
                .await;
            let _ = tx.send(AppMessage::Members(page));
        });
    }
}

fn reload_throttle(
    api: Option<ApiClient>,
    tx: mpsc::UnboundedSender<AppMessage>,
) -> Throttle<String> {
    Throttle::new(RELOAD_THROTTLE, move |guild_id: String| {
        let Some(api) = api.clone() else {
            return;
        };
        let tx = tx.clone();
        tokio::spawn(async move {
            let (data, stats) = tokio::join!(
                api.load_guild_data(&guild_id),
                api.load_guild_stats(&guild_id)
            );
            let _ = tx.send(AppMessage::GuildData(data));
            let _ = tx.send(AppMessage::GuildStats(stats));
        });
    })
}

fn input_debouncer(tx: mpsc::UnboundedSender<AppMessage>) -> Debouncer<(IdInputKind, String)> {
    Debouncer::new(INPUT_CHECK_DEBOUNCE, move |(kind, value): (IdInputKind, String)| {
        let valid = value.is_empty()
            || match kind {
                IdInputKind::Channel => validate_channel_id(&value),
                IdInputKind::Role => validate_role_id(&value),
            };
        let _ = tx.send(AppMessage::InputChecked { value, valid });
    })
}
