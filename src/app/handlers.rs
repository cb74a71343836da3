//! Keyboard handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use super::{App, AppMessage};
use crate::api::DEFAULT_MEMBERS_LIMIT;
use crate::clipboard::copy_to_clipboard;
use crate::models::GuildSettingsUpdate;
use crate::traits::ToastKind;
use crate::utils::check_id_field;
use crate::view_state::{IdInput, IdInputKind};

impl App {
    pub async fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.input.is_some() {
            self.handle_input_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('p') => self.controller.send_ping().await,
            KeyCode::Char('r') => self.reload_guild(),
            KeyCode::Char('m') => self.load_members(0),
            KeyCode::Char(']') => {
                if self.panel.members.is_some() {
                    self.load_members(self.members_offset + DEFAULT_MEMBERS_LIMIT);
                }
            }
            KeyCode::Char('[') => {
                if self.panel.members.is_some() && self.members_offset > 0 {
                    self.load_members(self.members_offset.saturating_sub(DEFAULT_MEMBERS_LIMIT));
                }
            }
            KeyCode::Char('y') => self.copy_guild_id(),
            KeyCode::Char('c') => self.open_input(IdInputKind::Channel),
            KeyCode::Char('o') => self.open_input(IdInputKind::Role),
            _ => {}
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        if let Some(input) = self.input.as_mut() {
            input.paste(text);
            self.input_check
                .call((input.kind, input.value.trim().to_string()));
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_check.cancel();
                self.input = None;
            }
            KeyCode::Enter => self.submit_input(),
            KeyCode::Backspace => {
                if let Some(input) = self.input.as_mut() {
                    input.backspace();
                    self.input_check
                        .call((input.kind, input.value.trim().to_string()));
                }
            }
            KeyCode::Char(ch) => {
                if let Some(input) = self.input.as_mut() {
                    input.push(ch);
                    self.input_check
                        .call((input.kind, input.value.trim().to_string()));
                }
            }
            _ => {}
        }
    }

    fn open_input(&mut self, kind: IdInputKind) {
        if self.guild_id().is_none() {
            self.surface()
                .show_toast("No guild selected", ToastKind::Warning);
            return;
        }
        self.input = Some(IdInput::new(kind));
    }

    /// Validate the id input like a blur, then save it when it is a valid id.
    fn submit_input(&mut self) {
        let Some(input) = self.input.as_ref() else {
            return;
        };
        let field_id = input.kind.field_id();
        let value = input.value.trim().to_string();
        self.input_check.cancel();

        if !check_id_field(field_id, &value, self.surface()) {
            if let Some(input) = self.input.as_mut() {
                input.valid = Some(false);
            }
            return;
        }
        self.input = None;
        if value.is_empty() {
            return;
        }

        let Ok(id) = value.parse::<u64>() else {
            return;
        };
        let mut update = GuildSettingsUpdate::new();
        update.set_id_field(field_id, id);
        self.save_settings(update);
    }

    fn save_settings(&mut self, update: GuildSettingsUpdate) {
        let (Some(api), Some(guild_id)) = (self.api.clone(), self.config.guild_id.clone()) else {
            return;
        };
        debug!(%guild_id, ?update, "Saving guild settings");
        self.panel.begin_request();
        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let message = api.update_guild_settings(&guild_id, &update).await;
            let _ = tx.send(AppMessage::SettingsSaved(message));
        });
    }

    fn copy_guild_id(&mut self) {
        match self.config.guild_id.as_deref() {
            Some(guild_id) => {
                copy_to_clipboard(self.clipboard.as_ref(), guild_id, self.view.as_ref());
            }
            None => self
                .surface()
                .show_toast("No guild selected", ToastKind::Warning),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::clipboard::Osc52Clipboard;
    use crate::config::DashboardConfig;
    use crate::traits::Method;

    const GUILD: &str = "123456789012345678";

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with(http: MockHttpClient, guild: Option<&str>) -> App {
        let mut config = DashboardConfig::new().with_base_url("http://panel.local");
        if let Some(guild) = guild {
            config = config.with_guild_id(guild);
        }
        App::new(config, Arc::new(http), Box::new(Osc52Clipboard::new(Vec::new()))).unwrap()
    }

    async fn drain(app: &mut App) {
        // Let spawned requests finish and deliver their messages
        tokio::time::sleep(Duration::from_millis(10)).await;
        while let Ok(message) = app.message_rx.try_recv() {
            app.handle_message(message);
        }
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = app_with(MockHttpClient::new(), None);
        app.handle_key(key(KeyCode::Char('q'))).await;
        assert!(app.should_quit);

        let mut app = app_with(MockHttpClient::new(), None);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .await;
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_reload_loads_data_and_stats() {
        let http = MockHttpClient::new();
        http.set_response(
            &format!("http://panel.local/api/guilds/{}/stats", GUILD),
            MockResponse::json(200, r#"{"total_members": 3}"#),
        );
        http.set_response(
            &format!("http://panel.local/api/guilds/{}", GUILD),
            MockResponse::json(200, r#"{"id": "123456789012345678", "name": "Tavern"}"#),
        );
        let mut app = app_with(http.clone(), Some(GUILD));

        app.handle_key(key(KeyCode::Char('r'))).await;
        assert!(app.panel.is_loading());
        drain(&mut app).await;

        assert!(!app.panel.is_loading());
        assert_eq!(app.panel.title(GUILD), "Tavern");
        assert_eq!(app.panel.stats.unwrap().total_members, 3);
        assert_eq!(http.get_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_reload_is_throttled() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::json(200, "{}"));
        let mut app = app_with(http.clone(), Some(GUILD));

        app.handle_key(key(KeyCode::Char('r'))).await;
        app.handle_key(key(KeyCode::Char('r'))).await;
        drain(&mut app).await;
        assert_eq!(http.get_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_members_load_keeps_panel() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::json(500, "{}"));
        let mut app = app_with(http, Some(GUILD));

        app.handle_key(key(KeyCode::Char('m'))).await;
        drain(&mut app).await;
        assert!(app.panel.members.is_none());
        let toast = app.view.toast().unwrap();
        assert_eq!(toast.message, "Failed to load guild members");
    }

    #[tokio::test]
    async fn test_invalid_channel_input_warns_and_stays_open() {
        let mut app = app_with(MockHttpClient::new(), Some(GUILD));
        app.handle_key(key(KeyCode::Char('c'))).await;
        for ch in "123".chars() {
            app.handle_key(key(KeyCode::Char(ch))).await;
        }
        app.handle_key(key(KeyCode::Enter)).await;

        let input = app.input.as_ref().unwrap();
        assert_eq!(input.valid, Some(false));
        let toast = app.view.toast().unwrap();
        assert_eq!(toast.message, "Invalid channel ID format");
        assert_eq!(toast.kind, ToastKind::Warning);
    }

    #[tokio::test]
    async fn test_valid_role_input_saves_settings() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::json(
            200,
            r#"{"success": true, "message": "Guild settings updated successfully"}"#,
        ));
        let mut app = app_with(http.clone(), Some(GUILD));

        app.handle_key(key(KeyCode::Char('o'))).await;
        app.handle_paste("987654321098765432");
        app.handle_key(key(KeyCode::Enter)).await;
        assert!(app.input.is_none());
        drain(&mut app).await;

        let patch = http
            .get_requests()
            .into_iter()
            .find(|r| r.method == Method::Patch)
            .unwrap();
        assert_eq!(patch.body.as_deref(), Some(r#"{"mute_role_id":987654321098765432}"#));
    }

    #[tokio::test]
    async fn test_escape_cancels_input() {
        let mut app = app_with(MockHttpClient::new(), Some(GUILD));
        app.handle_key(key(KeyCode::Char('c'))).await;
        app.handle_key(key(KeyCode::Char('1'))).await;
        app.handle_key(key(KeyCode::Esc)).await;
        assert!(app.input.is_none());
        assert!(!app.should_quit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_is_checked_after_quiet_period() {
        let mut app = app_with(MockHttpClient::new(), Some(GUILD));
        app.handle_key(key(KeyCode::Char('c'))).await;
        app.handle_key(key(KeyCode::Char('4'))).await;
        app.handle_key(key(KeyCode::Char('2'))).await;

        tokio::time::sleep(Duration::from_millis(500)).await;
        while let Ok(message) = app.message_rx.try_recv() {
            app.handle_message(message);
        }
        assert_eq!(app.input.as_ref().unwrap().valid, Some(false));
    }

    #[tokio::test]
    async fn test_copy_guild_id() {
        let mut app = app_with(MockHttpClient::new(), Some(GUILD));
        app.handle_key(key(KeyCode::Char('y'))).await;
        assert_eq!(app.view.toast().unwrap().message, "Copied to clipboard!");
    }

    #[tokio::test]
    async fn test_guild_keys_without_guild() {
        let mut app = app_with(MockHttpClient::new(), None);
        app.handle_key(key(KeyCode::Char('c'))).await;
        assert!(app.input.is_none());
        assert_eq!(app.view.toast().unwrap().message, "No guild selected");
    }
}
