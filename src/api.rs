//! JSON request helper and guild loaders for the panel's REST API.
//!
//! [`ApiClient::request`] is the single place requests are built: it sets the
//! JSON content type, attaches the session cookie and maps error bodies to
//! [`RequestError::RequestFailed`]. The loaders on top of it catch failures,
//! show an error toast and return `None`.

use std::sync::Arc;

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::error::{RequestError, RequestResult};
use crate::models::{ActionResponse, GuildData, GuildList, GuildSettingsUpdate, GuildStats, MembersPage};
use crate::traits::{DisplaySurface, HttpClient, HttpRequest, Method, ToastKind};

/// Default page size for member listings.
pub const DEFAULT_MEMBERS_LIMIT: u32 = 50;

#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    session_cookie: Option<String>,
    http: Arc<dyn HttpClient>,
    surface: Arc<dyn DisplaySurface>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        http: Arc<dyn HttpClient>,
        surface: Arc<dyn DisplaySurface>,
    ) -> RequestResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| RequestError::InvalidUrl(e.to_string()))?;
        Ok(Self {
            base_url,
            session_cookie: None,
            http,
            surface,
        })
    }

    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a path (or absolute URL) against the base URL.
    pub fn resolve(&self, path: &str) -> RequestResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| RequestError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// Send a JSON request and parse the JSON response.
    ///
    /// `body` is only serialized for methods that carry one. A non-success
    /// status fails with the server's `detail`, or `Request failed` without
    /// one; so does a success status whose body is not JSON.
    pub async fn request(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
    ) -> RequestResult<Value> {
        let url = self.resolve(path)?;
        let mut request = HttpRequest::new(method, url.as_str())
            .with_header("Content-Type", "application/json");
        if let Some(cookie) = &self.session_cookie {
            request = request.with_header("Cookie", format!("session={}", cookie));
        }
        if let Some(body) = body.filter(|_| method.carries_body()) {
            request = request.with_body(body.to_string());
        }

        debug!(%method, %url, "API request");
        let result = self.send(request).await;
        if let Err(e) = &result {
            error!(%method, %url, error = %e, code = e.error_code(), "Request error");
        }
        result
    }

    async fn send(&self, request: HttpRequest) -> RequestResult<Value> {
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| RequestError::Connection(e.to_string()))?;

        let parsed: Option<Value> = response.json().ok();
        if !response.is_success() {
            let detail = parsed
                .as_ref()
                .and_then(|v| v.get("detail"))
                .and_then(Value::as_str)
                .map(str::to_string);
            return Err(RequestError::failed(response.status, detail));
        }

        parsed.ok_or_else(|| RequestError::failed(response.status, None))
    }

    /// [`request`](Self::request) followed by a typed decode.
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
    ) -> RequestResult<T> {
        let value = self.request(path, method, body).await?;
        serde_json::from_value(value).map_err(|e| RequestError::Decode(e.to_string()))
    }

    pub async fn load_guilds(&self) -> Option<GuildList> {
        self.load("/api/guilds", "Failed to load guilds").await
    }

    pub async fn load_guild_data(&self, guild_id: &str) -> Option<GuildData> {
        self.load(&format!("/api/guilds/{}", guild_id), "Failed to load guild data")
            .await
    }

    pub async fn load_guild_stats(&self, guild_id: &str) -> Option<GuildStats> {
        self.load(
            &format!("/api/guilds/{}/stats", guild_id),
            "Failed to load guild stats",
        )
        .await
    }

    pub async fn load_guild_members(
        &self,
        guild_id: &str,
        limit: u32,
        offset: u32,
    ) -> Option<MembersPage> {
        self.load(
            &format!(
                "/api/guilds/{}/members?limit={}&offset={}",
                guild_id, limit, offset
            ),
            "Failed to load guild members",
        )
        .await
    }

    /// Apply a partial settings update. Returns the server's message.
    pub async fn update_guild_settings(
        &self,
        guild_id: &str,
        settings: &GuildSettingsUpdate,
    ) -> Option<String> {
        let body = match serde_json::to_value(settings) {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, "Failed to encode settings update");
                self.surface
                    .show_toast("Failed to update guild settings", ToastKind::Error);
                return None;
            }
        };
        self.act(
            &format!("/api/guilds/{}", guild_id),
            Method::Patch,
            Some(&body),
            "Guild settings updated",
            "Failed to update guild settings",
        )
        .await
    }

    /// Reset a guild to the bot's defaults. Returns the server's message.
    pub async fn reset_guild_settings(&self, guild_id: &str) -> Option<String> {
        self.act(
            &format!("/api/guilds/{}/reset", guild_id),
            Method::Delete,
            None,
            "Guild settings reset",
            "Failed to reset guild settings",
        )
        .await
    }

    async fn load<T: DeserializeOwned>(&self, path: &str, failure: &str) -> Option<T> {
        match self.request_as(path, Method::Get, None).await {
            Ok(value) => Some(value),
            Err(_) => {
                self.surface.show_toast(failure, ToastKind::Error);
                None
            }
        }
    }

    async fn act(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
        fallback: &str,
        failure: &str,
    ) -> Option<String> {
        match self.request_as::<ActionResponse>(path, method, body).await {
            Ok(response) => {
                let message = response.message.unwrap_or_else(|| fallback.to_string());
                info!(%path, %message, "Guild settings changed");
                self.surface.show_toast(&message, ToastKind::Success);
                Some(message)
            }
            Err(_) => {
                self.surface.show_toast(failure, ToastKind::Error);
                None
            }
        }
    }
}
