//! Panel HTTP transport over reqwest.

use async_trait::async_trait;

use crate::traits::{Headers, HttpClient, HttpError, HttpRequest, Method, Response};

/// Sent with every panel request.
pub const USER_AGENT: &str = concat!("guild-dash/", env!("CARGO_PKG_VERSION"));

/// Production [`HttpClient`].
///
/// ```ignore
/// let http = ReqwestHttpClient::new();
/// let response = http
///     .execute(HttpRequest::new(Method::Get, "http://localhost:8080/api/guilds"))
///     .await?;
/// assert!(response.is_success());
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// No request timeout is set; a hung panel is bounded only by the OS.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }

    /// Timeouts and refused connections are kept apart for the logs.
    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidUrl(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    /// Non-UTF-8 header values are dropped.
    fn convert_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    fn convert_method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<Response, HttpError> {
        let mut builder = self
            .client
            .request(Self::convert_method(request.method), &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let headers = Self::convert_headers(response.headers());
        let body = response.bytes().await.map_err(Self::convert_error)?;

        Ok(Response::with_headers(status, headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_headers_skips_opaque_values() {
        let mut header_map = reqwest::header::HeaderMap::new();
        header_map.insert(
            reqwest::header::SET_COOKIE,
            reqwest::header::HeaderValue::from_static("session=abc; HttpOnly"),
        );
        header_map.insert(
            "x-binary",
            reqwest::header::HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap(),
        );

        let headers = ReqwestHttpClient::convert_headers(&header_map);
        assert_eq!(headers.len(), 1);
        assert_eq!(
            headers.get("set-cookie").map(String::as_str),
            Some("session=abc; HttpOnly")
        );
    }

    #[test]
    fn test_convert_method() {
        assert_eq!(
            ReqwestHttpClient::convert_method(Method::Patch),
            reqwest::Method::PATCH
        );
        assert_eq!(
            ReqwestHttpClient::convert_method(Method::Get),
            reqwest::Method::GET
        );
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let client = ReqwestHttpClient::new();
        let result = client
            .execute(HttpRequest::new(Method::Get, "not-a-valid-url"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_slow_panel_is_awaited() {
        use wiremock::matchers::{header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/guilds"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("{}")
                    .set_delay(std::time::Duration::from_millis(300)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new();
        let response = client
            .execute(HttpRequest::new(
                Method::Get,
                format!("{}/api/guilds", server.uri()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let client = ReqwestHttpClient::new();
        let result = client
            .execute(HttpRequest::new(Method::Get, "http://127.0.0.1:59999/api/guilds"))
            .await;
        assert!(matches!(
            result,
            Err(HttpError::ConnectionFailed(_)) | Err(HttpError::Other(_))
        ));
    }
}
