//! Mock HTTP client for testing.
//!
//! Provides a configurable mock HTTP client that can return predefined
//! responses or errors for testing purposes.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{HttpClient, HttpError, HttpRequest, Response};

/// A recorded HTTP request for verification in tests.
pub type RecordedRequest = HttpRequest;

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response (any status)
    Success(Response),
    /// Return a transport error
    Error(HttpError),
}

impl MockResponse {
    /// JSON body with the given status.
    pub fn json(status: u16, body: &str) -> Self {
        MockResponse::Success(Response::new(status, Bytes::from(body.to_string())))
    }
}

/// Mock HTTP client for testing.
///
/// URLs are matched exactly first, then by prefix, then the default response
/// applies.
///
/// # Example
///
/// ```ignore
/// use guild_dash::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.set_response("http://panel/api/guilds/1", MockResponse::json(200, "{}"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a specific URL.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.insert(url.to_string(), response);
        }
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        if let Ok(mut default) = self.default_response.lock() {
            *default = Some(response);
        }
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.clear();
        }
    }

    fn find_response(&self, url: &str) -> Option<MockResponse> {
        if let Ok(responses) = self.responses.lock() {
            if let Some(response) = responses.get(url) {
                return Some(response.clone());
            }
            let prefixed = responses
                .iter()
                .filter(|(pattern, _)| url.starts_with(pattern.as_str()))
                .max_by_key(|(pattern, _)| pattern.len());
            if let Some((_, response)) = prefixed {
                return Some(response.clone());
            }
        }
        self.default_response.lock().ok().and_then(|d| d.clone())
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<Response, HttpError> {
        let url = request.url.clone();
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        match self.find_response(&url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Method;

    #[tokio::test]
    async fn test_exact_match_and_recording() {
        let client = MockHttpClient::new();
        client.set_response("http://panel/api/guilds/1", MockResponse::json(200, "{}"));

        let response = client
            .execute(HttpRequest::new(Method::Get, "http://panel/api/guilds/1"))
            .await
            .unwrap();
        assert_eq!(response.status, 200);

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Get);
        assert_eq!(requests[0].url, "http://panel/api/guilds/1");
    }

    #[tokio::test]
    async fn test_longest_prefix_wins() {
        let client = MockHttpClient::new();
        client.set_response("http://panel/api/", MockResponse::json(500, "{}"));
        client.set_response("http://panel/api/guilds/1/members", MockResponse::json(200, "{}"));

        let response = client
            .execute(HttpRequest::new(
                Method::Get,
                "http://panel/api/guilds/1/members?limit=50&offset=0",
            ))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_default_and_missing() {
        let client = MockHttpClient::new();
        let result = client
            .execute(HttpRequest::new(Method::Get, "http://panel/x"))
            .await;
        assert!(result.is_err());

        client.set_default_response(MockResponse::Error(HttpError::Timeout("30s".into())));
        let result = client
            .execute(HttpRequest::new(Method::Get, "http://panel/x"))
            .await;
        assert!(matches!(result, Err(HttpError::Timeout(_))));

        client.clear_requests();
        assert!(client.get_requests().is_empty());
    }
}
