// 🌐 HTTP Client - reqwest-backed implementation of the ApiClient seam
// Server errors carry a JSON body with `detail` or `message`; that text
// is what the admin shows the user, so extract it when present and fall
// back to the raw body otherwise.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::gateway::{ApiClient, ApiError};

/// Remote-store client for the registry API.
#[derive(Clone)]
pub struct HttpApiClient {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl HttpApiClient {
    /// Build a client for `api_base` (no trailing slash).
    pub fn new(api_base: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(format!("entity-registry/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(HttpApiClient {
            http,
            api_base: api_base.into(),
            token: None,
        })
    }

    /// Attach a bearer token to every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn dispatch(&self, req: reqwest::RequestBuilder) -> Result<Value, ApiError> {
        let response = self
            .apply_auth(req)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(ApiError::Http {
                status,
                detail: extract_detail(&body),
            });
        }

        // DELETE and some PUTs answer with an empty body
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// Server-provided detail when the error body is JSON, generic text otherwise.
fn extract_detail(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        for key in ["detail", "message"] {
            if let Some(text) = json.get(key).and_then(Value::as_str) {
                return text.to_string();
            }
        }
    }
    if body.trim().is_empty() {
        "request failed".to_string()
    } else {
        body.trim().to_string()
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.dispatch(self.http.get(self.url(path))).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.dispatch(self.http.post(self.url(path)).json(body)).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.dispatch(self.http.put(self.url(path)).json(body)).await
    }

    async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.dispatch(self.http.delete(self.url(path))).await
    }
}

// ============================================================================
// TESTS
// ============================================================================
