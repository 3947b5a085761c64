//! HTTP client for the WhizDesk backend.
//!
//! Deployments differ in which routes they expose, so reads and writes
//! that matter go through `get_first`/`post_first`: a fixed candidate
//! list probed in order, first success wins. Probing happens per call,
//! not cached, so a backend restarted with different routes keeps
//! working.

use std::time::Duration;

use serde_json::Value;

use crate::error::ApiError;
use crate::types::Config;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Thin wrapper over reqwest with base-url joining, optional bearer
/// auth, and endpoint probing.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        crate::config::validate(config)?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.auth_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    // -----------------------------------------------------------------
    // Single-endpoint verbs
    // -----------------------------------------------------------------

    pub async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let resp = self.with_auth(self.http.get(self.url(path))).send().await?;
        read_json(resp).await
    }

    pub async fn get_with_params(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Value, ApiError> {
        let resp = self
            .with_auth(self.http.get(self.url(path)).query(params))
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let resp = self
            .with_auth(self.http.post(self.url(path)).json(body))
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let resp = self
            .with_auth(self.http.put(self.url(path)).json(body))
            .send()
            .await?;
        read_json(resp).await
    }

    // -----------------------------------------------------------------
    // Endpoint probing
    // -----------------------------------------------------------------

    /// GET each candidate path in order; return the first success.
    /// On total failure the LAST error is returned (the end of the list
    /// is the oldest route and its failure mode is the most telling).
    pub async fn get_first<S: AsRef<str>>(&self, paths: &[S]) -> Result<Value, ApiError> {
        let mut last_err = ApiError::Config("no candidate paths".to_string());
        for path in paths {
            match self.get_json(path.as_ref()).await {
                Ok(v) => return Ok(v),
                Err(e) => {
                    log::debug!("probe GET {} failed: {}", path.as_ref(), e);
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }

    /// POST the same body to each candidate path in order; first success
    /// wins. Candidates must be idempotent alternates for one logical
    /// operation, never distinct operations.
    pub async fn post_first<S: AsRef<str>>(
        &self,
        paths: &[S],
        body: &Value,
    ) -> Result<Value, ApiError> {
        let mut last_err = ApiError::Config("no candidate paths".to_string());
        for path in paths {
            match self.post_json(path.as_ref(), body).await {
                Ok(v) => return Ok(v),
                Err(e) => {
                    log::debug!("probe POST {} failed: {}", path.as_ref(), e);
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }
}

/// Decode a response, mapping non-2xx statuses to `ApiError::Status`
/// with the server's own error text when it sent any.
async fn read_json(resp: reqwest::Response) -> Result<Value, ApiError> {
    let status = resp.status();
    let body: Value = resp.json().await.unwrap_or(Value::Null);
    if status.is_success() {
        Ok(body)
    } else {
        Err(ApiError::Status {
            status: status.as_u16(),
            message: server_message(&body),
        })
    }
}

fn server_message(body: &Value) -> String {
    for key in ["error", "message"] {
        if let Some(s) = body.get(key).and_then(Value::as_str) {
            if !s.trim().is_empty() {
                return s.to_string();
            }
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_server_message_prefers_error_over_message() {
        let body = json!({ "error": "Forbidden", "message": "secondary" });
        assert_eq!(server_message(&body), "Forbidden");
        assert_eq!(server_message(&json!({ "message": "Only this" })), "Only this");
        assert_eq!(server_message(&json!({})), "");
        assert_eq!(server_message(&Value::Null), "");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let mut cfg = Config::default();
        cfg.api_base_url = "http://localhost:3001/".to_string();
        let client = ApiClient::new(&cfg).expect("client");
        assert_eq!(client.base_url(), "http://localhost:3001");
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let mut cfg = Config::default();
        cfg.api_base_url = "nope".to_string();
        assert!(ApiClient::new(&cfg).is_err());
    }
}
