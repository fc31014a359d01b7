use async_trait::async_trait;
use grassdb_core::{
    AppConfig, GetRequest, GetResponse, NodeClient, NodeDriver, NodeError, SetRequest,
    SetResponse,
};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;

/// Talks to GrassDB nodes over their JSON HTTP API.
///
/// One `reqwest::Client` (and its connection pool) is shared by every node
/// client this driver hands out.
pub struct HttpDriver {
    http: reqwest::Client,
}

impl HttpDriver {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Build a driver with an explicit request timeout. `None` keeps the
    /// transport default.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, NodeError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| NodeError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(Self { http })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, NodeError> {
        Self::with_timeout(config.request_timeout())
    }
}

impl Default for HttpDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeDriver for HttpDriver {
    fn display_name(&self) -> &'static str {
        "HTTP"
    }

    fn connect(&self, base_url: &str) -> Result<Arc<dyn NodeClient>, NodeError> {
        Ok(Arc::new(HttpNodeClient::new(self.http.clone(), base_url)))
    }
}

pub struct HttpNodeClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpNodeClient {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn set_url(&self) -> String {
        format!("{}/set", self.base_url)
    }

    /// The key is percent-encoded so `&`, `#`, `+` and spaces survive.
    pub fn get_url(&self, key: &str) -> String {
        format!("{}/get?key={}", self.base_url, urlencoding::encode(key))
    }
}

#[async_trait]
impl NodeClient for HttpNodeClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn set(&self, request: &SetRequest) -> Result<SetResponse, NodeError> {
        let url = self.set_url();
        log::debug!("POST {} key={}", url, request.key);

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| format_transport_error(&url, &e))?;

        // Nodes answer with a JSON body whatever the status. Plain-text error
        // pages are unusable.
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format_transport_error(&url, &e))?;

        serde_json::from_str(&body).map_err(|e| {
            NodeError::invalid_response(format!("{} from {}: {}", status, url, e))
        })
    }

    async fn get(&self, request: &GetRequest) -> Result<GetResponse, NodeError> {
        let url = self.get_url(&request.key);
        log::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| format_transport_error(&url, &e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(NodeError::KeyNotFound);
        }

        if !status.is_success() {
            return Err(NodeError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| format_transport_error(&url, &e))?;

        serde_json::from_str(&body).map_err(|e| {
            NodeError::invalid_response(format!("{} from {}: {}", status, url, e))
        })
    }
}

fn format_transport_error(url: &str, error: &reqwest::Error) -> NodeError {
    let cause = if error.is_timeout() {
        "request timed out"
    } else if error.is_connect() {
        "could not connect"
    } else if error.is_builder() {
        "invalid request URL"
    } else if error.is_decode() || error.is_body() {
        "could not read response body"
    } else {
        "request failed"
    };

    NodeError::connection_failed(format!("{} ({}): {}", cause, url, error))
}
