use serde::{Deserialize, Serialize};

/// Body of `POST /set`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: String,
}

impl SetRequest {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Reply to `POST /set`.
///
/// Nodes serialize both fields with `omitempty`, so a rejected write may
/// arrive as `{"error": "Not Leader"}` with no `success` field at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error text a follower answers with when it cannot accept writes.
pub const NOT_LEADER_ERROR: &str = "Not Leader";

impl SetResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }

    /// The server-provided error, ignoring empty strings.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }

    pub fn is_not_leader(&self) -> bool {
        !self.success && self.error_message() == Some(NOT_LEADER_ERROR)
    }
}

/// Query of `GET /get?key=...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRequest {
    pub key: String,
}

impl GetRequest {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Successful (2xx) reply to `GET /get`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Only some deployments send this; a node behind a serverless handler
    /// answers 200 with `"found": false` instead of a 404.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found: Option<bool>,
}

impl GetResponse {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            found: Some(true),
        }
    }

    pub fn missing() -> Self {
        Self {
            value: None,
            found: Some(false),
        }
    }

    pub fn is_missing(&self) -> bool {
        self.found == Some(false)
    }

    /// The value, ignoring empty strings.
    pub fn non_empty_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }
}
