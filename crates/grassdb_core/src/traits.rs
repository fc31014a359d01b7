use std::sync::Arc;

use async_trait::async_trait;

use crate::{GetRequest, GetResponse, NodeError, SetRequest, SetResponse};

/// Factory for node clients.
///
/// The console connects on every submission with whatever base URL is in the
/// connection-target field at that moment, so `connect` must be cheap and
/// must not touch the network.
pub trait NodeDriver: Send + Sync {
    /// Human-readable name for logs (e.g., "HTTP").
    fn display_name(&self) -> &'static str;

    /// Create a client bound to `base_url`.
    fn connect(&self, base_url: &str) -> Result<Arc<dyn NodeClient>, NodeError>;
}

/// Client for a single GrassDB node.
///
/// The console interacts exclusively through this trait. Each call performs
/// exactly one request; retries are the caller's decision.
#[async_trait]
pub trait NodeClient: Send + Sync {
    /// Base URL this client talks to, without a trailing slash.
    fn base_url(&self) -> &str;

    /// Write a key.
    ///
    /// A node that answers but refuses the write returns
    /// `Ok(SetResponse { success: false, .. })`, not an error.
    async fn set(&self, request: &SetRequest) -> Result<SetResponse, NodeError>;

    /// Read a key.
    ///
    /// Returns `NodeError::KeyNotFound` on HTTP 404 and `NodeError::Status`
    /// for any other non-success status.
    async fn get(&self, request: &GetRequest) -> Result<GetResponse, NodeError>;
}
