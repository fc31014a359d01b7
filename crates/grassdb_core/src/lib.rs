mod app_config;
pub mod console;
mod error;
mod key_value;
mod request;
mod traits;

pub use app_config::{AppConfig, AppConfigStore, DEFAULT_NODE_URL, NODE_URL_ENV};
pub use console::{
    ConsoleState, ReadForm, ReadSubmission, WriteForm, WriteStatus, WriteSubmission, run_read,
    run_write,
};
pub use error::NodeError;
pub use key_value::{GetRequest, GetResponse, NOT_LEADER_ERROR, SetRequest, SetResponse};
pub use request::{RequestId, RequestKind, RequestSnapshot, RequestStatus, RequestTracker};
pub use traits::{NodeClient, NodeDriver};

/// Safely truncate a string at a character boundary, appending "..." if truncated.
pub fn truncate_string_safe(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }

    let truncate_at = max_len.saturating_sub(3);
    let safe_end = s
        .char_indices()
        .take_while(|(idx, _)| *idx <= truncate_at)
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(0);

    format!("{}...", &s[..safe_end])
}
