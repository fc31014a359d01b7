//! State of the two-pane admin console.
//!
//! The write pane posts `SET key value`, the read pane issues `GET key`, both
//! against the base URL currently in the connection-target field. A
//! submission snapshots everything it needs (request, base URL, tracking id),
//! so the fields stay editable while the request is in flight. Completions
//! are applied in arrival order and the last one wins the displayed state.

use log::{debug, error, info};

use crate::{
    GetRequest, GetResponse, NodeDriver, NodeError, RequestId, RequestKind, RequestTracker,
    SetRequest, SetResponse,
};

pub const KEY_NOT_FOUND: &str = "Key not found";
pub const EMPTY_VALUE: &str = "Empty value";
pub const UNKNOWN_ERROR: &str = "Unknown error";
pub const NO_RESULTS_YET: &str = "No query results yet...";

pub fn connection_failure_message(base_url: &str) -> String {
    format!("Failed to connect to GrassDB at {}", base_url)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteStatus {
    pub text: String,
    pub is_error: bool,
}

impl WriteStatus {
    fn success(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    fn error(text: String) -> Self {
        Self {
            text,
            is_error: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WriteForm {
    pub key: String,
    pub value: String,
    pub status: Option<WriteStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct ReadForm {
    pub search_key: String,
    /// `None` until the first read completes, and again while a new read is
    /// in flight.
    pub result: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WriteSubmission {
    pub id: RequestId,
    pub base_url: String,
    pub request: SetRequest,
}

#[derive(Debug, Clone)]
pub struct ReadSubmission {
    pub id: RequestId,
    pub base_url: String,
    pub request: GetRequest,
}

pub struct ConsoleState {
    pub node_url: String,
    pub write: WriteForm,
    pub read: ReadForm,
    requests: RequestTracker,
}

impl ConsoleState {
    pub fn new(node_url: impl Into<String>) -> Self {
        Self {
            node_url: node_url.into(),
            write: WriteForm::default(),
            read: ReadForm::default(),
            requests: RequestTracker::new(),
        }
    }

    /// Shared by both panes. It only changes how the submit buttons render;
    /// submissions are never refused because of it.
    pub fn is_loading(&self) -> bool {
        self.requests.has_running()
    }

    pub fn write_button_label(&self) -> &'static str {
        if self.is_loading() {
            "Writing..."
        } else {
            "Set Key"
        }
    }

    pub fn read_result_text(&self) -> &str {
        self.read.result.as_deref().unwrap_or(NO_RESULTS_YET)
    }

    pub fn requests(&self) -> &RequestTracker {
        &self.requests
    }

    pub fn requests_mut(&mut self) -> &mut RequestTracker {
        &mut self.requests
    }

    /// Start a write. Key and value are both required; returns `None` and
    /// leaves the form untouched when either is empty.
    pub fn submit_write(&mut self) -> Option<WriteSubmission> {
        if self.write.key.is_empty() || self.write.value.is_empty() {
            return None;
        }

        self.write.status = None;

        let request = SetRequest::new(self.write.key.clone(), self.write.value.clone());
        let id = self.requests.start(RequestKind::Write, request.key.clone());

        info!("Submitting SET {} to {}", request.key, self.node_url);

        Some(WriteSubmission {
            id,
            base_url: self.node_url.clone(),
            request,
        })
    }

    /// Start a read. The search key is required.
    pub fn submit_read(&mut self) -> Option<ReadSubmission> {
        if self.read.search_key.is_empty() {
            return None;
        }

        self.read.result = None;

        let request = GetRequest::new(self.read.search_key.clone());
        let id = self.requests.start(RequestKind::Read, request.key.clone());

        info!("Submitting GET {} to {}", request.key, self.node_url);

        Some(ReadSubmission {
            id,
            base_url: self.node_url.clone(),
            request,
        })
    }

    pub fn finish_write(
        &mut self,
        submission: &WriteSubmission,
        outcome: Result<SetResponse, NodeError>,
    ) {
        let status = match &outcome {
            Ok(response) if response.success => {
                self.write.key.clear();
                self.write.value.clear();
                WriteStatus::success(format!("Successfully set {}", submission.request.key))
            }
            Ok(response) => WriteStatus::error(format!(
                "Error: {}",
                response.error_message().unwrap_or(UNKNOWN_ERROR)
            )),
            Err(e) => {
                error!(
                    "SET {} against {} failed: {}",
                    submission.request.key, submission.base_url, e
                );
                WriteStatus::error(connection_failure_message(&submission.base_url))
            }
        };

        match &outcome {
            Ok(_) => self.requests.complete(submission.id),
            Err(e) => self.requests.fail(submission.id, e.to_string()),
        }

        debug!("Write status: {}", status.text);
        self.write.status = Some(status);
    }

    pub fn finish_read(
        &mut self,
        submission: &ReadSubmission,
        outcome: Result<GetResponse, NodeError>,
    ) {
        let result = match &outcome {
            Ok(response) if response.is_missing() => KEY_NOT_FOUND.to_string(),
            Ok(response) => response.non_empty_value().unwrap_or(EMPTY_VALUE).to_string(),
            Err(NodeError::KeyNotFound) => KEY_NOT_FOUND.to_string(),
            Err(NodeError::Status { code, reason }) => {
                if reason.is_empty() {
                    format!("Error: {}", code)
                } else {
                    format!("Error: {}", reason)
                }
            }
            Err(e) => {
                error!(
                    "GET {} against {} failed: {}",
                    submission.request.key, submission.base_url, e
                );
                connection_failure_message(&submission.base_url)
            }
        };

        match &outcome {
            Ok(_) | Err(NodeError::KeyNotFound) => self.requests.complete(submission.id),
            Err(e) => self.requests.fail(submission.id, e.to_string()),
        }

        debug!("Read result: {}", result);
        self.read.result = Some(result);
    }
}

/// Perform the single request behind a write submission.
pub async fn run_write(
    driver: &dyn NodeDriver,
    submission: &WriteSubmission,
) -> Result<SetResponse, NodeError> {
    let client = driver.connect(&submission.base_url)?;
    client.set(&submission.request).await
}

/// Perform the single request behind a read submission.
pub async fn run_read(
    driver: &dyn NodeDriver,
    submission: &ReadSubmission,
) -> Result<GetResponse, NodeError> {
    let client = driver.connect(&submission.base_url)?;
    client.get(&submission.request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console_with_write(key: &str, value: &str) -> (ConsoleState, WriteSubmission) {
        let mut console = ConsoleState::new("http://localhost:8081");
        console.write.key = key.to_string();
        console.write.value = value.to_string();
        let submission = console.submit_write().unwrap();
        (console, submission)
    }

    fn console_with_read(key: &str) -> (ConsoleState, ReadSubmission) {
        let mut console = ConsoleState::new("http://localhost:8081");
        console.read.search_key = key.to_string();
        let submission = console.submit_read().unwrap();
        (console, submission)
    }

    #[test]
    fn required_fields_block_submission() {
        let mut console = ConsoleState::new("http://localhost:8081");
        console.write.key = "username".to_string();
        assert!(console.submit_write().is_none());

        console.write.key.clear();
        console.write.value = "admin".to_string();
        assert!(console.submit_write().is_none());

        assert!(console.submit_read().is_none());
        assert!(!console.is_loading());
    }

    #[test]
    fn submission_sets_loading_and_clears_previous_outcome() {
        let (mut console, submission) = console_with_write("k", "v");
        console.finish_write(&submission, Ok(SetResponse::rejected("nope")));
        assert!(console.write.status.is_some());

        console.write.key = "k".to_string();
        console.write.value = "v".to_string();
        let _pending = console.submit_write().unwrap();

        assert!(console.is_loading());
        assert_eq!(console.write_button_label(), "Writing...");
        assert_eq!(console.write.status, None);
    }

    #[test]
    fn successful_write_clears_inputs() {
        let (mut console, submission) = console_with_write("username", "admin");

        console.finish_write(&submission, Ok(SetResponse::ok()));

        let status = console.write.status.clone().unwrap();
        assert_eq!(status.text, "Successfully set username");
        assert!(!status.is_error);
        assert!(console.write.key.is_empty());
        assert!(console.write.value.is_empty());
        assert!(!console.is_loading());
        assert_eq!(console.write_button_label(), "Set Key");
    }

    #[test]
    fn rejected_write_keeps_inputs() {
        let (mut console, submission) = console_with_write("username", "admin");

        console.finish_write(&submission, Ok(SetResponse::rejected("disk full")));

        assert_eq!(console.write.status.clone().unwrap().text, "Error: disk full");
        assert_eq!(console.write.key, "username");
        assert_eq!(console.write.value, "admin");
    }

    #[test]
    fn rejected_write_without_error_text() {
        let (mut console, submission) = console_with_write("k", "v");

        console.finish_write(&submission, Ok(SetResponse::default()));

        assert_eq!(
            console.write.status.clone().unwrap().text,
            "Error: Unknown error"
        );
    }

    #[test]
    fn transport_failure_names_the_submitted_url() {
        let (mut console, submission) = console_with_write("k", "v");
        console.node_url = "http://edited-meanwhile:1".to_string();

        console.finish_write(
            &submission,
            Err(NodeError::connection_failed("connection refused")),
        );

        let status = console.write.status.clone().unwrap();
        assert_eq!(
            status.text,
            "Failed to connect to GrassDB at http://localhost:8081"
        );
        assert!(status.is_error);
    }

    #[test]
    fn read_outcomes() {
        let cases = [
            (Err(NodeError::KeyNotFound), "Key not found"),
            (
                Err(NodeError::Status {
                    code: 500,
                    reason: "Internal Server Error".to_string(),
                }),
                "Error: Internal Server Error",
            ),
            (
                Err(NodeError::Status {
                    code: 599,
                    reason: String::new(),
                }),
                "Error: 599",
            ),
            (Ok(GetResponse::with_value("admin")), "admin"),
            (Ok(GetResponse::default()), "Empty value"),
            (Ok(GetResponse::with_value("")), "Empty value"),
            (Ok(GetResponse::missing()), "Key not found"),
            (
                Err(NodeError::invalid_response("expected value at line 1")),
                "Failed to connect to GrassDB at http://localhost:8081",
            ),
        ];

        for (outcome, expected) in cases {
            let (mut console, submission) = console_with_read("username");
            console.finish_read(&submission, outcome);
            assert_eq!(console.read_result_text(), expected);
            assert!(!console.is_loading());
        }
    }

    #[test]
    fn read_placeholder_before_first_result() {
        let console = ConsoleState::new("http://localhost:8081");
        assert_eq!(console.read_result_text(), NO_RESULTS_YET);
    }

    #[test]
    fn loading_stays_on_while_any_request_is_in_flight() {
        let mut console = ConsoleState::new("http://localhost:8081");
        console.write.key = "a".to_string();
        console.write.value = "1".to_string();
        console.read.search_key = "b".to_string();

        let write = console.submit_write().unwrap();
        let read = console.submit_read().unwrap();

        console.finish_read(&read, Ok(GetResponse::with_value("2")));
        assert!(console.is_loading());

        console.finish_write(&write, Ok(SetResponse::ok()));
        assert!(!console.is_loading());
    }

    #[test]
    fn last_completion_wins() {
        let mut console = ConsoleState::new("http://localhost:8081");
        console.read.search_key = "a".to_string();
        let first = console.submit_read().unwrap();
        console.read.search_key = "b".to_string();
        let second = console.submit_read().unwrap();

        console.finish_read(&second, Ok(GetResponse::with_value("from-b")));
        console.finish_read(&first, Ok(GetResponse::with_value("from-a")));

        assert_eq!(console.read_result_text(), "from-a");
    }
}
