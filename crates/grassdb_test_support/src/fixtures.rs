use grassdb_core::{ConsoleState, ReadSubmission, WriteSubmission};

pub const NODE_URL: &str = "http://localhost:8081";

pub fn console() -> ConsoleState {
    ConsoleState::new(NODE_URL)
}

/// Fill the write pane and submit it.
pub fn submit_write(
    console: &mut ConsoleState,
    key: &str,
    value: &str,
) -> Option<WriteSubmission> {
    console.write.key = key.to_string();
    console.write.value = value.to_string();
    console.submit_write()
}

/// Fill the read pane and submit it.
pub fn submit_read(console: &mut ConsoleState, key: &str) -> Option<ReadSubmission> {
    console.read.search_key = key.to_string();
    console.submit_read()
}
