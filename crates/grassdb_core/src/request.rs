use std::collections::HashMap;
use std::time::{Duration, Instant};

use uuid::Uuid;

pub type RequestId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Write,
    Read,
}

impl RequestKind {
    pub fn label(&self) -> &'static str {
        match self {
            RequestKind::Write => "Write",
            RequestKind::Read => "Read",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestStatus {
    Running,
    Completed,
    Failed(String),
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Running)
    }
}

struct TrackedRequest {
    kind: RequestKind,
    description: String,
    status: RequestStatus,
    started_at: Instant,
    completed_at: Option<Instant>,
}

impl TrackedRequest {
    fn elapsed(&self) -> Duration {
        match self.completed_at {
            Some(completed) => completed.duration_since(self.started_at),
            None => self.started_at.elapsed(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    pub id: RequestId,
    pub kind: RequestKind,
    pub description: String,
    pub status: RequestStatus,
    pub elapsed: Duration,
}

/// In-flight console requests.
///
/// Requests cannot be cancelled: once started they stay `Running` until the
/// caller reports a completion or a failure.
#[derive(Default)]
pub struct RequestTracker {
    requests: HashMap<RequestId, TrackedRequest>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self {
            requests: HashMap::new(),
        }
    }

    pub fn start(&mut self, kind: RequestKind, description: impl Into<String>) -> RequestId {
        let id = RequestId::new_v4();

        self.requests.insert(
            id,
            TrackedRequest {
                kind,
                description: description.into(),
                status: RequestStatus::Running,
                started_at: Instant::now(),
                completed_at: None,
            },
        );

        id
    }

    pub fn complete(&mut self, id: RequestId) {
        if let Some(request) = self.requests.get_mut(&id)
            && request.status == RequestStatus::Running
        {
            request.status = RequestStatus::Completed;
            request.completed_at = Some(Instant::now());
        }
    }

    pub fn fail(&mut self, id: RequestId, error: impl Into<String>) {
        if let Some(request) = self.requests.get_mut(&id)
            && request.status == RequestStatus::Running
        {
            request.status = RequestStatus::Failed(error.into());
            request.completed_at = Some(Instant::now());
        }
    }

    pub fn get(&self, id: RequestId) -> Option<RequestSnapshot> {
        self.requests.get(&id).map(|request| RequestSnapshot {
            id,
            kind: request.kind,
            description: request.description.clone(),
            status: request.status.clone(),
            elapsed: request.elapsed(),
        })
    }

    pub fn active_count(&self) -> usize {
        self.requests
            .values()
            .filter(|r| r.status == RequestStatus::Running)
            .count()
    }

    pub fn has_running(&self) -> bool {
        self.requests
            .values()
            .any(|r| r.status == RequestStatus::Running)
    }

    /// Text for the status bar while something is in flight, e.g.
    /// `Write username (0.4s)`.
    pub fn status_message(&self) -> Option<String> {
        match self.active_count() {
            0 => None,
            1 => {
                let id = self
                    .requests
                    .iter()
                    .find(|(_, r)| r.status == RequestStatus::Running)
                    .map(|(id, _)| *id)?;
                let snapshot = self.get(id)?;

                Some(format!(
                    "{} {} ({:.1}s)",
                    snapshot.kind.label(),
                    snapshot.description,
                    snapshot.elapsed.as_secs_f64()
                ))
            }
            n => Some(format!("{} requests in flight...", n)),
        }
    }

    pub fn cleanup_completed(&mut self, max_age: Duration) {
        let now = Instant::now();
        self.requests.retain(|_, request| {
            if request.status.is_terminal()
                && let Some(completed) = request.completed_at
            {
                return now.duration_since(completed) < max_age;
            }
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_until_completed_or_failed() {
        let mut tracker = RequestTracker::new();
        let write = tracker.start(RequestKind::Write, "username");
        let read = tracker.start(RequestKind::Read, "username");

        assert!(tracker.has_running());
        assert_eq!(tracker.active_count(), 2);
        assert_eq!(
            tracker.status_message().as_deref(),
            Some("2 requests in flight...")
        );

        tracker.complete(write);
        assert!(tracker.has_running());
        assert_eq!(tracker.active_count(), 1);
        let message = tracker.status_message().unwrap();
        assert!(message.starts_with("Read username ("), "{}", message);
        assert!(message.ends_with("s)"), "{}", message);

        tracker.fail(read, "connection refused");
        assert!(!tracker.has_running());
        assert_eq!(tracker.status_message(), None);

        let snapshot = tracker.get(read).unwrap();
        assert_eq!(snapshot.kind, RequestKind::Read);
        assert_eq!(snapshot.description, "username");
        assert_eq!(
            snapshot.status,
            RequestStatus::Failed("connection refused".to_string())
        );
    }

    #[test]
    fn terminal_status_is_sticky() {
        let mut tracker = RequestTracker::new();
        let id = tracker.start(RequestKind::Write, "k");

        tracker.fail(id, "boom");
        tracker.complete(id);

        assert_eq!(
            tracker.get(id).unwrap().status,
            RequestStatus::Failed("boom".to_string())
        );
    }

    #[test]
    fn elapsed_freezes_once_finished() {
        let mut tracker = RequestTracker::new();
        let id = tracker.start(RequestKind::Write, "k");
        tracker.complete(id);

        let first = tracker.get(id).unwrap().elapsed;
        std::thread::sleep(Duration::from_millis(5));

        assert_eq!(tracker.get(id).unwrap().elapsed, first);
        assert_eq!(RequestKind::Write.label(), "Write");
    }

    #[test]
    fn cleanup_keeps_running_requests() {
        let mut tracker = RequestTracker::new();
        let done = tracker.start(RequestKind::Write, "a");
        let pending = tracker.start(RequestKind::Read, "b");
        tracker.complete(done);

        tracker.cleanup_completed(Duration::ZERO);

        assert!(tracker.get(done).is_none());
        assert!(tracker.get(pending).is_some());
    }
}
