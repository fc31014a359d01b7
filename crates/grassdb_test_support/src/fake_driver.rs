use async_trait::async_trait;
use grassdb_core::{
    GetRequest, GetResponse, NodeClient, NodeDriver, NodeError, SetRequest, SetResponse,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone)]
pub enum FakeSetOutcome {
    Response(SetResponse),
    ConnectionFailed(String),
    InvalidResponse(String),
}

impl FakeSetOutcome {
    fn to_result(&self) -> Result<SetResponse, NodeError> {
        match self {
            Self::Response(response) => Ok(response.clone()),
            Self::ConnectionFailed(message) => Err(NodeError::connection_failed(message.clone())),
            Self::InvalidResponse(message) => Err(NodeError::invalid_response(message.clone())),
        }
    }
}

#[derive(Debug, Clone)]
pub enum FakeGetOutcome {
    Response(GetResponse),
    NotFound,
    Status(u16, String),
    ConnectionFailed(String),
    InvalidResponse(String),
}

impl FakeGetOutcome {
    fn to_result(&self) -> Result<GetResponse, NodeError> {
        match self {
            Self::Response(response) => Ok(response.clone()),
            Self::NotFound => Err(NodeError::KeyNotFound),
            Self::Status(code, reason) => Err(NodeError::Status {
                code: *code,
                reason: reason.clone(),
            }),
            Self::ConnectionFailed(message) => Err(NodeError::connection_failed(message.clone())),
            Self::InvalidResponse(message) => Err(NodeError::invalid_response(message.clone())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeDriverStats {
    pub connected_urls: Vec<String>,
    pub set_requests: Vec<(String, SetRequest)>,
    pub get_requests: Vec<(String, GetRequest)>,
}

#[derive(Default)]
struct FakeDriverState {
    store: RwLock<HashMap<String, String>>,
    set_outcomes: RwLock<HashMap<String, FakeSetOutcome>>,
    get_outcomes: RwLock<HashMap<String, FakeGetOutcome>>,
    default_set: RwLock<Option<FakeSetOutcome>>,
    default_get: RwLock<Option<FakeGetOutcome>>,
    unreachable: RwLock<HashSet<String>>,
    stats: Mutex<FakeDriverStats>,
}

/// Scripted in-memory stand-in for one or more GrassDB nodes.
///
/// Without scripting, every base URL behaves like a healthy node sharing one
/// in-memory map: writes succeed and reads return what was written, or
/// `KeyNotFound`. Outcomes can be scripted per base URL or for all nodes.
#[derive(Clone, Default)]
pub struct FakeDriver {
    state: Arc<FakeDriverState>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        rwlock_write(&self.state.store).insert(key.into(), value.into());
        self
    }

    pub fn with_set_response(self, response: SetResponse) -> Self {
        *rwlock_write(&self.state.default_set) = Some(FakeSetOutcome::Response(response));
        self
    }

    pub fn with_get_outcome(self, outcome: FakeGetOutcome) -> Self {
        *rwlock_write(&self.state.default_get) = Some(outcome);
        self
    }

    pub fn with_node_set_outcome(
        self,
        base_url: impl Into<String>,
        outcome: FakeSetOutcome,
    ) -> Self {
        rwlock_write(&self.state.set_outcomes).insert(base_url.into(), outcome);
        self
    }

    pub fn with_node_get_outcome(
        self,
        base_url: impl Into<String>,
        outcome: FakeGetOutcome,
    ) -> Self {
        rwlock_write(&self.state.get_outcomes).insert(base_url.into(), outcome);
        self
    }

    /// Every request to `base_url` fails as if the host refused the connection.
    pub fn with_unreachable(self, base_url: impl Into<String>) -> Self {
        rwlock_write(&self.state.unreachable).insert(base_url.into());
        self
    }

    pub fn value(&self, key: &str) -> Option<String> {
        rwlock_read(&self.state.store).get(key).cloned()
    }

    pub fn stats(&self) -> FakeDriverStats {
        mutex_lock(&self.state.stats).clone()
    }

    pub fn as_driver_arc(self) -> Arc<dyn NodeDriver> {
        Arc::new(self)
    }
}

impl NodeDriver for FakeDriver {
    fn display_name(&self) -> &'static str {
        "Fake"
    }

    fn connect(&self, base_url: &str) -> Result<Arc<dyn NodeClient>, NodeError> {
        mutex_lock(&self.state.stats)
            .connected_urls
            .push(base_url.to_string());

        Ok(Arc::new(FakeNodeClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            state: self.state.clone(),
        }))
    }
}

struct FakeNodeClient {
    base_url: String,
    state: Arc<FakeDriverState>,
}

impl FakeNodeClient {
    fn unreachable(&self) -> Option<NodeError> {
        rwlock_read(&self.state.unreachable)
            .contains(&self.base_url)
            .then(|| {
                NodeError::connection_failed(format!("{}: connection refused", self.base_url))
            })
    }
}

#[async_trait]
impl NodeClient for FakeNodeClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn set(&self, request: &SetRequest) -> Result<SetResponse, NodeError> {
        mutex_lock(&self.state.stats)
            .set_requests
            .push((self.base_url.clone(), request.clone()));

        if let Some(err) = self.unreachable() {
            return Err(err);
        }

        let scripted = rwlock_read(&self.state.set_outcomes)
            .get(&self.base_url)
            .cloned()
            .or_else(|| rwlock_read(&self.state.default_set).clone());

        if let Some(outcome) = scripted {
            let result = outcome.to_result();
            if matches!(&result, Ok(response) if response.success) {
                rwlock_write(&self.state.store)
                    .insert(request.key.clone(), request.value.clone());
            }
            return result;
        }

        log::debug!("fake SET {} on {}", request.key, self.base_url);
        rwlock_write(&self.state.store).insert(request.key.clone(), request.value.clone());
        Ok(SetResponse::ok())
    }

    async fn get(&self, request: &GetRequest) -> Result<GetResponse, NodeError> {
        mutex_lock(&self.state.stats)
            .get_requests
            .push((self.base_url.clone(), request.clone()));

        if let Some(err) = self.unreachable() {
            return Err(err);
        }

        let scripted = rwlock_read(&self.state.get_outcomes)
            .get(&self.base_url)
            .cloned()
            .or_else(|| rwlock_read(&self.state.default_get).clone());

        if let Some(outcome) = scripted {
            return outcome.to_result();
        }

        log::debug!("fake GET {} on {}", request.key, self.base_url);
        match rwlock_read(&self.state.store).get(&request.key) {
            Some(value) => Ok(GetResponse::with_value(value.clone())),
            None => Err(NodeError::KeyNotFound),
        }
    }
}

fn rwlock_read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poison_error) => poison_error.into_inner(),
    }
}

fn rwlock_write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poison_error) => poison_error.into_inner(),
    }
}

fn mutex_lock<T>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poison_error) => poison_error.into_inner(),
    }
}
