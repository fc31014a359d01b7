//! One-shot `set` / `get` commands.
//!
//! Each node in the list gets one attempt, in order. A write moves on when a
//! node is unreachable or answers "Not Leader"; a read moves on whenever a
//! node fails to answer.

use anyhow::{Result, bail};
use grassdb_core::console::UNKNOWN_ERROR;
use grassdb_core::{GetRequest, NodeDriver, NodeError, SetRequest, truncate_string_safe};
use log::{debug, info, warn};

/// Write `request` to the first node that accepts it and return that node's
/// URL.
pub async fn set_on_any(
    driver: &dyn NodeDriver,
    nodes: &[String],
    request: &SetRequest,
) -> Result<String> {
    for node in nodes {
        let client = match driver.connect(node) {
            Ok(client) => client,
            Err(e) => {
                warn!("Skipping {}: {}", node, e);
                continue;
            }
        };

        match client.set(request).await {
            Ok(response) if response.success => {
                info!("SET {} accepted by {}", request.key, node);
                return Ok(node.clone());
            }
            Ok(response) if response.is_not_leader() => {
                info!("{} is not the leader, trying next node", node);
            }
            Ok(response) => {
                bail!(
                    "server error: {}",
                    response.error_message().unwrap_or(UNKNOWN_ERROR)
                );
            }
            Err(e) => warn!("SET {} on {} failed: {}", request.key, node, e),
        }
    }

    bail!("failed to set key on any node")
}

/// Read from the first node that answers. `Ok(None)` means the key does not
/// exist.
pub async fn get_from_any(
    driver: &dyn NodeDriver,
    nodes: &[String],
    request: &GetRequest,
) -> Result<Option<String>> {
    for node in nodes {
        let client = match driver.connect(node) {
            Ok(client) => client,
            Err(e) => {
                warn!("Skipping {}: {}", node, e);
                continue;
            }
        };

        match client.get(request).await {
            Ok(response) if response.is_missing() => return Ok(None),
            Ok(response) => {
                let value = response.value.unwrap_or_default();
                debug!(
                    "GET {} from {}: {}",
                    request.key,
                    node,
                    truncate_string_safe(&value, 64)
                );
                return Ok(Some(value));
            }
            Err(NodeError::KeyNotFound) => return Ok(None),
            Err(e) => warn!("GET {} on {} failed: {}", request.key, node, e),
        }
    }

    bail!("failed to get key from any node")
}

pub async fn run_set(
    driver: &dyn NodeDriver,
    nodes: &[String],
    key: String,
    value: String,
) -> Result<()> {
    set_on_any(driver, nodes, &SetRequest::new(key, value)).await?;
    println!("OK");
    Ok(())
}

pub async fn run_get(driver: &dyn NodeDriver, nodes: &[String], key: String) -> Result<()> {
    match get_from_any(driver, nodes, &GetRequest::new(key)).await? {
        Some(value) => println!("{}", value),
        None => println!("(nil)"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use grassdb_core::{GetResponse, SetResponse};
    use grassdb_test_support::{FakeDriver, FakeGetOutcome, FakeSetOutcome};

    const A: &str = "http://node-a:8081";
    const B: &str = "http://node-b:8081";
    const C: &str = "http://node-c:8081";

    fn nodes() -> Vec<String> {
        vec![A.to_string(), B.to_string(), C.to_string()]
    }

    #[tokio::test]
    async fn set_skips_followers_and_unreachable_nodes() {
        let follower = FakeSetOutcome::Response(SetResponse::rejected("Not Leader"));
        let driver = FakeDriver::new()
            .with_unreachable(A)
            .with_node_set_outcome(B, follower);

        let leader = set_on_any(&driver, &nodes(), &SetRequest::new("k", "v"))
            .await
            .unwrap();

        assert_eq!(leader, C);
        assert_eq!(driver.value("k").as_deref(), Some("v"));
        assert_eq!(driver.stats().set_requests.len(), 3);
    }

    #[tokio::test]
    async fn set_stops_on_other_server_errors() {
        let rejected = FakeSetOutcome::Response(SetResponse::rejected("disk full"));
        let driver = FakeDriver::new().with_node_set_outcome(A, rejected);

        let err = set_on_any(&driver, &nodes(), &SetRequest::new("k", "v"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "server error: disk full");
        assert_eq!(driver.stats().set_requests.len(), 1);
    }

    #[tokio::test]
    async fn set_fails_when_every_node_is_down() {
        let driver = FakeDriver::new()
            .with_unreachable(A)
            .with_unreachable(B)
            .with_unreachable(C);

        let err = set_on_any(&driver, &nodes(), &SetRequest::new("k", "v"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "failed to set key on any node");
    }

    #[tokio::test]
    async fn get_falls_through_failing_nodes() {
        let broken = FakeGetOutcome::Status(500, "Internal Server Error".into());
        let driver = FakeDriver::new()
            .with_unreachable(A)
            .with_node_get_outcome(B, broken)
            .with_entry("username", "admin");

        let value = get_from_any(&driver, &nodes(), &GetRequest::new("username"))
            .await
            .unwrap();

        assert_eq!(value.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let driver = FakeDriver::new();

        let value = get_from_any(&driver, &nodes(), &GetRequest::new("ghost"))
            .await
            .unwrap();

        assert_eq!(value, None);
        assert_eq!(driver.stats().get_requests.len(), 1);
    }

    #[tokio::test]
    async fn get_found_false_is_none() {
        let missing = FakeGetOutcome::Response(GetResponse::missing());
        let driver = FakeDriver::new().with_get_outcome(missing);

        let value = get_from_any(&driver, &nodes(), &GetRequest::new("ghost"))
            .await
            .unwrap();

        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn get_fails_when_every_node_is_down() {
        let refused = FakeGetOutcome::ConnectionFailed("connection refused".into());
        let driver = FakeDriver::new().with_get_outcome(refused);

        let err = get_from_any(&driver, &nodes(), &GetRequest::new("k"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "failed to get key from any node");
        assert_eq!(driver.stats().get_requests.len(), 3);
    }
}
