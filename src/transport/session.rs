//! Per-request sessions
//!
//! A [`Session`] lives for exactly one HTTP request. It is registered with the
//! [`SessionTracker`] on open and released on drop, so it is released on every
//! exit path, including when the client disconnects and the request future is
//! cancelled mid-flight.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use uuid::Uuid;

use crate::mcp::protocol::codes;
use crate::mcp::{McpRequest, McpResponse, McpServer};

/// Session ID
pub type SessionId = String;

/// Tracks sessions that are currently open
#[derive(Clone, Default)]
pub struct SessionTracker {
    active: Arc<RwLock<HashSet<SessionId>>>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open sessions
    pub fn active_count(&self) -> usize {
        self.active.read().len()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.read().contains(id)
    }

    fn register(&self, id: SessionId) {
        self.active.write().insert(id);
    }

    fn release(&self, id: &str) {
        self.active.write().remove(id);
    }
}

/// A parsed request body
#[derive(Debug)]
pub enum Inbound {
    Single(Value),
    Batch(Vec<Value>),
}

impl Inbound {
    /// Parse a raw body. Fails only when it is not JSON at all.
    pub fn parse(body: &[u8]) -> serde_json::Result<Self> {
        Ok(match serde_json::from_slice::<Value>(body)? {
            Value::Array(items) => Inbound::Batch(items),
            other => Inbound::Single(other),
        })
    }
}

/// Short-lived binding of one request to the shared protocol server
pub struct Session {
    id: SessionId,
    server: Arc<McpServer>,
    tracker: SessionTracker,
}

impl Session {
    pub fn open(server: Arc<McpServer>, tracker: &SessionTracker) -> Self {
        let id = Uuid::new_v4().to_string();
        tracker.register(id.clone());
        tracing::debug!(session = %id, "session opened");
        Self {
            id,
            server,
            tracker: tracker.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Dispatch every message in the body; notifications produce nothing
    pub async fn handle(&self, inbound: Inbound) -> Vec<McpResponse> {
        let messages = match inbound {
            Inbound::Single(value) => vec![value],
            Inbound::Batch(items) if items.is_empty() => {
                return vec![McpResponse::error(
                    None,
                    codes::INVALID_REQUEST,
                    "Empty batch".to_string(),
                )];
            }
            Inbound::Batch(items) => items,
        };

        let mut responses = Vec::with_capacity(messages.len());
        for message in messages {
            match serde_json::from_value::<McpRequest>(message) {
                Ok(request) => {
                    tracing::debug!(session = %self.id, method = %request.method, "dispatching");
                    if let Some(response) = self.server.handle_request(request).await {
                        responses.push(response);
                    }
                }
                Err(e) => responses.push(McpResponse::error(
                    None,
                    codes::INVALID_REQUEST,
                    format!("Invalid request: {e}"),
                )),
            }
        }
        responses
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.tracker.release(&self.id);
        tracing::debug!(session = %self.id, "session released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::{ResourceRegistry, ToolRegistry};
    use serde_json::json;

    fn server() -> Arc<McpServer> {
        Arc::new(McpServer::new(ToolRegistry::new(), ResourceRegistry::new()))
    }

    #[test]
    fn test_session_released_on_drop() {
        let tracker = SessionTracker::new();
        let session = Session::open(server(), &tracker);
        let id = session.id().to_string();
        assert!(tracker.is_active(&id));
        assert_eq!(tracker.active_count(), 1);

        drop(session);
        assert!(!tracker.is_active(&id));
        assert_eq!(tracker.active_count(), 0);
    }

    #[test]
    fn test_sessions_have_distinct_ids() {
        let tracker = SessionTracker::new();
        let a = Session::open(server(), &tracker);
        let b = Session::open(server(), &tracker);
        assert_ne!(a.id(), b.id());
        assert_eq!(tracker.active_count(), 2);
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(Inbound::parse(b"{oops").is_err());
        assert!(matches!(Inbound::parse(b"[]").unwrap(), Inbound::Batch(_)));
    }

    #[tokio::test]
    async fn test_batch_skips_notifications() {
        let tracker = SessionTracker::new();
        let session = Session::open(server(), &tracker);
        let responses = session
            .handle(Inbound::Batch(vec![
                json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
                json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}),
                json!({"id": 2}),
            ]))
            .await;
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].id, Some(json!(1)));
        assert_eq!(responses[1].error.as_ref().unwrap().code, codes::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_batch_is_invalid() {
        let tracker = SessionTracker::new();
        let session = Session::open(server(), &tracker);
        let responses = session.handle(Inbound::Batch(vec![])).await;
        assert_eq!(responses[0].error.as_ref().unwrap().code, codes::INVALID_REQUEST);
    }
}
