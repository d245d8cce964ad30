//! Message envelope handler for the Learning Assistant RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! Requests are `{"action": ..., ...fields}` envelopes; replies are
//! `{"success": true, ...data}` or `{"error": "..."}`.

use serde_json::{json, Value};
use tracing::debug;

use crate::services::coordinator::Coordinator;
use crate::services::page_agent::PageAgent;
use crate::types::errors::EnvelopeError;
use crate::types::messages::{CoordinatorRequest, PageMessage};

const PING_ACTION: &str = "ping";

fn envelope_error(e: &EnvelopeError) -> Value {
    json!({ "error": e.to_string() })
}

/// Routes one envelope to the coordinator and returns its reply envelope.
pub async fn handle_message(coordinator: &Coordinator, message: &Value) -> Value {
    if message.get("action").and_then(|v| v.as_str()) == Some(PING_ACTION) {
        return json!({ "success": true, "version": env!("CARGO_PKG_VERSION") });
    }

    match CoordinatorRequest::from_envelope(message) {
        Ok(request) => coordinator.request(request).await.to_envelope(),
        Err(e) => {
            debug!(error = %e, "rejected envelope");
            envelope_error(&e)
        }
    }
}

/// Routes one envelope to a page agent and returns its reply envelope.
pub fn handle_page_message(agent: &mut PageAgent, message: &Value) -> Value {
    match PageMessage::from_envelope(message) {
        Ok(msg) => agent.handle(msg).to_envelope(),
        Err(e) => envelope_error(&e),
    }
}

/// Handles one protocol line: `{"id": ..., "message": {...}}`.
///
/// Returns `{"id": ..., "response": {...}}`; unparsable lines get
/// `{"id": null, "error": "parse error: ..."}`.
pub async fn handle_line(coordinator: &Coordinator, line: &str) -> Value {
    let request: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => return json!({ "id": null, "error": format!("parse error: {}", e) }),
    };

    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let Some(message) = request.get("message") else {
        return json!({ "id": id, "error": "missing message" });
    };

    let response = handle_message(coordinator, message).await;
    json!({ "id": id, "response": response })
}
