//! Wire messages
//!
//! Outbound: `{"id", "tag", "method", ...params}`, one per mutation.
//! Inbound: objects tagged by `type` (`log`, `event`, `response`), sent
//! alone or batched in an array.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tether_dom::{Method, MutationRecord, NodeId};

use crate::SyncError;

/// Server to browser message
#[derive(Debug, Serialize)]
pub struct OutboundMessage<'a> {
    pub id: &'a NodeId,
    pub tag: &'a str,
    pub method: Method,
    #[serde(flatten)]
    pub params: &'a Map<String, Value>,
}

impl<'a> From<&'a MutationRecord> for OutboundMessage<'a> {
    fn from(record: &'a MutationRecord) -> Self {
        Self {
            id: &record.id,
            tag: record.tag,
            method: record.method,
            params: &record.params,
        }
    }
}

impl OutboundMessage<'_> {
    pub fn to_json(&self) -> Result<String, SyncError> {
        serde_json::to_string(self).map_err(|e| SyncError::Malformed(e.to_string()))
    }
}

/// Browser to server message
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Inbound {
    /// Browser console output
    Log { level: String, message: String },
    /// DOM event; `event.type` names it
    Event { event: Value },
    /// Answer to a request carrying `reqid`
    Response {
        id: NodeId,
        #[serde(default)]
        reqid: Option<u64>,
        #[serde(default)]
        data: Option<Value>,
    },
}

impl Inbound {
    pub fn from_value(value: Value) -> Result<Self, SyncError> {
        match value.get("type").and_then(Value::as_str) {
            Some("log" | "event" | "response") => {
                serde_json::from_value(value).map_err(|e| SyncError::Malformed(e.to_string()))
            }
            Some(other) => Err(SyncError::UnknownMessageType(other.to_string())),
            None => Err(SyncError::Malformed("missing `type`".to_string())),
        }
    }
}

/// Split an inbound frame into its messages
pub fn split_batch(text: &str) -> Result<Vec<Value>, SyncError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| SyncError::Malformed(e.to_string()))?;
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(_) => Ok(vec![value]),
        other => Err(SyncError::Malformed(format!("expected object or array, got {other}"))),
    }
}

/// Node id carried by an event target object; numeric ids are accepted
pub(crate) fn target_id(event: &Value, field: &str) -> Option<NodeId> {
    match event.get(field)?.get("id")? {
        Value::String(id) if !id.is_empty() => Some(NodeId::new(id.as_str())),
        Value::Number(n) => Some(NodeId::new(n.to_string())),
        _ => None,
    }
}
