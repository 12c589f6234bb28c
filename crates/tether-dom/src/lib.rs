//! tether DOM - server-side document mirror
//!
//! A tree of addressable elements and text leaves. Every element carries a
//! stable [`NodeId`]; when the tree is attached to a document root that owns a
//! [`MutationSink`], each mutation is reported to the sink as a
//! [`MutationRecord`] so it can be replayed in connected browsers.

mod attributes;
mod classlist;
mod descriptor;
mod element;
mod events;
pub mod forms;
mod mutation;
mod node;
pub mod tags;
mod text;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

pub use attributes::{Attributes, escape_html, is_boolean_attribute};
pub use classlist::{ClassList, IntoClasses};
pub use descriptor::TagDescriptor;
pub use element::{Element, WeakElement};
pub use events::{Event, EventListeners, Listener, ListenerId, TaskSpawner};
pub use mutation::{Method, MutationRecord, MutationSink};
pub use node::Node;
pub use text::TextNode;

pub use tether_css::{CssError, CssStyleDeclaration};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque node identifier shared with the browser.
///
/// Generated ids come from a process-wide counter and are never handed out
/// twice in one process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap an explicit id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Allocate a fresh process-unique id
    pub fn generate() -> Self {
        let n = NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed);
        Self(format!("t{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Structural and attribute errors raised by the tree API
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Index {index} out of range for {len} children")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Hierarchy request error: {0}")]
    HierarchyRequest(String),

    #[error("Invalid token: {0:?}")]
    InvalidToken(String),

    #[error("Attribute `{0}` is read-only")]
    ReadOnlyAttribute(String),

    #[error(transparent)]
    Style(#[from] CssError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = NodeId::generate();
        let b = NodeId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_node_id_serializes_as_string() {
        let id = NodeId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }
}
