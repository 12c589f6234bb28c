//! Mutation records
//!
//! Each synchronized change to an attached element is described by one
//! record carrying exactly what a browser needs to replay it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Element, NodeId};

/// Browser-side operation name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Method {
    Append,
    Insert,
    Remove,
    RemoveAttribute,
    SetAttribute,
    RemoveChild,
    ReplaceChild,
    TextContent,
    Show,
    Hide,
    AddClass,
    RemoveClass,
    Empty,
    AddEventListener,
    RemoveEventListener,
    Query,
    Click,
    Eval,
    Scroll,
    ScrollTo,
    ScrollBy,
}

/// One mutation of one element
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRecord {
    pub id: NodeId,
    pub tag: &'static str,
    pub method: Method,
    pub params: Map<String, Value>,
}

impl MutationRecord {
    pub fn new(target: &Element, method: Method) -> Self {
        Self {
            id: target.id(),
            tag: target.tag(),
            method,
            params: Map::new(),
        }
    }

    /// Add a method parameter
    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn set_attribute(target: &Element, attr: &str, value: &str) -> Self {
        Self::new(target, Method::SetAttribute)
            .param("attr", attr)
            .param("value", value)
    }

    pub fn remove_attribute(target: &Element, attr: &str) -> Self {
        Self::new(target, Method::RemoveAttribute).param("attr", attr)
    }

    pub fn text_content(target: &Element, text: &str) -> Self {
        Self::new(target, Method::TextContent).param("text", text)
    }
}

/// Receiver of mutations made under a document root.
///
/// Implemented by the synchronization layer; a document root keeps a weak
/// reference to its sink.
pub trait MutationSink {
    /// Whether any browser is listening
    fn is_connected(&self) -> bool;

    /// Deliver a mutation that already happened locally
    fn emit(&self, record: MutationRecord);

    /// Start a browser-acknowledged removal of `element`.
    ///
    /// The sink must eventually call [`Element::detach`].
    fn request_remove(&self, element: &Element);

    /// Called when a subtree is attached under the root
    fn adopt(&self, element: &Element);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names() {
        assert_eq!(serde_json::to_value(Method::TextContent).unwrap(), "textContent");
        assert_eq!(serde_json::to_value(Method::RemoveChild).unwrap(), "removeChild");
        assert_eq!(serde_json::to_value(Method::Append).unwrap(), "append");
    }

    #[test]
    fn test_browser_command_names() {
        assert_eq!(serde_json::to_value(Method::ScrollTo).unwrap(), "scrollTo");
        assert_eq!(serde_json::to_value(Method::Eval).unwrap(), "eval");
    }
}
