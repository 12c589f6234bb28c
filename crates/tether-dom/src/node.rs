//! Tree node

use std::cell::RefCell;
use std::rc::Weak;

use crate::element::ElementData;
use crate::{DomError, Element, TextNode};

/// Child of an element: another element or a text leaf
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(TextNode),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    pub fn parent(&self) -> Option<Element> {
        match self {
            Node::Element(el) => el.parent(),
            Node::Text(text) => text.parent(),
        }
    }

    pub(crate) fn set_parent(&self, parent: Weak<RefCell<ElementData>>) {
        match self {
            Node::Element(el) => el.set_parent(parent),
            Node::Text(text) => text.set_parent(parent),
        }
    }

    /// Concatenated text of the node and its descendants
    pub fn text_content(&self) -> String {
        match self {
            Node::Element(el) => el.text_content(),
            Node::Text(text) => text.text(),
        }
    }

    pub fn html(&self) -> String {
        match self {
            Node::Element(el) => el.html(),
            Node::Text(text) => text.html(),
        }
    }

    pub(crate) fn render(&self, with_id: bool, escape: bool) -> String {
        match self {
            Node::Element(el) => el.render(with_id),
            Node::Text(text) => text.render(escape),
        }
    }

    pub fn deep_clone(&self) -> Node {
        match self {
            Node::Element(el) => Node::Element(el.deep_clone()),
            Node::Text(text) => Node::Text(text.deep_clone()),
        }
    }

    /// Insert a child; only elements hold children
    pub fn insert(&self, pos: usize, child: impl Into<Node>) -> Result<(), DomError> {
        match self {
            Node::Element(el) => el.insert(pos, child),
            Node::Text(_) => Err(DomError::TypeMismatch(
                "text leaves cannot hold children".to_string(),
            )),
        }
    }

    pub fn append(&self, child: impl Into<Node>) -> Result<(), DomError> {
        match self {
            Node::Element(el) => el.append(child),
            Node::Text(_) => Err(DomError::TypeMismatch(
                "text leaves cannot hold children".to_string(),
            )),
        }
    }

    /// Same text as `other`; used for text membership tests
    pub(crate) fn same_text(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Text(a), Node::Text(b)) => a.text() == b.text(),
            _ => false,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Element(a), Node::Element(b)) => a == b,
            (Node::Text(a), Node::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl From<&Element> for Node {
    fn from(el: &Element) -> Self {
        Node::Element(el.clone())
    }
}

impl From<TextNode> for Node {
    fn from(text: TextNode) -> Self {
        Node::Text(text)
    }
}

impl From<&TextNode> for Node {
    fn from(text: &TextNode) -> Self {
        Node::Text(text.clone())
    }
}

impl From<&Node> for Node {
    fn from(node: &Node) -> Self {
        node.clone()
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(TextNode::new(text))
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(TextNode::new(text))
    }
}
