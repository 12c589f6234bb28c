//! Text leaves

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::element::ElementData;
use crate::{Element, Method, MutationRecord, escape_html};

#[derive(Debug)]
pub(crate) struct TextData {
    text: String,
    raw: bool,
    parent: Weak<RefCell<ElementData>>,
}

/// Text content leaf.
///
/// Cloning the handle shares the leaf; use [`TextNode::deep_clone`] for an
/// independent copy.
#[derive(Debug, Clone)]
pub struct TextNode(Rc<RefCell<TextData>>);

impl TextNode {
    /// Text escaped on serialization
    pub fn new(text: impl Into<String>) -> Self {
        Self::build(text.into(), false)
    }

    /// Text emitted verbatim
    pub fn raw(text: impl Into<String>) -> Self {
        Self::build(text.into(), true)
    }

    fn build(text: String, raw: bool) -> Self {
        Self(Rc::new(RefCell::new(TextData {
            text,
            raw,
            parent: Weak::new(),
        })))
    }

    pub fn text(&self) -> String {
        self.0.borrow().text.clone()
    }

    pub fn is_raw(&self) -> bool {
        self.0.borrow().raw
    }

    /// Replace the text. An attached leaf is re-sent by its parent.
    pub fn set_text(&self, text: impl Into<String>) {
        self.0.borrow_mut().text = text.into();
        if let Some(parent) = self.parent() {
            if let Some(index) = parent.index(self) {
                parent.sync(|| {
                    MutationRecord::new(&parent, Method::ReplaceChild)
                        .param("index", index)
                        .param("html", self.render(parent.descriptor().escape_text))
                });
            }
        }
    }

    pub fn parent(&self) -> Option<Element> {
        self.0.borrow().parent.upgrade().map(Element)
    }

    pub(crate) fn set_parent(&self, parent: Weak<RefCell<ElementData>>) {
        self.0.borrow_mut().parent = parent;
    }

    /// Serialized form, escaped unless raw
    pub fn html(&self) -> String {
        self.render(true)
    }

    pub(crate) fn render(&self, escape: bool) -> String {
        let data = self.0.borrow();
        if escape && !data.raw {
            escape_html(&data.text)
        } else {
            data.text.clone()
        }
    }

    /// Detached copy with the same text
    pub fn deep_clone(&self) -> Self {
        let data = self.0.borrow();
        Self::build(data.text.clone(), data.raw)
    }

    pub(crate) fn ptr_eq(&self, other: &TextNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for TextNode {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl From<&str> for TextNode {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}
