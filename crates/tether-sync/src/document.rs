//! Document
//!
//! The single root tree a session mirrors.

use tether_dom::{DomError, Element, NodeId, tags};

/// `<html>` tree with head and body
#[derive(Debug, Clone)]
pub struct Document {
    root: Element,
    head: Element,
    body: Element,
    title: Element,
}

impl Document {
    pub fn new(title: &str) -> Result<Self, DomError> {
        let root = Element::connectable(&tags::HTML);
        let head = Element::connectable(&tags::HEAD);
        let body = Element::connectable(&tags::BODY);
        let title_el = Element::connectable(&tags::TITLE);

        let meta = Element::new(&tags::META);
        meta.set_attribute("charset", "utf-8")?;
        title_el.set_text_content(title);

        head.extend([&meta, &title_el])?;
        root.extend([&head, &body])?;
        Ok(Self {
            root,
            head,
            body,
            title: title_el,
        })
    }

    /// The `<html>` element
    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn head(&self) -> &Element {
        &self.head
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    pub fn title(&self) -> String {
        self.title.text_content()
    }

    pub fn set_title(&self, title: &str) {
        self.title.set_text_content(title);
    }

    /// Full page for a fresh load
    pub fn html(&self) -> String {
        format!("<!DOCTYPE html>{}", self.root.html())
    }

    pub fn get_element_by_id(&self, id: &NodeId) -> Option<Element> {
        self.root.find_by_id(id)
    }
}
