//! Identity registry
//!
//! Maps node ids to live elements for inbound message resolution. The
//! registry does not keep elements alive, and entries are only removed by
//! explicit deregistration.

use std::cell::RefCell;
use std::collections::HashMap;

use tether_dom::{Element, NodeId, WeakElement};
use tracing::{debug, warn};

/// Id to element lookup table
#[derive(Debug, Default)]
pub struct Registry {
    elements: RefCell<HashMap<NodeId, WeakElement>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one element under its id
    pub fn register(&self, element: &Element) {
        let id = element.id();
        let previous = self
            .elements
            .borrow_mut()
            .insert(id.clone(), element.downgrade());
        if let Some(old) = previous.and_then(|weak| weak.upgrade()) {
            if old != *element {
                warn!("node id {} re-registered; previous element replaced", id);
            }
        }
    }

    /// Register `root` and every connectable descendant.
    ///
    /// Returns how many elements were registered.
    pub fn register_tree(&self, root: &Element) -> usize {
        let mut count = 0;
        for el in std::iter::once(root.clone()).chain(root.elements()) {
            if el.is_connectable() {
                self.register(&el);
                count += 1;
            }
        }
        count
    }

    /// Look up a live element
    pub fn resolve(&self, id: &NodeId) -> Option<Element> {
        let found = self.elements.borrow().get(id).and_then(WeakElement::upgrade);
        if found.is_none() && self.elements.borrow_mut().remove(id).is_some() {
            debug!("node id {} pointed at a dropped element", id);
        }
        found
    }

    pub fn deregister(&self, id: &NodeId) -> Option<Element> {
        self.elements
            .borrow_mut()
            .remove(id)
            .and_then(|weak| weak.upgrade())
    }

    /// Deregister `root` and all its descendants
    pub fn deregister_tree(&self, root: &Element) {
        let mut elements = self.elements.borrow_mut();
        for el in std::iter::once(root.clone()).chain(root.elements()) {
            elements.remove(&el.id());
        }
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.resolve(id).is_some()
    }

    /// Number of entries whose element is still alive
    pub fn len(&self) -> usize {
        self.elements
            .borrow()
            .values()
            .filter(|weak| weak.upgrade().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
