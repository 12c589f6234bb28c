//! Element handles
//!
//! An [`Element`] is a shared handle to one tree node. Structural changes go
//! through the handle so that every child's parent link always points at the
//! element that holds it. When the element is connectable and its root owns a
//! live [`MutationSink`], each change is reported after it has been applied.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde_json::json;
use tracing::warn;

use crate::{
    Attributes, ClassList, CssStyleDeclaration, DomError, Event, EventListeners, IntoClasses,
    Listener, ListenerId, Method, MutationRecord, MutationSink, Node, NodeId, TagDescriptor,
    TaskSpawner, TextNode, escape_html,
};

pub(crate) struct ElementData {
    id: NodeId,
    descriptor: &'static TagDescriptor,
    attributes: Attributes,
    classes: ClassList,
    style: CssStyleDeclaration,
    hidden: bool,
    children: Vec<Node>,
    parent: Weak<RefCell<ElementData>>,
    listeners: EventListeners,
    sink: Option<Weak<dyn MutationSink>>,
    connectable: bool,
}

/// Shared handle to a tree element
#[derive(Clone)]
pub struct Element(pub(crate) Rc<RefCell<ElementData>>);

/// Non-owning element handle
#[derive(Clone, Default)]
pub struct WeakElement(Weak<RefCell<ElementData>>);

impl WeakElement {
    pub fn upgrade(&self) -> Option<Element> {
        self.0.upgrade().map(Element)
    }
}

impl std::fmt::Debug for WeakElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.upgrade() {
            Some(el) => write!(f, "WeakElement({:?})", el),
            None => f.write_str("WeakElement(dropped)"),
        }
    }
}

impl Element {
    /// Plain element; never synchronized and rendered without an id
    pub fn new(descriptor: &'static TagDescriptor) -> Self {
        Self::build(descriptor, NodeId::generate(), false)
    }

    /// Connectable element with a generated id
    pub fn connectable(descriptor: &'static TagDescriptor) -> Self {
        Self::build(descriptor, NodeId::generate(), true)
    }

    /// Connectable element with an explicit id
    pub fn with_id(descriptor: &'static TagDescriptor, id: impl Into<NodeId>) -> Self {
        Self::build(descriptor, id.into(), true)
    }

    fn build(descriptor: &'static TagDescriptor, id: NodeId, connectable: bool) -> Self {
        let mut attributes = Attributes::new();
        if let Some(type_) = descriptor.type_ {
            attributes.set("type", type_);
        }
        Self(Rc::new(RefCell::new(ElementData {
            id,
            descriptor,
            attributes,
            classes: ClassList::new(),
            style: CssStyleDeclaration::new(),
            hidden: false,
            children: Vec::new(),
            parent: Weak::new(),
            listeners: EventListeners::new(),
            sink: None,
            connectable,
        })))
    }

    pub fn id(&self) -> NodeId {
        self.0.borrow().id.clone()
    }

    pub fn tag(&self) -> &'static str {
        self.0.borrow().descriptor.tag
    }

    pub fn descriptor(&self) -> &'static TagDescriptor {
        self.0.borrow().descriptor
    }

    pub fn is_connectable(&self) -> bool {
        self.0.borrow().connectable
    }

    pub fn downgrade(&self) -> WeakElement {
        WeakElement(Rc::downgrade(&self.0))
    }

    // --- tree position ---

    pub fn parent(&self) -> Option<Element> {
        self.0.borrow().parent.upgrade().map(Element)
    }

    pub(crate) fn set_parent(&self, parent: Weak<RefCell<ElementData>>) {
        self.0.borrow_mut().parent = parent;
    }

    /// Topmost ancestor, or self
    pub fn root(&self) -> Element {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Make this element a document root reporting to `sink`
    pub fn set_sink(&self, sink: Weak<dyn MutationSink>) {
        self.0.borrow_mut().sink = Some(sink);
    }

    pub fn is_document_root(&self) -> bool {
        self.0.borrow().sink.is_some()
    }

    fn attached_sink(&self) -> Option<Rc<dyn MutationSink>> {
        let root = self.root();
        let sink = root.0.borrow().sink.as_ref()?.upgrade();
        sink
    }

    fn connected_sink(&self) -> Option<Rc<dyn MutationSink>> {
        self.attached_sink().filter(|sink| sink.is_connected())
    }

    /// Reachable from a document root with at least one open connection
    pub fn is_connected(&self) -> bool {
        self.connected_sink().is_some()
    }

    /// Report a mutation if this element is synchronized
    pub(crate) fn sync(&self, record: impl FnOnce() -> MutationRecord) {
        if !self.is_connectable() {
            return;
        }
        if let Some(sink) = self.connected_sink() {
            sink.emit(record());
        }
    }

    /// Check if `self` is `other` or one of its ancestors
    pub fn is_inclusive_ancestor_of(&self, other: &Element) -> bool {
        let mut current = Some(other.clone());
        while let Some(el) = current {
            if el == *self {
                return true;
            }
            current = el.parent();
        }
        false
    }

    // --- children ---

    pub fn children(&self) -> Vec<Node> {
        self.0.borrow().children.clone()
    }

    pub fn child(&self, index: usize) -> Option<Node> {
        self.0.borrow().children.get(index).cloned()
    }

    /// Element children only
    pub fn child_elements(&self) -> Vec<Element> {
        self.0
            .borrow()
            .children
            .iter()
            .filter_map(|n| n.as_element().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().children.is_empty()
    }

    /// Position of `child` by identity
    pub fn index(&self, child: impl Into<Node>) -> Option<usize> {
        let child = child.into();
        self.0.borrow().children.iter().position(|c| *c == child)
    }

    /// Position by identity, falling back to equal text for text leaves
    fn find_child(&self, child: &Node) -> Option<usize> {
        let data = self.0.borrow();
        data.children
            .iter()
            .position(|c| c == child)
            .or_else(|| data.children.iter().position(|c| c.same_text(child)))
    }

    fn check_insertable(&self, child: &Node) -> Result<(), DomError> {
        if let Node::Element(el) = child {
            if el.is_document_root() {
                return Err(DomError::TypeMismatch(format!(
                    "document root <{}> cannot be inserted",
                    el.tag()
                )));
            }
            if el.is_inclusive_ancestor_of(self) {
                return Err(DomError::HierarchyRequest(format!(
                    "<{}> cannot be inserted into itself or a descendant",
                    el.tag()
                )));
            }
        }
        Ok(())
    }

    /// Insert `child` at `pos`, moving it out of its current parent first
    pub fn insert(&self, pos: usize, child: impl Into<Node>) -> Result<(), DomError> {
        let child = child.into();
        self.check_insertable(&child)?;
        let len = self.len();
        if pos > len {
            return Err(DomError::IndexOutOfRange { index: pos, len });
        }

        let mut pos = pos;
        if let Some(old_parent) = child.parent() {
            if let Some(old_index) = old_parent.index(&child) {
                if old_parent == *self && old_index < pos {
                    pos -= 1;
                }
                old_parent.remove_child_at(old_index);
            }
        }

        let appended = {
            let mut data = self.0.borrow_mut();
            data.children.insert(pos, child.clone());
            pos + 1 == data.children.len()
        };
        child.set_parent(Rc::downgrade(&self.0));

        if let Node::Element(el) = &child {
            if let Some(sink) = self.attached_sink() {
                sink.adopt(el);
            }
        }

        self.sync(|| {
            let html = self.render_child(&child);
            if appended {
                MutationRecord::new(self, Method::Append).param("html", html)
            } else {
                MutationRecord::new(self, Method::Insert)
                    .param("index", pos)
                    .param("html", html)
            }
        });
        Ok(())
    }

    pub fn append(&self, child: impl Into<Node>) -> Result<(), DomError> {
        let len = self.len();
        self.insert(len, child)
    }

    pub fn prepend(&self, child: impl Into<Node>) -> Result<(), DomError> {
        self.insert(0, child)
    }

    pub fn extend<I>(&self, children: I) -> Result<(), DomError>
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        for child in children {
            self.append(child)?;
        }
        Ok(())
    }

    /// Insert `child` right before `reference`
    pub fn insert_before(
        &self,
        child: impl Into<Node>,
        reference: impl Into<Node>,
    ) -> Result<(), DomError> {
        let reference = reference.into();
        let index = self
            .index(&reference)
            .ok_or_else(|| DomError::NotFound(format!("reference node in <{}>", self.tag())))?;
        self.insert(index, child)
    }

    /// Detach and report the child at `index`
    fn remove_child_at(&self, index: usize) -> Node {
        let removed = self.0.borrow_mut().children.remove(index);
        removed.set_parent(Weak::new());
        self.sync(|| {
            let mut record = MutationRecord::new(self, Method::RemoveChild).param("index", index);
            if let Some(el) = removed.as_element().filter(|el| el.is_connectable()) {
                record = record.param("child", el.id().as_str());
            }
            record
        });
        removed
    }

    /// Remove one occurrence of `child`
    pub fn remove_child(&self, child: impl Into<Node>) -> Result<Node, DomError> {
        let child = child.into();
        let index = self
            .find_child(&child)
            .ok_or_else(|| DomError::NotFound(format!("child of <{}>", self.tag())))?;
        Ok(self.remove_child_at(index))
    }

    /// Put `new` where `old` is. `old` keeps its parent link.
    pub fn replace_child(
        &self,
        new: impl Into<Node>,
        old: impl Into<Node>,
    ) -> Result<Node, DomError> {
        let new = new.into();
        let old = old.into();
        if self.find_child(&old).is_none() {
            return Err(DomError::NotFound(format!("child of <{}>", self.tag())));
        }
        if new == old {
            return Ok(old);
        }
        self.check_insertable(&new)?;

        if let Some(old_parent) = new.parent() {
            if let Some(old_index) = old_parent.index(&new) {
                old_parent.remove_child_at(old_index);
            }
        }
        // Recomputed: moving `new` out of this element may shift `old`.
        let index = self
            .find_child(&old)
            .ok_or_else(|| DomError::NotFound(format!("child of <{}>", self.tag())))?;
        let replaced = std::mem::replace(&mut self.0.borrow_mut().children[index], new.clone());
        new.set_parent(Rc::downgrade(&self.0));

        if let Node::Element(el) = &new {
            if let Some(sink) = self.attached_sink() {
                sink.adopt(el);
            }
        }

        self.sync(|| {
            let mut record = MutationRecord::new(self, Method::ReplaceChild)
                .param("index", index)
                .param("html", self.render_child(&new));
            if let Some(el) = replaced.as_element().filter(|el| el.is_connectable()) {
                record = record.param("child", el.id().as_str());
            }
            record
        });
        Ok(replaced)
    }

    /// Remove from the parent.
    ///
    /// A connected element is removed once the browser acknowledges; anything
    /// else is removed immediately.
    pub fn remove(&self) {
        if self.is_connectable() && self.parent().is_some() {
            if let Some(sink) = self.connected_sink() {
                sink.request_remove(self);
                return;
            }
        }
        if let Some(parent) = self.parent() {
            if let Some(index) = parent.index(self) {
                parent.remove_child_at(index);
                return;
            }
        }
        self.set_parent(Weak::new());
    }

    /// Local-only removal from the parent
    pub fn detach(&self) {
        if let Some(parent) = self.parent() {
            let mut data = parent.0.borrow_mut();
            if let Some(index) = data.children.iter().position(|c| c.as_element() == Some(self)) {
                data.children.remove(index);
            }
        }
        self.set_parent(Weak::new());
    }

    /// Remove all children
    pub fn empty(&self) {
        self.clear_children();
        self.sync(|| MutationRecord::new(self, Method::Empty));
    }

    fn clear_children(&self) {
        let removed = std::mem::take(&mut self.0.borrow_mut().children);
        for child in &removed {
            child.set_parent(Weak::new());
        }
    }

    // --- descendants ---

    /// Descendant elements in document order
    pub fn elements(&self) -> Vec<Element> {
        let mut out = Vec::new();
        self.collect_elements(&mut out);
        out
    }

    fn collect_elements(&self, out: &mut Vec<Element>) {
        for child in self.child_elements() {
            out.push(child.clone());
            child.collect_elements(out);
        }
    }

    pub fn elements_by_tag(&self, tag: &str) -> Vec<Element> {
        let tag = tag.to_ascii_lowercase();
        self.elements()
            .into_iter()
            .filter(|el| el.tag() == tag)
            .collect()
    }

    /// Search self and descendants for an id
    pub fn find_by_id(&self, id: &NodeId) -> Option<Element> {
        if self.0.borrow().id == *id {
            return Some(self.clone());
        }
        self.elements().into_iter().find(|el| el.0.borrow().id == *id)
    }

    // --- attributes ---

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        let name = name.to_ascii_lowercase();
        let data = self.0.borrow();
        match name.as_str() {
            "id" if data.connectable => Some(data.id.to_string()),
            "class" => {
                let classes = self.class_list_of(&data);
                (!classes.is_empty()).then(|| classes.value())
            }
            "style" => (!data.style.is_empty()).then(|| data.style.css_text()),
            "hidden" => data.hidden.then(String::new),
            _ => data.attributes.get(&name).map(str::to_string),
        }
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    /// Ordered snapshot of plain attributes
    pub fn attributes(&self) -> Attributes {
        self.0.borrow().attributes.clone()
    }

    /// Apply an attribute locally, returning the value the browser should see
    fn write_attribute(&self, name: &str, value: &str) -> Result<String, DomError> {
        let mut data = self.0.borrow_mut();
        match name {
            "id" if data.connectable => Err(DomError::ReadOnlyAttribute(name.to_string())),
            "class" => {
                data.classes = ClassList::from_classes(value);
                Ok(self.class_list_of(&data).value())
            }
            "style" => {
                data.style = CssStyleDeclaration::parse(value)?;
                Ok(data.style.css_text())
            }
            _ => {
                data.attributes.set(name, value);
                Ok(value.to_string())
            }
        }
    }

    pub fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError> {
        let name = name.to_ascii_lowercase();
        if name == "hidden" {
            if value == "false" {
                self.show();
            } else {
                self.hide();
            }
            return Ok(());
        }
        let sent = self.write_attribute(&name, value)?;
        self.sync(|| MutationRecord::set_attribute(self, &name, &sent));
        Ok(())
    }

    /// Set without reporting; used for state the browser already has
    pub(crate) fn set_attribute_local(&self, name: &str, value: &str) -> Result<(), DomError> {
        self.write_attribute(&name.to_ascii_lowercase(), value)
            .map(|_| ())
    }

    fn erase_attribute(&self, name: &str) -> Result<bool, DomError> {
        let mut data = self.0.borrow_mut();
        match name {
            "id" if data.connectable => Err(DomError::ReadOnlyAttribute(name.to_string())),
            "class" => {
                let had = !data.classes.is_empty();
                data.classes.clear();
                Ok(had)
            }
            "style" => {
                let had = !data.style.is_empty();
                data.style.clear();
                Ok(had)
            }
            _ => Ok(data.attributes.remove(name).is_some()),
        }
    }

    pub fn remove_attribute(&self, name: &str) -> Result<(), DomError> {
        let name = name.to_ascii_lowercase();
        if name == "hidden" {
            self.show();
            return Ok(());
        }
        if !self.erase_attribute(&name)? {
            return Ok(());
        }
        if name == "class" {
            // class-level classes survive
            let remaining = self.class_list();
            if !remaining.is_empty() {
                self.sync(|| MutationRecord::set_attribute(self, "class", &remaining.value()));
                return Ok(());
            }
        }
        self.sync(|| MutationRecord::remove_attribute(self, &name));
        Ok(())
    }

    pub(crate) fn remove_attribute_local(&self, name: &str) -> Result<(), DomError> {
        self.erase_attribute(&name.to_ascii_lowercase()).map(|_| ())
    }

    // --- classes ---

    fn class_list_of(&self, data: &ElementData) -> ClassList {
        let mut list = data.descriptor.class_list();
        list.append(&data.classes);
        list
    }

    /// Effective classes: class-level ones first, then instance ones
    pub fn class_list(&self) -> ClassList {
        self.class_list_of(&self.0.borrow())
    }

    /// Instance-level classes only
    pub fn own_classes(&self) -> ClassList {
        self.0.borrow().classes.clone()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_list().contains(class)
    }

    pub fn add_class(&self, classes: impl IntoClasses) {
        let requested = ClassList::from_classes(classes);
        let added: Vec<String> = {
            let mut data = self.0.borrow_mut();
            let mut effective = self.class_list_of(&data);
            let mut added = Vec::new();
            for token in requested.iter() {
                if effective.contains(token) {
                    continue;
                }
                data.classes.append(token);
                effective.append(token);
                added.push(token.to_string());
            }
            added
        };
        if !added.is_empty() {
            self.sync(|| MutationRecord::new(self, Method::AddClass).param("classes", added));
        }
    }

    pub fn remove_class(&self, classes: impl IntoClasses) {
        let requested = ClassList::from_classes(classes);
        let class_level = self.descriptor().class_list();
        let mut removed = Vec::new();
        for token in requested.iter() {
            if class_level.contains(token) {
                warn!(
                    "cannot remove class-level class `{}` from {}",
                    token,
                    self.descriptor().name
                );
                continue;
            }
            let present = matches!(self.0.borrow_mut().classes.remove(token), Ok(true));
            if present {
                removed.push(token.to_string());
            } else {
                warn!("class `{}` not present on <{}>", token, self.tag());
            }
        }
        if !removed.is_empty() {
            self.sync(|| MutationRecord::new(self, Method::RemoveClass).param("classes", removed));
        }
    }

    // --- visibility & style ---

    pub fn hidden(&self) -> bool {
        self.0.borrow().hidden
    }

    pub fn show(&self) {
        self.0.borrow_mut().hidden = false;
        self.sync(|| MutationRecord::new(self, Method::Show));
    }

    pub fn hide(&self) {
        self.0.borrow_mut().hidden = true;
        self.sync(|| MutationRecord::new(self, Method::Hide));
    }

    // --- browser commands ---

    /// Click the browser node. Without a browser, listeners for `click` are
    /// called directly.
    pub fn click(&self, spawner: &dyn TaskSpawner) {
        if self.is_connectable() {
            if let Some(sink) = self.connected_sink() {
                sink.emit(MutationRecord::new(self, Method::Click));
                return;
            }
        }
        let id = self.id();
        let init = json!({
            "type": "click",
            "currentTarget": { "id": id.as_str() },
            "target": { "id": id.as_str() },
        });
        let event = Event::with_init("click", init)
            .with_targets(Some(self.clone()), Some(self.clone()));
        self.dispatch_event(&event, spawner);
    }

    /// Evaluate `script` on the browser node
    pub fn exec(&self, script: &str) {
        self.sync(|| MutationRecord::new(self, Method::Eval).param("script", script));
    }

    pub fn scroll(&self, x: i64, y: i64) {
        self.scroll_command(Method::Scroll, x, y);
    }

    pub fn scroll_to(&self, x: i64, y: i64) {
        self.scroll_command(Method::ScrollTo, x, y);
    }

    pub fn scroll_by(&self, x: i64, y: i64) {
        self.scroll_command(Method::ScrollBy, x, y);
    }

    fn scroll_command(&self, method: Method, x: i64, y: i64) {
        self.sync(|| MutationRecord::new(self, method).param("x", x).param("y", y));
    }

    pub fn style(&self) -> CssStyleDeclaration {
        self.0.borrow().style.clone()
    }

    pub fn set_style_property(&self, property: &str, value: &str) {
        let css_text = {
            let mut data = self.0.borrow_mut();
            data.style.set_property(property, value);
            data.style.css_text()
        };
        self.sync(|| MutationRecord::set_attribute(self, "style", &css_text));
    }

    /// Returns the previous value, or an empty string
    pub fn remove_style_property(&self, property: &str) -> String {
        let (previous, css_text) = {
            let mut data = self.0.borrow_mut();
            let previous = data.style.remove_property(property);
            (previous, data.style.css_text())
        };
        if !previous.is_empty() {
            self.sync(|| MutationRecord::set_attribute(self, "style", &css_text));
        }
        previous
    }

    // --- text ---

    /// Concatenated text of all descendants
    pub fn text_content(&self) -> String {
        self.0
            .borrow()
            .children
            .iter()
            .map(Node::text_content)
            .collect()
    }

    /// Replace all children with one text leaf
    pub fn set_text_content(&self, text: &str) {
        self.set_text_content_local(text);
        self.sync(|| MutationRecord::text_content(self, text));
    }

    pub(crate) fn set_text_content_local(&self, text: &str) {
        self.clear_children();
        let leaf = Node::Text(TextNode::new(text));
        leaf.set_parent(Rc::downgrade(&self.0));
        self.0.borrow_mut().children.push(leaf);
    }

    // --- events ---

    /// Register a listener. The first one for an event is announced to the
    /// browser so it starts forwarding that event.
    pub fn add_event_listener(&self, event: &str, listener: Listener) -> ListenerId {
        let (id, first) = {
            let mut data = self.0.borrow_mut();
            let first = !data.listeners.has(event);
            (data.listeners.add(event, listener), first)
        };
        if first {
            self.sync(|| MutationRecord::new(self, Method::AddEventListener).param("event", event));
        }
        id
    }

    /// Returns false if `id` was not registered for `event`
    pub fn remove_event_listener(&self, event: &str, id: ListenerId) -> bool {
        let (removed, last) = {
            let mut data = self.0.borrow_mut();
            let removed = data.listeners.remove(event, id);
            (removed, !data.listeners.has(event))
        };
        if removed && last {
            self.sync(|| {
                MutationRecord::new(self, Method::RemoveEventListener).param("event", event)
            });
        }
        removed
    }

    /// Event names with at least one listener
    pub fn listened_events(&self) -> Vec<String> {
        self.0.borrow().listeners.events()
    }

    /// Call listeners for `event.kind()` in registration order.
    ///
    /// Listeners run on a snapshot, so they may freely mutate this element.
    pub fn dispatch_event(&self, event: &Event, spawner: &dyn TaskSpawner) -> usize {
        let listeners = self.0.borrow().listeners.listeners(event.kind());
        for listener in &listeners {
            listener.invoke(event, spawner);
        }
        listeners.len()
    }

    // --- serialization ---

    /// Serialized subtree
    pub fn html(&self) -> String {
        self.render(true)
    }

    /// Serialized subtree without generated ids
    pub fn html_noid(&self) -> String {
        self.render(false)
    }

    pub(crate) fn render(&self, with_id: bool) -> String {
        let mut out = self.render_start_tag(with_id);
        if !self.descriptor().is_void() {
            out.push_str(&self.render_inner(with_id));
            out.push_str(&self.end_tag());
        }
        out
    }

    pub fn inner_html(&self) -> String {
        self.render_inner(true)
    }

    fn render_inner(&self, with_id: bool) -> String {
        let data = self.0.borrow();
        let escape = data.descriptor.escape_text;
        data.children
            .iter()
            .map(|child| child.render(with_id, escape))
            .collect()
    }

    fn render_child(&self, child: &Node) -> String {
        child.render(true, self.descriptor().escape_text)
    }

    pub fn start_tag(&self) -> String {
        self.render_start_tag(true)
    }

    fn render_start_tag(&self, with_id: bool) -> String {
        let data = self.0.borrow();
        let mut out = format!("<{}", data.descriptor.tag);
        if with_id && data.connectable {
            out.push_str(&format!(" id=\"{}\"", escape_html(data.id.as_str())));
        }
        let attrs = data.attributes.render();
        if !attrs.is_empty() {
            out.push(' ');
            out.push_str(&attrs);
        }
        let classes = self.class_list_of(&data);
        if !classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", escape_html(&classes.value())));
        }
        if !data.style.is_empty() {
            out.push_str(&format!(" style=\"{}\"", escape_html(&data.style.css_text())));
        }
        if data.hidden {
            out.push_str(" hidden");
        }
        out.push('>');
        out
    }

    pub fn end_tag(&self) -> String {
        let desc = self.descriptor();
        if desc.is_void() {
            String::new()
        } else {
            format!("</{}>", desc.tag)
        }
    }

    /// Detached copy of the subtree with fresh ids and no listeners
    pub fn deep_clone(&self) -> Element {
        let data = self.0.borrow();
        let copy = Self::build(data.descriptor, NodeId::generate(), data.connectable);
        {
            let mut copy_data = copy.0.borrow_mut();
            copy_data.attributes = data.attributes.clone();
            copy_data.classes = data.classes.clone();
            copy_data.style = data.style.clone();
            copy_data.hidden = data.hidden;
        }
        for child in &data.children {
            let cloned = child.deep_clone();
            cloned.set_parent(Rc::downgrade(&copy.0));
            copy.0.borrow_mut().children.push(cloned);
        }
        copy
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Element {}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("Element")
            .field("tag", &data.descriptor.tag)
            .field("id", &data.id)
            .field("children", &data.children.len())
            .finish()
    }
}
