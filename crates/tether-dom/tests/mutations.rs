//! Mutation reporting through a document root sink

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tether_dom::{
    Element, Event, Listener, Method, MutationRecord, MutationSink, TaskSpawner, TextNode, tags,
};

#[derive(Default)]
struct RecordingSink {
    connected: Cell<bool>,
    records: RefCell<Vec<MutationRecord>>,
    removals: RefCell<Vec<Element>>,
    adopted: RefCell<Vec<Element>>,
}

impl RecordingSink {
    fn methods(&self) -> Vec<Method> {
        self.records.borrow().iter().map(|r| r.method).collect()
    }
}

impl MutationSink for RecordingSink {
    fn is_connected(&self) -> bool {
        self.connected.get()
    }

    fn emit(&self, record: MutationRecord) {
        self.records.borrow_mut().push(record);
    }

    fn request_remove(&self, element: &Element) {
        self.removals.borrow_mut().push(element.clone());
    }

    fn adopt(&self, element: &Element) {
        self.adopted.borrow_mut().push(element.clone());
    }
}

struct NoSpawn;

impl TaskSpawner for NoSpawn {
    fn spawn_task(&self, _task: smol::future::BoxedLocal<()>) {}
}

fn document(connected: bool) -> (Rc<RecordingSink>, Element) {
    let sink = Rc::new(RecordingSink::default());
    sink.connected.set(connected);
    let root = Element::connectable(&tags::BODY);
    let weak: Weak<dyn MutationSink> = Rc::downgrade(&sink) as Weak<dyn MutationSink>;
    root.set_sink(weak);
    (sink, root)
}

#[test]
fn test_append_and_insert_records() {
    let (sink, root) = document(true);
    let a = Element::with_id(&tags::P, "a");
    let b = Element::with_id(&tags::P, "b");
    root.append(&a).unwrap();
    root.insert(0, &b).unwrap();

    let records = sink.records.borrow();
    assert_eq!(records[0].method, Method::Append);
    assert_eq!(records[0].params["html"], "<p id=\"a\"></p>");
    assert_eq!(records[1].method, Method::Insert);
    assert_eq!(records[1].params["index"], 0);
    assert_eq!(records[1].id, root.id());
}

#[test]
fn test_detached_elements_do_not_report() {
    let (sink, _root) = document(true);
    let loose = Element::connectable(&tags::DIV);
    loose.set_attribute("title", "x").unwrap();
    loose.add_class("c");
    loose.append("text").unwrap();
    assert!(sink.records.borrow().is_empty());
    assert!(!loose.is_connected());
}

#[test]
fn test_no_connection_no_records() {
    let (sink, root) = document(false);
    let p = Element::connectable(&tags::P);
    root.append(&p).unwrap();
    p.set_attribute("title", "t").unwrap();
    assert!(sink.records.borrow().is_empty());
    assert_eq!(sink.adopted.borrow().len(), 1);
}

#[test]
fn test_plain_elements_are_not_synchronized() {
    let (sink, root) = document(true);
    let plain = Element::new(&tags::DIV);
    root.append(&plain).unwrap();
    sink.records.borrow_mut().clear();

    plain.set_attribute("title", "t").unwrap();
    assert!(sink.records.borrow().is_empty());
}

#[test]
fn test_attribute_and_class_records() {
    let (sink, root) = document(true);
    let p = Element::connectable(&tags::P);
    root.append(&p).unwrap();
    sink.records.borrow_mut().clear();

    p.set_attribute("title", "hi").unwrap();
    p.remove_attribute("title").unwrap();
    p.remove_attribute("title").unwrap();
    p.add_class("a b");
    p.add_class("a");
    p.remove_class("b");
    p.hide();
    p.show();
    p.set_text_content("x");

    assert_eq!(
        sink.methods(),
        vec![
            Method::SetAttribute,
            Method::RemoveAttribute,
            Method::AddClass,
            Method::RemoveClass,
            Method::Hide,
            Method::Show,
            Method::TextContent,
        ]
    );
    let records = sink.records.borrow();
    assert_eq!(records[2].params["classes"], serde_json::json!(["a", "b"]));
    assert_eq!(records[6].params["text"], "x");
}

#[test]
fn test_remove_child_record_carries_child_id() {
    let (sink, root) = document(true);
    let p = Element::with_id(&tags::P, "gone");
    root.append(&p).unwrap();
    root.remove_child(&p).unwrap();

    let records = sink.records.borrow();
    let last = records.last().unwrap();
    assert_eq!(last.method, Method::RemoveChild);
    assert_eq!(last.params["index"], 0);
    assert_eq!(last.params["child"], "gone");
}

#[test]
fn test_connected_remove_is_deferred() {
    let (sink, root) = document(true);
    let p = Element::connectable(&tags::P);
    root.append(&p).unwrap();
    p.remove();

    assert_eq!(p.parent(), Some(root.clone()));
    assert_eq!(sink.removals.borrow().as_slice(), &[p.clone()]);

    p.detach();
    assert!(root.is_empty());
}

#[test]
fn test_unconnected_remove_is_immediate() {
    let (sink, root) = document(false);
    let p = Element::connectable(&tags::P);
    root.append(&p).unwrap();
    p.remove();
    assert!(root.is_empty());
    assert!(sink.removals.borrow().is_empty());
}

#[test]
fn test_text_leaf_update_replaces_child() {
    let (sink, root) = document(true);
    let p = Element::connectable(&tags::P);
    let leaf = TextNode::new("a");
    p.append(&leaf).unwrap();
    root.append(&p).unwrap();
    sink.records.borrow_mut().clear();

    leaf.set_text("b & c");
    let records = sink.records.borrow();
    assert_eq!(records[0].method, Method::ReplaceChild);
    assert_eq!(records[0].params["html"], "b &amp; c");
    assert_eq!(p.text_content(), "b & c");
}

#[test]
fn test_listener_announcements() {
    let (sink, root) = document(true);
    let button = Element::connectable(&tags::BUTTON);
    root.append(&button).unwrap();
    sink.records.borrow_mut().clear();

    let clicks = Rc::new(Cell::new(0));
    let c = clicks.clone();
    let first = button.add_event_listener("click", Listener::new(move |_| c.set(c.get() + 1)));
    let second = button.add_event_listener("click", Listener::new(|_| {}));
    assert_eq!(sink.methods(), vec![Method::AddEventListener]);

    assert_eq!(button.dispatch_event(&Event::new("click"), &NoSpawn), 2);
    assert_eq!(clicks.get(), 1);

    assert!(button.remove_event_listener("click", first));
    assert_eq!(sink.methods().len(), 1);
    assert!(button.remove_event_listener("click", second));
    assert_eq!(
        sink.methods(),
        vec![Method::AddEventListener, Method::RemoveEventListener]
    );
}

#[test]
fn test_listener_may_mutate_element() {
    let (_sink, root) = document(true);
    let button = Element::connectable(&tags::BUTTON);
    root.append(&button).unwrap();
    let target = button.clone();
    button.add_event_listener(
        "click",
        Listener::new(move |_| target.set_text_content("clicked")),
    );
    button.dispatch_event(&Event::new("click"), &NoSpawn);
    assert_eq!(button.text_content(), "clicked");
}

#[test]
fn test_document_root_cannot_be_nested() {
    let (_sink, root) = document(false);
    let div = Element::new(&tags::DIV);
    assert!(div.append(&root).is_err());
}

#[test]
fn test_click_goes_to_browser_when_connected() {
    let (sink, root) = document(true);
    let button = Element::with_id(&tags::BUTTON, "b1");
    root.append(&button).unwrap();
    let clicks = Rc::new(Cell::new(0));
    let counter = clicks.clone();
    button.add_event_listener("click", Listener::new(move |_| counter.set(counter.get() + 1)));
    sink.records.borrow_mut().clear();

    button.click(&NoSpawn);
    assert_eq!(sink.methods(), vec![Method::Click]);
    assert_eq!(clicks.get(), 0);
}

#[test]
fn test_click_dispatches_locally_without_browser() {
    let (sink, root) = document(false);
    let button = Element::with_id(&tags::BUTTON, "b2");
    root.append(&button).unwrap();
    let seen = Rc::new(RefCell::new(None));
    let slot = seen.clone();
    button.add_event_listener(
        "click",
        Listener::new(move |event| {
            *slot.borrow_mut() = event.and_then(|e| e.target()).map(Element::id);
        }),
    );

    button.click(&NoSpawn);
    assert!(sink.records.borrow().is_empty());
    assert_eq!(seen.borrow().clone(), Some(button.id()));
}

#[test]
fn test_exec_and_scroll_commands() {
    let (sink, root) = document(true);
    let pane = Element::with_id(&tags::DIV, "pane");
    root.append(&pane).unwrap();
    sink.records.borrow_mut().clear();

    pane.exec("node.focus()");
    pane.scroll(0, 10);
    pane.scroll_to(5, 20);
    pane.scroll_by(-5, 0);

    let records = sink.records.borrow();
    assert_eq!(
        records.iter().map(|r| r.method).collect::<Vec<_>>(),
        vec![Method::Eval, Method::Scroll, Method::ScrollTo, Method::ScrollBy]
    );
    assert_eq!(records[0].params["script"], "node.focus()");
    assert_eq!(records[2].params["x"], 5);
    assert_eq!(records[3].params["x"], -5);
    assert!(records.iter().all(|r| r.id == pane.id()));
}
