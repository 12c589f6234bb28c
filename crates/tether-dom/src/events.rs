//! Events and listeners
//!
//! Browser events delivered to elements, and the listener wrapper that lets
//! plain closures, async closures and already-built futures share one
//! invocation path.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::future::Future;
use std::rc::Rc;

use serde_json::Value;
use smol::future::BoxedLocal;
use tracing::debug;

use crate::Element;

/// Something that can run a local task without blocking the caller
pub trait TaskSpawner {
    fn spawn_task(&self, task: BoxedLocal<()>);
}

impl TaskSpawner for smol::LocalExecutor<'static> {
    fn spawn_task(&self, task: BoxedLocal<()>) {
        self.spawn(task).detach();
    }
}

impl<T: TaskSpawner + ?Sized> TaskSpawner for Rc<T> {
    fn spawn_task(&self, task: BoxedLocal<()>) {
        (**self).spawn_task(task);
    }
}

/// Event delivered to listeners
#[derive(Debug, Clone)]
pub struct Event {
    kind: String,
    current_target: Option<Element>,
    target: Option<Element>,
    init: Value,
}

impl Event {
    /// Event with no browser payload
    pub fn new(kind: &str) -> Self {
        Self::with_init(kind, Value::Object(Default::default()))
    }

    /// Event built from the browser's event object
    pub fn with_init(kind: &str, init: Value) -> Self {
        Self {
            kind: kind.to_string(),
            current_target: None,
            target: None,
            init,
        }
    }

    /// Set resolved targets. `target` falls back to `current_target`.
    pub fn with_targets(mut self, current_target: Option<Element>, target: Option<Element>) -> Self {
        self.target = target.or_else(|| current_target.clone());
        self.current_target = current_target;
        self
    }

    /// Event type, e.g. `click`
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn current_target(&self) -> Option<&Element> {
        self.current_target.as_ref()
    }

    pub fn target(&self) -> Option<&Element> {
        self.target.as_ref()
    }

    /// Raw event object
    pub fn init(&self) -> &Value {
        &self.init
    }

    /// Top-level field of the event object
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.init.get(key)
    }

    fn current_target_field(&self, key: &str) -> Option<&Value> {
        self.init.get("currentTarget")?.get(key)
    }

    /// `currentTarget.value` as reported by the browser
    pub fn value(&self) -> Option<&str> {
        self.current_target_field("value")?.as_str()
    }

    /// `currentTarget.checked` as reported by the browser
    pub fn checked(&self) -> Option<bool> {
        self.current_target_field("checked")?.as_bool()
    }

    /// Ids listed in `currentTarget.selectedOptions`
    pub fn selected_options(&self) -> Vec<String> {
        let Some(Value::Array(items)) = self.current_target_field("selectedOptions") else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Object(obj) => obj.get("id").and_then(Value::as_str).map(str::to_string),
                _ => None,
            })
            .collect()
    }
}

type SyncFn = Rc<dyn Fn(Option<&Event>)>;
type AsyncFn = Rc<dyn Fn(Option<Event>) -> BoxedLocal<()>>;

#[derive(Clone)]
enum ListenerKind {
    Sync(SyncFn),
    Async(AsyncFn),
    Pending(Rc<RefCell<Option<BoxedLocal<()>>>>),
}

/// Wrapped event listener
#[derive(Clone)]
pub struct Listener {
    kind: ListenerKind,
    wants_data: bool,
}

impl Listener {
    /// Plain callback
    pub fn new(f: impl Fn(Option<&Event>) + 'static) -> Self {
        Self {
            kind: ListenerKind::Sync(Rc::new(f)),
            wants_data: true,
        }
    }

    /// Async callback; each invocation spawns a new task
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(Option<Event>) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let wrapped: AsyncFn = Rc::new(move |event| Box::pin(f(event)));
        Self {
            kind: ListenerKind::Async(wrapped),
            wants_data: true,
        }
    }

    /// Already-built task, spawned on the first invocation only
    pub fn pending(task: impl Future<Output = ()> + 'static) -> Self {
        let task: BoxedLocal<()> = Box::pin(task);
        Self {
            kind: ListenerKind::Pending(Rc::new(RefCell::new(Some(task)))),
            wants_data: false,
        }
    }

    /// Call without the event payload
    pub fn without_data(mut self) -> Self {
        self.wants_data = false;
        self
    }

    pub fn wants_data(&self) -> bool {
        self.wants_data
    }

    pub fn is_async(&self) -> bool {
        !matches!(self.kind, ListenerKind::Sync(_))
    }

    /// Run the listener. Async forms are handed to `spawner` and not awaited.
    pub fn invoke(&self, event: &Event, spawner: &dyn TaskSpawner) {
        match &self.kind {
            ListenerKind::Sync(f) => {
                if self.wants_data {
                    f(Some(event));
                } else {
                    f(None);
                }
            }
            ListenerKind::Async(f) => {
                let data = self.wants_data.then(|| event.clone());
                spawner.spawn_task(f(data));
            }
            ListenerKind::Pending(slot) => match slot.borrow_mut().take() {
                Some(task) => spawner.spawn_task(task),
                None => debug!("pending listener for `{}` already scheduled", event.kind()),
            },
        }
    }
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            ListenerKind::Sync(_) => "sync",
            ListenerKind::Async(_) => "async",
            ListenerKind::Pending(_) => "pending",
        };
        f.debug_struct("Listener")
            .field("kind", &kind)
            .field("wants_data", &self.wants_data)
            .finish()
    }
}

/// Handle returned by listener registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Per-element listeners keyed by event name, in registration order
#[derive(Debug, Default)]
pub struct EventListeners {
    next_id: u64,
    by_event: BTreeMap<String, Vec<(ListenerId, Listener)>>,
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, event: &str, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.by_event
            .entry(event.to_string())
            .or_default()
            .push((id, listener));
        id
    }

    /// Remove a listener. Returns false when it was not registered.
    pub fn remove(&mut self, event: &str, id: ListenerId) -> bool {
        let Some(list) = self.by_event.get_mut(event) else {
            return false;
        };
        let before = list.len();
        list.retain(|(lid, _)| *lid != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.by_event.remove(event);
        }
        removed
    }

    /// Snapshot of listeners for an event
    pub fn listeners(&self, event: &str) -> Vec<Listener> {
        self.by_event
            .get(event)
            .map(|list| list.iter().map(|(_, l)| l.clone()).collect())
            .unwrap_or_default()
    }

    pub fn has(&self, event: &str) -> bool {
        self.by_event.contains_key(event)
    }

    /// Event names with at least one listener
    pub fn events(&self) -> Vec<String> {
        self.by_event.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Collect(RefCell<Vec<BoxedLocal<()>>>);

    impl TaskSpawner for Collect {
        fn spawn_task(&self, task: BoxedLocal<()>) {
            self.0.borrow_mut().push(task);
        }
    }

    #[test]
    fn test_sync_listener_with_and_without_data() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let spawner = Collect::default();
        let event = Event::new("click");

        let s = seen.clone();
        let with = Listener::new(move |e| s.borrow_mut().push(e.map(|e| e.kind().to_string())));
        let s = seen.clone();
        let without = Listener::new(move |e| s.borrow_mut().push(e.map(|e| e.kind().to_string())))
            .without_data();

        with.invoke(&event, &spawner);
        without.invoke(&event, &spawner);
        assert_eq!(*seen.borrow(), vec![Some("click".to_string()), None]);
        assert!(spawner.0.borrow().is_empty());
    }

    #[test]
    fn test_async_listener_is_spawned_not_run() {
        let ran = Rc::new(Cell::new(false));
        let spawner = Collect::default();
        let r = ran.clone();
        let listener = Listener::from_async(move |_| {
            let r = r.clone();
            async move { r.set(true) }
        });

        listener.invoke(&Event::new("click"), &spawner);
        assert!(!ran.get());
        assert_eq!(spawner.0.borrow().len(), 1);

        let task = spawner.0.borrow_mut().pop().unwrap();
        smol::block_on(task);
        assert!(ran.get());
    }

    #[test]
    fn test_pending_task_spawned_once() {
        let spawner = Collect::default();
        let listener = Listener::pending(async {});
        listener.invoke(&Event::new("x"), &spawner);
        listener.invoke(&Event::new("x"), &spawner);
        assert_eq!(spawner.0.borrow().len(), 1);
    }

    #[test]
    fn test_registry_order_and_removal() {
        let mut listeners = EventListeners::new();
        let a = listeners.add("click", Listener::new(|_| {}));
        let _b = listeners.add("click", Listener::new(|_| {}).without_data());
        assert_eq!(listeners.listeners("click").len(), 2);
        assert!(listeners.listeners("click")[0].wants_data());

        assert!(listeners.remove("click", a));
        assert!(!listeners.remove("click", a));
        assert!(!listeners.listeners("click")[0].wants_data());
        assert_eq!(listeners.events(), vec!["click".to_string()]);
    }

    #[test]
    fn test_event_payload_helpers() {
        let event = Event::with_init(
            "change",
            serde_json::json!({
                "currentTarget": {"id": "1", "value": "v", "checked": true, "selectedOptions": ["a", 2]}
            }),
        );
        assert_eq!(event.value(), Some("v"));
        assert_eq!(event.checked(), Some(true));
        assert_eq!(event.selected_options(), vec!["a".to_string(), "2".to_string()]);
    }
}
