//! Synchronization session
//!
//! Owns the document, the identity registry and the connection set. Local
//! mutations arrive through [`MutationSink`] and are broadcast; inbound
//! browser messages are resolved against the registry and replayed locally.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::rc::{Rc, Weak};

use serde_json::Value;
use smol::Timer;
use smol::channel::{self, Sender};
use tether_dom::{
    Element, Event, Method, MutationRecord, MutationSink, NodeId, TagDescriptor, TaskSpawner,
    WeakElement, forms,
};
use tracing::{debug, error, info, warn};

use crate::connection::{Connection, ConnectionId, ConnectionSet};
use crate::logging::BROWSER_TARGET;
use crate::message::{Inbound, OutboundMessage, split_batch, target_id};
use crate::{Config, Document, Registry, SyncError};

/// What the host should do after a connection closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Other connections remain
    Remaining(usize),
    /// No connections left
    Idle,
    /// No connections left and auto-shutdown is enabled
    Shutdown,
}

/// An element waiting for the browser to confirm its removal
struct Removal {
    element: Element,
    parent: Option<WeakElement>,
}

impl Removal {
    /// Still under the parent it was removed from
    fn in_place(&self) -> bool {
        let parent = self.parent.as_ref().and_then(WeakElement::upgrade);
        parent.is_some() && self.element.parent() == parent
    }
}

/// Server side of one mirrored document
pub struct Session {
    this: Weak<Session>,
    config: Config,
    spawner: Rc<dyn TaskSpawner>,
    document: Document,
    registry: Registry,
    connections: ConnectionSet,
    next_reqid: Cell<u64>,
    removals: RefCell<HashMap<u64, Removal>>,
    queries: RefCell<HashMap<u64, Sender<Value>>>,
}

impl Session {
    /// Create a session and its document. Async listeners and removal
    /// timeouts run on `spawner`.
    pub fn new(config: Config, spawner: Rc<dyn TaskSpawner>) -> Result<Rc<Self>, SyncError> {
        let document = Document::new(&config.title)?;
        let registry = Registry::new();
        registry.register_tree(document.root());

        Ok(Rc::new_cyclic(|this: &Weak<Session>| {
            let sink: Weak<dyn MutationSink> = this.clone();
            document.root().set_sink(sink);
            Self {
                this: this.clone(),
                config,
                spawner,
                document,
                registry,
                connections: ConnectionSet::new(),
                next_reqid: Cell::new(1),
                removals: RefCell::new(HashMap::new()),
                queries: RefCell::new(HashMap::new()),
            }
        }))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn connections(&self) -> &ConnectionSet {
        &self.connections
    }

    /// Connectable element, registered for inbound resolution
    pub fn create_element(&self, descriptor: &'static TagDescriptor) -> Element {
        let el = Element::connectable(descriptor);
        self.registry.register(&el);
        el
    }

    pub fn create_element_with_id(
        &self,
        descriptor: &'static TagDescriptor,
        id: impl Into<NodeId>,
    ) -> Element {
        let el = Element::with_id(descriptor, id);
        self.registry.register(&el);
        el
    }

    /// Register an existing subtree. Returns the number of elements added.
    ///
    /// Removals still waiting for the browser are cancelled for every element
    /// of the subtree, since the node lives on under its new parent.
    pub fn adopt(&self, element: &Element) -> usize {
        self.removals.borrow_mut().retain(|reqid, removal| {
            let reattached = element.is_inclusive_ancestor_of(&removal.element);
            if reattached {
                debug!("removal {} of {} cancelled by reattach", reqid, removal.element.id());
            }
            !reattached
        });
        self.registry.register_tree(element)
    }

    /// Full page for a fresh browser load
    pub fn page(&self) -> String {
        self.document.html()
    }

    fn next_reqid(&self) -> u64 {
        let reqid = self.next_reqid.get();
        self.next_reqid.set(reqid + 1);
        reqid
    }

    fn encode(record: &MutationRecord) -> Option<String> {
        match OutboundMessage::from(record).to_json() {
            Ok(text) => Some(text),
            Err(e) => {
                error!("cannot encode {:?} for {}: {}", record.method, record.id, e);
                None
            }
        }
    }

    // --- transport callbacks ---

    pub fn on_open(&self, connection: &Rc<dyn Connection>) {
        self.connections.open(connection);
    }

    /// Handle one inbound frame.
    ///
    /// Every message in a batch is processed; failures are logged and the
    /// first one is returned. The connection stays usable either way.
    pub fn on_message(&self, origin: ConnectionId, text: &str) -> Result<(), SyncError> {
        let mut first_error = None;
        let batch = split_batch(text).inspect_err(|e| {
            warn!("dropped frame from connection {}: {}", origin, e);
        })?;
        for value in batch {
            let result = Inbound::from_value(value).and_then(|msg| self.handle(origin, msg));
            if let Err(e) = result {
                warn!("dropped message from connection {}: {}", origin, e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub fn on_close(&self, id: ConnectionId) -> CloseOutcome {
        self.connections.close(id);
        let remaining = self.connections.len();
        if remaining > 0 {
            return CloseOutcome::Remaining(remaining);
        }

        let parked: Vec<u64> = self.removals.borrow().keys().copied().collect();
        for reqid in parked {
            self.complete_removal(reqid);
        }
        let abandoned = self.queries.borrow_mut().drain().count();
        if abandoned > 0 {
            debug!("{} queries abandoned", abandoned);
        }

        if self.config.auto_shutdown {
            info!("last connection closed, shutting down");
            CloseOutcome::Shutdown
        } else {
            CloseOutcome::Idle
        }
    }

    fn handle(&self, origin: ConnectionId, msg: Inbound) -> Result<(), SyncError> {
        match msg {
            Inbound::Log { level, message } => {
                log_browser(&level, &message);
                Ok(())
            }
            Inbound::Event { event } => self.handle_event(origin, event),
            Inbound::Response { id, reqid, data } => self.handle_response(id, reqid, data),
        }
    }

    fn handle_event(&self, origin: ConnectionId, init: Value) -> Result<(), SyncError> {
        let kind = init
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| SyncError::Malformed("event without `type`".to_string()))?
            .to_string();
        let current_id = target_id(&init, "currentTarget")
            .ok_or_else(|| SyncError::Malformed(format!("`{kind}` event without currentTarget")))?;

        let Some(current) = self.registry.resolve(&current_id) else {
            if matches!(kind.as_str(), "mount" | "unmount") {
                return Ok(());
            }
            return Err(SyncError::UnknownNode(current_id));
        };
        let target = target_id(&init, "target").and_then(|id| self.registry.resolve(&id));
        let event = Event::with_init(&kind, init).with_targets(Some(current.clone()), target);

        if kind == "mount" {
            self.announce_listeners(origin, &current);
        }

        for record in forms::reconcile(&current, &event)? {
            if let Some(text) = Self::encode(&record) {
                self.connections.broadcast_except(&text, Some(origin));
            }
        }

        let invoked = current.dispatch_event(&event, &*self.spawner);
        debug!("`{}` on {} reached {} listeners", kind, current_id, invoked);
        Ok(())
    }

    /// Tell one browser about every listened event in a freshly mounted subtree
    fn announce_listeners(&self, origin: ConnectionId, root: &Element) {
        for el in std::iter::once(root.clone()).chain(root.elements()) {
            if !el.is_connectable() {
                continue;
            }
            for event in el.listened_events() {
                let record =
                    MutationRecord::new(&el, Method::AddEventListener).param("event", event);
                if let Some(text) = Self::encode(&record) {
                    if let Err(e) = self.connections.send_to(origin, &text) {
                        warn!("{}", e);
                    }
                }
            }
        }
    }

    fn handle_response(
        &self,
        id: NodeId,
        reqid: Option<u64>,
        data: Option<Value>,
    ) -> Result<(), SyncError> {
        if let Some(reqid) = reqid {
            let query = self.queries.borrow_mut().remove(&reqid);
            if let Some(reply) = query {
                if reply.try_send(data.unwrap_or(Value::Null)).is_err() {
                    debug!("query {} answered after its caller left", reqid);
                }
                return Ok(());
            }
            if self.complete_removal(reqid) {
                return Ok(());
            }
        }

        let parked: Vec<u64> = self
            .removals
            .borrow()
            .iter()
            .filter(|(_, removal)| removal.element.id() == id)
            .map(|(reqid, _)| *reqid)
            .collect();
        if !parked.is_empty() {
            for reqid in parked {
                self.complete_removal(reqid);
            }
            return Ok(());
        }

        if self.registry.resolve(&id).is_none() {
            return Err(SyncError::UnknownNode(id));
        }
        debug!("unsolicited response from {}", id);
        Ok(())
    }

    /// Detach and deregister a parked element. Returns false if `reqid` was
    /// not pending.
    ///
    /// An element moved elsewhere since the request is left where it is.
    fn complete_removal(&self, reqid: u64) -> bool {
        let Some(removal) = self.removals.borrow_mut().remove(&reqid) else {
            return false;
        };
        let el = &removal.element;
        if !removal.in_place() {
            debug!("{} moved since removal request {}, kept", el.id(), reqid);
            return true;
        }
        el.detach();
        self.registry.deregister_tree(el);
        debug!("removed {} (request {})", el.id(), reqid);
        true
    }

    fn is_removal_pending(&self, element: &Element) -> bool {
        self.removals
            .borrow()
            .values()
            .any(|removal| removal.element == *element)
    }

    /// Number of removals waiting for the browser
    pub fn pending_removals(&self) -> usize {
        self.removals.borrow().len()
    }

    /// Ask the browser to evaluate `query` against `element`.
    ///
    /// Resolves to the browser's `data`, or `None` when nobody is connected,
    /// the element was never sent to a browser, or the last connection closes
    /// first.
    pub fn query(
        &self,
        element: &Element,
        query: &str,
    ) -> impl Future<Output = Option<Value>> + use<> {
        let receiver = if element.is_connectable() && element.is_connected() {
            let reqid = self.next_reqid();
            let (sender, receiver) = channel::bounded(1);
            self.queries.borrow_mut().insert(reqid, sender);
            let record = MutationRecord::new(element, Method::Query)
                .param("reqid", reqid)
                .param("query", query);
            self.emit(record);
            Some(receiver)
        } else {
            None
        };
        async move {
            match receiver {
                Some(receiver) => receiver.recv().await.ok(),
                None => None,
            }
        }
    }

    /// Horizontal scroll offset of the browser node
    pub fn scroll_x(&self, element: &Element) -> impl Future<Output = Option<Value>> + use<> {
        self.query(element, "scrollX")
    }

    /// Vertical scroll offset of the browser node
    pub fn scroll_y(&self, element: &Element) -> impl Future<Output = Option<Value>> + use<> {
        self.query(element, "scrollY")
    }
}

impl MutationSink for Session {
    fn is_connected(&self) -> bool {
        !self.connections.is_empty()
    }

    fn emit(&self, record: MutationRecord) {
        let Some(text) = Self::encode(&record) else {
            return;
        };
        let delivery = self.connections.broadcast(&text);
        if delivery.failed > 0 {
            warn!(
                "{:?} on {} reached {} of {} connections",
                record.method,
                record.id,
                delivery.delivered,
                delivery.delivered + delivery.failed
            );
        }
    }

    fn request_remove(&self, element: &Element) {
        if self.is_removal_pending(element) {
            debug!("removal of {} already requested", element.id());
            return;
        }
        let reqid = self.next_reqid();
        let removal = Removal {
            element: element.clone(),
            parent: element.parent().map(|parent| parent.downgrade()),
        };
        self.removals.borrow_mut().insert(reqid, removal);
        self.emit(MutationRecord::new(element, Method::Remove).param("reqid", reqid));

        let this = self.this.clone();
        let timeout = self.config.remove_ack_timeout();
        self.spawner.spawn_task(Box::pin(async move {
            Timer::after(timeout).await;
            if let Some(session) = this.upgrade() {
                if session.complete_removal(reqid) {
                    warn!("removal {} not acknowledged within {:?}", reqid, timeout);
                }
            }
        }));
    }

    fn adopt(&self, element: &Element) {
        Session::adopt(self, element);
    }
}

fn log_browser(level: &str, message: &str) {
    match level {
        "debug" => debug!(target: BROWSER_TARGET, "JS: {}", message),
        "info" | "log" => info!(target: BROWSER_TARGET, "JS: {}", message),
        "warn" | "warning" => warn!(target: BROWSER_TARGET, "JS: {}", message),
        "error" => error!(target: BROWSER_TARGET, "JS: {}", message),
        _ => {}
    }
}
