//! Connection set
//!
//! Live browser connections. The transport owns each connection; the set
//! keeps weak handles and fans messages out to them.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, info, warn};

use crate::SyncError;

/// Transport-assigned connection identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Write failure reported by a transport
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// One browser connection
pub trait Connection {
    fn id(&self) -> ConnectionId;

    /// Queue one text frame
    fn write(&self, text: &str) -> Result<(), TransportError>;
}

/// Result of a broadcast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    pub delivered: usize,
    pub failed: usize,
}

/// Active connections in open order
#[derive(Default)]
pub struct ConnectionSet {
    connections: RefCell<Vec<(ConnectionId, Weak<dyn Connection>)>>,
}

impl ConnectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection. Reopening an id replaces the old handle.
    pub fn open(&self, connection: &Rc<dyn Connection>) {
        let id = connection.id();
        let mut connections = self.connections.borrow_mut();
        connections.retain(|(existing, _)| *existing != id);
        connections.push((id, Rc::downgrade(connection)));
        info!("connection {} opened ({} open)", id, connections.len());
    }

    /// Remove a connection. Returns false if it was not open.
    pub fn close(&self, id: ConnectionId) -> bool {
        let mut connections = self.connections.borrow_mut();
        let before = connections.len();
        connections.retain(|(existing, _)| *existing != id);
        let closed = connections.len() != before;
        if closed {
            info!("connection {} closed ({} open)", id, connections.len());
        }
        closed
    }

    pub fn len(&self) -> usize {
        self.connections.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.borrow().is_empty()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.borrow().iter().any(|(existing, _)| *existing == id)
    }

    /// Live handles, dropping any the transport already released
    fn live(&self) -> Vec<Rc<dyn Connection>> {
        let mut connections = self.connections.borrow_mut();
        let mut live = Vec::with_capacity(connections.len());
        connections.retain(|(id, weak)| match weak.upgrade() {
            Some(conn) => {
                live.push(conn);
                true
            }
            None => {
                debug!("connection {} dropped by transport", id);
                false
            }
        });
        live
    }

    /// Write to every connection
    pub fn broadcast(&self, text: &str) -> Delivery {
        self.broadcast_except(text, None)
    }

    /// Write to every connection but `origin`.
    ///
    /// Best effort: a failed write is logged and counted, the rest still
    /// receive the message.
    pub fn broadcast_except(&self, text: &str, origin: Option<ConnectionId>) -> Delivery {
        let mut delivery = Delivery::default();
        for conn in self.live() {
            let id = conn.id();
            if Some(id) == origin {
                continue;
            }
            match conn.write(text) {
                Ok(()) => delivery.delivered += 1,
                Err(e) => {
                    warn!("write to connection {} failed: {}", id, e);
                    delivery.failed += 1;
                }
            }
        }
        delivery
    }

    /// Write to a single connection
    pub fn send_to(&self, id: ConnectionId, text: &str) -> Result<(), SyncError> {
        let conn = self
            .live()
            .into_iter()
            .find(|conn| conn.id() == id)
            .ok_or_else(|| SyncError::Transport {
                connection: id,
                source: TransportError("connection is not open".to_string()),
            })?;
        conn.write(text).map_err(|source| SyncError::Transport {
            connection: id,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Memory {
        id: ConnectionId,
        frames: RefCell<Vec<String>>,
    }

    impl Connection for Memory {
        fn id(&self) -> ConnectionId {
            self.id
        }

        fn write(&self, text: &str) -> Result<(), TransportError> {
            self.frames.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    fn memory(id: u64) -> Rc<Memory> {
        Rc::new(Memory {
            id: ConnectionId(id),
            frames: RefCell::new(Vec::new()),
        })
    }

    #[test]
    fn test_open_close() {
        let set = ConnectionSet::new();
        let a: Rc<dyn Connection> = memory(1);
        set.open(&a);
        set.open(&a);
        assert_eq!(set.len(), 1);
        assert!(set.close(ConnectionId(1)));
        assert!(!set.close(ConnectionId(1)));
        assert!(set.is_empty());
    }

    #[test]
    fn test_broadcast_except_origin() {
        let set = ConnectionSet::new();
        let a = memory(1);
        let b = memory(2);
        set.open(&(a.clone() as Rc<dyn Connection>));
        set.open(&(b.clone() as Rc<dyn Connection>));

        let delivery = set.broadcast_except("x", Some(ConnectionId(1)));
        assert_eq!(delivery, Delivery { delivered: 1, failed: 0 });
        assert!(a.frames.borrow().is_empty());
        assert_eq!(*b.frames.borrow(), vec!["x".to_string()]);
    }

    #[test]
    fn test_released_connections_are_pruned() {
        let set = ConnectionSet::new();
        let a: Rc<dyn Connection> = memory(1);
        set.open(&a);
        drop(a);
        assert_eq!(set.broadcast("x"), Delivery::default());
        assert!(set.is_empty());
    }

    #[test]
    fn test_send_to_closed() {
        let set = ConnectionSet::new();
        assert!(matches!(
            set.send_to(ConnectionId(9), "x"),
            Err(SyncError::Transport { .. })
        ));
    }
}
