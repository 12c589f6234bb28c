//! Synchronization errors

use tether_dom::{DomError, NodeId};

use crate::connection::{ConnectionId, TransportError};

/// Errors raised while handling browser traffic.
///
/// None of them close the connection; the offending message is dropped.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Malformed message: {0}")]
    Malformed(String),

    #[error("Unknown message type: {0}")]
    UnknownMessageType(String),

    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("Write to connection {connection} failed: {source}")]
    Transport {
        connection: ConnectionId,
        #[source]
        source: TransportError,
    },

    #[error(transparent)]
    Dom(#[from] DomError),
}
