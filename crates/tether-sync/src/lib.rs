//! tether sync - browser synchronization layer
//!
//! Keeps a [`tether_dom`] tree and any number of browser tabs in step over a
//! JSON message channel. The host transport feeds [`Session::on_open`],
//! [`Session::on_message`] and [`Session::on_close`]; every mutation of a
//! connected element is broadcast back to all open connections.
//!
//! ```
//! use std::rc::Rc;
//! use tether_dom::tags;
//! use tether_sync::{Config, Session};
//!
//! let executor = Rc::new(smol::LocalExecutor::new());
//! let session = Session::new(Config::default(), executor.clone()).unwrap();
//! let greeting = session.create_element(&tags::P);
//! greeting.set_text_content("hello");
//! session.document().body().append(&greeting).unwrap();
//! assert!(session.page().contains(">hello</p>"));
//! ```

pub mod connection;
mod config;
mod document;
mod error;
pub mod logging;
pub mod message;
mod registry;
mod session;

pub use config::Config;
pub use connection::{Connection, ConnectionId, ConnectionSet, Delivery, TransportError};
pub use document::Document;
pub use error::SyncError;
pub use message::{Inbound, OutboundMessage};
pub use registry::Registry;
pub use session::{CloseOutcome, Session};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
