//! Remote editing over a plain line protocol.
//!
//! [`Transport`] bridges a single TCP client to two queues, [`CommandRouter`]
//! turns queued lines into workspace edits and [`EditorService`] ties both to
//! a [`tile_engine_edit::Workspace`].

mod error;
pub use error::*;

mod protocol;
pub use protocol::*;

mod character;
pub use character::Controllable;

mod router;
pub use router::*;

pub mod transport;
pub use transport::{Transport, TransportConfig, TransportStats, DEFAULT_MAX_LINE_LEN, DEFAULT_PORT};

mod service;
pub use service::*;
