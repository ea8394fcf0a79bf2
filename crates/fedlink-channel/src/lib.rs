//! Protocol channel between a simulation ambassador and a network federate.
//!
//! [`ProtocolChannel`] is the federate end: it listens, accepts the one
//! ambassador connection, and exposes one operation per message kind.
//! [`AmbassadorChannel`] is the orchestrator end of the same protocol.
//! [`FederateLink`] and [`AmbassadorLink`] perform the two-channel
//! bootstrap both sides use in a coupled simulation.
//!
//! Every body on the wire is preceded by one command record. The raw
//! operations leave it to the caller to read the body that matches the
//! command just read; [`ProtocolChannel::read_request`] pairs them by
//! construction.

mod conn;

pub mod ambassador;
pub mod dispatch;
pub mod error;
pub mod federate;
pub mod link;

pub use ambassador::{expect_success, AmbassadorChannel, ConnectConfig};
pub use dispatch::Request;
pub use error::{ChannelError, Result};
pub use federate::{ChannelConfig, ChannelState, ProtocolChannel, ShutdownHandle};
pub use link::{AmbassadorLink, FederateLink};
