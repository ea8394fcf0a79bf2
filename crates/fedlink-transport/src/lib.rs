//! TCP connection lifecycle for the ambassador/federate channel.
//!
//! This is the lowest layer of fedlink. It binds the listening socket the
//! orchestrator connects to, accepts exactly one peer per listener, and hands
//! out [`FederateStream`]s configured for low-latency delivery.
//!
//! Everything above this crate reads through the [`PollRead`] trait so the
//! short-read recovery in `fedlink-frame` can wait for readiness without
//! knowing about sockets.

pub mod error;
pub mod tcp;
pub mod traits;

pub use error::{Result, TransportError};
pub use tcp::{connect, resolve_ipv4, TcpChannelListener};
pub use traits::{FederateStream, PollRead};
