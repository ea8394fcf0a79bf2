//! Wire-protocol bridge between a simulation ambassador and a network federate.
//!
//! The two processes exchange varint length-prefixed protobuf records over
//! TCP: synchronization commands, node topology updates, radio
//! configuration, and message send/receive events.
//!
//! # Crate Structure
//!
//! - [`transport`]: TCP listener/stream with low-latency socket options
//! - [`frame`]: Varint length-prefixed framing with short-read recovery
//! - [`schema`]: Wire records, domain types, and the bridge between them
//! - [`channel`]: Federate and ambassador channels (behind `channel` feature)

/// Re-export transport types.
pub mod transport {
    pub use fedlink_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use fedlink_frame::*;
}

/// Re-export schema types.
pub mod schema {
    pub use fedlink_schema::*;
}

/// Re-export channel types (requires `channel` feature).
#[cfg(feature = "channel")]
pub mod channel {
    pub use fedlink_channel::*;
}
