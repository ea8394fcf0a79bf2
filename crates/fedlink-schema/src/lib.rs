//! Message schema bridge for the ambassador/federate protocol.
//!
//! [`wire`] holds the protobuf records exactly as they travel over the
//! socket. [`types`] holds the domain values the rest of the workspace
//! works with, and [`bridge`] converts between the two.
//!
//! Enum conversions are total: a wire value outside the known set maps to
//! an explicit sentinel (`CommandKind::Undef`, `RadioChannel::UndefChannel`)
//! and is logged, never rejected with a panic.

pub mod bridge;
pub mod error;
pub mod types;
pub mod wire;

pub use bridge::{
    decode_command, decode_init, decode_port, decode_radio_config, decode_receive_message,
    decode_send_message, decode_time, decode_update_node, encode_command, encode_init,
    encode_port, encode_radio_config, encode_receive_message, encode_send_message, encode_time,
    encode_update_node, ipv4_from_wire, ipv4_to_wire, GEO_ADDRESS_TTL,
};
pub use error::{Result, SchemaError};
pub use types::{
    ChannelMode, CommandKind, Destination, GeoPoint, InitBounds, NodeProperty, NodeUpdate,
    OutboundMessage, RadioChannel, RadioConfMessage, RadioConfig, RadioCount, ReceiveMessage,
    SendMessage, TimeMessage, TopoAddress, UpdateKind,
};
