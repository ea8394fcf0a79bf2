use std::fmt;

use serde::Serialize;

/// Kind of the command record that precedes every body on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandKind {
    /// Unrecognized or unreadable command.
    Undef,
    Init,
    ShutDown,
    UpdateNode,
    RemoveNode,
    AdvanceTime,
    NextEvent,
    MsgRecv,
    MsgSend,
    ConfRadio,
    End,
    /// Pure acknowledgement; no body follows.
    Success,
}

impl CommandKind {
    /// Every kind, in wire value order.
    pub const ALL: [CommandKind; 12] = [
        CommandKind::Undef,
        CommandKind::Init,
        CommandKind::ShutDown,
        CommandKind::UpdateNode,
        CommandKind::RemoveNode,
        CommandKind::AdvanceTime,
        CommandKind::NextEvent,
        CommandKind::MsgRecv,
        CommandKind::MsgSend,
        CommandKind::ConfRadio,
        CommandKind::End,
        CommandKind::Success,
    ];

    /// Protocol name, as written in logs.
    pub fn name(self) -> &'static str {
        match self {
            CommandKind::Undef => "UNDEF",
            CommandKind::Init => "INIT",
            CommandKind::ShutDown => "SHUT_DOWN",
            CommandKind::UpdateNode => "UPDATE_NODE",
            CommandKind::RemoveNode => "REMOVE_NODE",
            CommandKind::AdvanceTime => "ADVANCE_TIME",
            CommandKind::NextEvent => "NEXT_EVENT",
            CommandKind::MsgRecv => "MSG_RECV",
            CommandKind::MsgSend => "MSG_SEND",
            CommandKind::ConfRadio => "CONF_RADIO",
            CommandKind::End => "END",
            CommandKind::Success => "SUCCESS",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Node topology mutation carried by an update body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateKind {
    AddRsu,
    AddVehicle,
    MoveNode,
    RemoveNode,
}

/// How many radio configuration blocks a configuration message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RadioCount {
    NoRadio,
    SingleRadio,
    DualRadio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelMode {
    SingleChannel,
    DualChannel,
}

/// Radio channel of a simulated interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RadioChannel {
    Sch1,
    Sch2,
    Sch3,
    Sch4,
    Sch5,
    Sch6,
    /// Control channel.
    Cch,
    /// Unrecognized wire value.
    UndefChannel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InitBounds {
    pub start_time: i64,
    pub end_time: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeProperty {
    pub id: i32,
    pub x: f64,
    pub y: f64,
}

/// A batch of node mutations applied at `time`.
///
/// `properties` keeps wire order; nodes are applied in that order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeUpdate {
    pub kind: UpdateKind,
    pub time: i64,
    pub properties: Vec<NodeProperty>,
}

/// Topological destination. `ip_address` is the raw packed 32-bit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopoAddress {
    pub ip_address: u32,
    pub ttl: i32,
}

/// A send request as the federate sees it.
///
/// Geographic destinations arrive already flattened to a [`TopoAddress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SendMessage {
    pub time: i64,
    pub node_id: i32,
    pub channel: RadioChannel,
    pub message_id: i32,
    pub length: i32,
    pub address: TopoAddress,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub x: f64,
    pub y: f64,
}

/// Destination shape of an outgoing send request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Destination {
    Topological { ip_address: u32, ttl: i32 },
    Rectangle { ip_address: u32, a: GeoPoint, b: GeoPoint },
    Circle { ip_address: u32, center: GeoPoint, radius: f64 },
}

/// A send request as the ambassador writes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutboundMessage {
    pub time: i64,
    pub node_id: i32,
    pub channel: RadioChannel,
    pub message_id: i32,
    pub length: i32,
    pub destination: Destination,
}

impl From<&SendMessage> for OutboundMessage {
    fn from(msg: &SendMessage) -> Self {
        Self {
            time: msg.time,
            node_id: msg.node_id,
            channel: msg.channel,
            message_id: msg.message_id,
            length: msg.length,
            destination: Destination::Topological {
                ip_address: msg.address.ip_address,
                ttl: msg.address.ttl,
            },
        }
    }
}

/// Configuration of one radio interface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadioConfig {
    pub enabled: bool,
    pub ip_address: u32,
    pub subnet: u32,
    pub tx_power: i32,
    pub mode: ChannelMode,
    pub primary_channel: RadioChannel,
    /// Only present under [`ChannelMode::DualChannel`].
    pub secondary_channel: Option<RadioChannel>,
}

/// Radio configuration for one node.
///
/// `primary` is present unless `radio_count` is `NoRadio`; `secondary`
/// only for `DualRadio`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadioConfMessage {
    pub time: i64,
    pub message_id: i32,
    pub node_id: i32,
    pub radio_count: RadioCount,
    pub primary: Option<RadioConfig>,
    pub secondary: Option<RadioConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeMessage {
    pub time: i64,
}

/// Reception of a radio message at a simulated node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReceiveMessage {
    pub time: i64,
    pub node_id: i32,
    pub message_id: i32,
    pub channel: RadioChannel,
    pub rssi: f64,
}
