//! Protobuf records as they appear on the wire.
//!
//! Field numbers and enum values are a fixed contract shared with peers
//! that were built from the original `.proto` schema; do not renumber.

/// Discriminator sent before every body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum CommandType {
    Undef = 0,
    Init = 1,
    ShutDown = 2,
    UpdateNode = 10,
    RemoveNode = 11,
    AdvanceTime = 20,
    NextEvent = 21,
    MsgRecv = 22,
    MsgSend = 30,
    ConfRadio = 31,
    End = 40,
    Success = 41,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum RadioChannel {
    ProtoSch1 = 0,
    ProtoSch2 = 1,
    ProtoSch3 = 2,
    ProtoCch = 3,
    ProtoSch4 = 4,
    ProtoSch5 = 5,
    ProtoSch6 = 6,
    ProtoUndef = 7,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum UpdateType {
    AddRsu = 0,
    AddVehicle = 1,
    MoveNode = 2,
    RemoveNode = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum RadioNumber {
    NoRadio = 0,
    SingleRadio = 1,
    DualRadio = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum RadioMode {
    SingleChannel = 0,
    DualChannel = 1,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct CommandMessage {
    #[prost(enumeration = "CommandType", tag = "1")]
    pub command_type: i32,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct InitMessage {
    #[prost(int64, tag = "1")]
    pub start_time: i64,
    #[prost(int64, tag = "2")]
    pub end_time: i64,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct TimeMessage {
    #[prost(int64, tag = "1")]
    pub time: i64,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct PortExchange {
    #[prost(uint32, tag = "1")]
    pub port_number: u32,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct NodeData {
    #[prost(int32, tag = "1")]
    pub id: i32,
    #[prost(double, tag = "2")]
    pub x: f64,
    #[prost(double, tag = "3")]
    pub y: f64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateNode {
    #[prost(enumeration = "UpdateType", tag = "1")]
    pub update_type: i32,
    #[prost(int64, tag = "2")]
    pub time: i64,
    #[prost(message, repeated, tag = "3")]
    pub properties: Vec<NodeData>,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct RadioConfiguration {
    #[prost(bool, tag = "1")]
    pub receiving_messages: bool,
    #[prost(uint32, tag = "2")]
    pub ip_address: u32,
    #[prost(uint32, tag = "3")]
    pub subnet_address: u32,
    #[prost(double, tag = "4")]
    pub transmission_power: f64,
    #[prost(enumeration = "RadioMode", tag = "5")]
    pub radio_mode: i32,
    #[prost(enumeration = "RadioChannel", tag = "6")]
    pub primary_radio_channel: i32,
    #[prost(enumeration = "RadioChannel", tag = "7")]
    pub secondary_radio_channel: i32,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct ConfigureRadioMessage {
    #[prost(int64, tag = "1")]
    pub time: i64,
    #[prost(int32, tag = "2")]
    pub message_id: i32,
    #[prost(int32, tag = "3")]
    pub external_id: i32,
    #[prost(enumeration = "RadioNumber", tag = "4")]
    pub radio_number: i32,
    #[prost(message, optional, tag = "5")]
    pub primary_radio_configuration: Option<RadioConfiguration>,
    #[prost(message, optional, tag = "6")]
    pub secondary_radio_configuration: Option<RadioConfiguration>,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct TopoAddress {
    #[prost(uint32, tag = "1")]
    pub ip_address: u32,
    #[prost(int32, tag = "2")]
    pub ttl: i32,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct GeoRectangleAddress {
    #[prost(uint32, tag = "1")]
    pub ip_address: u32,
    #[prost(double, tag = "2")]
    pub a_x: f64,
    #[prost(double, tag = "3")]
    pub a_y: f64,
    #[prost(double, tag = "4")]
    pub b_x: f64,
    #[prost(double, tag = "5")]
    pub b_y: f64,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct GeoCircleAddress {
    #[prost(uint32, tag = "1")]
    pub ip_address: u32,
    #[prost(double, tag = "2")]
    pub center_x: f64,
    #[prost(double, tag = "3")]
    pub center_y: f64,
    #[prost(double, tag = "4")]
    pub radius: f64,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct SendMessageMessage {
    #[prost(int64, tag = "1")]
    pub time: i64,
    #[prost(int32, tag = "2")]
    pub node_id: i32,
    #[prost(enumeration = "RadioChannel", tag = "3")]
    pub channel_id: i32,
    #[prost(int32, tag = "4")]
    pub message_id: i32,
    #[prost(int64, tag = "5")]
    pub length: i64,
    #[prost(oneof = "send_message_message::Address", tags = "6, 7, 8")]
    pub address: Option<send_message_message::Address>,
}

pub mod send_message_message {
    /// Which destination shape a send request targets.
    #[derive(Clone, Copy, PartialEq, prost::Oneof)]
    pub enum Address {
        #[prost(message, tag = "6")]
        TopoAddress(super::TopoAddress),
        #[prost(message, tag = "7")]
        RectangleAddress(super::GeoRectangleAddress),
        #[prost(message, tag = "8")]
        CircleAddress(super::GeoCircleAddress),
    }
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct ReceiveMessage {
    #[prost(int64, tag = "1")]
    pub time: i64,
    #[prost(int32, tag = "2")]
    pub node_id: i32,
    #[prost(enumeration = "RadioChannel", tag = "3")]
    pub channel_id: i32,
    #[prost(int32, tag = "4")]
    pub message_id: i32,
    #[prost(double, tag = "5")]
    pub rssi: f64,
}
