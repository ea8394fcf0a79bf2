use std::net::Ipv4Addr;

use prost::Message;
use tracing::warn;

use crate::error::{Result, SchemaError};
use crate::types::{
    ChannelMode, CommandKind, Destination, InitBounds, NodeProperty, NodeUpdate, OutboundMessage,
    RadioChannel, RadioConfMessage, RadioConfig, RadioCount, ReceiveMessage, SendMessage,
    TopoAddress, UpdateKind,
};
use crate::wire::{self, send_message_message::Address};

/// TTL assigned to geographically addressed send requests.
///
/// Rectangle and circle destinations are not routed geographically yet;
/// they are delivered topologically with this fixed hop limit.
pub const GEO_ADDRESS_TTL: i32 = 10;

impl CommandKind {
    /// Map a wire command value. Unknown values become [`CommandKind::Undef`].
    pub fn from_wire(value: i32) -> Self {
        match wire::CommandType::try_from(value) {
            Ok(wire::CommandType::Undef) => CommandKind::Undef,
            Ok(wire::CommandType::Init) => CommandKind::Init,
            Ok(wire::CommandType::ShutDown) => CommandKind::ShutDown,
            Ok(wire::CommandType::UpdateNode) => CommandKind::UpdateNode,
            Ok(wire::CommandType::RemoveNode) => CommandKind::RemoveNode,
            Ok(wire::CommandType::AdvanceTime) => CommandKind::AdvanceTime,
            Ok(wire::CommandType::NextEvent) => CommandKind::NextEvent,
            Ok(wire::CommandType::MsgRecv) => CommandKind::MsgRecv,
            Ok(wire::CommandType::MsgSend) => CommandKind::MsgSend,
            Ok(wire::CommandType::ConfRadio) => CommandKind::ConfRadio,
            Ok(wire::CommandType::End) => CommandKind::End,
            Ok(wire::CommandType::Success) => CommandKind::Success,
            Err(_) => {
                warn!(value, "unknown command type, mapping to UNDEF");
                CommandKind::Undef
            }
        }
    }

    pub fn to_wire(self) -> wire::CommandType {
        match self {
            CommandKind::Undef => wire::CommandType::Undef,
            CommandKind::Init => wire::CommandType::Init,
            CommandKind::ShutDown => wire::CommandType::ShutDown,
            CommandKind::UpdateNode => wire::CommandType::UpdateNode,
            CommandKind::RemoveNode => wire::CommandType::RemoveNode,
            CommandKind::AdvanceTime => wire::CommandType::AdvanceTime,
            CommandKind::NextEvent => wire::CommandType::NextEvent,
            CommandKind::MsgRecv => wire::CommandType::MsgRecv,
            CommandKind::MsgSend => wire::CommandType::MsgSend,
            CommandKind::ConfRadio => wire::CommandType::ConfRadio,
            CommandKind::End => wire::CommandType::End,
            CommandKind::Success => wire::CommandType::Success,
        }
    }
}

impl RadioChannel {
    /// Map a wire channel value. Unknown values become [`RadioChannel::UndefChannel`].
    pub fn from_wire(value: i32) -> Self {
        match wire::RadioChannel::try_from(value) {
            Ok(wire::RadioChannel::ProtoSch1) => RadioChannel::Sch1,
            Ok(wire::RadioChannel::ProtoSch2) => RadioChannel::Sch2,
            Ok(wire::RadioChannel::ProtoSch3) => RadioChannel::Sch3,
            Ok(wire::RadioChannel::ProtoCch) => RadioChannel::Cch,
            Ok(wire::RadioChannel::ProtoSch4) => RadioChannel::Sch4,
            Ok(wire::RadioChannel::ProtoSch5) => RadioChannel::Sch5,
            Ok(wire::RadioChannel::ProtoSch6) => RadioChannel::Sch6,
            Ok(wire::RadioChannel::ProtoUndef) => RadioChannel::UndefChannel,
            Err(_) => {
                warn!(value, "unknown radio channel, mapping to UNDEF_CHANNEL");
                RadioChannel::UndefChannel
            }
        }
    }

    pub fn to_wire(self) -> wire::RadioChannel {
        match self {
            RadioChannel::Sch1 => wire::RadioChannel::ProtoSch1,
            RadioChannel::Sch2 => wire::RadioChannel::ProtoSch2,
            RadioChannel::Sch3 => wire::RadioChannel::ProtoSch3,
            RadioChannel::Sch4 => wire::RadioChannel::ProtoSch4,
            RadioChannel::Sch5 => wire::RadioChannel::ProtoSch5,
            RadioChannel::Sch6 => wire::RadioChannel::ProtoSch6,
            RadioChannel::Cch => wire::RadioChannel::ProtoCch,
            RadioChannel::UndefChannel => wire::RadioChannel::ProtoUndef,
        }
    }
}

impl UpdateKind {
    /// Map a wire update type. There is no sentinel: an unknown mutation is an error.
    pub fn from_wire(value: i32) -> Result<Self> {
        match wire::UpdateType::try_from(value) {
            Ok(wire::UpdateType::AddRsu) => Ok(UpdateKind::AddRsu),
            Ok(wire::UpdateType::AddVehicle) => Ok(UpdateKind::AddVehicle),
            Ok(wire::UpdateType::MoveNode) => Ok(UpdateKind::MoveNode),
            Ok(wire::UpdateType::RemoveNode) => Ok(UpdateKind::RemoveNode),
            Err(_) => Err(SchemaError::UnknownUpdateKind(value)),
        }
    }

    pub fn to_wire(self) -> wire::UpdateType {
        match self {
            UpdateKind::AddRsu => wire::UpdateType::AddRsu,
            UpdateKind::AddVehicle => wire::UpdateType::AddVehicle,
            UpdateKind::MoveNode => wire::UpdateType::MoveNode,
            UpdateKind::RemoveNode => wire::UpdateType::RemoveNode,
        }
    }
}

impl RadioCount {
    pub fn from_wire(value: i32) -> Self {
        match wire::RadioNumber::try_from(value) {
            Ok(wire::RadioNumber::NoRadio) => RadioCount::NoRadio,
            Ok(wire::RadioNumber::SingleRadio) => RadioCount::SingleRadio,
            Ok(wire::RadioNumber::DualRadio) => RadioCount::DualRadio,
            Err(_) => {
                warn!(value, "unknown radio number, mapping to NO_RADIO");
                RadioCount::NoRadio
            }
        }
    }

    pub fn to_wire(self) -> wire::RadioNumber {
        match self {
            RadioCount::NoRadio => wire::RadioNumber::NoRadio,
            RadioCount::SingleRadio => wire::RadioNumber::SingleRadio,
            RadioCount::DualRadio => wire::RadioNumber::DualRadio,
        }
    }
}

impl ChannelMode {
    pub fn from_wire(value: i32) -> Self {
        match wire::RadioMode::try_from(value) {
            Ok(wire::RadioMode::SingleChannel) => ChannelMode::SingleChannel,
            Ok(wire::RadioMode::DualChannel) => ChannelMode::DualChannel,
            Err(_) => {
                warn!(value, "unknown radio mode, mapping to SINGLE_CHANNEL");
                ChannelMode::SingleChannel
            }
        }
    }

    pub fn to_wire(self) -> wire::RadioMode {
        match self {
            ChannelMode::SingleChannel => wire::RadioMode::SingleChannel,
            ChannelMode::DualChannel => wire::RadioMode::DualChannel,
        }
    }
}

/// Unpack a wire IPv4 address (most significant byte first).
pub fn ipv4_from_wire(value: u32) -> Ipv4Addr {
    Ipv4Addr::from(value)
}

pub fn ipv4_to_wire(addr: Ipv4Addr) -> u32 {
    u32::from(addr)
}

pub fn decode_command(body: &[u8]) -> Result<CommandKind> {
    let msg = wire::CommandMessage::decode(body)?;
    Ok(CommandKind::from_wire(msg.command_type))
}

pub fn encode_command(kind: CommandKind) -> Vec<u8> {
    wire::CommandMessage {
        command_type: kind.to_wire().into(),
    }
    .encode_to_vec()
}

pub fn decode_init(body: &[u8]) -> Result<InitBounds> {
    let msg = wire::InitMessage::decode(body)?;
    Ok(InitBounds {
        start_time: msg.start_time,
        end_time: msg.end_time,
    })
}

pub fn encode_init(bounds: InitBounds) -> Vec<u8> {
    wire::InitMessage {
        start_time: bounds.start_time,
        end_time: bounds.end_time,
    }
    .encode_to_vec()
}

pub fn decode_time(body: &[u8]) -> Result<i64> {
    Ok(wire::TimeMessage::decode(body)?.time)
}

pub fn encode_time(time: i64) -> Vec<u8> {
    wire::TimeMessage { time }.encode_to_vec()
}

pub fn decode_port(body: &[u8]) -> Result<u32> {
    Ok(wire::PortExchange::decode(body)?.port_number)
}

pub fn encode_port(port: u32) -> Vec<u8> {
    wire::PortExchange { port_number: port }.encode_to_vec()
}

/// Decode a node update body. Properties keep wire order.
pub fn decode_update_node(body: &[u8]) -> Result<NodeUpdate> {
    let msg = wire::UpdateNode::decode(body)?;
    Ok(NodeUpdate {
        kind: UpdateKind::from_wire(msg.update_type)?,
        time: msg.time,
        properties: msg
            .properties
            .iter()
            .map(|node| NodeProperty {
                id: node.id,
                x: node.x,
                y: node.y,
            })
            .collect(),
    })
}

pub fn encode_update_node(update: &NodeUpdate) -> Vec<u8> {
    wire::UpdateNode {
        update_type: update.kind.to_wire().into(),
        time: update.time,
        properties: update
            .properties
            .iter()
            .map(|node| wire::NodeData {
                id: node.id,
                x: node.x,
                y: node.y,
            })
            .collect(),
    }
    .encode_to_vec()
}

/// Decode a send request, flattening any destination shape to a topological address.
pub fn decode_send_message(body: &[u8]) -> Result<SendMessage> {
    let msg = wire::SendMessageMessage::decode(body)?;
    let length = i32::try_from(msg.length).map_err(|_| SchemaError::OutOfRange {
        field: "length",
        value: msg.length,
    })?;

    let address = match msg.address {
        Some(Address::TopoAddress(topo)) => TopoAddress {
            ip_address: topo.ip_address,
            ttl: topo.ttl,
        },
        Some(Address::RectangleAddress(rect)) => TopoAddress {
            ip_address: rect.ip_address,
            ttl: GEO_ADDRESS_TTL,
        },
        Some(Address::CircleAddress(circle)) => TopoAddress {
            ip_address: circle.ip_address,
            ttl: GEO_ADDRESS_TTL,
        },
        None => {
            warn!(message_id = msg.message_id, "send request without destination");
            TopoAddress {
                ip_address: 0,
                ttl: 0,
            }
        }
    };

    Ok(SendMessage {
        time: msg.time,
        node_id: msg.node_id,
        channel: RadioChannel::from_wire(msg.channel_id),
        message_id: msg.message_id,
        length,
        address,
    })
}

pub fn encode_send_message(msg: &OutboundMessage) -> Vec<u8> {
    let address = match msg.destination {
        Destination::Topological { ip_address, ttl } => {
            Address::TopoAddress(wire::TopoAddress { ip_address, ttl })
        }
        Destination::Rectangle { ip_address, a, b } => {
            Address::RectangleAddress(wire::GeoRectangleAddress {
                ip_address,
                a_x: a.x,
                a_y: a.y,
                b_x: b.x,
                b_y: b.y,
            })
        }
        Destination::Circle {
            ip_address,
            center,
            radius,
        } => Address::CircleAddress(wire::GeoCircleAddress {
            ip_address,
            center_x: center.x,
            center_y: center.y,
            radius,
        }),
    };

    wire::SendMessageMessage {
        time: msg.time,
        node_id: msg.node_id,
        channel_id: msg.channel.to_wire().into(),
        message_id: msg.message_id,
        length: i64::from(msg.length),
        address: Some(address),
    }
    .encode_to_vec()
}

fn radio_from_wire(cfg: &wire::RadioConfiguration) -> RadioConfig {
    let mode = ChannelMode::from_wire(cfg.radio_mode);
    let secondary_channel = match mode {
        ChannelMode::DualChannel => Some(RadioChannel::from_wire(cfg.secondary_radio_channel)),
        ChannelMode::SingleChannel => None,
    };
    RadioConfig {
        enabled: cfg.receiving_messages,
        ip_address: cfg.ip_address,
        subnet: cfg.subnet_address,
        tx_power: cfg.transmission_power as i32,
        mode,
        primary_channel: RadioChannel::from_wire(cfg.primary_radio_channel),
        secondary_channel,
    }
}

fn radio_to_wire(cfg: &RadioConfig) -> wire::RadioConfiguration {
    let secondary_radio_channel = match cfg.mode {
        ChannelMode::DualChannel => cfg
            .secondary_channel
            .unwrap_or(RadioChannel::UndefChannel)
            .to_wire()
            .into(),
        ChannelMode::SingleChannel => 0,
    };
    wire::RadioConfiguration {
        receiving_messages: cfg.enabled,
        ip_address: cfg.ip_address,
        subnet_address: cfg.subnet,
        transmission_power: f64::from(cfg.tx_power),
        radio_mode: cfg.mode.to_wire().into(),
        primary_radio_channel: cfg.primary_channel.to_wire().into(),
        secondary_radio_channel,
    }
}

/// Decode a radio configuration body.
///
/// Radio blocks are read only as far as `radio_number` announces them; a
/// block the count announces but the body omits decodes as all defaults.
pub fn decode_radio_config(body: &[u8]) -> Result<RadioConfMessage> {
    let msg = wire::ConfigureRadioMessage::decode(body)?;
    let radio_count = RadioCount::from_wire(msg.radio_number);

    let primary = match radio_count {
        RadioCount::NoRadio => None,
        RadioCount::SingleRadio | RadioCount::DualRadio => Some(radio_from_wire(
            &msg.primary_radio_configuration.unwrap_or_default(),
        )),
    };
    let secondary = match radio_count {
        RadioCount::DualRadio => Some(radio_from_wire(
            &msg.secondary_radio_configuration.unwrap_or_default(),
        )),
        RadioCount::NoRadio | RadioCount::SingleRadio => None,
    };

    Ok(RadioConfMessage {
        time: msg.time,
        message_id: msg.message_id,
        node_id: msg.external_id,
        radio_count,
        primary,
        secondary,
    })
}

pub fn encode_radio_config(msg: &RadioConfMessage) -> Vec<u8> {
    let primary = match msg.radio_count {
        RadioCount::NoRadio => None,
        RadioCount::SingleRadio | RadioCount::DualRadio => msg.primary.as_ref().map(radio_to_wire),
    };
    let secondary = match msg.radio_count {
        RadioCount::DualRadio => msg.secondary.as_ref().map(radio_to_wire),
        RadioCount::NoRadio | RadioCount::SingleRadio => None,
    };

    wire::ConfigureRadioMessage {
        time: msg.time,
        message_id: msg.message_id,
        external_id: msg.node_id,
        radio_number: msg.radio_count.to_wire().into(),
        primary_radio_configuration: primary,
        secondary_radio_configuration: secondary,
    }
    .encode_to_vec()
}

pub fn decode_receive_message(body: &[u8]) -> Result<ReceiveMessage> {
    let msg = wire::ReceiveMessage::decode(body)?;
    Ok(ReceiveMessage {
        time: msg.time,
        node_id: msg.node_id,
        message_id: msg.message_id,
        channel: RadioChannel::from_wire(msg.channel_id),
        rssi: msg.rssi,
    })
}

pub fn encode_receive_message(msg: &ReceiveMessage) -> Vec<u8> {
    wire::ReceiveMessage {
        time: msg.time,
        node_id: msg.node_id,
        channel_id: msg.channel.to_wire().into(),
        message_id: msg.message_id,
        rssi: msg.rssi,
    }
    .encode_to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GeoPoint;

    fn dual_radio(primary: RadioChannel, secondary: RadioChannel) -> RadioConfig {
        RadioConfig {
            enabled: true,
            ip_address: 0x0A01_0002,
            subnet: 0xFFFF_0000,
            tx_power: 23,
            mode: ChannelMode::DualChannel,
            primary_channel: primary,
            secondary_channel: Some(secondary),
        }
    }

    #[test]
    fn command_kinds_roundtrip_through_wire_values() {
        for kind in CommandKind::ALL {
            let value: i32 = kind.to_wire().into();
            assert_eq!(CommandKind::from_wire(value), kind);
        }
        assert_eq!(i32::from(CommandKind::Success.to_wire()), 41);
        assert_eq!(i32::from(CommandKind::AdvanceTime.to_wire()), 20);
    }

    #[test]
    fn unknown_command_values_map_to_undef() {
        for value in [3, 9, 12, 19, 23, 29, 32, 39, 42, 1000, -1, i32::MAX] {
            assert_eq!(CommandKind::from_wire(value), CommandKind::Undef, "value {value}");
        }
    }

    #[test]
    fn unknown_command_body_decodes_to_undef() {
        let body = wire::CommandMessage { command_type: 99 }.encode_to_vec();
        assert_eq!(decode_command(&body).unwrap(), CommandKind::Undef);
    }

    #[test]
    fn undef_command_is_empty_body() {
        assert!(encode_command(CommandKind::Undef).is_empty());
        assert_eq!(decode_command(&[]).unwrap(), CommandKind::Undef);
    }

    #[test]
    fn radio_channel_wire_values() {
        assert_eq!(RadioChannel::from_wire(3), RadioChannel::Cch);
        assert_eq!(RadioChannel::from_wire(4), RadioChannel::Sch4);
        assert_eq!(RadioChannel::from_wire(7), RadioChannel::UndefChannel);
        assert_eq!(RadioChannel::from_wire(8), RadioChannel::UndefChannel);
        assert_eq!(RadioChannel::from_wire(-3), RadioChannel::UndefChannel);
        assert_eq!(i32::from(RadioChannel::UndefChannel.to_wire()), 7);
        assert_eq!(i32::from(RadioChannel::Sch6.to_wire()), 6);
    }

    #[test]
    fn unknown_update_type_is_an_error() {
        let body = wire::UpdateNode {
            update_type: 9,
            time: 1,
            properties: Vec::new(),
        }
        .encode_to_vec();
        assert!(matches!(
            decode_update_node(&body),
            Err(SchemaError::UnknownUpdateKind(9))
        ));
    }

    #[test]
    fn update_node_preserves_property_order() {
        let update = NodeUpdate {
            kind: UpdateKind::MoveNode,
            time: 2_000_000_000,
            properties: vec![
                NodeProperty { id: 7, x: 10.5, y: -3.25 },
                NodeProperty { id: 2, x: 0.0, y: 0.0 },
                NodeProperty { id: 5, x: 1e6, y: 2e6 },
            ],
        };
        let decoded = decode_update_node(&encode_update_node(&update)).unwrap();
        assert_eq!(decoded, update);
        let ids: Vec<i32> = decoded.properties.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![7, 2, 5]);
    }

    #[test]
    fn init_bounds_roundtrip() {
        let bounds = InitBounds {
            start_time: 0,
            end_time: 3_600_000_000,
        };
        assert_eq!(decode_init(&encode_init(bounds)).unwrap(), bounds);
    }

    #[test]
    fn time_and_port_bodies() {
        assert_eq!(decode_time(&encode_time(-42)).unwrap(), -42);
        assert_eq!(decode_port(&encode_port(40_123)).unwrap(), 40_123);
    }

    #[test]
    fn dual_radio_dual_channel_decodes_both_channels() {
        let msg = RadioConfMessage {
            time: 1_000,
            message_id: 4,
            node_id: 17,
            radio_count: RadioCount::DualRadio,
            primary: Some(dual_radio(RadioChannel::Cch, RadioChannel::Sch1)),
            secondary: Some(dual_radio(RadioChannel::Sch2, RadioChannel::Sch6)),
        };
        let decoded = decode_radio_config(&encode_radio_config(&msg)).unwrap();
        assert_eq!(decoded, msg);

        let secondary = decoded.secondary.unwrap();
        assert_eq!(secondary.primary_channel, RadioChannel::Sch2);
        assert_eq!(secondary.secondary_channel, Some(RadioChannel::Sch6));
    }

    #[test]
    fn single_channel_radio_has_no_secondary_channel() {
        let body = wire::ConfigureRadioMessage {
            time: 1,
            message_id: 2,
            external_id: 3,
            radio_number: wire::RadioNumber::SingleRadio.into(),
            primary_radio_configuration: Some(wire::RadioConfiguration {
                receiving_messages: true,
                ip_address: 1,
                subnet_address: 2,
                transmission_power: 17.9,
                radio_mode: wire::RadioMode::SingleChannel.into(),
                primary_radio_channel: wire::RadioChannel::ProtoSch3.into(),
                secondary_radio_channel: wire::RadioChannel::ProtoSch5.into(),
            }),
            secondary_radio_configuration: None,
        }
        .encode_to_vec();

        let decoded = decode_radio_config(&body).unwrap();
        assert!(decoded.secondary.is_none());
        let primary = decoded.primary.unwrap();
        assert_eq!(primary.tx_power, 17);
        assert_eq!(primary.primary_channel, RadioChannel::Sch3);
        assert_eq!(primary.secondary_channel, None);
    }

    #[test]
    fn no_radio_ignores_present_blocks() {
        let body = wire::ConfigureRadioMessage {
            radio_number: wire::RadioNumber::NoRadio.into(),
            primary_radio_configuration: Some(wire::RadioConfiguration::default()),
            ..Default::default()
        }
        .encode_to_vec();

        let decoded = decode_radio_config(&body).unwrap();
        assert_eq!(decoded.radio_count, RadioCount::NoRadio);
        assert!(decoded.primary.is_none());
        assert!(decoded.secondary.is_none());
    }

    #[test]
    fn rectangle_address_degrades_to_fixed_ttl() {
        let outbound = OutboundMessage {
            time: 10,
            node_id: 3,
            channel: RadioChannel::Cch,
            message_id: 77,
            length: 200,
            destination: Destination::Rectangle {
                ip_address: 0xC0A8_0001,
                a: GeoPoint { x: 0.0, y: 0.0 },
                b: GeoPoint { x: 50.0, y: 50.0 },
            },
        };
        let decoded = decode_send_message(&encode_send_message(&outbound)).unwrap();
        assert_eq!(
            decoded.address,
            TopoAddress {
                ip_address: 0xC0A8_0001,
                ttl: 10
            }
        );
        assert_eq!(decoded.length, 200);
        assert_eq!(decoded.channel, RadioChannel::Cch);
    }

    #[test]
    fn circle_address_degrades_to_fixed_ttl() {
        let outbound = OutboundMessage {
            time: 10,
            node_id: 3,
            channel: RadioChannel::Sch1,
            message_id: 78,
            length: 20,
            destination: Destination::Circle {
                ip_address: 0x0A00_00FF,
                center: GeoPoint { x: 5.0, y: 5.0 },
                radius: 300.0,
            },
        };
        let decoded = decode_send_message(&encode_send_message(&outbound)).unwrap();
        assert_eq!(decoded.address.ip_address, 0x0A00_00FF);
        assert_eq!(decoded.address.ttl, GEO_ADDRESS_TTL);
    }

    #[test]
    fn topological_address_keeps_ttl() {
        let outbound = OutboundMessage {
            time: 1,
            node_id: 1,
            channel: RadioChannel::Sch4,
            message_id: 1,
            length: 1,
            destination: Destination::Topological {
                ip_address: 0xFFFF_FFFF,
                ttl: 1,
            },
        };
        let decoded = decode_send_message(&encode_send_message(&outbound)).unwrap();
        assert_eq!(
            decoded.address,
            TopoAddress {
                ip_address: 0xFFFF_FFFF,
                ttl: 1
            }
        );
    }

    #[test]
    fn send_length_outside_i32_is_rejected() {
        let body = wire::SendMessageMessage {
            length: i64::from(i32::MAX) + 1,
            ..Default::default()
        }
        .encode_to_vec();
        assert!(matches!(
            decode_send_message(&body),
            Err(SchemaError::OutOfRange { field: "length", .. })
        ));
    }

    #[test]
    fn malformed_body_fails_loudly() {
        // Field 1 announced as length-delimited with 10 bytes, none present.
        let err = decode_init(&[0x0A, 0x0A]).unwrap_err();
        assert!(matches!(err, SchemaError::Decode(_)));
    }

    #[test]
    fn receive_message_roundtrip() {
        let msg = ReceiveMessage {
            time: 99,
            node_id: 4,
            message_id: 12,
            channel: RadioChannel::Sch5,
            rssi: -71.5,
        };
        assert_eq!(decode_receive_message(&encode_receive_message(&msg)).unwrap(), msg);
    }

    #[test]
    fn ipv4_packing_is_big_endian() {
        assert_eq!(ipv4_from_wire(0x0A00_0001), Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(ipv4_to_wire(Ipv4Addr::new(192, 168, 1, 2)), 0xC0A8_0102);
    }
}
