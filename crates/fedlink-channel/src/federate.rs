use std::fmt;
use std::net::SocketAddr;

use fedlink_frame::FrameConfig;
use fedlink_schema::{
    decode_init, decode_radio_config, decode_send_message, decode_time, decode_update_node,
    encode_port, encode_receive_message, encode_time, CommandKind, InitBounds, NodeUpdate,
    RadioChannel, RadioConfMessage, ReceiveMessage, SendMessage,
};
use fedlink_transport::{FederateStream, TcpChannelListener};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::conn::FramedConnection;
use crate::dispatch::Request;
use crate::error::{ChannelError, Result};

/// Lifecycle state of a [`ProtocolChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelState {
    Disconnected,
    Listening,
    Connected,
    /// Terminal.
    Closed,
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelState::Disconnected => "disconnected",
            ChannelState::Listening => "listening",
            ChannelState::Connected => "connected",
            ChannelState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Configuration for a federate-side channel.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Framing limits and short-read recovery.
    pub frame: FrameConfig,
    /// Listen backlog of the listening socket. Default: 3.
    pub listen_backlog: i32,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            frame: FrameConfig::default(),
            listen_backlog: TcpChannelListener::DEFAULT_BACKLOG,
        }
    }
}

/// Federate end of the ambassador protocol.
///
/// `Disconnected -> Listening -> Connected -> Closed`. Message operations
/// are only valid while connected. A framing error on the connection moves
/// the channel to `Closed`. The channel is driven by one caller;
/// to unblock a read from another thread use [`ProtocolChannel::shutdown_handle`].
pub struct ProtocolChannel {
    state: ChannelState,
    config: ChannelConfig,
    listener: Option<TcpChannelListener>,
    conn: Option<FramedConnection>,
}

impl ProtocolChannel {
    pub fn new() -> Self {
        Self::with_config(ChannelConfig::default())
    }

    pub fn with_config(config: ChannelConfig) -> Self {
        Self {
            state: ChannelState::Disconnected,
            config,
            listener: None,
            conn: None,
        }
    }

    /// Bind and listen on `host:port`, returning the bound port.
    ///
    /// Port 0 requests an ephemeral port; the assigned one is returned.
    pub fn prepare(&mut self, host: &str, port: u16) -> Result<u16> {
        if self.state != ChannelState::Disconnected {
            return Err(ChannelError::AlreadyPrepared(self.state));
        }
        let listener =
            TcpChannelListener::bind_with_backlog(host, port, self.config.listen_backlog)?;
        let bound = listener.port();
        self.listener = Some(listener);
        self.state = ChannelState::Listening;
        Ok(bound)
    }

    /// Block until the ambassador connects.
    pub fn accept(&mut self) -> Result<()> {
        let listener = match (&self.listener, self.state) {
            (Some(listener), ChannelState::Listening) => listener,
            _ => return Err(ChannelError::NotListening(self.state)),
        };
        let stream = listener.accept()?;
        let conn = FramedConnection::new(stream, &self.config.frame)?;
        info!(peer = ?conn.peer(), "ambassador connected");
        self.conn = Some(conn);
        self.state = ChannelState::Connected;
        Ok(())
    }

    /// Release the listening and the accepted socket. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.state == ChannelState::Closed {
            return;
        }
        if let Some(conn) = self.conn.take() {
            if let Err(err) = conn.shutdown() {
                debug!(error = %err, "socket shutdown failed during close");
            }
        }
        self.listener = None;
        self.state = ChannelState::Closed;
        info!("channel closed");
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// Address of the listening socket, while one is held.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().map(TcpChannelListener::local_addr)
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.conn.as_ref().and_then(FramedConnection::peer)
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// A handle that can shut the connection down from another thread.
    ///
    /// A read blocked on this channel then fails instead of waiting forever.
    pub fn shutdown_handle(&self) -> Result<ShutdownHandle> {
        let stream = self.connection_ref()?.stream_handle()?;
        Ok(ShutdownHandle { stream })
    }

    /// Read the next command. Any failure yields [`CommandKind::Undef`].
    ///
    /// Callers should treat repeated `Undef` as a broken protocol.
    pub fn read_command(&mut self) -> CommandKind {
        match self.with_connection(FramedConnection::read_command) {
            Ok(kind) => kind,
            Err(err) => {
                error!(error = %err, "failed to read command");
                CommandKind::Undef
            }
        }
    }

    pub fn read_init(&mut self) -> Result<InitBounds> {
        let body = self.with_connection(FramedConnection::read_body)?;
        let bounds = decode_init(&body)?;
        debug!(start = bounds.start_time, end = bounds.end_time, "read init");
        Ok(bounds)
    }

    pub fn read_update_node(&mut self) -> Result<NodeUpdate> {
        let body = self.with_connection(FramedConnection::read_body)?;
        let update = decode_update_node(&body)?;
        debug!(
            kind = ?update.kind,
            time = update.time,
            nodes = update.properties.len(),
            "read node update"
        );
        Ok(update)
    }

    pub fn read_time(&mut self) -> Result<i64> {
        let body = self.with_connection(FramedConnection::read_body)?;
        Ok(decode_time(&body)?)
    }

    /// Read a send request and acknowledge it with SUCCESS.
    pub fn read_send_message(&mut self) -> Result<SendMessage> {
        let body = self.with_connection(FramedConnection::read_body)?;
        let msg = decode_send_message(&body)?;
        debug!(
            node_id = msg.node_id,
            message_id = msg.message_id,
            channel = ?msg.channel,
            ttl = msg.address.ttl,
            "read send message"
        );
        self.write_command(CommandKind::Success)?;
        Ok(msg)
    }

    /// Read a radio configuration and acknowledge it with SUCCESS.
    pub fn read_radio_config(&mut self) -> Result<RadioConfMessage> {
        let body = self.with_connection(FramedConnection::read_body)?;
        let msg = decode_radio_config(&body)?;
        debug!(node_id = msg.node_id, radios = ?msg.radio_count, "read radio config");
        self.write_command(CommandKind::Success)?;
        Ok(msg)
    }

    pub fn write_command(&mut self, kind: CommandKind) -> Result<()> {
        self.with_connection(|conn| conn.write_command(kind))
    }

    pub fn write_time(&mut self, time: i64) -> Result<()> {
        self.with_connection(|conn| conn.write_body(&encode_time(time)))
    }

    pub fn write_port(&mut self, port: u32) -> Result<()> {
        self.with_connection(|conn| conn.write_body(&encode_port(port)))
    }

    /// Report that `node_id` received `message_id` on `channel`.
    pub fn write_receive_message(
        &mut self,
        time: i64,
        node_id: i32,
        message_id: i32,
        channel: RadioChannel,
        rssi: f64,
    ) -> Result<()> {
        let body = encode_receive_message(&ReceiveMessage {
            time,
            node_id,
            message_id,
            channel,
            rssi,
        });
        self.with_connection(|conn| conn.write_body(&body))
    }

    /// Read one command and the body that belongs to it.
    ///
    /// Acknowledgements written by the underlying body reads still happen.
    /// Commands without a body, including `Undef`, come back as [`Request::Other`].
    pub fn read_request(&mut self) -> Result<Request> {
        let request = match self.read_command() {
            CommandKind::Init => Request::Init(self.read_init()?),
            CommandKind::UpdateNode => Request::UpdateNode(self.read_update_node()?),
            CommandKind::AdvanceTime => Request::AdvanceTime(self.read_time()?),
            CommandKind::MsgSend => Request::SendMessage(self.read_send_message()?),
            CommandKind::ConfRadio => Request::ConfigureRadio(self.read_radio_config()?),
            CommandKind::ShutDown => Request::ShutDown,
            other => Request::Other(other),
        };
        Ok(request)
    }

    /// Run `op` on the connection, closing the channel if it desynchronized the stream.
    fn with_connection<T>(
        &mut self,
        op: impl FnOnce(&mut FramedConnection) -> Result<T>,
    ) -> Result<T> {
        let state = self.state;
        let conn = self.conn.as_mut().ok_or(ChannelError::NotConnected(state))?;
        let result = op(&mut *conn);
        if conn.is_desynchronized() {
            error!("framing error left the stream out of sync, closing channel");
            self.close();
        }
        result
    }

    fn connection_ref(&self) -> Result<&FramedConnection> {
        self.conn
            .as_ref()
            .ok_or(ChannelError::NotConnected(self.state))
    }
}

impl Default for ProtocolChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProtocolChannel {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for ProtocolChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtocolChannel")
            .field("state", &self.state)
            .field("local_addr", &self.local_addr())
            .field("peer_addr", &self.peer_addr())
            .finish()
    }
}

/// Shuts down a channel's connection from another thread.
#[derive(Debug)]
pub struct ShutdownHandle {
    stream: FederateStream,
}

impl ShutdownHandle {
    pub fn shutdown(&self) -> Result<()> {
        Ok(self.stream.shutdown()?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::thread;
    use std::time::Duration;

    use fedlink_frame::{FrameError, FrameWriter, RecoveryPolicy};
    use fedlink_schema::{
        encode_command, ChannelMode, Destination, GeoPoint, OutboundMessage,
        RadioConfig, RadioCount, TopoAddress,
    };
    use prost::Message;

    use super::*;
    use crate::ambassador::AmbassadorChannel;

    fn connected_pair() -> (ProtocolChannel, AmbassadorChannel) {
        let mut channel = ProtocolChannel::new();
        let port = channel.prepare("127.0.0.1", 0).expect("prepare should bind");
        let ambassador =
            AmbassadorChannel::connect("127.0.0.1", port).expect("ambassador should connect");
        channel.accept().expect("accept should succeed");
        (channel, ambassador)
    }

    fn raw_client(port: u16) -> FrameWriter<FederateStream> {
        let stream = fedlink_transport::connect("127.0.0.1", port).expect("raw connect");
        FrameWriter::new(stream)
    }

    fn dual_radio(primary: RadioChannel, secondary: RadioChannel) -> RadioConfig {
        RadioConfig {
            enabled: true,
            ip_address: 0x0A00_0002,
            subnet: 0xFFFF_FF00,
            tx_power: 20,
            mode: ChannelMode::DualChannel,
            primary_channel: primary,
            secondary_channel: Some(secondary),
        }
    }

    #[test]
    fn prepare_returns_ephemeral_port() {
        let mut channel = ProtocolChannel::new();
        assert_eq!(channel.state(), ChannelState::Disconnected);

        let port = channel.prepare("127.0.0.1", 0).expect("prepare should bind");
        assert_ne!(port, 0);
        assert_eq!(channel.state(), ChannelState::Listening);
        assert_eq!(channel.local_addr().map(|addr| addr.port()), Some(port));
    }

    #[test]
    fn prepare_twice_is_rejected() {
        let mut channel = ProtocolChannel::new();
        channel.prepare("127.0.0.1", 0).expect("prepare should bind");
        assert!(matches!(
            channel.prepare("127.0.0.1", 0),
            Err(ChannelError::AlreadyPrepared(ChannelState::Listening))
        ));
    }

    #[test]
    fn accept_requires_listening() {
        let mut channel = ProtocolChannel::new();
        assert!(matches!(
            channel.accept(),
            Err(ChannelError::NotListening(ChannelState::Disconnected))
        ));
    }

    #[test]
    fn message_operations_require_connection() {
        let mut channel = ProtocolChannel::new();
        channel.prepare("127.0.0.1", 0).expect("prepare should bind");

        assert_eq!(channel.read_command(), CommandKind::Undef);
        assert!(matches!(
            channel.read_init(),
            Err(ChannelError::NotConnected(ChannelState::Listening))
        ));
        assert!(matches!(
            channel.write_time(5),
            Err(ChannelError::NotConnected(ChannelState::Listening))
        ));
    }

    #[test]
    fn init_command_then_bounds() {
        let (mut channel, mut ambassador) = connected_pair();
        assert_eq!(channel.state(), ChannelState::Connected);

        let client = thread::spawn(move || {
            let ack = ambassador.write_init(0, 3_600_000_000).expect("write init");
            assert_eq!(ack, CommandKind::Success);
        });

        assert_eq!(channel.read_command(), CommandKind::Init);
        assert_eq!(
            channel.read_init().expect("init body"),
            InitBounds {
                start_time: 0,
                end_time: 3_600_000_000
            }
        );
        channel.write_command(CommandKind::Success).expect("ack");
        client.join().expect("client thread should finish");
    }

    #[test]
    fn dual_radio_config_is_acknowledged() {
        let (mut channel, mut ambassador) = connected_pair();
        let conf = RadioConfMessage {
            time: 500,
            message_id: 3,
            node_id: 11,
            radio_count: RadioCount::DualRadio,
            primary: Some(dual_radio(RadioChannel::Cch, RadioChannel::Sch1)),
            secondary: Some(dual_radio(RadioChannel::Sch3, RadioChannel::Sch5)),
        };

        let sent = conf;
        let client = thread::spawn(move || ambassador.write_radio_config(&sent));

        assert_eq!(channel.read_command(), CommandKind::ConfRadio);
        let decoded = channel.read_radio_config().expect("radio config body");
        assert_eq!(decoded, conf);

        let primary = decoded.primary.expect("primary radio");
        let secondary = decoded.secondary.expect("secondary radio");
        assert_eq!(primary.secondary_channel, Some(RadioChannel::Sch1));
        assert_eq!(secondary.primary_channel, RadioChannel::Sch3);
        assert_eq!(secondary.secondary_channel, Some(RadioChannel::Sch5));

        let ack = client.join().expect("client thread").expect("ack read");
        assert_eq!(ack, CommandKind::Success);
    }

    #[test]
    fn rectangle_send_message_is_flattened_and_acknowledged() {
        let (mut channel, mut ambassador) = connected_pair();
        let outbound = OutboundMessage {
            time: 42,
            node_id: 8,
            channel: RadioChannel::Sch2,
            message_id: 1001,
            length: 512,
            destination: Destination::Rectangle {
                ip_address: 0x0A00_00FE,
                a: GeoPoint { x: -10.0, y: -10.0 },
                b: GeoPoint { x: 10.0, y: 10.0 },
            },
        };

        let client = thread::spawn(move || ambassador.write_send_message(&outbound));

        assert_eq!(channel.read_command(), CommandKind::MsgSend);
        let msg = channel.read_send_message().expect("send body");
        assert_eq!(
            msg.address,
            TopoAddress {
                ip_address: 0x0A00_00FE,
                ttl: 10
            }
        );
        assert_eq!(msg.length, 512);
        assert_eq!(msg.channel, RadioChannel::Sch2);

        let ack = client.join().expect("client thread").expect("ack read");
        assert_eq!(ack, CommandKind::Success);
    }

    #[test]
    fn unknown_command_value_reads_as_undef() {
        let mut channel = ProtocolChannel::new();
        let port = channel.prepare("127.0.0.1", 0).expect("prepare should bind");
        let mut raw = raw_client(port);
        channel.accept().expect("accept");

        let unknown = fedlink_schema::wire::CommandMessage { command_type: 99 }.encode_to_vec();
        raw.write_frame(&unknown).expect("raw write");
        raw.write_frame(&encode_command(CommandKind::ShutDown))
            .expect("raw write");

        assert_eq!(channel.read_command(), CommandKind::Undef);
        assert_eq!(channel.read_command(), CommandKind::ShutDown);
    }

    #[test]
    fn malformed_body_is_an_error() {
        let mut channel = ProtocolChannel::new();
        let port = channel.prepare("127.0.0.1", 0).expect("prepare should bind");
        let mut raw = raw_client(port);
        channel.accept().expect("accept");

        raw.write_frame(&encode_command(CommandKind::Init))
            .expect("raw write");
        raw.write_frame(&[0x0A, 0x0A]).expect("raw write");

        assert_eq!(channel.read_command(), CommandKind::Init);
        assert!(matches!(channel.read_init(), Err(ChannelError::Schema(_))));
    }

    #[test]
    fn peer_disconnect_surfaces_as_undef_then_error() {
        let mut channel = ProtocolChannel::new();
        let port = channel.prepare("127.0.0.1", 0).expect("prepare should bind");
        let mut raw = raw_client(port);
        channel.accept().expect("accept");

        raw.write_frame(&encode_command(CommandKind::Init))
            .expect("raw write");
        drop(raw);

        assert_eq!(channel.read_command(), CommandKind::Init);
        assert!(matches!(channel.read_init(), Err(ChannelError::Frame(_))));
        assert_eq!(channel.state(), ChannelState::Closed);
        assert_eq!(channel.read_command(), CommandKind::Undef);
    }

    fn fast_recovery_config() -> ChannelConfig {
        ChannelConfig {
            frame: FrameConfig {
                read_timeout: Some(Duration::from_millis(50)),
                recovery: RecoveryPolicy {
                    poll_attempts: 3,
                    poll_timeout: Duration::from_millis(20),
                    retry_delay: Duration::from_millis(20),
                },
                ..FrameConfig::default()
            },
            ..ChannelConfig::default()
        }
    }

    #[test]
    fn short_body_closes_channel_before_late_bytes_are_misread() {
        let mut channel = ProtocolChannel::with_config(fast_recovery_config());
        let port = channel.prepare("127.0.0.1", 0).expect("prepare should bind");
        let mut raw = raw_client(port);
        channel.accept().expect("accept");

        raw.write_frame(&encode_command(CommandKind::Init))
            .expect("raw write");
        // Announce 5 body bytes, deliver 2, then go quiet.
        raw.get_mut().write_all(&[0x05, 0x08, 0x01]).expect("raw write");

        assert_eq!(channel.read_command(), CommandKind::Init);
        assert!(matches!(
            channel.read_init(),
            Err(ChannelError::Frame(FrameError::ShortRead {
                expected: 5,
                received: 2
            }))
        ));
        assert_eq!(channel.state(), ChannelState::Closed);

        // The rest of the body would parse as a SUCCESS command frame.
        let _ = raw.get_mut().write_all(&[0x02, 0x08, 0x29]);

        assert_eq!(channel.read_command(), CommandKind::Undef);
        assert!(matches!(
            channel.read_init(),
            Err(ChannelError::NotConnected(ChannelState::Closed))
        ));
        assert!(matches!(
            channel.write_command(CommandKind::End),
            Err(ChannelError::NotConnected(ChannelState::Closed))
        ));
    }

    #[test]
    fn oversized_prefix_closes_channel() {
        let mut channel = ProtocolChannel::new();
        let port = channel.prepare("127.0.0.1", 0).expect("prepare should bind");
        let mut raw = raw_client(port);
        channel.accept().expect("accept");

        raw.get_mut()
            .write_all(&[0x80, 0x80, 0x80, 0x80, 0x01])
            .expect("raw write");

        assert_eq!(channel.read_command(), CommandKind::Undef);
        assert_eq!(channel.state(), ChannelState::Closed);
    }

    #[test]
    fn oversized_outbound_body_keeps_channel_open() {
        let config = ChannelConfig {
            frame: FrameConfig {
                max_payload_size: 4,
                ..FrameConfig::default()
            },
            ..ChannelConfig::default()
        };
        let mut channel = ProtocolChannel::with_config(config);
        let port = channel.prepare("127.0.0.1", 0).expect("prepare should bind");
        let mut ambassador =
            AmbassadorChannel::connect("127.0.0.1", port).expect("ambassador should connect");
        channel.accept().expect("accept");

        assert!(matches!(
            channel.write_receive_message(900, 4, 1001, RadioChannel::Cch, -80.25),
            Err(ChannelError::Frame(FrameError::PayloadTooLarge { .. }))
        ));
        assert_eq!(channel.state(), ChannelState::Connected);

        channel.write_command(CommandKind::End).expect("command");
        assert_eq!(ambassador.read_command().expect("command"), CommandKind::End);
    }

    #[test]
    fn read_request_pairs_command_and_body() {
        let (mut channel, mut ambassador) = connected_pair();

        let client = thread::spawn(move || {
            ambassador.write_advance_time(7_000).expect("advance");
            ambassador.write_command(CommandKind::ShutDown).expect("shutdown");
        });

        assert_eq!(
            channel.read_request().expect("advance request"),
            Request::AdvanceTime(7_000)
        );
        assert_eq!(channel.read_request().expect("shutdown"), Request::ShutDown);
        client.join().expect("client thread should finish");
    }

    #[test]
    fn receive_message_reaches_ambassador() {
        let (mut channel, mut ambassador) = connected_pair();

        channel.write_command(CommandKind::MsgRecv).expect("command");
        channel
            .write_receive_message(900, 4, 1001, RadioChannel::Cch, -80.25)
            .expect("receive message");

        assert_eq!(
            ambassador.read_command().expect("command"),
            CommandKind::MsgRecv
        );
        let msg = ambassador.read_receive_message().expect("body");
        assert_eq!(
            msg,
            ReceiveMessage {
                time: 900,
                node_id: 4,
                message_id: 1001,
                channel: RadioChannel::Cch,
                rssi: -80.25
            }
        );
    }

    #[test]
    fn time_and_port_writes() {
        let (mut channel, mut ambassador) = connected_pair();

        channel.write_time(123_456).expect("time");
        channel.write_port(40_001).expect("port");

        assert_eq!(ambassador.read_time().expect("time"), 123_456);
        assert_eq!(ambassador.read_port().expect("port"), 40_001);
    }

    #[test]
    fn close_is_idempotent() {
        let (mut channel, _ambassador) = connected_pair();

        channel.close();
        assert_eq!(channel.state(), ChannelState::Closed);
        assert!(channel.local_addr().is_none());
        channel.close();
        assert_eq!(channel.state(), ChannelState::Closed);

        assert!(matches!(
            channel.write_command(CommandKind::End),
            Err(ChannelError::NotConnected(ChannelState::Closed))
        ));
        assert!(matches!(
            channel.prepare("127.0.0.1", 0),
            Err(ChannelError::AlreadyPrepared(ChannelState::Closed))
        ));
    }

    #[test]
    fn close_while_listening() {
        let mut channel = ProtocolChannel::new();
        channel.prepare("127.0.0.1", 0).expect("prepare should bind");
        channel.close();
        assert_eq!(channel.state(), ChannelState::Closed);
        assert!(matches!(
            channel.accept(),
            Err(ChannelError::NotListening(ChannelState::Closed))
        ));
    }

    #[test]
    fn shutdown_handle_unblocks_reader() {
        let (mut channel, _ambassador) = connected_pair();
        let handle = channel.shutdown_handle().expect("handle");

        let reader = thread::spawn(move || channel.read_command());
        thread::sleep(Duration::from_millis(50));
        handle.shutdown().expect("shutdown");

        assert_eq!(reader.join().expect("reader thread"), CommandKind::Undef);
    }
}
