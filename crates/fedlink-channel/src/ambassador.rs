use std::net::SocketAddr;
use std::thread;
use std::time::Duration;

use fedlink_frame::FrameConfig;
use fedlink_schema::{
    decode_port, decode_receive_message, decode_time, encode_init, encode_radio_config,
    encode_send_message, encode_time, encode_update_node, CommandKind, InitBounds, NodeProperty,
    NodeUpdate, OutboundMessage, RadioConfMessage, ReceiveMessage, UpdateKind,
};
use fedlink_transport::TransportError;
use tracing::{debug, error, info, warn};

use crate::conn::FramedConnection;
use crate::error::{ChannelError, Result};
use crate::federate::ChannelState;

/// How the ambassador reaches a federate that may still be starting up.
#[derive(Debug, Clone)]
pub struct ConnectConfig {
    /// Connection attempts before giving up. Default: 10.
    pub max_tries: u32,
    /// Pause between failed attempts. Default: 1 s.
    pub retry_delay: Duration,
    pub frame: FrameConfig,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            max_tries: 10,
            retry_delay: Duration::from_secs(1),
            frame: FrameConfig::default(),
        }
    }
}

/// Orchestrator end of the federate protocol.
///
/// Writes that the federate acknowledges return the command it answered
/// with; use [`expect_success`] to turn anything but SUCCESS into an error.
pub struct AmbassadorChannel {
    conn: Option<FramedConnection>,
}

impl AmbassadorChannel {
    /// Connect with default retry policy.
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        Self::connect_with_config(host, port, &ConnectConfig::default())
    }

    pub fn connect_with_config(host: &str, port: u16, config: &ConnectConfig) -> Result<Self> {
        let max_tries = config.max_tries.max(1);
        let mut attempt = 1;
        let stream = loop {
            match fedlink_transport::connect(host, port) {
                Ok(stream) => break stream,
                Err(err @ TransportError::Connect { .. }) if attempt < max_tries => {
                    warn!(attempt, max_tries, error = %err, "federate not reachable yet, retrying");
                    thread::sleep(config.retry_delay);
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        };

        let conn = FramedConnection::new(stream, &config.frame)?;
        info!(peer = ?conn.peer(), attempt, "connected to federate");
        Ok(Self { conn: Some(conn) })
    }

    /// Send INIT with the simulation bounds and return the federate's answer.
    pub fn write_init(&mut self, start_time: i64, end_time: i64) -> Result<CommandKind> {
        let body = encode_init(InitBounds {
            start_time,
            end_time,
        });
        self.exchange(CommandKind::Init, &body)
    }

    pub fn write_add_vehicles(&mut self, time: i64, nodes: &[NodeProperty]) -> Result<CommandKind> {
        self.write_update(UpdateKind::AddVehicle, time, nodes.to_vec())
    }

    pub fn write_add_rsus(&mut self, time: i64, nodes: &[NodeProperty]) -> Result<CommandKind> {
        self.write_update(UpdateKind::AddRsu, time, nodes.to_vec())
    }

    pub fn write_update_positions(
        &mut self,
        time: i64,
        nodes: &[NodeProperty],
    ) -> Result<CommandKind> {
        self.write_update(UpdateKind::MoveNode, time, nodes.to_vec())
    }

    /// Remove nodes by id. Positions are sent as zero.
    pub fn write_remove_nodes(&mut self, time: i64, ids: &[i32]) -> Result<CommandKind> {
        let nodes = ids
            .iter()
            .map(|&id| NodeProperty { id, x: 0.0, y: 0.0 })
            .collect();
        self.write_update(UpdateKind::RemoveNode, time, nodes)
    }

    pub fn write_send_message(&mut self, msg: &OutboundMessage) -> Result<CommandKind> {
        self.exchange(CommandKind::MsgSend, &encode_send_message(msg))
    }

    pub fn write_radio_config(&mut self, msg: &RadioConfMessage) -> Result<CommandKind> {
        self.exchange(CommandKind::ConfRadio, &encode_radio_config(msg))
    }

    /// Grant the federate time up to `time`. Its answer arrives on the event channel.
    pub fn write_advance_time(&mut self, time: i64) -> Result<()> {
        let body = encode_time(time);
        self.with_connection(|conn| {
            conn.write_command(CommandKind::AdvanceTime)?;
            conn.write_body(&body)
        })
    }

    /// Write a bare command. `Undef` is never put on the wire.
    pub fn write_command(&mut self, kind: CommandKind) -> Result<()> {
        if kind == CommandKind::Undef {
            debug!("skipping UNDEF command");
            return Ok(());
        }
        self.with_connection(|conn| conn.write_command(kind))
    }

    pub fn read_command(&mut self) -> Result<CommandKind> {
        self.with_connection(FramedConnection::read_command)
    }

    pub fn read_port(&mut self) -> Result<u32> {
        let body = self.with_connection(FramedConnection::read_body)?;
        Ok(decode_port(&body)?)
    }

    pub fn read_time(&mut self) -> Result<i64> {
        let body = self.with_connection(FramedConnection::read_body)?;
        Ok(decode_time(&body)?)
    }

    pub fn read_receive_message(&mut self) -> Result<ReceiveMessage> {
        let body = self.with_connection(FramedConnection::read_body)?;
        Ok(decode_receive_message(&body)?)
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.conn.as_ref().and_then(FramedConnection::peer)
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Shut the connection down. Closing twice is a no-op.
    pub fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(err) = conn.shutdown() {
                debug!(error = %err, "socket shutdown failed during close");
            }
            info!("ambassador channel closed");
        }
    }

    fn write_update(
        &mut self,
        kind: UpdateKind,
        time: i64,
        properties: Vec<NodeProperty>,
    ) -> Result<CommandKind> {
        let body = encode_update_node(&NodeUpdate {
            kind,
            time,
            properties,
        });
        self.exchange(CommandKind::UpdateNode, &body)
    }

    /// Command, body, then the federate's acknowledgement.
    fn exchange(&mut self, kind: CommandKind, body: &[u8]) -> Result<CommandKind> {
        self.with_connection(|conn| {
            conn.write_command(kind)?;
            conn.write_body(body)?;
            conn.read_command()
        })
    }

    /// Run `op` on the connection, dropping it if it desynchronized the stream.
    fn with_connection<T>(
        &mut self,
        op: impl FnOnce(&mut FramedConnection) -> Result<T>,
    ) -> Result<T> {
        let conn = self
            .conn
            .as_mut()
            .ok_or(ChannelError::NotConnected(ChannelState::Closed))?;
        let result = op(&mut *conn);
        if conn.is_desynchronized() {
            error!("framing error left the stream out of sync, closing channel");
            self.close();
        }
        result
    }
}

impl Drop for AmbassadorChannel {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for AmbassadorChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmbassadorChannel")
            .field("peer_addr", &self.peer_addr())
            .finish()
    }
}

/// Accept only a SUCCESS acknowledgement.
pub fn expect_success(ack: CommandKind) -> Result<()> {
    match ack {
        CommandKind::Success => Ok(()),
        other => Err(ChannelError::UnexpectedAck(other)),
    }
}
