use fedlink_schema::CommandKind;
use tracing::info;

use crate::ambassador::{AmbassadorChannel, ConnectConfig};
use crate::error::{ChannelError, Result};
use crate::federate::{ChannelConfig, ChannelState, ProtocolChannel};

/// Both channels of a coupled federate.
///
/// The ambassador connects to the configured port first; that connection
/// carries federate-initiated events (NEXT_EVENT, MSG_RECV, END). The
/// federate then announces an ephemeral port with INIT + port, and the
/// ambassador's second connection carries its commands.
#[derive(Debug)]
pub struct FederateLink {
    /// Federate to ambassador.
    pub events: ProtocolChannel,
    /// Ambassador to federate.
    pub commands: ProtocolChannel,
}

impl FederateLink {
    /// Prepare on `host:port`, then run [`FederateLink::establish`].
    pub fn bind(host: &str, port: u16, config: ChannelConfig) -> Result<Self> {
        let mut events = ProtocolChannel::with_config(config);
        events.prepare(host, port)?;
        Self::establish(events)
    }

    /// Complete the bootstrap on an already prepared event channel.
    ///
    /// Blocks until the ambassador has connected both channels.
    pub fn establish(mut events: ProtocolChannel) -> Result<Self> {
        let host = match (events.state(), events.local_addr()) {
            (ChannelState::Listening, Some(addr)) => addr.ip().to_string(),
            (state, _) => return Err(ChannelError::NotListening(state)),
        };

        events.accept()?;

        let mut commands = ProtocolChannel::with_config(events.config().clone());
        let command_port = commands.prepare(&host, 0)?;

        events.write_command(CommandKind::Init)?;
        events.write_port(u32::from(command_port))?;
        info!(command_port, "announced command channel");

        commands.accept()?;
        Ok(Self { events, commands })
    }

    /// Port the ambassador sends commands to.
    pub fn command_port(&self) -> Option<u16> {
        self.commands.local_addr().map(|addr| addr.port())
    }

    pub fn close(&mut self) {
        self.commands.close();
        self.events.close();
    }
}

/// Ambassador side of [`FederateLink`].
#[derive(Debug)]
pub struct AmbassadorLink {
    pub events: AmbassadorChannel,
    pub commands: AmbassadorChannel,
    command_port: u16,
}

impl AmbassadorLink {
    /// Connect the event channel, learn the command port, connect to it on the same host.
    pub fn connect(host: &str, port: u16, config: &ConnectConfig) -> Result<Self> {
        let mut events = AmbassadorChannel::connect_with_config(host, port, config)?;

        let announced = events.read_command()?;
        if announced != CommandKind::Init {
            return Err(ChannelError::Bootstrap(format!(
                "expected INIT on event channel, got {announced}"
            )));
        }
        let raw_port = events.read_port()?;
        let command_port = u16::try_from(raw_port)
            .ok()
            .filter(|port| *port != 0)
            .ok_or_else(|| {
                ChannelError::Bootstrap(format!("announced command port {raw_port} is invalid"))
            })?;

        let commands = AmbassadorChannel::connect_with_config(host, command_port, config)?;
        info!(event_port = port, command_port, "federate link established");
        Ok(Self {
            events,
            commands,
            command_port,
        })
    }

    pub fn command_port(&self) -> u16 {
        self.command_port
    }

    pub fn close(&mut self) {
        self.commands.close();
        self.events.close();
    }
}
