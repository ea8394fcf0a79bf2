use fedlink_schema::{CommandKind, InitBounds, NodeUpdate, RadioConfMessage, SendMessage};
use serde::Serialize;

/// One command together with its decoded body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", content = "body", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    Init(InitBounds),
    UpdateNode(NodeUpdate),
    /// Advance simulation time to the carried timestamp.
    AdvanceTime(i64),
    /// Already acknowledged with SUCCESS.
    SendMessage(SendMessage),
    /// Already acknowledged with SUCCESS.
    ConfigureRadio(RadioConfMessage),
    ShutDown,
    /// A command that carries no body, or `Undef` if the read failed.
    Other(CommandKind),
}

impl Request {
    /// The command this request was read from.
    pub fn command(&self) -> CommandKind {
        match self {
            Request::Init(_) => CommandKind::Init,
            Request::UpdateNode(_) => CommandKind::UpdateNode,
            Request::AdvanceTime(_) => CommandKind::AdvanceTime,
            Request::SendMessage(_) => CommandKind::MsgSend,
            Request::ConfigureRadio(_) => CommandKind::ConfRadio,
            Request::ShutDown => CommandKind::ShutDown,
            Request::Other(kind) => *kind,
        }
    }
}
