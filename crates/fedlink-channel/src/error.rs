use fedlink_schema::CommandKind;

use crate::federate::ChannelState;

/// Errors that can occur in channel operations.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] fedlink_transport::TransportError),

    /// Frame-level error.
    ///
    /// A failed frame read or a partially written frame leaves the stream
    /// desynchronized, and the channel drops the connection before returning
    /// this. Only an outbound [`fedlink_frame::FrameError::PayloadTooLarge`]
    /// keeps it open.
    #[error("frame error: {0}")]
    Frame(#[from] fedlink_frame::FrameError),

    /// A well-framed body did not decode as the expected record.
    #[error("schema error: {0}")]
    Schema(#[from] fedlink_schema::SchemaError),

    /// A message operation was called without an open connection.
    #[error("channel is not connected (state: {0})")]
    NotConnected(ChannelState),

    /// `accept` was called on a channel that is not listening.
    #[error("channel is not listening (state: {0})")]
    NotListening(ChannelState),

    /// `prepare` was called on a channel that already left `Disconnected`.
    #[error("channel already prepared (state: {0})")]
    AlreadyPrepared(ChannelState),

    /// The peer acknowledged with something other than SUCCESS.
    #[error("expected SUCCESS acknowledgement, got {0}")]
    UnexpectedAck(CommandKind),

    /// The two-channel link bootstrap failed.
    #[error("link bootstrap failed: {0}")]
    Bootstrap(String),
}

pub type Result<T> = std::result::Result<T, ChannelError>;
