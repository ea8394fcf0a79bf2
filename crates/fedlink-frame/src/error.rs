/// Errors that can occur during frame encoding/decoding.
///
/// Every variant except [`FrameError::PayloadTooLarge`] raised by a writer
/// leaves the stream desynchronized; the connection should be dropped.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The length prefix did not terminate within 4 bytes.
    #[error("length prefix longer than 4 bytes")]
    VarintTooLong,

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The body could not be read completely, even after polling for the rest.
    #[error("short read: expected {expected} bytes, received {received}")]
    ShortRead { expected: usize, received: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete length prefix was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
