use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};
use fedlink_transport::{FederateStream, PollRead};
use tracing::{debug, error, warn};

use crate::codec::{FrameConfig, VARINT_MAX_BYTES};
use crate::error::{FrameError, Result};

/// Outcome of one attempt to fill a body buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fill {
    Complete,
    Stalled,
    Eof,
}

/// Reads length-prefixed frames from a [`PollRead`] stream.
///
/// Short body reads are retried under the configured
/// [`crate::RecoveryPolicy`]; callers always get a complete frame or an error.
pub struct FrameReader<T> {
    inner: T,
    config: FrameConfig,
}

impl<T: PollRead> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Read the next complete frame payload (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached before
    /// the length prefix.
    pub fn read_frame(&mut self) -> Result<Bytes> {
        let len = self.read_length_prefix()?;
        debug!(len, "read frame length prefix");
        self.read_exact(len as usize)
    }

    /// Decode the varint length prefix one byte at a time.
    ///
    /// Blocks until a byte arrives; read timeouts on the stream do not end
    /// the wait. A fifth continuation byte is [`FrameError::VarintTooLong`].
    pub fn read_length_prefix(&mut self) -> Result<u32> {
        let mut value = 0u32;
        for index in 0..VARINT_MAX_BYTES {
            let byte = self.read_prefix_byte()?;
            value |= u32::from(byte & 0x7F) << (7 * index);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(FrameError::VarintTooLong)
    }

    /// Read exactly `len` bytes of frame body into a fresh heap buffer.
    ///
    /// If the first attempt stalls with fewer bytes, the reader polls for the
    /// remainder under the recovery policy and retries once. A body that is
    /// still incomplete, or cut off by EOF, is [`FrameError::ShortRead`].
    pub fn read_exact(&mut self, len: usize) -> Result<Bytes> {
        let max = self.config.payload_limit();
        if len > max {
            return Err(FrameError::PayloadTooLarge { size: len, max });
        }

        let mut buf = BytesMut::zeroed(len);
        let mut filled = 0usize;

        match self.fill(&mut buf, &mut filled)? {
            Fill::Complete => return Ok(buf.freeze()),
            Fill::Eof => {
                error!(expected = len, received = filled, "peer closed mid-body");
                return Err(FrameError::ShortRead {
                    expected: len,
                    received: filled,
                });
            }
            Fill::Stalled => {}
        }

        warn!(expected = len, received = filled, "short read, polling for the remainder");
        self.await_readable()?;

        match self.fill(&mut buf, &mut filled)? {
            Fill::Complete => {
                debug!(len, "short read recovered");
                Ok(buf.freeze())
            }
            outcome => {
                error!(expected = len, received = filled, ?outcome, "body read failed after recovery");
                Err(FrameError::ShortRead {
                    expected: len,
                    received: filled,
                })
            }
        }
    }

    fn read_prefix_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(_) => return Ok(byte[0]),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if is_stall(&err) => {
                    self.inner
                        .poll_readable(self.config.recovery.poll_timeout)
                        .map_err(FrameError::Io)?;
                }
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    fn fill(&mut self, buf: &mut [u8], filled: &mut usize) -> Result<Fill> {
        while *filled < buf.len() {
            match self.inner.read(&mut buf[*filled..]) {
                Ok(0) => return Ok(Fill::Eof),
                Ok(n) => *filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if is_stall(&err) => return Ok(Fill::Stalled),
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        Ok(Fill::Complete)
    }

    fn await_readable(&mut self) -> Result<bool> {
        let policy = self.config.recovery.clone();
        for attempt in 1..=policy.poll_attempts {
            let ready = self
                .inner
                .poll_readable(policy.poll_timeout)
                .map_err(FrameError::Io)?;
            debug!(attempt, ready, "poll after short read");
            if ready {
                return Ok(true);
            }
            if attempt < policy.poll_attempts {
                std::thread::sleep(policy.retry_delay);
            }
        }
        Ok(false)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum payload size for subsequent frame decoding.
    pub fn set_max_payload_size(&mut self, max_payload_size: usize) {
        self.config.max_payload_size = max_payload_size;
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl FrameReader<FederateStream> {
    /// Create a frame reader for `FederateStream` and apply read timeout from config.
    pub fn with_config_stream(inner: FederateStream, config: FrameConfig) -> Result<Self> {
        inner
            .set_read_timeout(config.read_timeout)
            .map_err(transport_to_frame_error)?;
        Ok(Self::with_config(inner, config))
    }
}

fn is_stall(err: &std::io::Error) -> bool {
    matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}

pub(crate) fn transport_to_frame_error(err: fedlink_transport::TransportError) -> FrameError {
    match err {
        fedlink_transport::TransportError::Io(io)
        | fedlink_transport::TransportError::Accept(io) => FrameError::Io(io),
        fedlink_transport::TransportError::Bind { source, .. }
        | fedlink_transport::TransportError::Connect { source, .. }
        | fedlink_transport::TransportError::Resolve { source, .. }
        | fedlink_transport::TransportError::SocketOption { source, .. } => FrameError::Io(source),
    }
}
