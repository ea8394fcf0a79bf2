use std::time::Duration;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Maximum number of bytes a length prefix may occupy.
pub const VARINT_MAX_BYTES: usize = 4;

/// Largest length a 4-byte prefix can announce (2^28 - 1).
pub const MAX_FRAME_LEN: u32 = (1 << (7 * VARINT_MAX_BYTES)) - 1;

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// Append `value` as a base-128 varint.
///
/// Values at or above [`MAX_FRAME_LEN`] + 1 need a fifth byte, which
/// [`decode_varint`] rejects.
pub fn encode_varint(mut value: u32, dst: &mut BytesMut) {
    dst.reserve(varint_len(value));
    while value >= 0x80 {
        dst.put_u8((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    dst.put_u8(value as u8);
}

/// Number of bytes [`encode_varint`] emits for `value`.
pub fn varint_len(value: u32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        0x20_0000..=0x0FFF_FFFF => 4,
        _ => 5,
    }
}

/// Decode a length prefix from the start of `src`.
///
/// Returns `Ok(None)` if `src` ends before the prefix terminates, otherwise
/// the decoded value and the number of bytes it occupied.
pub fn decode_varint(src: &[u8]) -> Result<Option<(u32, usize)>> {
    let mut value = 0u32;
    for (index, byte) in src.iter().take(VARINT_MAX_BYTES).enumerate() {
        value |= u32::from(byte & 0x7F) << (7 * index);
        if byte & 0x80 == 0 {
            return Ok(Some((value, index + 1)));
        }
    }
    if src.len() >= VARINT_MAX_BYTES {
        return Err(FrameError::VarintTooLong);
    }
    Ok(None)
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────────────────┬──────────────────────┐
/// │ Length (varint,    │ Payload               │
/// │ 1..=4 bytes)       │ (Length bytes)        │
/// └────────────────────┴──────────────────────┘
/// ```
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_FRAME_LEN as usize {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_FRAME_LEN as usize,
        });
    }
    let len = payload.len() as u32;
    dst.reserve(varint_len(len) + payload.len());
    encode_varint(len, dst);
    dst.put_slice(payload);
    Ok(())
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_frame(src: &mut BytesMut, max_payload: usize) -> Result<Option<Bytes>> {
    let Some((len, prefix_len)) = decode_varint(src)? else {
        return Ok(None);
    };
    let len = len as usize;

    if len > max_payload {
        return Err(FrameError::PayloadTooLarge {
            size: len,
            max: max_payload,
        });
    }

    if src.len() < prefix_len + len {
        return Ok(None);
    }

    src.advance(prefix_len);
    Ok(Some(src.split_to(len).freeze()))
}

/// How a reader bridges a body that arrived only partially.
///
/// After a short read the reader polls for readiness up to `poll_attempts`
/// times, sleeping `retry_delay` between polls, then retries the read once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryPolicy {
    /// Number of readiness polls. Default: 3.
    pub poll_attempts: u32,
    /// Timeout of each readiness poll. Default: 1 s.
    pub poll_timeout: Duration,
    /// Sleep between polls that found nothing. Default: 1 s.
    pub retry_delay: Duration,
}

impl Default for RecoveryPolicy {
    fn default() -> Self {
        Self {
            poll_attempts: 3,
            poll_timeout: Duration::from_secs(1),
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Configuration for the frame codec.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum payload size in bytes. Default: 16 MiB, capped at [`MAX_FRAME_LEN`].
    pub max_payload_size: usize,
    /// Stall bound of a single body read attempt. Default: 1 s.
    ///
    /// Length prefix reads keep waiting across this timeout; only body reads
    /// treat it as a short read.
    pub read_timeout: Option<Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<Duration>,
    /// Short-read recovery policy.
    pub recovery: RecoveryPolicy,
}

impl FrameConfig {
    /// The effective payload limit, never above what a 4-byte prefix can carry.
    pub fn payload_limit(&self) -> usize {
        self.max_payload_size.min(MAX_FRAME_LEN as usize)
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            read_timeout: Some(Duration::from_secs(1)),
            write_timeout: None,
            recovery: RecoveryPolicy::default(),
        }
    }
}
