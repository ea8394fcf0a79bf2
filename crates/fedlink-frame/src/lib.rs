//! Varint length-prefixed framing with short-read recovery.
//!
//! Every record on the wire is preceded by its byte length:
//! - A base-128 varint, low 7 bits per byte, continuation in the high bit
//! - At most 4 prefix bytes, so a frame carries at most 2^28 - 1 bytes
//!
//! Records are not self-delimiting, so readers always consume exactly the
//! announced number of bytes. The codec has no knowledge of what the bytes
//! mean.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_frame, decode_varint, encode_frame, encode_varint, varint_len, FrameConfig,
    RecoveryPolicy, DEFAULT_MAX_PAYLOAD, MAX_FRAME_LEN, VARINT_MAX_BYTES,
};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
