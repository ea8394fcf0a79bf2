use std::net::SocketAddr;

use bytes::Bytes;
use fedlink_frame::{FrameConfig, FrameError, FrameReader, FrameWriter};
use fedlink_schema::{decode_command, encode_command, CommandKind};
use fedlink_transport::FederateStream;
use tracing::debug;

use crate::error::Result;

/// One framed TCP connection with separate read and write halves.
///
/// Any failed frame read, and any write that may have put a partial frame on
/// the wire, marks the connection desynchronized. Owners must drop it then.
pub(crate) struct FramedConnection {
    reader: FrameReader<FederateStream>,
    writer: FrameWriter<FederateStream>,
    peer: Option<SocketAddr>,
    desynchronized: bool,
}

impl FramedConnection {
    pub(crate) fn new(stream: FederateStream, config: &FrameConfig) -> Result<Self> {
        let peer = stream.peer_addr().ok();
        let reader_stream = stream.try_clone()?;
        let reader = FrameReader::with_config_stream(reader_stream, config.clone())?;
        let writer = FrameWriter::with_config_stream(stream, config.clone())?;
        Ok(Self {
            reader,
            writer,
            peer,
            desynchronized: false,
        })
    }

    pub(crate) fn read_body(&mut self) -> Result<Bytes> {
        self.reader.read_frame().map_err(|err| {
            self.desynchronized = true;
            err.into()
        })
    }

    pub(crate) fn write_body(&mut self, body: &[u8]) -> Result<()> {
        self.writer.write_frame(body).map_err(|err| {
            // Rejected before anything was written.
            if !matches!(err, FrameError::PayloadTooLarge { .. }) {
                self.desynchronized = true;
            }
            err.into()
        })
    }

    pub(crate) fn is_desynchronized(&self) -> bool {
        self.desynchronized
    }

    pub(crate) fn read_command(&mut self) -> Result<CommandKind> {
        let body = self.read_body()?;
        let kind = decode_command(&body)?;
        debug!(%kind, "read command");
        Ok(kind)
    }

    pub(crate) fn write_command(&mut self, kind: CommandKind) -> Result<()> {
        debug!(%kind, "write command");
        self.write_body(&encode_command(kind))
    }

    pub(crate) fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }

    /// A second handle onto the socket, for shutting it down from elsewhere.
    pub(crate) fn stream_handle(&self) -> Result<FederateStream> {
        Ok(self.writer.get_ref().try_clone()?)
    }

    pub(crate) fn shutdown(&self) -> Result<()> {
        Ok(self.writer.get_ref().shutdown()?)
    }
}
