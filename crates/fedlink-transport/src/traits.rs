use std::io::{Cursor, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

use crate::error::Result;

/// A readable stream that can wait for incoming data.
///
/// The frame reader uses this to bridge short reads: after a partial body
/// it polls for readiness instead of spinning on `read`.
pub trait PollRead: Read {
    /// Wait up to `timeout` for the stream to become readable.
    ///
    /// Returns `Ok(true)` if data (or EOF) is pending, `Ok(false)` on timeout.
    fn poll_readable(&mut self, timeout: Duration) -> std::io::Result<bool>;
}

impl<T: AsRef<[u8]>> PollRead for Cursor<T> {
    fn poll_readable(&mut self, _timeout: Duration) -> std::io::Result<bool> {
        Ok(self.position() < self.get_ref().as_ref().len() as u64)
    }
}

/// A connected channel stream. Implements Read + Write.
///
/// Wraps the TCP stream between ambassador and federate. Streams handed out
/// by [`crate::TcpChannelListener::accept`] and [`crate::connect`] already
/// have `TCP_NODELAY` set.
pub struct FederateStream {
    inner: TcpStream,
}

impl Read for FederateStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for FederateStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl FederateStream {
    pub(crate) fn from_tcp(stream: TcpStream) -> Self {
        Self { inner: stream }
    }

    /// Set read timeout on the underlying stream.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.inner.set_read_timeout(timeout).map_err(Into::into)
    }

    /// Set write timeout on the underlying stream.
    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.inner.set_write_timeout(timeout).map_err(Into::into)
    }

    /// Try to clone this stream (creates a new file descriptor).
    pub fn try_clone(&self) -> Result<Self> {
        let cloned = self.inner.try_clone()?;
        Ok(Self::from_tcp(cloned))
    }

    /// Whether `TCP_NODELAY` is enabled.
    pub fn nodelay(&self) -> Result<bool> {
        self.inner.nodelay().map_err(Into::into)
    }

    /// Address of the connected peer.
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        self.inner.peer_addr().map_err(Into::into)
    }

    /// Local address of this end of the connection.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.inner.local_addr().map_err(Into::into)
    }

    /// Shut down both halves of the connection.
    ///
    /// Any clone of this stream blocked in `read` is woken with EOF.
    /// Shutting down an already disconnected stream is not an error.
    pub fn shutdown(&self) -> Result<()> {
        match self.inner.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(unix)]
impl PollRead for FederateStream {
    fn poll_readable(&mut self, timeout: Duration) -> std::io::Result<bool> {
        use std::os::fd::AsRawFd;

        let timeout_ms = timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;
        let mut pollfd = libc::pollfd {
            fd: self.inner.as_raw_fd(),
            events: libc::POLLIN | libc::POLLRDNORM | libc::POLLERR,
            revents: 0,
        };

        loop {
            // SAFETY: `pollfd` is a valid, writable pollfd for exactly one entry and
            // `fd` is an open socket descriptor owned by this stream.
            let rc = unsafe { libc::poll(&mut pollfd, 1, timeout_ms) };
            if rc >= 0 {
                return Ok(rc > 0);
            }
            let err = std::io::Error::last_os_error();
            if err.kind() != std::io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }
}

#[cfg(not(unix))]
impl PollRead for FederateStream {
    fn poll_readable(&mut self, timeout: Duration) -> std::io::Result<bool> {
        let previous = self.inner.read_timeout()?;
        self.inner.set_read_timeout(Some(timeout.max(Duration::from_millis(1))))?;
        let mut probe = [0u8; 1];
        let ready = match self.inner.peek(&mut probe) {
            Ok(_) => Ok(true),
            Err(err)
                if matches!(
                    err.kind(),
                    std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                ) =>
            {
                Ok(false)
            }
            Err(err) => Err(err),
        };
        self.inner.set_read_timeout(previous)?;
        ready
    }
}

impl std::fmt::Debug for FederateStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FederateStream")
            .field("peer", &self.inner.peer_addr().ok())
            .finish()
    }
}
