use std::net::{Ipv4Addr, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};

use socket2::{Domain, Protocol, Socket, Type};
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::FederateStream;

/// Listening TCP socket the orchestrator connects to.
///
/// Binds with `SO_REUSEADDR` so a federate restarted on the same port does not
/// fail on sockets lingering in `TIME_WAIT`.
pub struct TcpChannelListener {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl TcpChannelListener {
    /// Listen backlog used by [`TcpChannelListener::bind`].
    pub const DEFAULT_BACKLOG: i32 = 3;

    /// Bind and listen on `host:port`. Port 0 requests an ephemeral port.
    pub fn bind(host: &str, port: u16) -> Result<Self> {
        Self::bind_with_backlog(host, port, Self::DEFAULT_BACKLOG)
    }

    /// Bind and listen with an explicit backlog.
    pub fn bind_with_backlog(host: &str, port: u16, backlog: i32) -> Result<Self> {
        let addr = resolve_ipv4(host, port)?;
        let bind_err = |source| TransportError::Bind { addr, source };

        let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP)).map_err(bind_err)?;
        socket
            .set_reuse_address(true)
            .map_err(|source| TransportError::SocketOption {
                option: "SO_REUSEADDR",
                source,
            })?;
        socket.bind(&addr.into()).map_err(bind_err)?;
        socket.listen(backlog).map_err(bind_err)?;

        let listener: TcpListener = socket.into();
        let local_addr = listener.local_addr().map_err(bind_err)?;

        info!(%local_addr, "listening for ambassador connection");

        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Accept an incoming connection (blocking) and enable `TCP_NODELAY` on it.
    pub fn accept(&self) -> Result<FederateStream> {
        let (stream, peer) = self.listener.accept().map_err(TransportError::Accept)?;
        stream
            .set_nodelay(true)
            .map_err(|source| TransportError::SocketOption {
                option: "TCP_NODELAY",
                source,
            })?;
        debug!(%peer, "accepted connection");
        Ok(FederateStream::from_tcp(stream))
    }

    /// The address this listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The port this listener is bound to (the assigned one if 0 was requested).
    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }
}

impl std::fmt::Debug for TcpChannelListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpChannelListener")
            .field("local_addr", &self.local_addr)
            .finish()
    }
}

/// Connect to a listening channel (blocking) with `TCP_NODELAY` enabled.
pub fn connect(host: &str, port: u16) -> Result<FederateStream> {
    let addr = resolve_ipv4(host, port)?;
    let stream = TcpStream::connect(addr).map_err(|source| TransportError::Connect {
        addr: format!("{host}:{port}"),
        source,
    })?;
    stream
        .set_nodelay(true)
        .map_err(|source| TransportError::SocketOption {
            option: "TCP_NODELAY",
            source,
        })?;
    debug!(%addr, "connected to channel");
    Ok(FederateStream::from_tcp(stream))
}

/// Resolve `host` to an IPv4 socket address.
///
/// Literal dotted-quad addresses are used as-is; anything else goes through
/// the system resolver and the first IPv4 result wins.
pub fn resolve_ipv4(host: &str, port: u16) -> Result<SocketAddr> {
    if let Ok(ip) = host.parse::<Ipv4Addr>() {
        return Ok(SocketAddr::from((ip, port)));
    }

    let resolve_err = |source| TransportError::Resolve {
        host: host.to_string(),
        source,
    };
    let mut addrs = (host, port).to_socket_addrs().map_err(resolve_err)?;
    addrs.find(SocketAddr::is_ipv4).ok_or_else(|| {
        resolve_err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no IPv4 address for host",
        ))
    })
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::time::Duration;

    use super::*;
    use crate::traits::PollRead;

    #[test]
    fn bind_ephemeral_reports_assigned_port() {
        let listener = TcpChannelListener::bind("127.0.0.1", 0).unwrap();
        assert_ne!(listener.port(), 0);
        assert_eq!(listener.local_addr().ip(), Ipv4Addr::LOCALHOST);
    }

    #[test]
    fn listener_has_reuse_address() {
        let listener = TcpChannelListener::bind("127.0.0.1", 0).unwrap();
        let sock = socket2::SockRef::from(&listener.listener);
        assert!(sock.reuse_address().unwrap());
    }

    #[test]
    fn accept_and_connect_exchange_bytes() {
        let listener = TcpChannelListener::bind("127.0.0.1", 0).unwrap();
        let port = listener.port();

        let handle = std::thread::spawn(move || {
            let mut client = connect("127.0.0.1", port).unwrap();
            assert!(client.nodelay().unwrap());
            client.write_all(b"hello").unwrap();
        });

        let mut server = listener.accept().unwrap();
        assert!(server.nodelay().unwrap());
        let mut buf = [0u8; 5];
        server.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"hello");

        handle.join().unwrap();
    }

    #[test]
    fn poll_readable_times_out_then_sees_data() {
        let listener = TcpChannelListener::bind("127.0.0.1", 0).unwrap();
        let port = listener.port();
        let mut client = connect("127.0.0.1", port).unwrap();
        let mut server = listener.accept().unwrap();

        assert!(!server.poll_readable(Duration::from_millis(20)).unwrap());
        client.write_all(&[1]).unwrap();
        assert!(server.poll_readable(Duration::from_secs(2)).unwrap());
    }

    #[test]
    fn shutdown_wakes_blocked_clone_reader() {
        let listener = TcpChannelListener::bind("127.0.0.1", 0).unwrap();
        let port = listener.port();
        let _client = connect("127.0.0.1", port).unwrap();
        let server = listener.accept().unwrap();
        let mut reader = server.try_clone().unwrap();

        let handle = std::thread::spawn(move || {
            let mut buf = [0u8; 1];
            reader.read(&mut buf)
        });

        std::thread::sleep(Duration::from_millis(50));
        server.shutdown().unwrap();
        let read = handle.join().unwrap();
        assert!(matches!(read, Ok(0) | Err(_)));
    }

    #[test]
    fn resolve_literal_and_hostname() {
        let literal = resolve_ipv4("10.1.2.3", 7000).unwrap();
        assert_eq!(literal, SocketAddr::from(([10, 1, 2, 3], 7000)));

        let local = resolve_ipv4("localhost", 7001).unwrap();
        assert!(local.is_ipv4());
        assert_eq!(local.port(), 7001);
    }

    #[test]
    fn resolve_invalid_host_fails() {
        let err = resolve_ipv4("no-such-host.invalid", 1).unwrap_err();
        assert!(matches!(err, TransportError::Resolve { .. }));
    }

    #[test]
    fn connect_refused_reports_address() {
        let port = {
            let listener = TcpChannelListener::bind("127.0.0.1", 0).unwrap();
            listener.port()
        };
        let err = connect("127.0.0.1", port).unwrap_err();
        match err {
            TransportError::Connect { addr, .. } => assert_eq!(addr, format!("127.0.0.1:{port}")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
