use crate::clients::stats::StatsBuilder;
use crate::clients::Exchanger;
use crate::errors::{Error, Result};
use crate::{Query, Response};
use log::{debug, warn};
use std::io;
use std::net::SocketAddr;
use std::net::ToSocketAddrs;
use std::net::UdpSocket;
use std::time::Duration;

/// The resolver used when none is configured.
pub const DEFAULT_SERVER: &str = "114.114.114.114:53";

/// Size of the receive buffer. Replies over UDP are normally at most 512
/// bytes, but a larger buffer means an oversized reply is parsed in full
/// rather than silently cut short by the socket.
const RECV_BUFFER_SIZE: usize = 4096;

/// A UDP DNS Client.
///
/// Each exchange is a single request and a single response: there are no
/// retries, and a server that does not answer within the read timeout
/// produces [`Error::Timeout`].
///
/// # Example
///
/// ```no_run
/// use stubdns::clients::Exchanger;
/// use stubdns::clients::UdpClient;
/// use stubdns::Query;
///
/// fn main() -> Result<(), stubdns::Error> {
///     let response = UdpClient::new("8.8.8.8:53")?
///         .exchange(&Query::new("example.com"))?;
///
///     println!("{}", response);
///     Ok(())
/// }
/// ```
///
/// See <https://datatracker.ietf.org/doc/html/rfc1035#section-4.2.1>
pub struct Client {
    servers: Vec<SocketAddr>,

    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl Default for Client {
    fn default() -> Self {
        Client {
            servers: vec![SocketAddr::from(([114, 114, 114, 114], 53))],
            read_timeout: Some(Duration::new(5, 0)),
            write_timeout: Some(Duration::new(5, 0)),
        }
    }
}

impl Client {
    /// Creates a new Client bound to the specific servers.
    ///
    /// The servers should be IP addresses and ports, as resolving a hostname
    /// here would need a resolver of its own. Fails if `servers` yields no
    /// addresses.
    pub fn new<A: ToSocketAddrs>(servers: A) -> Result<Self> {
        let servers: Vec<SocketAddr> = servers.to_socket_addrs()?.collect();
        if servers.is_empty() {
            return Err(Error::TransportFailure(io::Error::new(
                io::ErrorKind::InvalidInput,
                "no server addresses given",
            )));
        }

        Ok(Self {
            servers,

            ..Default::default()
        })
    }

    /// Sets how long to wait for the request to be sent, and for the
    /// response to arrive. `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self.write_timeout = timeout;
        self
    }
}

/// A socket read or write that hit its timeout is reported as
/// [`Error::Timeout`], anything else as a transport failure.
fn socket_error(e: io::Error) -> Error {
    match e.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Error::Timeout,
        _ => Error::TransportFailure(e),
    }
}

impl Exchanger for Client {
    /// Sends the query to the server via UDP and returns the parsed response.
    fn exchange(&self, query: &Query) -> Result<Response> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.set_read_timeout(self.read_timeout)?;
        socket.set_write_timeout(self.write_timeout)?;

        // Connect us to the server, meaning recv will only receive directly
        // from the server.
        socket.connect(self.servers.as_slice())?;

        let req = query.to_vec()?;

        let stats = StatsBuilder::start(req.len());
        socket.send(&req).map_err(socket_error)?;

        let mut buf = [0; RECV_BUFFER_SIZE];
        let len = socket.recv(&mut buf).map_err(socket_error)?;
        let server = socket.peer_addr()?;
        debug!("received {} bytes from {}", len, server);

        let mut resp = Response::from_slice(&buf[0..len])?;

        if resp.header.id != query.id {
            warn!(
                "{}: response id {} does not match query id {}",
                server, resp.header.id, query.id
            );
            return Err(Error::MismatchedId {
                expected: query.id,
                got: resp.header.id,
            });
        }

        if !resp.header.qr() {
            warn!("{}: response {} is not marked as a response", server, resp.header.id);
        }

        resp.stats = Some(stats.end(server, len));

        Ok(resp)
    }
}
