use crate::clients::udp::Client as UdpClient;
use crate::clients::Exchanger;
use crate::errors::{Error, Result};
use crate::name::encode_name;
use crate::types::*;
use log::debug;

/// Resolves hostnames into IPv4 addresses by asking a single recursive
/// resolver.
pub struct Resolver<E = UdpClient> {
    client: E,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    /// Creates a new Resolver using [`crate::clients::udp::DEFAULT_SERVER`].
    pub fn new() -> Resolver<UdpClient> {
        Resolver::with_client(UdpClient::default())
    }
}

impl<E> Resolver<E>
where
    E: Exchanger,
{
    /// Creates a new Resolver that sends its queries through `client`.
    pub fn with_client(client: E) -> Resolver<E> {
        Resolver { client }
    }

    /// Resolves a name into its IPv4 addresses.
    ///
    /// Every A record in the reply is returned under its own name. CNAME
    /// records are not followed with further queries; a recursive resolver
    /// normally includes the A records of the canonical name in the same
    /// reply. An empty list means the name exists but has no addresses.
    ///
    /// See [rfc1035#section-7] and [rfc1034#section-5].
    ///
    /// [rfc1035#section-7]: https://datatracker.ietf.org/doc/html/rfc1035#section-7
    /// [rfc1034#section-5]: https://datatracker.ietf.org/doc/html/rfc1034#section-5
    pub fn resolve(&self, hostname: &str) -> Result<Vec<Entry>> {
        // Fail on a bad name before anything is sent.
        encode_name(hostname)?;

        let query = Query::new(hostname);
        let response = self.client.exchange(&query)?;

        match response.header.rcode() {
            Rcode::NoError => (),
            rcode => return Err(Error::ResponseCode(rcode)),
        };

        let entries = response.entries();
        debug!(
            "{}: {} addresses from {} answers",
            hostname,
            entries.len(),
            response.answers.len()
        );

        Ok(entries)
    }
}
