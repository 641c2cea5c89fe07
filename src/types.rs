use std::net::{Ipv4Addr, SocketAddr};
use std::time::{Duration, SystemTime};
use strum_macros::{Display, EnumString};

/// The fixed 12 byte header found at the start of every DNS message.
///
/// All fields are kept in host byte order; they are converted to and from
/// network byte order only when written to or read from the wire.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    /// 16-bit identifier assigned by the program that generates any kind of
    /// query. This identifier is copied into the corresponding reply and can be
    /// used by the requester to match up replies to outstanding queries.
    pub id: u16,

    /// The raw flags word (QR, Opcode, AA, TC, RD, RA, Z, AD, CD and RCODE).
    pub flags: u16,

    pub qd_count: u16,
    pub an_count: u16,
    pub ns_count: u16,
    pub ar_count: u16,
}

impl Header {
    /// Length of the header on the wire.
    pub const LEN: usize = 12;

    /// A standard query with Recursion Desired set.
    pub const QUERY_FLAGS: u16 = 0x0100;

    const QR: u16 = 0b1000_0000_0000_0000;
    const AA: u16 = 0b0000_0100_0000_0000;
    const TC: u16 = 0b0000_0010_0000_0000;
    const RD: u16 = 0b0000_0001_0000_0000;
    const RA: u16 = 0b0000_0000_1000_0000;
    const RCODE: u16 = 0b0000_0000_0000_1111;

    /// Specifies whether this message is a query (false), or a response (true).
    pub fn qr(&self) -> bool {
        self.flags & Header::QR != 0
    }

    /// Authoritative Answer.
    pub fn aa(&self) -> bool {
        self.flags & Header::AA != 0
    }

    /// Truncation - specifies that this message was truncated.
    pub fn tc(&self) -> bool {
        self.flags & Header::TC != 0
    }

    /// Recursion Desired.
    pub fn rd(&self) -> bool {
        self.flags & Header::RD != 0
    }

    /// Recursion Available.
    pub fn ra(&self) -> bool {
        self.flags & Header::RA != 0
    }

    pub fn rcode(&self) -> Rcode {
        Rcode::from((self.flags & Header::RCODE) as u8)
    }

    /// Writes the header in network byte order.
    pub fn to_bytes(&self) -> [u8; Header::LEN] {
        let mut buf = [0; Header::LEN];
        let fields = [
            self.id,
            self.flags,
            self.qd_count,
            self.an_count,
            self.ns_count,
            self.ar_count,
        ];

        for (chunk, field) in buf.chunks_exact_mut(2).zip(fields.iter()) {
            chunk.copy_from_slice(&field.to_be_bytes());
        }

        buf
    }
}

/// Resource record types. Only [`Type::A`] and [`Type::CNAME`] are interpreted,
/// the rest are named so skipped records can be displayed.
#[derive(Copy, Clone, Debug, Display, EnumString, FromPrimitive, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
#[repr(u16)]
pub enum Type {
    /// A host address.
    A = 1,
    NS = 2,
    /// The canonical name for an alias.
    CNAME = 5,
    SOA = 6,
    PTR = 12,
    MX = 15,
    TXT = 16,
    AAAA = 28,
}

impl Default for Type {
    fn default() -> Self {
        Type::A
    }
}

#[derive(Copy, Clone, Debug, Display, EnumString, FromPrimitive, PartialEq, Eq)]
#[repr(u16)]
pub enum Class {
    #[strum(serialize = "IN")]
    Internet = 1,
}

impl Default for Class {
    fn default() -> Self {
        Class::Internet
    }
}

/// Response Codes. See [rfc1035].
///
/// [rfc1035]: https://datatracker.ietf.org/doc/html/rfc1035
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Rcode {
    NoError,
    FormErr,
    ServFail,
    NXDomain,
    NotImp,
    Refused,

    /// Any code this crate does not name (6-15).
    Other(u8),
}

impl From<u8> for Rcode {
    fn from(code: u8) -> Self {
        match code {
            0 => Rcode::NoError,
            1 => Rcode::FormErr,
            2 => Rcode::ServFail,
            3 => Rcode::NXDomain,
            4 => Rcode::NotImp,
            5 => Rcode::Refused,
            n => Rcode::Other(n),
        }
    }
}

/// DNS Question, as echoed back in a reply.
///
/// The type and class are kept as their raw values, as a reply may carry ones
/// this crate does not name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Question {
    pub name: String,
    pub r#type: u16,
    pub class: u16,
}

/// A single-question request, ready to be encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    /// Transaction id, echoed back by the server.
    pub id: u16,

    /// The hostname being asked about, in dotted form.
    pub name: String,
    pub r#type: Type,
    pub class: Class,
}

/// Resource Record (RR) from the answer section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub name: String,

    /// The number of seconds that the resource record may be cached
    /// before the source of the information should again be consulted.
    pub ttl: Duration,

    pub resource: Resource,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Resource {
    A(Ipv4Addr),
    CNAME(String),

    /// A record that was skipped by its length without being interpreted.
    Other { r#type: u16, len: u16 },
}

/// A decoded reply.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Response {
    pub header: Header,

    pub questions: Vec<Question>,

    /// The answer records, in the order they appeared in the reply.
    pub answers: Vec<Record>,

    /// Set by the client that received this response.
    pub stats: Option<Stats>,
}

/// One resolved address: the owner name of an A record and its address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub domain: String,
    pub ip: Ipv4Addr,
    pub ttl: Duration,
}

/// Statistics about the exchange that produced a [`Response`].
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    /// When the request was sent.
    pub start: SystemTime,

    /// How long the server took to respond.
    pub duration: Duration,

    /// The server used to service this query.
    pub server: SocketAddr,

    pub request_size: usize,
    pub response_size: usize,
}
