use crate::bail;
use crate::errors::{Error, Result};
use crate::io::DNSReadExt;
use crate::name::{encode_name, read_name, MAX_NAME_LEN};
use crate::types::*;
use log::debug;
use num_traits::FromPrimitive;
use std::io::Cursor;
use std::net::Ipv4Addr;
use std::time::Duration;

impl Query {
    /// Creates a type A query for `name`, with a random id.
    ///
    /// The id is what lets a client reject spoofed replies, so it must not be
    /// predictable.
    pub fn new(name: &str) -> Query {
        Query::with_id(rand::random(), name)
    }

    /// Creates a type A query for `name`, with the given id.
    pub fn with_id(id: u16, name: &str) -> Query {
        Query {
            id,
            name: name.to_string(),
            r#type: Type::A,
            class: Class::Internet,
        }
    }

    /// The header sent with this query: a standard query, recursion desired,
    /// with exactly one question.
    pub fn header(&self) -> Header {
        Header {
            id: self.id,
            flags: Header::QUERY_FLAGS,
            qd_count: 1,

            ..Default::default()
        }
    }

    /// Writes this query into `buf`, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] if the name can not be encoded, or
    /// [`Error::BufferTooSmall`] if `buf` can not hold the header, the name
    /// and the type and class.
    pub fn write_to(&self, buf: &mut [u8]) -> Result<usize> {
        let qname = encode_name(&self.name)?;

        let needed = Header::LEN + qname.len() + 4;
        if buf.len() < needed {
            return Err(Error::BufferTooSmall {
                needed,
                available: buf.len(),
            });
        }

        buf[..Header::LEN].copy_from_slice(&self.header().to_bytes());
        let mut offset = Header::LEN;

        buf[offset..offset + qname.len()].copy_from_slice(&qname);
        offset += qname.len();

        buf[offset..offset + 2].copy_from_slice(&(self.r#type as u16).to_be_bytes());
        offset += 2;

        buf[offset..offset + 2].copy_from_slice(&(self.class as u16).to_be_bytes());
        offset += 2;

        debug!("built {} byte query for {} with id {}", offset, self.name, self.id);

        Ok(offset)
    }

    /// Returns this query as a Vec<u8> ready to be sent, as defined by [rfc1035](https://datatracker.ietf.org/doc/html/rfc1035).
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        let mut req = vec![0; Header::LEN + MAX_NAME_LEN + 4];
        let len = self.write_to(&mut req)?;
        req.truncate(len);

        Ok(req)
    }
}

// A helper class to hold state while the parsing is happening.
pub(crate) struct MessageParser<'a> {
    cur: Cursor<&'a [u8]>,

    m: Response,
}

impl<'a> MessageParser<'a> {
    fn new(buf: &[u8]) -> MessageParser {
        MessageParser {
            cur: Cursor::new(buf),
            m: Response::default(),
        }
    }

    /// Consume the MessageParser and returned the resulting Response.
    fn parse(mut self) -> Result<Response> {
        if self.cur.remaining() < Header::LEN {
            bail!(
                TruncatedMessage,
                "message of {} bytes is shorter than the {} byte header",
                self.cur.remaining(),
                Header::LEN
            );
        }

        self.m.header = Header {
            id: self.cur.read_be_u16("id")?,
            flags: self.cur.read_be_u16("flags")?,
            qd_count: self.cur.read_be_u16("question count")?,
            an_count: self.cur.read_be_u16("answer count")?,
            ns_count: self.cur.read_be_u16("authority count")?,
            ar_count: self.cur.read_be_u16("additional count")?,
        };

        self.read_questions(self.m.header.qd_count)?;
        self.read_answers(self.m.header.an_count)?;

        // The authority and additional sections are not interpreted.
        if self.cur.remaining() > 0 {
            debug!(
                "ignoring {} bytes of authority and additional records",
                self.cur.remaining()
            );
        }

        Ok(self.m)
    }

    fn read_questions(&mut self, count: u16) -> Result<()> {
        for _ in 0..count {
            let name = self.cur.read_qname()?;
            let r#type = self.cur.read_be_u16("question type")?;
            let class = self.cur.read_be_u16("question class")?;

            self.m.questions.push(Question {
                name,
                r#type,
                class,
            });
        }

        Ok(())
    }

    fn read_answers(&mut self, count: u16) -> Result<()> {
        for i in 0..count {
            let name = self.cur.read_qname()?;
            let r#type = self.cur.read_be_u16("record type")?;
            let _class = self.cur.read_be_u16("record class")?;
            let ttl = self.cur.read_be_u32("record ttl")?;
            let len = self.cur.read_be_u16("record length")?;

            let start = self.cur.position() as usize;
            self.cur.skip(len.into(), "record data")?;

            let buf = *self.cur.get_ref();
            let rdata = &buf[start..start + len as usize];

            let resource = match FromPrimitive::from_u16(r#type) {
                Some(Type::A) if rdata.len() == 4 => {
                    Resource::A(Ipv4Addr::new(rdata[0], rdata[1], rdata[2], rdata[3]))
                }

                Some(Type::CNAME) => {
                    // Pointers in the alias are relative to the whole message.
                    let (alias, alias_len) = read_name(buf, start)?;
                    if alias_len > rdata.len() {
                        bail!(
                            MalformedName,
                            "alias in answer {} is {} bytes, longer than its {} byte record",
                            i,
                            alias_len,
                            rdata.len()
                        );
                    }
                    Resource::CNAME(alias)
                }

                _ => {
                    debug!(
                        "skipping answer {} for {}: type {} with {} bytes of data",
                        i, name, r#type, len
                    );
                    Resource::Other { r#type, len }
                }
            };

            self.m.answers.push(Record {
                name,
                ttl: Duration::from_secs(ttl.into()),
                resource,
            });
        }

        Ok(())
    }
}

impl Response {
    /// Parses a reply.
    ///
    /// The header, question section and answer section are decoded. Any
    /// authority or additional records that follow are left uninterpreted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedMessage`] if the header counts or a record
    /// length run past the end of `buf`, or [`Error::MalformedName`] if a
    /// name can not be decoded. Parsing stops at the first such problem.
    pub fn from_slice(buf: &[u8]) -> Result<Response> {
        let m = MessageParser::new(buf).parse()?;

        debug!(
            "parsed {} byte response id {} with {} answers",
            buf.len(),
            m.header.id,
            m.answers.len()
        );

        Ok(m)
    }

    /// Returns every A record in the answer section, in order.
    ///
    /// Each address is listed under its own record's name. CNAME records
    /// contribute nothing here, see [`Response::aliases`].
    pub fn entries(&self) -> Vec<Entry> {
        self.answers
            .iter()
            .filter_map(|record| match record.resource {
                Resource::A(ip) => Some(Entry {
                    domain: record.name.clone(),
                    ip,
                    ttl: record.ttl,
                }),
                _ => None,
            })
            .collect()
    }

    /// Returns the (alias, canonical name) pairs of every CNAME record in the
    /// answer section, in order.
    pub fn aliases(&self) -> Vec<(String, String)> {
        self.answers
            .iter()
            .filter_map(|record| match &record.resource {
                Resource::CNAME(target) => Some((record.name.clone(), target.clone())),
                _ => None,
            })
            .collect()
    }
}

/// Parses a reply and returns its address entries. An empty list means the
/// reply was valid but held no usable A records.
pub fn parse_response(buf: &[u8]) -> Result<Vec<Entry>> {
    Ok(Response::from_slice(buf)?.entries())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EXAMPLE_QUESTION: &[u8] = b"\x07example\x03com\x00\x00\x01\x00\x01";

    // 93.184.216.34 for example.com (via a pointer to the question), TTL 300.
    const EXAMPLE_A: &[u8] = b"\xC0\x0C\x00\x01\x00\x01\x00\x00\x01\x2C\x00\x04\x5D\xB8\xD8\x22";

    fn reply(qd_count: u16, an_count: u16, sections: &[&[u8]]) -> Vec<u8> {
        let header = Header {
            id: 0x1234,
            flags: 0x8180,
            qd_count,
            an_count,
            ..Default::default()
        };

        let mut buf = header.to_bytes().to_vec();
        for section in sections {
            buf.extend_from_slice(section);
        }
        buf
    }

    fn entry(domain: &str, ip: &str, ttl: u64) -> Entry {
        Entry {
            domain: domain.to_string(),
            ip: ip.parse().unwrap(),
            ttl: Duration::from_secs(ttl),
        }
    }

    #[test]
    fn test_write_to() {
        let mut buf = [0xAA; 64];
        let len = Query::with_id(0xBEEF, "www.example.com")
            .write_to(&mut buf)
            .unwrap();

        let want: &[u8] = b"\xBE\xEF\x01\x00\x00\x01\x00\x00\x00\x00\x00\x00\
            \x03www\x07example\x03com\x00\
            \x00\x01\x00\x01";

        assert_eq!(len, want.len());
        assert_eq!(&buf[..len], want);

        // Bytes past the query are not touched.
        assert_eq!(buf[len], 0xAA);
    }

    #[test]
    fn test_write_to_exact_fit() {
        let query = Query::with_id(1, "example.com");
        let mut buf = vec![0; 12 + 13 + 4];

        assert_eq!(query.write_to(&mut buf).unwrap(), buf.len());
        assert_eq!(query.to_vec().unwrap(), buf);
    }

    #[test]
    fn test_write_to_buffer_too_small() {
        let mut buf = [0; 28];
        match Query::with_id(1, "example.com").write_to(&mut buf) {
            Err(Error::BufferTooSmall { needed, available }) => {
                assert_eq!((needed, available), (29, 28));
            }
            got => panic!("got {:?}, want BufferTooSmall", got),
        }
    }

    #[test]
    fn test_write_to_invalid_name() {
        let mut buf = [0; 512];
        match Query::with_id(1, "").write_to(&mut buf) {
            Err(Error::InvalidName(_)) => (),
            got => panic!("got {:?}, want InvalidName", got),
        }
    }

    #[test]
    fn test_query_ids_vary() {
        let ids: Vec<u16> = (0..16).map(|_| Query::new("example.com").id).collect();
        assert!(ids.iter().any(|id| *id != ids[0]), "ids never changed: {:?}", ids);
    }

    #[test]
    fn test_parse_a_record() {
        let buf = reply(1, 1, &[EXAMPLE_QUESTION, EXAMPLE_A]);

        let m = Response::from_slice(&buf).unwrap();
        assert_eq!(m.header.id, 0x1234);
        assert!(m.header.qr());
        assert_eq!(m.header.rcode(), Rcode::NoError);
        assert_eq!(
            m.questions,
            vec![Question {
                name: "example.com".to_string(),
                r#type: 1,
                class: 1,
            }]
        );

        assert_eq!(
            parse_response(&buf).unwrap(),
            vec![entry("example.com", "93.184.216.34", 300)]
        );
    }

    #[test]
    fn test_parse_cname_chain() {
        let question: &[u8] = b"\x05alias\x07example\x03com\x00\x00\x01\x00\x01";

        // alias.example.com CNAME example.com (a pointer into the question).
        let cname: &[u8] = b"\xC0\x0C\x00\x05\x00\x01\x00\x00\x0E\x10\x00\x02\xC0\x12";
        // example.com A 93.184.216.34
        let a: &[u8] = b"\xC0\x12\x00\x01\x00\x01\x00\x00\x01\x2C\x00\x04\x5D\xB8\xD8\x22";

        let buf = reply(1, 2, &[question, cname, a]);
        let m = Response::from_slice(&buf).unwrap();

        assert_eq!(m.entries(), vec![entry("example.com", "93.184.216.34", 300)]);
        assert_eq!(
            m.aliases(),
            vec![("alias.example.com".to_string(), "example.com".to_string())]
        );
    }

    #[test]
    fn test_parse_keeps_answer_order() {
        let second: &[u8] = b"\xC0\x0C\x00\x01\x00\x01\x00\x00\x00\x3C\x00\x04\x5D\xB8\xD8\x23";
        let buf = reply(1, 2, &[EXAMPLE_QUESTION, EXAMPLE_A, second]);

        assert_eq!(
            parse_response(&buf).unwrap(),
            vec![
                entry("example.com", "93.184.216.34", 300),
                entry("example.com", "93.184.216.35", 60),
            ]
        );
    }

    #[test]
    fn test_parse_no_answers() {
        let buf = reply(1, 0, &[EXAMPLE_QUESTION]);
        assert_eq!(parse_response(&buf).unwrap(), Vec::<Entry>::new());
    }

    #[test]
    fn test_parse_skips_other_records() {
        // An AAAA record, and an A record with the wrong length.
        let aaaa: &[u8] = b"\xC0\x0C\x00\x1C\x00\x01\x00\x00\x01\x2C\x00\x10\
            \x20\x01\x0d\xb8\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x01";
        let bad_a: &[u8] = b"\xC0\x0C\x00\x01\x00\x01\x00\x00\x01\x2C\x00\x03\x01\x02\x03";

        let buf = reply(1, 3, &[EXAMPLE_QUESTION, aaaa, bad_a, EXAMPLE_A]);
        let m = Response::from_slice(&buf).unwrap();

        assert_eq!(m.answers.len(), 3);
        assert_eq!(m.answers[0].resource, Resource::Other { r#type: 28, len: 16 });
        assert_eq!(m.answers[1].resource, Resource::Other { r#type: 1, len: 3 });
        assert_eq!(m.entries(), vec![entry("example.com", "93.184.216.34", 300)]);
    }

    #[test]
    fn test_parse_ignores_trailing_sections() {
        let mut buf = reply(1, 1, &[EXAMPLE_QUESTION, EXAMPLE_A]);
        buf[9] = 1; // ns_count
        buf.extend_from_slice(b"\xC0\x0C\x00\x02\x00\x01\x00\x00\x01\x2C\x00\x02\xC0\x0C");

        assert_eq!(parse_response(&buf).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_truncated() {
        let tests: Vec<(&str, Vec<u8>)> = vec![
            ("empty", vec![]),
            ("short header", reply(0, 0, &[])[..11].to_vec()),
            ("missing question", reply(1, 0, &[])),
            ("ancount too large", reply(1, 3, &[EXAMPLE_QUESTION, EXAMPLE_A])),
            (
                "short record data",
                reply(1, 1, &[EXAMPLE_QUESTION, &EXAMPLE_A[..EXAMPLE_A.len() - 1]]),
            ),
            (
                "short record header",
                reply(1, 1, &[EXAMPLE_QUESTION, &EXAMPLE_A[..8]]),
            ),
        ];

        for (name, buf) in tests {
            match Response::from_slice(&buf) {
                Err(Error::TruncatedMessage(_)) => (),
                got => panic!("{}: got {:?}, want TruncatedMessage", name, got),
            }
        }
    }

    #[test]
    fn test_parse_pointer_cycle() {
        // The answer's name points at itself.
        let looped: &[u8] = b"\xC0\x1D\x00\x01\x00\x01\x00\x00\x01\x2C\x00\x04\x5D\xB8\xD8\x22";
        let buf = reply(1, 1, &[EXAMPLE_QUESTION, looped]);

        match Response::from_slice(&buf) {
            Err(Error::MalformedName(_)) => (),
            got => panic!("got {:?}, want MalformedName", got),
        }
    }

    #[test]
    fn test_parse_cname_longer_than_record() {
        let cname: &[u8] = b"\xC0\x0C\x00\x05\x00\x01\x00\x00\x0E\x10\x00\x01\x03www\xC0\x0C";
        let buf = reply(1, 1, &[EXAMPLE_QUESTION, cname]);

        match Response::from_slice(&buf) {
            Err(Error::MalformedName(_)) => (),
            got => panic!("got {:?}, want MalformedName", got),
        }
    }
}
