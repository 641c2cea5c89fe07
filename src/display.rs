//! Implements the Display trait for the various types, so they output
//! in `dig` style.
// Refer to https://github.com/tigeli/bind-utils/blob/master/bin/dig/dig.c for reference.

use crate::types::*;
use chrono::prelude::*;
use num_traits::FromPrimitive;
use std::fmt;

/// Formats a raw record type by name where one is known, otherwise in the
/// `TYPE123` form of [rfc3597].
///
/// [rfc3597]: https://datatracker.ietf.org/doc/html/rfc3597
fn type_name(r#type: u16) -> String {
    match Type::from_u16(r#type) {
        Some(t) => t.to_string(),
        None => format!("TYPE{}", r#type),
    }
}

fn class_name(class: u16) -> String {
    match Class::from_u16(class) {
        Some(c) => c.to_string(),
        None => format!("CLASS{}", class),
    }
}

/// Displays this message in a format resembling `dig` output.
impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_header(f)?;

        // Always display the question section, but optionally
        // display the answers.
        writeln!(f, ";; QUESTION SECTION:")?;
        for question in &self.questions {
            write!(f, "{}", question)?;
        }
        writeln!(f)?;

        if !self.answers.is_empty() {
            writeln!(f, ";; ANSWER SECTION:")?;
            for answer in &self.answers {
                write!(f, "{}", answer)?;
            }
            writeln!(f)?;
        }

        if let Some(stats) = &self.stats {
            write!(f, "{}", stats)?;
        }

        Ok(())
    }
}

impl Response {
    fn fmt_header(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let header = &self.header;

        writeln!(
            f,
            ";; ->>HEADER<<- status: {rcode}, id: {id}",
            rcode = header.rcode(),
            id = header.id,
        )?;

        let mut flags = String::new();

        if header.qr() {
            flags.push_str(" qr")
        }
        if header.aa() {
            flags.push_str(" aa")
        }
        if header.tc() {
            flags.push_str(" tc")
        }
        if header.rd() {
            flags.push_str(" rd")
        }
        if header.ra() {
            flags.push_str(" ra")
        }

        writeln!(f, ";; flags:{flags}; QUERY: {qd_count}, ANSWER: {an_count}, AUTHORITY: {ns_count}, ADDITIONAL: {ar_count}",
            flags = flags,
            qd_count = header.qd_count,
            an_count = header.an_count,
            ns_count = header.ns_count,
            ar_count = header.ar_count,
        )?;

        writeln!(f)
    }
}

impl fmt::Display for Rcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Rcode::NoError => write!(f, "NOERROR"),
            Rcode::FormErr => write!(f, "FORMERR"),
            Rcode::ServFail => write!(f, "SERVFAIL"),
            Rcode::NXDomain => write!(f, "NXDOMAIN"),
            Rcode::NotImp => write!(f, "NOTIMP"),
            Rcode::Refused => write!(f, "REFUSED"),
            Rcode::Other(code) => write!(f, "RESERVED{}", code),
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, ";; Query time: {} msec", self.duration.as_millis())?;
        writeln!(f, ";; SERVER: {}", self.server)?;

        let start: chrono::DateTime<Local> = self.start.into();
        // ;; WHEN: Sat Jun 12 12:14:21 PDT 2021
        writeln!(f, ";; WHEN: {}", start.format("%a %b %-d %H:%M:%S %z %-Y"))?;
        writeln!(
            f,
            ";; MSG SIZE sent: {} rcvd: {}",
            self.request_size, self.response_size
        )
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            ";{name:<20}      {class:4} {type:6}",
            name = self.name,
            class = class_name(self.class),
            r#type = type_name(self.r#type),
        )
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let r#type = match &self.resource {
            Resource::A(_) => Type::A.to_string(),
            Resource::CNAME(_) => Type::CNAME.to_string(),
            Resource::Other { r#type, .. } => type_name(*r#type),
        };

        writeln!(
            f,
            "{name:<20} {ttl:>4} {class:4} {type:6} {resource}",
            name = self.name,
            ttl = self.ttl.as_secs(),
            class = Class::Internet.to_string(),
            r#type = r#type,
            resource = self.resource,
        )
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::A(ip) => write!(f, "{}", ip),
            Resource::CNAME(name) => write!(f, "{}", name),

            // As in rfc3597, but without the data itself.
            Resource::Other { len, .. } => write!(f, "\\# {}", len),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} has address {}", self.domain, self.ip)
    }
}

#[cfg(test)]
mod tests {
    use crate::types::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn test_display_resource() {
        let tests = vec![
            (
                Resource::A("93.184.216.34".parse().unwrap()),
                "93.184.216.34",
            ),
            (Resource::CNAME("example.com".to_string()), "example.com"),
            (Resource::Other { r#type: 28, len: 16 }, "\\# 16"),
        ];

        for (resource, display) in tests {
            assert_eq!(format!("{}", resource), display);
        }
    }

    #[test]
    fn test_display_record() {
        let record = Record {
            name: "www.example.com".to_string(),
            ttl: Duration::from_secs(300),
            resource: Resource::Other { r#type: 99, len: 3 },
        };

        assert_eq!(
            format!("{}", record),
            "www.example.com       300 IN   TYPE99 \\# 3\n"
        );
    }

    #[test]
    fn test_display_entry() {
        let entry = Entry {
            domain: "example.com".to_string(),
            ip: "93.184.216.34".parse().unwrap(),
            ttl: Duration::from_secs(300),
        };

        assert_eq!(entry.to_string(), "example.com has address 93.184.216.34");
    }

    #[test]
    fn test_display_rcode() {
        assert_eq!(Rcode::from(0u8).to_string(), "NOERROR");
        assert_eq!(Rcode::from(3u8).to_string(), "NXDOMAIN");
        assert_eq!(Rcode::from(11u8).to_string(), "RESERVED11");
    }

    #[test]
    fn test_display_response() {
        let m = Response {
            header: Header {
                id: 42,
                flags: 0x8180,
                qd_count: 1,
                an_count: 1,
                ..Default::default()
            },
            questions: vec![Question {
                name: "example.com".to_string(),
                r#type: 1,
                class: 1,
            }],
            answers: vec![Record {
                name: "example.com".to_string(),
                ttl: Duration::from_secs(60),
                resource: Resource::A("93.184.216.34".parse().unwrap()),
            }],
            stats: None,
        };

        let got = m.to_string();
        assert!(got.starts_with(";; ->>HEADER<<- status: NOERROR, id: 42\n"), "{}", got);
        assert!(got.contains(";; flags: qr rd ra; QUERY: 1, ANSWER: 1, AUTHORITY: 0, ADDITIONAL: 0"), "{}", got);
        assert!(got.contains("93.184.216.34"), "{}", got);
    }
}
