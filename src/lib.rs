//! A minimal DNS stub resolver.
//!
//! Builds a single question query for a hostname, sends it over UDP to a
//! recursive resolver, and decodes the A and CNAME records of the reply,
//! following label compression pointers.
//!
//! ```no_run
//! use stubdns::clients::Resolver;
//!
//! fn main() -> Result<(), stubdns::Error> {
//!     for entry in Resolver::new().resolve("example.com")? {
//!         println!("{}", entry);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! The codec can also be used on its own:
//!
//! ```
//! use stubdns::{parse_response, Query};
//!
//! let req = Query::with_id(0x1234, "example.com").to_vec().unwrap();
//! assert_eq!(req.len(), 12 + 13 + 4);
//!
//! // A reply with no answers is valid, and yields no entries.
//! let mut reply = req.clone();
//! reply[2] |= 0x80; // QR
//! assert!(parse_response(&reply).unwrap().is_empty());
//! ```

mod display;
mod dns;
mod errors;
mod io;
pub mod name;
pub mod types;

#[cfg(feature = "clients")]
pub mod clients;

#[macro_use]
extern crate num_derive;

pub use crate::dns::parse_response;
pub use crate::errors::{Error, Result};
pub use crate::types::*;

// Pull up the various types that should be on the front page of the docs.
#[doc(inline)]
pub use crate::types::Entry;
#[doc(inline)]
pub use crate::types::Query;
#[doc(inline)]
pub use crate::types::Response;
