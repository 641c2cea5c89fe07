use crate::errors::Result;
use crate::{Query, Response};

pub use self::resolver::Resolver;
pub use self::udp::Client as UdpClient;

mod resolver;
mod stats;
pub mod udp;

/// Exchanger takes a query and returns a response.
///
/// This is the seam between the codec and the network: [`Resolver`] only
/// needs something that can turn a [`Query`] into a [`Response`].
pub trait Exchanger {
    fn exchange(&self, query: &Query) -> Result<Response>;
}

impl<E: Exchanger + ?Sized> Exchanger for &E {
    fn exchange(&self, query: &Query) -> Result<Response> {
        (**self).exchange(query)
    }
}
