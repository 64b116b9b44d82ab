//! IPv4 query normalization.

use std::net::Ipv4Addr;

use crate::{Error, Result};

/// Anything that can be turned into the unsigned key used by the index.
///
/// Implemented for dotted-quad strings and for already-numeric addresses,
/// so every search method accepts `"1.2.3.4"`, `0x01020304u32` or an
/// [`Ipv4Addr`] alike.
pub trait IpQuery {
    /// Convert to the host-order `u32` form of the address.
    fn to_ip_num(&self) -> Result<u32>;
}

impl IpQuery for u32 {
    fn to_ip_num(&self) -> Result<u32> {
        Ok(*self)
    }
}

impl IpQuery for Ipv4Addr {
    fn to_ip_num(&self) -> Result<u32> {
        Ok(u32::from(*self))
    }
}

impl IpQuery for str {
    fn to_ip_num(&self) -> Result<u32> {
        self.parse::<Ipv4Addr>()
            .map(u32::from)
            .map_err(|_| Error::InvalidAddress(self.to_string()))
    }
}

impl IpQuery for String {
    fn to_ip_num(&self) -> Result<u32> {
        self.as_str().to_ip_num()
    }
}

impl<T: IpQuery + ?Sized> IpQuery for &T {
    fn to_ip_num(&self) -> Result<u32> {
        (**self).to_ip_num()
    }
}

/// Normalize a query to its unsigned integer key.
pub fn normalize_ip(input: impl IpQuery) -> Result<u32> {
    input.to_ip_num()
}
