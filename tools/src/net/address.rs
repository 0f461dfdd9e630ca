//! net.address — literal IP address classification

use std::net::{Ipv4Addr, Ipv6Addr};

/// True if `value` is a literal IPv4 or IPv6 address.
///
/// Anything else, including the empty string and out-of-range octets, is
/// simply not an address.
pub fn is_ip_address(value: &str) -> bool {
    value.parse::<Ipv4Addr>().is_ok() || value.parse::<Ipv6Addr>().is_ok()
}
