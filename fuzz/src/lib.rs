use std::net::IpAddr;
use uriutils::{Host, Uri};

/// Parses `//{host}` and returns its host if it is an IP address.
pub fn parse_ip_host(host: &str) -> Option<IpAddr> {
    let uri = Uri::parse(&format!("//{host}")).ok()?;
    match uri.host_parsed()? {
        Host::Ipv4(addr) => Some(addr.into()),
        Host::Ipv6(addr) => Some(addr.into()),
        Host::IpvFuture | Host::RegName(_) => None,
    }
}
