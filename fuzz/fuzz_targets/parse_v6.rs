#![no_main]
use libfuzzer_sys::fuzz_target;
use std::net::{IpAddr, Ipv6Addr};
use std::str::FromStr;
use uriutils_fuzz::parse_ip_host;

fuzz_target!(|data: &str| {
    let parsed = match parse_ip_host(&format!("[{data}]")) {
        Some(IpAddr::V6(addr)) => Some(addr),
        _ => None,
    };
    assert_eq!(parsed, Ipv6Addr::from_str(data).ok());
    assert_eq!(
        uriutils::ip::parse_v6(data.as_bytes()).map(Ipv6Addr::from),
        Ipv6Addr::from_str(data).ok()
    );
});
