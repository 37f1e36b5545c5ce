#![no_main]
use libfuzzer_sys::fuzz_target;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use uriutils_fuzz::parse_ip_host;

fuzz_target!(|data: &str| {
    if data.contains(['/', '?', '#', '@', ':', '%', '[']) {
        return;
    }
    let parsed = match parse_ip_host(data) {
        Some(IpAddr::V4(addr)) => Some(addr),
        _ => None,
    };
    assert_eq!(parsed, Ipv4Addr::from_str(data).ok());
});
