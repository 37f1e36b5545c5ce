#![no_main]
use libfuzzer_sys::{arbitrary::Arbitrary, fuzz_target};
use uriutils::{BuildError, Builder, HostEncoding, Uri};

#[derive(Arbitrary, Debug)]
struct Authority<'a> {
    userinfo: Option<&'a str>,
    host: &'a str,
    dns_compatible: bool,
    port: Option<u16>,
}

#[derive(Arbitrary, Debug)]
struct UriComponents<'a> {
    scheme: Option<&'a str>,
    authority: Option<Authority<'a>>,
    path: &'a str,
    segments: Vec<&'a str>,
    query: Option<&'a str>,
    params: Vec<(&'a str, Option<&'a str>)>,
    fragment: Option<&'a str>,
}

fuzz_target!(|c: UriComponents<'_>| {
    let mut b = Builder::new();
    if b.scheme(c.scheme).is_err() {
        return;
    }
    if let Some(a) = &c.authority {
        b.userinfo(a.userinfo).host(a.host).port(a.port);
        if a.dns_compatible {
            b.host_encoding(HostEncoding::DnsCompatible);
        }
    }
    b.path(c.path).query(c.query).fragment(c.fragment);
    for seg in &c.segments {
        b.append_path_segment(seg);
    }
    for &(name, value) in &c.params {
        b.append_query_param(name, value);
    }

    let u1 = match b.build() {
        Ok(u) => u,
        Err(
            BuildError::RootlessPathWithAuthority
            | BuildError::PathStartsWithDoubleSlash
            | BuildError::Syntax(_),
        ) => return,
        Err(e) => panic!("{e}"),
    };

    assert_eq!(u1.scheme(), c.scheme);
    assert_eq!(u1.has_authority(), c.authority.is_some());
    assert_eq!(u1.fragment().unwrap(), c.fragment);

    let u2 = Uri::parse(u1.as_str()).unwrap();
    assert_eq!(u1, u2);
    assert_eq!(u1.encoded_userinfo(), u2.encoded_userinfo());
    assert_eq!(u1.encoded_host(), u2.encoded_host());
    assert_eq!(u1.host_parsed(), u2.host_parsed());
    assert_eq!(u1.port(), u2.port());
    assert_eq!(u1.encoded_path(), u2.encoded_path());
    assert_eq!(u1.path_segments(), u2.path_segments());
    assert_eq!(u1.query_params(), u2.query_params());
    assert_eq!(u1.fragment(), u2.fragment());

    if let Some(a) = &c.authority {
        assert_eq!(u1.userinfo().unwrap(), a.userinfo);
        assert_eq!(u1.port(), a.port);
    }
});
