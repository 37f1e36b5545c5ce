use std::{
    collections::HashSet,
    net::{Ipv4Addr, Ipv6Addr},
};

use uriutils::{pct_enc::EStr, Component, DecodeErrorKind, Host, ParseErrorKind::*, *};

#[test]
fn parse_full() {
    let u = Uri::parse("foo://user@host:8080/path?q=1#frag").unwrap();
    assert_eq!(u.scheme(), Some("foo"));
    assert_eq!(u.userinfo().unwrap(), Some("user"));
    assert_eq!(u.host().unwrap(), Some("host"));
    assert_eq!(u.port(), Some(8080));
    assert_eq!(u.path().unwrap(), "/path");
    assert_eq!(u.encoded_query().unwrap(), "q=1");
    assert_eq!(u.fragment().unwrap(), Some("frag"));
    assert_eq!(u.as_str(), "foo://user@host:8080/path?q=1#frag");
}

#[test]
fn parse_absolute() {
    let u = Uri::parse("file:///etc/hosts").unwrap();
    assert_eq!(u.scheme(), Some("file"));
    assert!(u.has_authority());
    assert_eq!(u.encoded_userinfo(), None);
    assert_eq!(u.encoded_host(), Some(""));
    assert_eq!(u.host_parsed(), Some(Host::RegName(EStr::new_or_panic(""))));
    assert_eq!(u.port(), None);
    assert_eq!(u.encoded_path(), "/etc/hosts");
    assert_eq!(u.path_segments().unwrap(), ["etc", "hosts"]);
    assert_eq!(u.encoded_query(), None);
    assert_eq!(u.encoded_fragment(), None);

    let u = Uri::parse("ftp://ftp.is.co.za/rfc/rfc1808.txt").unwrap();
    assert_eq!(u.scheme(), Some("ftp"));
    assert_eq!(u.encoded_host(), Some("ftp.is.co.za"));
    assert_eq!(
        u.host_parsed(),
        Some(Host::RegName(EStr::new_or_panic("ftp.is.co.za")))
    );
    assert_eq!(u.path_segments().unwrap(), ["rfc", "rfc1808.txt"]);

    let u = Uri::parse("ldap://[2001:db8::7]/c=GB?objectClass?one").unwrap();
    assert_eq!(u.scheme(), Some("ldap"));
    assert_eq!(u.encoded_host(), Some("[2001:db8::7]"));
    assert_eq!(u.host().unwrap(), Some("2001:db8::7"));
    assert_eq!(
        u.host_parsed(),
        Some(Host::Ipv6(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 0x7)))
    );
    assert_eq!(u.encoded_path(), "/c=GB");
    assert_eq!(u.encoded_query().unwrap(), "objectClass?one");

    let u = Uri::parse("mailto:John.Doe@example.com").unwrap();
    assert_eq!(u.scheme(), Some("mailto"));
    assert!(!u.has_authority());
    assert_eq!(u.encoded_path(), "John.Doe@example.com");
    assert!(u.is_opaque());

    let u = Uri::parse("news:comp.infosystems.www.servers.unix").unwrap();
    assert_eq!(u.encoded_path(), "comp.infosystems.www.servers.unix");
    assert!(u.is_opaque());

    let u = Uri::parse("tel:+1-816-555-1212").unwrap();
    assert_eq!(u.encoded_path(), "+1-816-555-1212");

    let u = Uri::parse("telnet://192.0.2.16:80/").unwrap();
    assert_eq!(u.host_parsed(), Some(Host::Ipv4(Ipv4Addr::new(192, 0, 2, 16))));
    assert_eq!(u.port(), Some(80));
    assert_eq!(u.encoded_path(), "/");
    assert!(!u.is_opaque());

    let u = Uri::parse("urn:oasis:names:specification:docbook:dtd:xml:4.1.2").unwrap();
    assert_eq!(u.scheme(), Some("urn"));
    assert_eq!(u.encoded_path(), "oasis:names:specification:docbook:dtd:xml:4.1.2");
    assert!(!u.is_relative());
}

#[test]
fn parse_relative() {
    let u = Uri::parse("").unwrap();
    assert_eq!(u.scheme(), None);
    assert!(!u.has_authority());
    assert_eq!(u.encoded_path(), "");
    assert_eq!(u.path_segments().unwrap(), [] as [&str; 0]);
    assert!(u.is_relative());
    assert!(!u.is_opaque());

    let u = Uri::parse("foo.txt").unwrap();
    assert_eq!(u.encoded_path(), "foo.txt");
    assert!(u.is_relative());

    let u = Uri::parse("./this:that").unwrap();
    assert_eq!(u.scheme(), None);
    assert_eq!(u.encoded_path(), "./this:that");

    let u = Uri::parse("//example.com").unwrap();
    assert_eq!(u.scheme(), None);
    assert_eq!(u.encoded_host(), Some("example.com"));
    assert_eq!(u.encoded_path(), "");

    let u = Uri::parse("?query#frag").unwrap();
    assert_eq!(u.encoded_query().unwrap(), "query");
    assert_eq!(u.encoded_fragment().unwrap(), "frag");

    let u = Uri::parse("#a?b").unwrap();
    assert_eq!(u.encoded_query(), None);
    assert_eq!(u.encoded_fragment().unwrap(), "a?b");
}

#[test]
fn parse_authority() {
    let u = Uri::parse("http://127.0.0.1:").unwrap();
    assert_eq!(u.encoded_host(), Some("127.0.0.1"));
    assert_eq!(u.port(), None);
    assert_eq!(u.as_str(), "http://127.0.0.1:");

    let u = Uri::parse("//user:pass@[::1]:0").unwrap();
    assert_eq!(u.encoded_userinfo().unwrap(), "user:pass");
    assert_eq!(u.host_parsed(), Some(Host::Ipv6(Ipv6Addr::LOCALHOST)));
    assert_eq!(u.port(), Some(0));

    let u = Uri::parse("//[v7.abc:def]").unwrap();
    assert_eq!(u.host_parsed(), Some(Host::IpvFuture));
    assert_eq!(u.host().unwrap(), Some("v7.abc:def"));

    let u = Uri::parse("//127.0.0.001").unwrap();
    assert_eq!(
        u.host_parsed(),
        Some(Host::RegName(EStr::new_or_panic("127.0.0.001")))
    );

    let u = Uri::parse("http://65535").unwrap();
    assert_eq!(u.encoded_host(), Some("65535"));
    assert_eq!(u.port(), None);

    let u = Uri::parse("//h:65535").unwrap();
    assert_eq!(u.port(), Some(65535));
}

#[test]
fn decoded_views() {
    let u = Uri::parse("//us%20er@ex%41mple.com/a%2Fb/%E6%B5%8B?x#%20y").unwrap();
    assert_eq!(u.userinfo().unwrap(), Some("us er"));
    assert_eq!(u.host().unwrap(), Some("exAmple.com"));
    assert_eq!(u.path().unwrap(), "/a/b/测");
    assert_eq!(u.path_segments().unwrap(), ["a/b", "测"]);
    assert_eq!(u.fragment().unwrap(), Some(" y"));

    let u = Uri::parse("http://xn--fiqs8s.xn--bcher-kva.de/").unwrap();
    assert_eq!(u.host().unwrap(), Some("中国.bücher.de"));

    // ACE labels that are not valid IDNA are left alone.
    let u = Uri::parse("//xn--.example").unwrap();
    assert_eq!(u.host().unwrap(), Some("xn--.example"));
    let u = Uri::parse("//xn--a.com").unwrap();
    assert_eq!(u.host().unwrap(), Some("xn--a.com"));

    let u = Uri::parse("/a/%FF/b").unwrap();
    let e = u.path().unwrap_err();
    assert_eq!(e.index(), 3);
    assert_eq!(e.kind(), DecodeErrorKind::InvalidUtf8);
    let e = u.path_segments().unwrap_err();
    assert_eq!(e.index(), 3);
    // Errors are cached alongside values.
    assert_eq!(u.path().unwrap_err(), e);

    let u = Uri::parse("?a=1&b&a=2").unwrap();
    let params = u.query_params().unwrap().unwrap();
    assert_eq!(
        params.get("a").unwrap(),
        [Some("1".to_owned()), Some("2".to_owned())]
    );
    assert_eq!(params.get("b").unwrap(), [None::<String>]);
    assert!(params.iter().map(|(name, _)| name).eq(["a", "b"]));

    assert_eq!(Uri::parse("/p").unwrap().query_params().unwrap(), None);
}

#[test]
fn parse_error() {
    fn fail(input: &str, index: usize, kind: ParseErrorKind, component: Component) {
        let e = Uri::parse(input).unwrap_err();
        assert_eq!(e.index(), index, "{input}");
        assert_eq!(e.kind(), kind, "{input}");
        assert_eq!(e.component(), Some(component), "{input}");
        assert_eq!(e.input(), input);
    }

    // Empty scheme
    fail(":hello", 0, UnexpectedChar, Component::Scheme);
    // Scheme starts with non-letter
    fail("3ttp://a.com", 0, UnexpectedChar, Component::Scheme);
    // Unexpected char in scheme
    fail("exam=ple:foo", 4, UnexpectedChar, Component::Scheme);

    // Percent-encoded scheme
    fail("a%20:foo", 1, UnexpectedChar, Component::Scheme);
    // Incomplete percent-encoded octet
    fail("te%st", 2, InvalidOctet, Component::Path);
    fail("%", 0, InvalidOctet, Component::Path);

    // Non-hexadecimal octet
    fail("http://a.com/%GG", 13, InvalidOctet, Component::Path);
    // Unescaped space
    fail("http://example.com/a b", 20, UnexpectedChar, Component::Path);
    // Non-ASCII character
    fail("/测试", 1, UnexpectedChar, Component::Path);

    // Unexpected char in authority
    fail("http://us[er@a.com", 9, UnexpectedChar, Component::Userinfo);
    fail("//a@b@c", 5, UnexpectedChar, Component::Host);
    fail("//a b", 3, UnexpectedChar, Component::Host);

    // Port
    fail("//a.com:8o", 9, UnexpectedChar, Component::Port);
    fail("//a.com:80:80", 10, UnexpectedChar, Component::Port);
    fail("//a.com:65536", 8, InvalidPort, Component::Port);
    fail("//a.com:99999999999999999999", 8, InvalidPort, Component::Port);

    // IP literals
    fail("//[::1::2]", 3, InvalidIpLiteral, Component::Host);
    fail("//[12345::]", 3, InvalidIpLiteral, Component::Host);
    fail("//[1:2:3]", 3, InvalidIpLiteral, Component::Host);
    fail("//[v.x]", 3, InvalidIpLiteral, Component::Host);
    fail("//[::1", 6, UnexpectedChar, Component::Host);
    fail("//[::1]a", 7, UnexpectedChar, Component::Host);

    // Query and fragment
    fail("?a b", 2, UnexpectedChar, Component::Query);
    fail("#a#b", 2, UnexpectedChar, Component::Fragment);
    fail("?a^b", 2, UnexpectedChar, Component::Query);
}

#[test]
fn error_display() {
    let e = Uri::parse("http://example.com/a b").unwrap_err();
    assert_eq!(
        e.to_string(),
        r#"illegal character in path at index 20 of "http://example.com/a b""#
    );
    assert_eq!(e.clone().into_input(), "http://example.com/a b");
}

#[test]
fn string_form() {
    // A parsed URI keeps its input as its string form.
    let s = "HTTP://h:/a?#";
    let u = Uri::parse(s).unwrap();
    assert_eq!(u, s);
    assert_eq!(u.to_string(), s);
    assert_eq!(String::from(u.clone()), s);

    let u = Uri::try_from(s.to_owned()).unwrap();
    assert_eq!(u.as_str(), s);
    let u: Uri = s.parse().unwrap();
    assert_eq!(String::from(u), s);

    assert!(Uri::try_from("a b".to_owned()).is_err());
}

#[test]
fn equality() {
    let a = Uri::parse("http://example.com/a").unwrap();
    let b = Uri::builder()
        .scheme("http")
        .unwrap()
        .host("example.com")
        .path("/a")
        .build()
        .unwrap();
    assert_eq!(a, b);
    assert_eq!("http://example.com/a", a);

    // No normalization is performed before comparison.
    let c = Uri::parse("HTTP://example.com/a").unwrap();
    assert_ne!(a, c);
    assert!(c < a);

    let set: HashSet<_> = [a.clone(), b, c].into_iter().collect();
    assert_eq!(set.len(), 2);
    assert!(set.contains(&a));
}

#[test]
fn shared_across_threads() {
    let u = std::sync::Arc::new(Uri::parse("/a/%E6%B5%8B?x=1").unwrap());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let u = u.clone();
            std::thread::spawn(move || {
                assert_eq!(u.path().unwrap(), "/a/测");
                assert_eq!(u.query_params().unwrap().unwrap().first("x"), Some(Some("1")));
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}
