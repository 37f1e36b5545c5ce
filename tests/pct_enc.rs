use uriutils::{
    pct_enc::{
        self,
        encoder::{Path, PathSegment, Query, QueryParam},
        table::*,
        EStr, EString, Table,
    },
    DecodeErrorKind, ParseErrorKind,
};

const RAW: &str = "te😃a 测1`~!@试#$%st^&+=";
const ENCODED: &str = "te%F0%9F%98%83a%20%E6%B5%8B1%60~!@%E8%AF%95%23$%25st%5E&+=";

#[test]
fn enc_dec_validate() {
    let s = pct_enc::encode(RAW, QUERY);
    assert_eq!(ENCODED, s);

    let mut buf = String::from("x");
    pct_enc::encode_to(RAW, QUERY, &mut buf);
    assert_eq!(buf, format!("x{ENCODED}"));

    assert!(pct_enc::validate(&s, QUERY).is_ok());
    assert_eq!(pct_enc::decode(ENCODED).unwrap(), RAW);

    let e = pct_enc::validate(RAW, QUERY).unwrap_err();
    assert_eq!(e.index(), 2);
    assert_eq!(e.kind(), ParseErrorKind::UnexpectedChar);
    assert_eq!(e.component(), None);

    assert_eq!(pct_enc::decode("%2D%E6%B5%8B").unwrap(), "-测");
    assert_eq!(pct_enc::decode("%2d%e6%b5%8b").unwrap(), "-测");

    let e = pct_enc::decode("%2d%").unwrap_err();
    assert_eq!(e.index(), 3);
    assert_eq!(e.kind(), DecodeErrorKind::InvalidOctet);

    let e = pct_enc::decode("%2d%fg").unwrap_err();
    assert_eq!(e.index(), 3);
    assert_eq!(e.kind(), DecodeErrorKind::InvalidOctet);

    let e = pct_enc::decode("ab%E6%B5").unwrap_err();
    assert_eq!(e.index(), 2);
    assert_eq!(e.kind(), DecodeErrorKind::InvalidUtf8);
}

#[test]
fn encode_tables() {
    assert_eq!(pct_enc::encode("a/b c", PATH), "a/b%20c");
    assert_eq!(pct_enc::encode("a/b c", PCHAR), "a%2Fb%20c");
    assert_eq!(pct_enc::encode("a=b&c+d", QUERY), "a=b&c+d");
    assert_eq!(pct_enc::encode("a=b&c+d", QUERY_PARAM), "a%3Db%26c%2Bd");
    assert_eq!(pct_enc::encode("%41", PATH), "%2541");
    assert_eq!(pct_enc::encode("", PATH), "");
    assert_eq!(pct_enc::encode("~", UNRESERVED), "~");
    assert_eq!(pct_enc::encode("é", UNRESERVED), "%C3%A9");
}

#[test]
fn plus_is_literal() {
    assert_eq!(pct_enc::decode("a+b").unwrap(), "a+b");
    assert_eq!(pct_enc::decode_plus_as_space("a+b%2B").unwrap(), "a b+");
}

#[test]
fn tables() {
    assert!(UNRESERVED.is_subset(PCHAR));
    assert!(PCHAR.is_subset(PATH));
    assert!(PATH.is_subset(QUERY));
    assert!(QUERY_PARAM.is_subset(QUERY));
    assert!(!QUERY.is_subset(QUERY_PARAM));
    assert!(RESERVED.is_subset(GEN_DELIMS.or(SUB_DELIMS)));

    assert!(SCHEME.allows('+'));
    assert!(!SCHEME.allows('%'));
    assert!(!SCHEME.allows_pct_encoded());
    assert!(PATH.allows_pct_encoded());
    assert!(!PATH.allows('%'));
    assert!(!PATH.allows('é'));
    assert!(!QUERY_PARAM.allows('&'));
    assert!(!QUERY_PARAM.allows('='));
    assert!(!QUERY_PARAM.allows('+'));

    const T: Table = Table::new(b"abc").or(DIGIT).sub(Table::new(b"0"));
    assert!(T.allows('a') && T.allows('9'));
    assert!(!T.allows('0') && !T.allows('d'));
}

#[test]
fn estr() {
    assert!(EStr::<Path>::new("/a%20b").is_some());
    assert!(EStr::<Path>::new("/a b").is_none());
    assert!(EStr::<Path>::new("%2").is_none());

    let s = EStr::<Path>::new_or_panic("/a%2Fb/c");
    assert_eq!(s.len(), 8);
    assert_eq!(s.decode().to_string().unwrap(), "/a/b/c");
    assert!(s.split('/').eq(["", "a%2Fb", "c"]));

    let q = EStr::<Query>::new_or_panic("k=v%3D=w");
    let (k, v) = q.split_once('=').unwrap();
    assert_eq!(k, "k");
    assert_eq!(v, "v%3D=w");
    assert_eq!(v.decode().to_string().unwrap(), "v==w");

    let s = EStr::<Path>::new_or_panic("%FF");
    assert_eq!(s.decode().to_bytes(), &[0xFF][..]);
    assert_eq!(s.decode().to_string_lossy(), "\u{FFFD}");
    assert!(EStr::<Path>::EMPTY.is_empty());
}

#[test]
fn estring() {
    let mut buf = EString::<Path>::new();
    buf.push('/');
    buf.encode_str::<PathSegment>("a/b c");
    buf.push('/');
    buf.push_estr(EStr::new_or_panic("%41"));
    assert_eq!(buf, "/a%2Fb%20c/%41");
    assert_eq!(buf.decode().to_string().unwrap(), "/a/b c/A");

    let mut q = EString::<Query>::new();
    q.encode_str::<QueryParam>("a&b");
    q.push('=');
    q.encode_str::<QueryParam>("1+1");
    assert_eq!(q.into_string(), "a%26b=1%2B1");
}

#[test]
#[should_panic]
fn estring_push_disallowed() {
    EString::<Path>::new().push('?');
}
