#![no_main]
use libfuzzer_sys::fuzz_target;
use uriutils::Uri;

fuzz_target!(|data: &str| {
    let Ok(r) = Uri::parse(data) else {
        return;
    };
    let mut buf = String::with_capacity(data.len());
    if let Some(s) = r.scheme() {
        buf.push_str(s);
        buf.push(':');
    }
    if let Some(host) = r.encoded_host() {
        buf.push_str("//");
        if let Some(ui) = r.encoded_userinfo() {
            buf.push_str(ui.as_str());
            buf.push('@');
        }
        buf.push_str(host);
        if let Some(p) = r.port() {
            buf.push(':');
            buf.push_str(&p.to_string());
        }
    }
    buf.push_str(r.encoded_path().as_str());
    if let Some(q) = r.encoded_query() {
        buf.push('?');
        buf.push_str(q.as_str());
    }
    if let Some(f) = r.encoded_fragment() {
        buf.push('#');
        buf.push_str(f.as_str());
    }

    // The port may have been written with leading zeros or left empty.
    let reparsed = Uri::parse(&buf).unwrap();
    assert_eq!(reparsed.encoded_host(), r.encoded_host());
    assert_eq!(reparsed.port(), r.port());
    assert_eq!(reparsed.encoded_path(), r.encoded_path());
    assert_eq!(reparsed.encoded_query(), r.encoded_query());
    assert_eq!(reparsed.encoded_fragment(), r.encoded_fragment());
    let _ = (r.path(), r.path_segments(), r.query_params(), r.host());
});
