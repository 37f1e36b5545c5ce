use crate::{
    error::{Component, ParseError, ParseErrorKind},
    ip,
    pct_enc::table::Violation,
};

type Result<T> = std::result::Result<T, ParseError>;

/// Returns immediately with an error.
macro_rules! err {
    ($input:expr, $index:expr, $kind:ident, $component:ident) => {
        return Err(ParseError::new(
            $input,
            $index,
            ParseErrorKind::$kind,
            Some(Component::$component),
        ))
    };
}

/// The components of a URI, borrowed from the parsed input.
///
/// Every component is validated. `host` keeps the brackets of an IP literal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Components<'a> {
    pub(crate) scheme: Option<&'a str>,
    pub(crate) userinfo: Option<&'a str>,
    pub(crate) host: Option<&'a str>,
    pub(crate) port: Option<u16>,
    pub(crate) path: &'a str,
    pub(crate) query: Option<&'a str>,
    pub(crate) fragment: Option<&'a str>,
}

/// Parses a URI reference into its components.
///
/// The input is split at the first occurrence of each of the generic
/// delimiters `':'`, `'/'`, `'?'` and `'#'`; every piece is then checked
/// against the character table of its component.
pub(crate) fn parse(input: &str) -> Result<Components<'_>> {
    let mut parser = Parser {
        input,
        out: Components::default(),
    };
    parser.parse()?;
    Ok(parser.out)
}

/// Scans for the first `':'`, `'/'`, `'?'` and `'#'`, in that order.
///
/// A missing delimiter is reported as the length of the input.
fn scan_delims(bytes: &[u8]) -> [usize; 4] {
    let len = bytes.len();
    let mut res = [len; 4];
    for (i, &x) in bytes.iter().enumerate() {
        let j = match x {
            b':' => 0,
            b'/' => 1,
            b'?' => 2,
            b'#' => 3,
            _ => continue,
        };
        if res[j] == len {
            res[j] = i;
        }
    }
    res
}

/// URI parser.
///
/// # Invariants
///
/// Every index passed between methods is in bounds and
/// on the boundary of an ASCII delimiter or of the input.
struct Parser<'a> {
    input: &'a str,
    out: Components<'a>,
}

impl<'a> Parser<'a> {
    /// Checks `input[start..end]` against the table of a component.
    fn check(&self, start: usize, end: usize, component: Component) -> Result<&'a str> {
        let s = &self.input[start..end];
        match component.table().check(s.as_bytes()) {
            Ok(()) => Ok(s),
            Err(v) => {
                let (i, kind) = match v {
                    Violation::InvalidOctet(i) => (i, ParseErrorKind::InvalidOctet),
                    Violation::UnexpectedChar(i) => (i, ParseErrorKind::UnexpectedChar),
                };
                Err(ParseError::new(self.input, start + i, kind, Some(component)))
            }
        }
    }

    fn find(&self, start: usize, end: usize, x: char) -> Option<usize> {
        self.input[start..end].find(x).map(|i| start + i)
    }

    fn parse(&mut self) -> Result<()> {
        let input = self.input;
        let bytes = input.as_bytes();
        let len = bytes.len();
        if len == 0 {
            return Ok(());
        }

        let [colon, slash, mut qmark, sharp] = scan_delims(bytes);
        if colon == 0 {
            err!(self.input, 0, UnexpectedChar, Scheme);
        }
        // A '?' within the fragment does not start a query.
        if sharp < qmark {
            qmark = len;
        }

        let mut start = 0;
        if colon < slash && colon < qmark && colon < sharp {
            if !bytes[0].is_ascii_alphabetic() {
                err!(self.input, 0, UnexpectedChar, Scheme);
            }
            self.out.scheme = Some(self.check(0, colon, Component::Scheme)?);
            start = colon + 1;
        }

        let has_query = qmark != len;
        let hier_end = if has_query { qmark } else { sharp };
        self.parse_hier_part(start, hier_end)?;

        if has_query {
            self.out.query = Some(self.check(qmark + 1, sharp, Component::Query)?);
        }
        if sharp != len {
            self.out.fragment = Some(self.check(sharp + 1, len, Component::Fragment)?);
        }
        Ok(())
    }

    fn parse_hier_part(&mut self, mut start: usize, end: usize) -> Result<()> {
        if self.input[start..end].starts_with("//") {
            start += 2;
            let auth_end = self.find(start, end, '/').unwrap_or(end);
            self.parse_authority(start, auth_end)?;
            start = auth_end;
        }
        self.out.path = self.check(start, end, Component::Path)?;
        Ok(())
    }

    fn parse_authority(&mut self, mut start: usize, end: usize) -> Result<()> {
        if let Some(at) = self.find(start, end, '@') {
            self.out.userinfo = Some(self.check(start, at, Component::Userinfo)?);
            start = at + 1;
        }

        let host_end = if self.input[start..end].starts_with('[') {
            let close = self.find(start, end, ']');
            let literal = &self.input[start + 1..close.unwrap_or(end)];
            if !ip::is_valid_ip_literal(literal) {
                err!(self.input, start + 1, InvalidIpLiteral, Host);
            }
            let Some(close) = close else {
                err!(self.input, end, UnexpectedChar, Host);
            };
            let host_end = close + 1;
            if host_end < end && self.input.as_bytes()[host_end] != b':' {
                err!(self.input, host_end, UnexpectedChar, Host);
            }
            host_end
        } else {
            let host_end = self.find(start, end, ':').unwrap_or(end);
            self.check(start, host_end, Component::Host)?;
            host_end
        };
        self.out.host = Some(&self.input[start..host_end]);

        if host_end < end {
            self.parse_port(host_end + 1, end)?;
        }
        Ok(())
    }

    fn parse_port(&mut self, start: usize, end: usize) -> Result<()> {
        let digits = self.check(start, end, Component::Port)?;
        // An empty port is the same as no port.
        if !digits.is_empty() {
            match digits.parse() {
                Ok(port) => self.out.port = Some(port),
                Err(_) => err!(self.input, start, InvalidPort, Port),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full() {
        let c = parse("foo://user@host:8080/path?q=1#frag").unwrap();
        assert_eq!(
            c,
            Components {
                scheme: Some("foo"),
                userinfo: Some("user"),
                host: Some("host"),
                port: Some(8080),
                path: "/path",
                query: Some("q=1"),
                fragment: Some("frag"),
            }
        );
    }

    #[test]
    fn delimiters() {
        assert_eq!(parse("").unwrap(), Components::default());

        let c = parse("a/b:c").unwrap();
        assert_eq!(c.scheme, None);
        assert_eq!(c.path, "a/b:c");

        let c = parse("#a?b").unwrap();
        assert_eq!(c.query, None);
        assert_eq!(c.fragment, Some("a?b"));

        let c = parse("?a:b").unwrap();
        assert_eq!(c.scheme, None);
        assert_eq!(c.query, Some("a:b"));

        let c = parse("urn:a:b").unwrap();
        assert_eq!(c.scheme, Some("urn"));
        assert_eq!(c.path, "a:b");

        let c = parse("//").unwrap();
        assert_eq!(c.host, Some(""));
        assert_eq!(c.path, "");
    }

    #[test]
    fn authority() {
        let c = parse("http://[::1]:80/").unwrap();
        assert_eq!(c.host, Some("[::1]"));
        assert_eq!(c.port, Some(80));

        let e = parse("//a@b@c").unwrap_err();
        assert_eq!(e.index(), 5);
        assert_eq!(e.component(), Some(Component::Host));

        let c = parse("//host:").unwrap();
        assert_eq!(c.host, Some("host"));
        assert_eq!(c.port, None);

        let c = parse("//[v1.x]").unwrap();
        assert_eq!(c.host, Some("[v1.x]"));
    }

    #[test]
    fn errors() {
        let cases = [
            (":a", 0, ParseErrorKind::UnexpectedChar, Component::Scheme),
            ("1a:b", 0, ParseErrorKind::UnexpectedChar, Component::Scheme),
            ("a_b:c", 1, ParseErrorKind::UnexpectedChar, Component::Scheme),
            ("/a b", 2, ParseErrorKind::UnexpectedChar, Component::Path),
            ("/a%2", 2, ParseErrorKind::InvalidOctet, Component::Path),
            ("?a b", 2, ParseErrorKind::UnexpectedChar, Component::Query),
            ("#a#b", 2, ParseErrorKind::UnexpectedChar, Component::Fragment),
            ("//[::1::]", 3, ParseErrorKind::InvalidIpLiteral, Component::Host),
            ("//[::1", 6, ParseErrorKind::UnexpectedChar, Component::Host),
            ("//[::1]x", 7, ParseErrorKind::UnexpectedChar, Component::Host),
            ("//h[st", 3, ParseErrorKind::UnexpectedChar, Component::Host),
            ("//h:8a", 5, ParseErrorKind::UnexpectedChar, Component::Port),
            ("//h:1:2", 5, ParseErrorKind::UnexpectedChar, Component::Port),
            ("//h:65536", 4, ParseErrorKind::InvalidPort, Component::Port),
        ];
        for (input, index, kind, component) in cases {
            let e = parse(input).unwrap_err();
            assert_eq!(e.index(), index, "{input}");
            assert_eq!(e.kind(), kind, "{input}");
            assert_eq!(e.component(), Some(component), "{input}");
            assert_eq!(e.input(), input);
        }
    }
}
