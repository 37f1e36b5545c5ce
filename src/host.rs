//! Host classification and internationalization.

use crate::{
    error::{Component, DecodeError, ParseError, ParseErrorKind},
    ip,
    pct_enc::{self, encoder::RegName, table::REG_NAME, EStr},
};
use std::net::{Ipv4Addr, Ipv6Addr};

const ACE_PREFIX: &str = "xn--";

/// A parsed [host] component.
///
/// [host]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2.2
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Host<'a> {
    /// An IPv4 address.
    Ipv4(Ipv4Addr),
    /// An IPv6 address.
    Ipv6(Ipv6Addr),
    /// An IP address of future version.
    IpvFuture,
    /// A registered name.
    ///
    /// Note that ASCII characters within a registered name are *case-insensitive*.
    RegName(&'a EStr<RegName>),
}

impl<'a> Host<'a> {
    /// Classifies a validated, encoded host.
    pub(crate) fn classify(encoded: &'a str) -> Self {
        if let Some(literal) = strip_brackets(encoded) {
            match ip::parse_v6(literal.as_bytes()) {
                Some(segs) => Host::Ipv6(segs.into()),
                None => Host::IpvFuture,
            }
        } else if let Some(octets) = ip::parse_v4(encoded.as_bytes()) {
            Host::Ipv4(octets.into())
        } else {
            Host::RegName(EStr::new_validated(encoded))
        }
    }
}

/// The policy for encoding a host given as unencoded text.
///
/// A host containing a colon is always taken for an IPv6 address
/// and is not subject to this policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostEncoding {
    /// Converts the host to an ASCII-compatible domain name with IDNA,
    /// punycoding every non-ASCII label into an `xn--` label.
    DnsCompatible,
    /// Percent-encodes every character not allowed in a registered name.
    PctEncoded,
}

impl HostEncoding {
    /// Returns the policy used for a scheme when none is set on the builder.
    ///
    /// No scheme is currently known to require DNS-compatible hosts,
    /// so this always returns [`PctEncoded`](Self::PctEncoded).
    #[must_use]
    pub fn default_for_scheme(_scheme: Option<&str>) -> Self {
        Self::PctEncoded
    }

    /// Encodes unencoded host text with this policy.
    fn encode(self, host: &str) -> Result<String, ParseError> {
        match self {
            Self::PctEncoded => Ok(pct_enc::encode(host, REG_NAME)),
            Self::DnsCompatible => {
                let invalid =
                    || ParseError::new(host, 0, ParseErrorKind::InvalidDomain, Some(Component::Host));
                let ascii = idna::domain_to_ascii(host).map_err(|_| invalid())?;
                if REG_NAME.validate(ascii.as_bytes()) {
                    Ok(ascii)
                } else {
                    Err(invalid())
                }
            }
        }
    }
}

/// Returns the text between the brackets of an IP literal.
pub(crate) fn strip_brackets(host: &str) -> Option<&str> {
    host.strip_prefix('[')?.strip_suffix(']')
}

/// Encodes host text, bracketing it if it is an IPv6 address.
pub(crate) fn encode(host: &str, encoding: HostEncoding) -> Result<String, ParseError> {
    if host.contains(':') {
        if !ip::is_valid_ip_literal(host) {
            return Err(ParseError::new(
                host,
                0,
                ParseErrorKind::InvalidIpLiteral,
                Some(Component::Host),
            ));
        }
        return Ok(format!("[{host}]"));
    }
    encoding.encode(host)
}

/// Validates an encoded host, which is either a bracketed IP literal
/// or a percent-encoded registered name.
pub(crate) fn validate(host: &str) -> Result<(), ParseError> {
    match strip_brackets(host) {
        Some(literal) if ip::is_valid_ip_literal(literal) => Ok(()),
        Some(_) => Err(ParseError::new(
            host,
            1,
            ParseErrorKind::InvalidIpLiteral,
            Some(Component::Host),
        )),
        None => pct_enc::check_component(host, Component::Host),
    }
}

/// Decodes an encoded host into Unicode text.
///
/// IP literals are stripped of their brackets. Otherwise every `xn--` label
/// is converted to Unicode and every other label is percent-decoded.
/// An `xn--` label is kept as is unless its Unicode form converts back
/// to the same label under IDNA.
pub(crate) fn decode(host: &str) -> Result<String, DecodeError> {
    if let Some(literal) = strip_brackets(host) {
        return Ok(literal.to_owned());
    }

    let mut out = String::with_capacity(host.len());
    let mut start = 0;
    for label in host.split('.') {
        if start != 0 {
            out.push('.');
        }
        match to_unicode_label(label) {
            Some(s) => out.push_str(&s),
            None => {
                let decoded = pct_enc::decode(label).map_err(|e| DecodeError {
                    index: start + e.index,
                    ..e
                })?;
                out.push_str(&decoded);
            }
        }
        start += label.len() + 1;
    }
    Ok(out)
}

fn to_unicode_label(label: &str) -> Option<String> {
    let prefix = label.get(..ACE_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(ACE_PREFIX) || label.contains('%') {
        return None;
    }
    let unicode = idna::punycode::decode_to_string(&label[ACE_PREFIX.len()..])?;
    match idna::domain_to_ascii(&unicode) {
        Ok(ascii) if ascii.eq_ignore_ascii_case(label) => Some(unicode),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_policies() {
        assert_eq!(
            encode("bücher.example", HostEncoding::DnsCompatible).unwrap(),
            "xn--bcher-kva.example"
        );
        assert_eq!(
            encode("bücher.example", HostEncoding::PctEncoded).unwrap(),
            "b%C3%BCcher.example"
        );
        assert_eq!(encode("::1", HostEncoding::DnsCompatible).unwrap(), "[::1]");
        assert_eq!(
            encode("1::2::3", HostEncoding::PctEncoded).unwrap_err().kind(),
            ParseErrorKind::InvalidIpLiteral
        );
        assert_eq!(
            encode("a b", HostEncoding::DnsCompatible).unwrap_err().kind(),
            ParseErrorKind::InvalidDomain
        );
        assert_eq!(HostEncoding::default_for_scheme(Some("http")), HostEncoding::PctEncoded);
    }

    #[test]
    fn decode_host() {
        assert_eq!(decode("[::1]").unwrap(), "::1");
        assert_eq!(decode("xn--bcher-kva.example").unwrap(), "bücher.example");
        assert_eq!(decode("XN--bcher-kva.example").unwrap(), "bücher.example");
        assert_eq!(decode("b%C3%BCcher.example").unwrap(), "bücher.example");
        assert_eq!(decode("a.b%zz").unwrap_err().index(), 3);
        assert_eq!(decode("").unwrap(), "");

        // Labels that do not round-trip through IDNA are kept.
        assert_eq!(decode("xn--.example").unwrap(), "xn--.example");
        assert_eq!(decode("xn--a.com").unwrap(), "xn--a.com");
        assert_eq!(decode("xn--fiqs8s.xn--bcher-kva").unwrap(), "中国.bücher");
        assert_eq!(decode("xn--zz%41.com").unwrap(), "xn--zzA.com");
    }

    #[test]
    fn validate_host() {
        assert!(validate("[::1]").is_ok());
        assert!(validate("[v7.x]").is_ok());
        assert!(validate("example.com").is_ok());
        assert!(validate("").is_ok());

        let e = validate("[::1::]").unwrap_err();
        assert_eq!(e.index(), 1);
        assert_eq!(e.kind(), ParseErrorKind::InvalidIpLiteral);

        let e = validate("[::1").unwrap_err();
        assert_eq!(e.index(), 0);
        assert_eq!(e.kind(), ParseErrorKind::UnexpectedChar);
    }

    #[test]
    fn classify() {
        assert_eq!(Host::classify("127.0.0.1"), Host::Ipv4(Ipv4Addr::LOCALHOST));
        assert_eq!(Host::classify("[::1]"), Host::Ipv6(Ipv6Addr::LOCALHOST));
        assert_eq!(Host::classify("[v1.x]"), Host::IpvFuture);
        assert!(matches!(
            Host::classify("127.0.0.01"),
            Host::RegName(name) if name == "127.0.0.01"
        ));
    }
}
