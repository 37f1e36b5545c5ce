//! IP address forms allowed in a URI host.
//!
//! ```text
//! IP-literal  = "[" ( IPv6address / IPvFuture ) "]"
//! IPvFuture   = "v" 1*HEXDIG "." 1*( unreserved / sub-delims / ":" )
//! IPv4address = dec-octet "." dec-octet "." dec-octet "." dec-octet
//! ```
//!
//! The functions here operate on the text between the brackets
//! and report only acceptance or rejection.

use crate::pct_enc::{table::IPV_FUTURE, OCTET_TABLE_LO};

/// Parses an IPv6 address into its eight 16-bit groups.
///
/// Accepts at most one `"::"` eliding one or more zero groups,
/// and a dotted-decimal IPv4 address in place of the last two groups.
///
/// # Examples
///
/// ```
/// use uriutils::ip::parse_v6;
///
/// assert_eq!(parse_v6(b"2001:db8::1"), Some([0x2001, 0xdb8, 0, 0, 0, 0, 0, 1]));
/// assert_eq!(parse_v6(b"::ffff:192.0.2.1"), Some([0, 0, 0, 0, 0, 0xffff, 0xc000, 0x201]));
/// assert_eq!(parse_v6(b"::1::2"), None);
/// ```
#[must_use]
pub fn parse_v6(bytes: &[u8]) -> Option<[u16; 8]> {
    let mut reader = Reader::new(bytes);
    reader.read_v6().filter(|_| !reader.has_remaining())
}

/// Parses a dotted-decimal IPv4 address into its four octets.
///
/// Octets with leading zeros are rejected.
///
/// # Examples
///
/// ```
/// use uriutils::ip::parse_v4;
///
/// assert_eq!(parse_v4(b"192.0.2.1"), Some([192, 0, 2, 1]));
/// assert_eq!(parse_v4(b"192.0.2.01"), None);
/// ```
#[must_use]
pub fn parse_v4(bytes: &[u8]) -> Option<[u8; 4]> {
    let mut reader = Reader::new(bytes);
    reader
        .read_v4()
        .filter(|_| !reader.has_remaining())
        .map(u32::to_be_bytes)
}

/// Checks whether the text between the brackets of an IP literal
/// is an IPv6 address or an `IPvFuture`.
#[must_use]
pub fn is_valid_ip_literal(s: &str) -> bool {
    parse_v6(s.as_bytes()).is_some() || is_ipv_future(s.as_bytes())
}

pub(crate) fn is_ipv_future(bytes: &[u8]) -> bool {
    let [b'v' | b'V', rem @ ..] = bytes else {
        return false;
    };
    let Some(dot) = rem.iter().position(|&x| x == b'.') else {
        return false;
    };
    let (ver, addr) = (&rem[..dot], &rem[dot + 1..]);
    !ver.is_empty()
        && ver.iter().all(|&x| x.is_ascii_hexdigit())
        && !addr.is_empty()
        && IPV_FUTURE.validate(addr)
}

enum Seg {
    // *1":" 1*4HEXDIG
    Normal(u16, bool),
    // "::"
    Ellipsis,
    // *1":" 1*4HEXDIG "."
    MaybeV4(bool),
    // ":"
    SingleColon,
}

/// A cursor over an address.
///
/// # Invariants
///
/// `pos <= bytes.len()` and `pos` is non-decreasing.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    fn has_remaining(&self) -> bool {
        self.pos < self.bytes.len()
    }

    fn peek(&self, i: usize) -> Option<u8> {
        self.bytes.get(self.pos + i).copied()
    }

    fn skip(&mut self, n: usize) {
        self.pos += n;
        debug_assert!(self.pos <= self.bytes.len());
    }

    fn read_byte(&mut self, x: u8) -> bool {
        if self.peek(0) == Some(x) {
            self.skip(1);
            true
        } else {
            false
        }
    }

    fn read_v6(&mut self) -> Option<[u16; 8]> {
        let mut segs = [0; 8];
        let mut ellipsis_i = 8;

        let mut i = 0;
        while i < 8 {
            match self.read_v6_segment() {
                Some(Seg::Normal(seg, colon)) => {
                    if colon == (i == 0 || i == ellipsis_i) {
                        // Leading colon, triple colons, or no colon.
                        return None;
                    }
                    segs[i] = seg;
                    i += 1;
                }
                Some(Seg::Ellipsis) => {
                    if ellipsis_i != 8 {
                        // Multiple ellipses.
                        return None;
                    }
                    ellipsis_i = i;
                }
                Some(Seg::MaybeV4(colon)) => {
                    if i > 6 || colon == (i == 0 || i == ellipsis_i) {
                        // Not enough space, triple colons, or no colon.
                        return None;
                    }
                    let octets = self.read_v4()?.to_be_bytes();
                    segs[i] = u16::from_be_bytes([octets[0], octets[1]]);
                    segs[i + 1] = u16::from_be_bytes([octets[2], octets[3]]);
                    i += 2;
                    break;
                }
                Some(Seg::SingleColon) => return None,
                None => break,
            }
        }

        if ellipsis_i == 8 {
            if i != 8 {
                // Too short.
                return None;
            }
        } else if i == 8 {
            // Eliding nothing.
            return None;
        } else {
            // Shift the segments after the ellipsis to the right.
            for j in (ellipsis_i..i).rev() {
                segs[8 - (i - j)] = segs[j];
                segs[j] = 0;
            }
        }

        Some(segs)
    }

    fn read_v6_segment(&mut self) -> Option<Seg> {
        let colon = self.read_byte(b':');
        let Some(first) = self.peek(0) else {
            return colon.then_some(Seg::SingleColon);
        };

        let mut x = match OCTET_TABLE_LO[first as usize] {
            v if v < 128 => v as u16,
            _ => {
                return colon.then(|| {
                    if first == b':' {
                        self.skip(1);
                        Seg::Ellipsis
                    } else {
                        Seg::SingleColon
                    }
                });
            }
        };
        let mut i = 1;

        while i < 4 {
            let Some(b) = self.peek(i) else {
                break;
            };
            match OCTET_TABLE_LO[b as usize] {
                v if v < 128 => {
                    x = (x << 4) | v as u16;
                    i += 1;
                }
                _ if b == b'.' => return Some(Seg::MaybeV4(colon)),
                _ => break,
            }
        }
        if i == 4 && self.peek(4) == Some(b'.') {
            return Some(Seg::MaybeV4(colon));
        }
        self.skip(i);
        Some(Seg::Normal(x, colon))
    }

    fn read_v4(&mut self) -> Option<u32> {
        let mut addr = self.read_v4_octet()? << 24;
        for i in (0..3).rev() {
            if !self.read_byte(b'.') {
                return None;
            }
            addr |= self.read_v4_octet()? << (i * 8);
        }
        Some(addr)
    }

    fn read_v4_octet(&mut self) -> Option<u32> {
        let mut res = self.peek_digit(0)?;
        if res == 0 {
            self.skip(1);
            return Some(0);
        }

        for i in 1..3 {
            let Some(x) = self.peek_digit(i) else {
                self.skip(i);
                return Some(res);
            };
            res = res * 10 + x;
        }
        self.skip(3);

        u8::try_from(res).is_ok().then_some(res)
    }

    fn peek_digit(&self, i: usize) -> Option<u32> {
        self.peek(i).and_then(|x| (x as char).to_digit(10))
    }
}
