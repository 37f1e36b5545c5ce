//! Byte pattern tables from RFC 3986.
//!
//! The predefined table constants in this module are documented with
//! the ABNF notation of [RFC 5234].
//!
//! [RFC 5234]: https://datatracker.ietf.org/doc/html/rfc5234

use crate::pct_enc;

const MASK_PCT_ENCODED: u64 = 1 << b'%';
const MASK_UNENCODED_ASCII: u64 = !MASK_PCT_ENCODED;

/// A table specifying the byte patterns allowed in a string.
///
/// The table is a pair of bitmasks covering the ASCII range: the first
/// for `0x00..=0x3F` and the second for `0x40..=0x7F`. The bit of `'%'`
/// is reused as a marker meaning that percent-encoded octets are allowed.
///
/// Non-ASCII characters are never allowed unencoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Table(u64, u64);

/// The first violation found when checking a string against a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Violation {
    /// A `'%'` not followed by two hexadecimal digits, at the given index.
    InvalidOctet(usize),
    /// A character not allowed by the table, at the given index.
    UnexpectedChar(usize),
}

impl Table {
    /// Creates a table that only allows the given unencoded bytes.
    ///
    /// # Panics
    ///
    /// Panics if any of the bytes is not ASCII or equals `b'%'`.
    #[must_use]
    pub const fn new(mut bytes: &[u8]) -> Self {
        let mut table = 0;
        while let [cur, rem @ ..] = bytes {
            assert!(
                !matches!(cur, b'%' | 128..),
                "cannot allow non-ASCII byte or %"
            );
            table |= 1u128.wrapping_shl(*cur as u32);
            bytes = rem;
        }
        Self(table as u64, (table >> 64) as u64)
    }

    /// Combines two tables into one.
    ///
    /// Returns a new table that allows all the byte patterns allowed
    /// by `self` or by `other`.
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        Self(self.0 | other.0, self.1 | other.1)
    }

    /// Marks this table as allowing percent-encoded octets.
    #[must_use]
    pub const fn or_pct_encoded(self) -> Self {
        Self(self.0 | MASK_PCT_ENCODED, self.1)
    }

    /// Subtracts from this table.
    ///
    /// Returns a new table that allows all the byte patterns allowed
    /// by `self` but not allowed by `other`.
    #[must_use]
    pub const fn sub(self, other: Self) -> Self {
        Self(self.0 & !other.0, self.1 & !other.1)
    }

    /// Checks whether the table is a subset of another, i.e., `other`
    /// allows at least all the byte patterns allowed by `self`.
    #[must_use]
    pub const fn is_subset(self, other: Self) -> bool {
        self.0 & other.0 == self.0 && self.1 & other.1 == self.1
    }

    /// Checks whether the given unencoded byte is allowed by the table.
    ///
    /// Always returns `false` for non-ASCII bytes.
    #[inline]
    #[must_use]
    pub const fn allows_ascii(self, x: u8) -> bool {
        let table = if x < 64 {
            self.0 & MASK_UNENCODED_ASCII
        } else if x < 128 {
            self.1
        } else {
            0
        };
        table & 1u64.wrapping_shl(x as u32) != 0
    }

    /// Checks whether the given unencoded character is allowed by the table.
    #[inline]
    #[must_use]
    pub const fn allows(self, ch: char) -> bool {
        ch.is_ascii() && self.allows_ascii(ch as u8)
    }

    /// Checks whether percent-encoded octets are allowed by the table.
    #[inline]
    #[must_use]
    pub const fn allows_pct_encoded(self) -> bool {
        self.0 & MASK_PCT_ENCODED != 0
    }

    /// Checks the given string with the table, returning the first violation.
    pub(crate) fn check(self, s: &[u8]) -> Result<(), Violation> {
        let allow_pct_encoded = self.allows_pct_encoded();
        let mut i = 0;

        while i < s.len() {
            let x = s[i];
            if allow_pct_encoded && x == b'%' {
                let [hi, lo, ..] = s[i + 1..] else {
                    return Err(Violation::InvalidOctet(i));
                };
                if !pct_enc::is_hexdig_pair(hi, lo) {
                    return Err(Violation::InvalidOctet(i));
                }
                i += 3;
            } else {
                if !self.allows_ascii(x) {
                    return Err(Violation::UnexpectedChar(i));
                }
                i += 1;
            }
        }
        Ok(())
    }

    /// Validates the given string with the table.
    #[inline]
    pub(crate) fn validate(self, s: &[u8]) -> bool {
        self.check(s).is_ok()
    }
}

const fn new(bytes: &[u8]) -> Table {
    Table::new(bytes)
}

/// `ALPHA = %x41-5A / %x61-7A`
pub const ALPHA: Table = new(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz");

/// `DIGIT = %x30-39`
pub const DIGIT: Table = new(b"0123456789");

/// `HEXDIG = DIGIT / "A" / "B" / "C" / "D" / "E" / "F"`
pub const HEXDIG: Table = DIGIT.or(new(b"ABCDEFabcdef"));

/// `scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
pub const SCHEME: Table = ALPHA.or(DIGIT).or(new(b"+-."));

/// `userinfo = *( unreserved / pct-encoded / sub-delims / ":" )`
pub const USERINFO: Table = UNRESERVED.or(SUB_DELIMS).or(new(b":")).or_pct_encoded();

/// `IPvFuture = "v" 1*HEXDIG "." 1*( unreserved / sub-delims / ":" )`
pub const IPV_FUTURE: Table = UNRESERVED.or(SUB_DELIMS).or(new(b":"));

/// `reg-name = *( unreserved / pct-encoded / sub-delims )`
pub const REG_NAME: Table = UNRESERVED.or(SUB_DELIMS).or_pct_encoded();

/// `path = *( pchar / "/" )`
pub const PATH: Table = PCHAR.or(new(b"/"));

/// `pchar = unreserved / pct-encoded / sub-delims / ":" / "@"`
pub const PCHAR: Table = UNRESERVED.or(SUB_DELIMS).or(new(b":@")).or_pct_encoded();

/// `query = *( pchar / "/" / "?" )`
pub const QUERY: Table = PCHAR.or(new(b"/?"));

/// `fragment = *( pchar / "/" / "?" )`
pub const FRAGMENT: Table = QUERY;

/// A name or value of a query parameter: `query` without `"&"`, `"="` and `"+"`.
///
/// `"&"` and `"="` delimit parameters. `"+"` is excluded so that encoded
/// values never contain a literal plus that a form decoder could take for a space.
pub const QUERY_PARAM: Table = QUERY.sub(new(b"&=+"));

/// `unreserved = ALPHA / DIGIT / "-" / "." / "_" / "~"`
pub const UNRESERVED: Table = ALPHA.or(DIGIT).or(new(b"-._~"));

/// `reserved = gen-delims / sub-delims`
pub const RESERVED: Table = GEN_DELIMS.or(SUB_DELIMS);

/// `gen-delims = ":" / "/" / "?" / "#" / "[" / "]" / "@"`
pub const GEN_DELIMS: Table = new(b":/?#[]@");

/// `sub-delims = "!" / "$" / "&" / "'" / "(" / ")"
///             / "*" / "+" / "," / ";" / "="`
pub const SUB_DELIMS: Table = new(b"!$&'()*+,;=");
