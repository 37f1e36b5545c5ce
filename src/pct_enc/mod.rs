//! Percent-encoding utilities.
//!
//! Encoding works on the UTF-8 bytes of the input: a byte is preserved if it
//! is an ASCII character [allowed] by the [`Table`], and is percent-encoded as
//! `'%'` followed by two uppercase hexadecimal digits otherwise.
//!
//! Decoding never translates `'+'` into a space, except through the explicitly
//! named [`decode_plus_as_space`].
//!
//! [allowed]: Table::allows

pub mod encoder;
mod estring;
pub mod table;

pub use estring::EString;
pub use table::Table;

use crate::error::{Component, DecodeError, DecodeErrorKind, ParseError, ParseErrorKind};
use std::{
    borrow::Cow,
    cmp::Ordering,
    hash,
    iter::FusedIterator,
    marker::PhantomData,
    str,
};
use ref_cast::{ref_cast_custom, RefCastCustom};
use table::Violation;

/// A trait used by [`EStr`] and [`EString`] to specify the table used for encoding.
///
/// # Sub-encoders
///
/// A sub-encoder `SubE` of `E` is an encoder such that `SubE::TABLE` is a [subset] of `E::TABLE`.
///
/// [subset]: Table::is_subset
pub trait Encoder: 'static {
    /// The table used for encoding.
    const TABLE: Table;
}

/// Percent-encodes a string with the given table.
///
/// # Examples
///
/// ```
/// use uriutils::pct_enc::{self, table::PATH};
///
/// assert_eq!(pct_enc::encode("/a b/ü", PATH), "/a%20b/%C3%BC");
/// ```
#[must_use]
pub fn encode(s: &str, table: Table) -> String {
    let mut buf = String::with_capacity(s.len());
    encode_to(s, table, &mut buf);
    buf
}

/// Percent-encodes a string with the given table and appends the result onto a buffer.
pub fn encode_to(s: &str, table: Table, buf: &mut String) {
    for chunk in Encode::new(table, s) {
        buf.push_str(chunk.as_str());
    }
}

/// Decodes a percent-encoded string.
///
/// This function allocates only when the string contains any percent-encoded octet.
///
/// # Errors
///
/// Returns `Err` if a `'%'` is not followed by two hexadecimal digits,
/// or if the decoded bytes are not valid UTF-8.
///
/// # Examples
///
/// ```
/// use uriutils::pct_enc;
///
/// assert_eq!(pct_enc::decode("%C2%A1Hola%21").unwrap(), "¡Hola!");
/// assert_eq!(pct_enc::decode("a+b").unwrap(), "a+b");
/// assert_eq!(pct_enc::decode("%FF").unwrap_err().index(), 0);
/// ```
pub fn decode(s: &str) -> Result<Cow<'_, str>, DecodeError> {
    if let Some(index) = find_invalid_octet(s.as_bytes()) {
        return Err(DecodeError {
            index,
            kind: DecodeErrorKind::InvalidOctet,
        });
    }
    Decode::new(s).to_string()
}

/// Decodes a percent-encoded string, taking `'+'` for a space.
///
/// This is the legacy `application/x-www-form-urlencoded` convention and is
/// not part of RFC 3986. Only use it on query parameter values produced by
/// an encoder known to follow that convention.
///
/// # Errors
///
/// Same as [`decode`].
///
/// # Examples
///
/// ```
/// use uriutils::pct_enc;
///
/// assert_eq!(pct_enc::decode_plus_as_space("a+b%2B").unwrap(), "a b+");
/// ```
pub fn decode_plus_as_space(s: &str) -> Result<Cow<'_, str>, DecodeError> {
    if !s.contains('+') {
        return decode(s);
    }
    // Same length, so error indexes still point into `s`.
    let replaced = s.replace('+', " ");
    decode(&replaced).map(|s| Cow::Owned(s.into_owned()))
}

/// Checks that every character in a string is either allowed by the table
/// or part of a well-formed percent-encoded octet.
///
/// # Errors
///
/// Returns `Err` pointing at the first offending character or malformed octet.
///
/// # Examples
///
/// ```
/// use uriutils::{pct_enc::{self, table::PATH}, ParseErrorKind};
///
/// assert!(pct_enc::validate("/a%20b", PATH).is_ok());
///
/// let e = pct_enc::validate("/a b", PATH).unwrap_err();
/// assert_eq!(e.index(), 2);
/// assert_eq!(e.kind(), ParseErrorKind::UnexpectedChar);
/// ```
pub fn validate(s: &str, table: Table) -> Result<(), ParseError> {
    check(s, table, None)
}

/// Checks a string against the table of a component.
pub(crate) fn check_component(s: &str, component: Component) -> Result<(), ParseError> {
    check(s, component.table(), Some(component))
}

fn check(s: &str, table: Table, component: Option<Component>) -> Result<(), ParseError> {
    table.check(s.as_bytes()).map_err(|v| {
        let (index, kind) = match v {
            Violation::InvalidOctet(i) => (i, ParseErrorKind::InvalidOctet),
            Violation::UnexpectedChar(i) => (i, ParseErrorKind::UnexpectedChar),
        };
        ParseError::new(s, index, kind, component)
    })
}

fn find_invalid_octet(s: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < s.len() {
        if s[i] == b'%' {
            match s.get(i + 1..i + 3) {
                Some(&[hi, lo]) if is_hexdig_pair(hi, lo) => i += 3,
                _ => return Some(i),
            }
        } else {
            i += 1;
        }
    }
    None
}

/// Percent-encoded string slices.
///
/// The owned counterpart of `EStr` is [`EString`].
///
/// # Type parameter
///
/// The `EStr<E>` type is parameterized over a type `E` that implements [`Encoder`].
/// The underlying string of an `EStr<E>` slice only consists of characters allowed
/// by `E::TABLE` and, if the table [allows percent-encoded octets], of well-formed
/// percent-encoded octets.
///
/// [allows percent-encoded octets]: Table::allows_pct_encoded
///
/// # Comparison
///
/// `EStr` slices are compared [lexicographically](Ord#lexicographical-comparison)
/// by their byte values. Normalization is **not** performed prior to comparison.
///
/// # Examples
///
/// ```
/// use uriutils::{pct_enc::EStr, Uri};
///
/// let uri = Uri::parse("?name=%E5%BC%A0%E4%B8%89&speech=%C2%A1Ol%C3%A9%21")?;
/// let query = uri.encoded_query().unwrap();
/// let (k, v) = query.split('&').nth(1).unwrap().split_once('=').unwrap();
/// assert_eq!(k, "speech");
/// assert_eq!(v.decode().to_string().unwrap(), "¡Olé!");
/// # Ok::<_, uriutils::ParseError>(())
/// ```
#[derive(RefCastCustom)]
#[repr(transparent)]
pub struct EStr<E: Encoder> {
    encoder: PhantomData<E>,
    inner: str,
}

struct Assert<L: Encoder, R: Encoder> {
    _marker: PhantomData<(L, R)>,
}

impl<L: Encoder, R: Encoder> Assert<L, R> {
    const L_IS_SUB_ENCODER_OF_R: () = assert!(L::TABLE.is_subset(R::TABLE), "not a sub-encoder");
}

impl<E: Encoder> EStr<E> {
    const ASSERT_ALLOWS_PCT_ENCODED: () = assert!(
        E::TABLE.allows_pct_encoded(),
        "table does not allow percent-encoded octets"
    );

    /// Converts a string slice to an `EStr` slice assuming validity.
    #[ref_cast_custom]
    pub(crate) const fn new_validated(s: &str) -> &Self;

    /// An empty `EStr` slice.
    pub const EMPTY: &'static Self = Self::new_validated("");

    /// Converts a string slice to an `EStr` slice.
    ///
    /// # Panics
    ///
    /// Panics if the string is not properly encoded with `E`.
    /// For a non-panicking variant, use [`new`](Self::new).
    #[must_use]
    pub fn new_or_panic(s: &str) -> &Self {
        match Self::new(s) {
            Some(s) => s,
            None => panic!("improperly encoded string"),
        }
    }

    /// Converts a string slice to an `EStr` slice, returning `None` if the conversion fails.
    #[must_use]
    pub fn new(s: &str) -> Option<&Self> {
        if E::TABLE.validate(s.as_bytes()) {
            Some(Self::new_validated(s))
        } else {
            None
        }
    }

    /// Yields the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns the length of the `EStr` slice in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Checks whether the `EStr` slice is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns an iterator used to decode the `EStr` slice.
    ///
    /// Always **split before decoding**, as otherwise the data may be
    /// mistaken for component delimiters.
    ///
    /// Note that the iterator will **not** decode `U+002B` (+) as `0x20` (space).
    ///
    /// # Panics
    ///
    /// Panics at compile time if `E::TABLE` does not [allow percent-encoded octets].
    ///
    /// [allow percent-encoded octets]: Table::allows_pct_encoded
    pub fn decode(&self) -> Decode<'_> {
        () = Self::ASSERT_ALLOWS_PCT_ENCODED;
        Decode::new(&self.inner)
    }

    /// Returns an iterator over subslices of the `EStr` slice separated by the given delimiter.
    ///
    /// # Panics
    ///
    /// Panics if the delimiter is not a [reserved] character.
    ///
    /// [reserved]: https://datatracker.ietf.org/doc/html/rfc3986#section-2.2
    ///
    /// # Examples
    ///
    /// ```
    /// use uriutils::pct_enc::{encoder::Path, EStr};
    ///
    /// assert!(EStr::<Path>::new_or_panic("a,b,c").split(',').eq(["a", "b", "c"]));
    /// assert!(EStr::<Path>::new_or_panic(",").split(',').eq(["", ""]));
    /// assert!(EStr::<Path>::EMPTY.split(',').eq([""]));
    /// ```
    pub fn split(&self, delim: char) -> Split<'_, E> {
        assert!(
            table::RESERVED.allows(delim),
            "splitting with non-reserved character"
        );
        Split {
            inner: self.inner.split(delim),
            encoder: PhantomData,
        }
    }

    /// Splits the `EStr` slice on the first occurrence of the given delimiter and
    /// returns prefix before delimiter and suffix after delimiter.
    ///
    /// Returns `None` if the delimiter is not found.
    ///
    /// # Panics
    ///
    /// Panics if the delimiter is not a [reserved] character.
    ///
    /// [reserved]: https://datatracker.ietf.org/doc/html/rfc3986#section-2.2
    #[must_use]
    pub fn split_once(&self, delim: char) -> Option<(&Self, &Self)> {
        assert!(
            table::RESERVED.allows(delim),
            "splitting with non-reserved character"
        );
        self.inner
            .split_once(delim)
            .map(|(a, b)| (Self::new_validated(a), Self::new_validated(b)))
    }
}

impl<E: Encoder> AsRef<str> for EStr<E> {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl<E: Encoder> PartialEq for EStr<E> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<E: Encoder> PartialEq<str> for EStr<E> {
    fn eq(&self, other: &str) -> bool {
        &self.inner == other
    }
}

impl<E: Encoder> PartialEq<&str> for EStr<E> {
    fn eq(&self, other: &&str) -> bool {
        &self.inner == *other
    }
}

impl<E: Encoder> PartialEq<EStr<E>> for str {
    fn eq(&self, other: &EStr<E>) -> bool {
        self == &other.inner
    }
}

impl<E: Encoder> Eq for EStr<E> {}

impl<E: Encoder> hash::Hash for EStr<E> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl<E: Encoder> PartialOrd for EStr<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E: Encoder> Ord for EStr<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl<E: Encoder> Default for &EStr<E> {
    /// Creates an empty `EStr` slice.
    fn default() -> Self {
        EStr::EMPTY
    }
}

impl<E: Encoder> ToOwned for EStr<E> {
    type Owned = EString<E>;

    fn to_owned(&self) -> EString<E> {
        EString::new_validated(self.inner.to_owned())
    }
}

impl<E: Encoder> std::fmt::Debug for EStr<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.inner, f)
    }
}

impl<E: Encoder> std::fmt::Display for EStr<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.inner, f)
    }
}

const fn gen_octet_table(hi: bool) -> [u8; 256] {
    let mut out = [0xff; 256];
    let shift = if hi { 4 } else { 0 };

    let mut i = 0;
    while i < 10 {
        out[(i + b'0') as usize] = i << shift;
        i += 1;
    }
    while i < 16 {
        out[(i - 10 + b'A') as usize] = i << shift;
        out[(i - 10 + b'a') as usize] = i << shift;
        i += 1;
    }
    out
}

const OCTET_TABLE_HI: &[u8; 256] = &gen_octet_table(true);
pub(crate) const OCTET_TABLE_LO: &[u8; 256] = &gen_octet_table(false);

pub(crate) const fn is_hexdig(x: u8) -> bool {
    OCTET_TABLE_LO[x as usize] < 128
}

pub(crate) const fn is_hexdig_pair(x: u8, y: u8) -> bool {
    is_hexdig(x) & is_hexdig(y)
}

/// Decodes a percent-encoded octet, assuming that the bytes are hexadecimal.
fn decode_octet(hi: u8, lo: u8) -> u8 {
    debug_assert!(hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit());
    OCTET_TABLE_HI[hi as usize] | OCTET_TABLE_LO[lo as usize]
}

/// Returns the index in `source` of the encoded form of the `n`-th decoded byte.
fn source_index(source: &[u8], n: usize) -> usize {
    let mut i = 0;
    for _ in 0..n {
        i += if source[i] == b'%' { 3 } else { 1 };
    }
    i
}

/// An iterator used to decode an [`EStr`] slice.
///
/// This struct is created by [`EStr::decode`]. Normally you'll use the methods below
/// instead of iterating over a `Decode` manually.
///
/// See the [`DecodedChunk`] type for documentation of the items yielded by this iterator.
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Decode<'a> {
    source: &'a str,
}

/// An item returned by the [`Decode`] iterator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodedChunk<'a> {
    /// An unencoded subslice.
    Unencoded(&'a str),
    /// A percent-encoded octet, decoded (for example, `"%20"` decoded as `0x20`).
    PctDecoded(u8),
}

impl<'a> Decode<'a> {
    /// Assumes that every `'%'` in `source` starts a well-formed octet.
    pub(crate) fn new(source: &'a str) -> Self {
        Self { source }
    }

    fn next_if_unencoded(&mut self) -> Option<&'a str> {
        let i = self
            .source
            .bytes()
            .position(|x| x == b'%')
            .unwrap_or(self.source.len());

        if i == 0 {
            None
        } else {
            let s;
            (s, self.source) = self.source.split_at(i);
            Some(s)
        }
    }

    fn decoded_len(&self) -> usize {
        self.source.len() - self.source.bytes().filter(|&x| x == b'%').count() * 2
    }

    /// Decodes the slice to bytes.
    ///
    /// This method allocates only when the slice contains any percent-encoded octet.
    #[must_use]
    pub fn to_bytes(self) -> Cow<'a, [u8]> {
        if !self.source.contains('%') {
            return Cow::Borrowed(self.source.as_bytes());
        }

        let mut buf = Vec::with_capacity(self.decoded_len());
        for chunk in self {
            match chunk {
                DecodedChunk::Unencoded(s) => buf.extend_from_slice(s.as_bytes()),
                DecodedChunk::PctDecoded(x) => buf.push(x),
            }
        }
        Cow::Owned(buf)
    }

    /// Attempts to decode the slice to a string.
    ///
    /// This method allocates only when the slice contains any percent-encoded octet.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the decoded bytes are not valid UTF-8.
    /// The error index points into the encoded slice.
    pub fn to_string(self) -> Result<Cow<'a, str>, DecodeError> {
        let source = self.source;
        match self.to_bytes() {
            Cow::Borrowed(_) => Ok(Cow::Borrowed(source)),
            Cow::Owned(bytes) => String::from_utf8(bytes).map(Cow::Owned).map_err(|e| {
                let valid_up_to = e.utf8_error().valid_up_to();
                DecodeError {
                    index: source_index(source.as_bytes(), valid_up_to),
                    kind: DecodeErrorKind::InvalidUtf8,
                }
            }),
        }
    }

    /// Decodes the slice to a string, replacing any invalid UTF-8 sequences with
    /// [`U+FFFD REPLACEMENT CHARACTER`][U+FFFD].
    ///
    /// [U+FFFD]: char::REPLACEMENT_CHARACTER
    #[must_use]
    pub fn to_string_lossy(self) -> Cow<'a, str> {
        let source = self.source;
        match self.to_bytes() {
            Cow::Borrowed(_) => Cow::Borrowed(source),
            Cow::Owned(bytes) => match String::from_utf8_lossy(&bytes) {
                Cow::Borrowed(s) => Cow::Owned(s.to_owned()),
                Cow::Owned(s) => Cow::Owned(s),
            },
        }
    }
}

impl<'a> Iterator for Decode<'a> {
    type Item = DecodedChunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.source.is_empty() {
            None
        } else if let Some(s) = self.next_if_unencoded() {
            Some(DecodedChunk::Unencoded(s))
        } else {
            let s;
            (s, self.source) = self.source.split_at(3);
            let x = decode_octet(s.as_bytes()[1], s.as_bytes()[2]);
            Some(DecodedChunk::PctDecoded(x))
        }
    }
}

impl FusedIterator for Decode<'_> {}

pub(crate) fn encode_byte(x: u8) -> &'static str {
    const TABLE: &[u8; 256 * 3] = &{
        const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

        let mut i = 0;
        let mut table = [0; 256 * 3];
        while i < 256 {
            table[i * 3] = b'%';
            table[i * 3 + 1] = HEX_DIGITS[i >> 4];
            table[i * 3 + 2] = HEX_DIGITS[i & 0b1111];
            i += 1;
        }
        table
    };

    const TABLE_STR: &str = match str::from_utf8(TABLE) {
        Ok(s) => s,
        Err(_) => unreachable!(),
    };

    &TABLE_STR[x as usize * 3..x as usize * 3 + 3]
}

/// An iterator used to percent-encode a string slice.
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub(crate) struct Encode<'s> {
    table: Table,
    source: &'s str,
    to_enc: &'s [u8],
}

impl<'s> Encode<'s> {
    pub(crate) fn new(table: Table, source: &'s str) -> Self {
        Self {
            table,
            source,
            to_enc: &[],
        }
    }
}

/// An item returned by the [`Encode`] iterator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EncodedChunk<'a> {
    /// An unencoded subslice.
    Unencoded(&'a str),
    /// A byte, percent-encoded (for example, `0x20` encoded as `"%20"`).
    PctEncoded(&'static str),
}

impl<'a> EncodedChunk<'a> {
    pub(crate) fn as_str(self) -> &'a str {
        match self {
            Self::Unencoded(s) | Self::PctEncoded(s) => s,
        }
    }
}

impl<'a> Iterator for Encode<'a> {
    type Item = EncodedChunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let [x, rem @ ..] = self.to_enc {
            self.to_enc = rem;
            return Some(EncodedChunk::PctEncoded(encode_byte(*x)));
        }

        if self.source.is_empty() {
            return None;
        }

        let first_unallowed_i = self
            .source
            .bytes()
            .position(|x| !self.table.allows_ascii(x))
            .unwrap_or(self.source.len());

        if first_unallowed_i == 0 {
            // Encode the whole run of disallowed bytes, one per call.
            let next_allowed_i = self
                .source
                .char_indices()
                .find_map(|(i, ch)| self.table.allows(ch).then_some(i))
                .unwrap_or(self.source.len());

            let unallowed = &self.source.as_bytes()[..next_allowed_i];
            self.source = &self.source[next_allowed_i..];
            self.to_enc = &unallowed[1..];

            Some(EncodedChunk::PctEncoded(encode_byte(unallowed[0])))
        } else {
            let allowed;
            (allowed, self.source) = self.source.split_at(first_unallowed_i);
            Some(EncodedChunk::Unencoded(allowed))
        }
    }
}

impl FusedIterator for Encode<'_> {}

/// An iterator over subslices of an [`EStr`] slice separated by a delimiter.
///
/// This struct is created by [`EStr::split`].
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Split<'a, E: Encoder> {
    inner: str::Split<'a, char>,
    encoder: PhantomData<E>,
}

impl<'a, E: Encoder> Iterator for Split<'a, E> {
    type Item = &'a EStr<E>;

    fn next(&mut self) -> Option<&'a EStr<E>> {
        self.inner.next().map(EStr::new_validated)
    }
}

impl<'a, E: Encoder> DoubleEndedIterator for Split<'a, E> {
    fn next_back(&mut self) -> Option<&'a EStr<E>> {
        self.inner.next_back().map(EStr::new_validated)
    }
}

impl<E: Encoder> FusedIterator for Split<'_, E> {}
