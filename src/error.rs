//! Error types.

use crate::pct_enc::{table::*, Table};
use std::{error::Error, fmt};

/// A component of a URI, named in error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    /// The scheme component.
    Scheme,
    /// The userinfo subcomponent of authority.
    Userinfo,
    /// The host subcomponent of authority.
    Host,
    /// The port subcomponent of authority.
    Port,
    /// The path component.
    Path,
    /// The query component.
    Query,
    /// The fragment component.
    Fragment,
}

impl Component {
    /// Returns the lowercase name of the component.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheme => "scheme",
            Self::Userinfo => "userinfo",
            Self::Host => "host",
            Self::Port => "port",
            Self::Path => "path",
            Self::Query => "query",
            Self::Fragment => "fragment",
        }
    }

    /// The table the encoded form of the component is checked against.
    pub(crate) fn table(self) -> Table {
        match self {
            Self::Scheme => SCHEME,
            Self::Userinfo => USERINFO,
            Self::Host => REG_NAME,
            Self::Port => DIGIT,
            Self::Path => PATH,
            Self::Query => QUERY,
            Self::Fragment => FRAGMENT,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detailed cause of a [`ParseError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Invalid percent-encoded octet that is either non-hexadecimal or incomplete.
    ///
    /// The error index points to the percent character "%" of the octet.
    InvalidOctet,
    /// Unexpected character that is not allowed by the URI syntax.
    ///
    /// The error index points to the first byte of the character.
    UnexpectedChar,
    /// Invalid IP literal address.
    ///
    /// The error index points to the first byte after the left square bracket "[".
    InvalidIpLiteral,
    /// Port that does not fit in 16 bits.
    ///
    /// The error index points to the first digit of the port.
    InvalidPort,
    /// Host that cannot be converted to an ASCII-compatible domain name.
    ///
    /// The error index is always zero.
    InvalidDomain,
}

/// An error occurred when parsing or validating URI text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub(crate) input: String,
    pub(crate) index: usize,
    pub(crate) kind: ParseErrorKind,
    pub(crate) component: Option<Component>,
}

impl ParseError {
    pub(crate) fn new(
        input: &str,
        index: usize,
        kind: ParseErrorKind,
        component: Option<Component>,
    ) -> Self {
        Self {
            input: input.into(),
            index,
            kind,
            component,
        }
    }

    /// Returns the input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Recovers the input that failed to parse.
    #[must_use]
    pub fn into_input(self) -> String {
        self.input
    }

    /// Returns the byte index at which the error occurred.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// Returns the component in which the error occurred, if known.
    #[must_use]
    pub fn component(&self) -> Option<Component> {
        self.component
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.kind {
            ParseErrorKind::InvalidOctet => "malformed percent-encoded octet",
            ParseErrorKind::UnexpectedChar => "illegal character",
            ParseErrorKind::InvalidIpLiteral => "invalid IP literal",
            ParseErrorKind::InvalidPort => "port out of range",
            ParseErrorKind::InvalidDomain => "invalid internationalized domain name",
        };
        f.write_str(reason)?;
        if let Some(component) = self.component {
            write!(f, " in {component}")?;
        }
        write!(f, " at index {} of {:?}", self.index, self.input)
    }
}

impl Error for ParseError {}

/// Detailed cause of a [`DecodeError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Invalid percent-encoded octet that is either non-hexadecimal or incomplete.
    ///
    /// The error index points to the percent character "%" of the octet.
    InvalidOctet,
    /// The decoded bytes are not valid UTF-8.
    ///
    /// The error index points to the start of the first byte sequence
    /// that fails to decode.
    InvalidUtf8,
}

/// An error occurred when decoding a percent-encoded string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeError {
    pub(crate) index: usize,
    pub(crate) kind: DecodeErrorKind,
}

impl DecodeError {
    /// Returns the index in the encoded string at which the error occurred.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> DecodeErrorKind {
        self.kind
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.kind {
            DecodeErrorKind::InvalidOctet => "malformed percent-encoded octet at index ",
            DecodeErrorKind::InvalidUtf8 => "invalid UTF-8 sequence at index ",
        };
        write!(f, "{}{}", msg, self.index)
    }
}

impl Error for DecodeError {}

/// The class of a [`BuildError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// A structurally invalid value was passed to a setter.
    Argument,
    /// A mutation style incompatible with the current state of a component was used.
    State,
    /// Text violating the URI grammar was supplied.
    Syntax,
}

/// An error occurred when setting a component on a [`Builder`] or building a [`Uri`].
///
/// [`Builder`]: crate::Builder
/// [`Uri`]: crate::Uri
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildError {
    /// The scheme is empty.
    EmptyScheme,
    /// The scheme does not start with a letter or contains
    /// a character other than letters, digits, `'+'`, `'-'` and `'.'`.
    InvalidScheme {
        /// The byte index of the offending character.
        index: usize,
    },
    /// Authority is present, but the path is not empty and does not start with `'/'`.
    RootlessPathWithAuthority,
    /// Authority is not present, but the path starts with `"//"`.
    PathStartsWithDoubleSlash,
    /// A pre-encoded value was set after appending to the component.
    AlreadyAppended(Component),
    /// Pre-encoded text or a host violates the URI syntax.
    Syntax(ParseError),
}

impl BuildError {
    /// Returns the class of the error.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::EmptyScheme
            | Self::InvalidScheme { .. }
            | Self::RootlessPathWithAuthority
            | Self::PathStartsWithDoubleSlash => ErrorClass::Argument,
            Self::AlreadyAppended(_) => ErrorClass::State,
            Self::Syntax(_) => ErrorClass::Syntax,
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyScheme => f.write_str("empty scheme"),
            Self::InvalidScheme { index } => write!(f, "illegal character in scheme at index {index}"),
            Self::RootlessPathWithAuthority => f.write_str(
                "when authority is present, path should either be empty or start with '/'",
            ),
            Self::PathStartsWithDoubleSlash => {
                f.write_str("when authority is not present, path should not start with \"//\"")
            }
            Self::AlreadyAppended(component) => write!(f, "{component} already appended to"),
            Self::Syntax(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl Error for BuildError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Syntax(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for BuildError {
    fn from(e: ParseError) -> Self {
        Self::Syntax(e)
    }
}
