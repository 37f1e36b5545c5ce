use crate::{
    builder::Builder,
    error::{DecodeError, ParseError},
    host::{self, Host},
    parse::{self, Components},
    pct_enc::{
        encoder::{Fragment, Path, Query, Userinfo},
        EStr,
    },
    query::QueryParams,
};
use std::{borrow::Cow, cmp::Ordering, hash, str::FromStr, sync::OnceLock};

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// An immutable URI reference defined in [RFC 3986].
///
/// [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986/
///
/// A `Uri` holds the percent-encoded form of each component, fixed when it is
/// parsed or built. Decoded forms and the string form are computed on first
/// access and cached, so repeated access is cheap and every accessor takes `&self`.
///
/// # Comparison
///
/// `Uri`s are compared, hashed and ordered by their string forms.
/// Normalization is **not** performed prior to comparison.
///
/// # Examples
///
/// Parse and extract components from a URI:
///
/// ```
/// use uriutils::Uri;
///
/// let uri = Uri::parse("foo://user@example.com:8042/over/there?name=ferret#nose")?;
///
/// assert_eq!(uri.scheme(), Some("foo"));
/// assert_eq!(uri.encoded_userinfo().unwrap(), "user");
/// assert_eq!(uri.encoded_host(), Some("example.com"));
/// assert_eq!(uri.port(), Some(8042));
/// assert_eq!(uri.encoded_path(), "/over/there");
/// assert_eq!(uri.encoded_query().unwrap(), "name=ferret");
/// assert_eq!(uri.encoded_fragment().unwrap(), "nose");
/// # Ok::<_, uriutils::ParseError>(())
/// ```
///
/// Modify a copy of a URI:
///
/// ```
/// use uriutils::Uri;
///
/// let uri = Uri::parse("http://example.com/a?x=1")?;
/// let next = uri.to_builder().append_query_param("y", Some("2")).build()?;
/// assert_eq!(next, "http://example.com/a?x=1&y=2");
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct Uri {
    scheme: Option<String>,
    userinfo: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
    cache: Cache,
}

type Decoded<T> = OnceLock<Result<T, DecodeError>>;

/// Values derived from the components, each computed at most once.
#[derive(Clone, Default)]
struct Cache {
    string: OnceLock<String>,
    userinfo: Decoded<String>,
    host: Decoded<String>,
    path: Decoded<String>,
    path_segments: Decoded<Vec<String>>,
    query_params: Decoded<QueryParams>,
    fragment: Decoded<String>,
}

fn get_or_decode<T>(
    cell: &Decoded<T>,
    f: impl FnOnce() -> Result<T, DecodeError>,
) -> Result<&T, DecodeError> {
    match cell.get_or_init(f) {
        Ok(v) => Ok(v),
        Err(e) => Err(*e),
    }
}

impl Uri {
    /// Parses a URI reference from a string.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string does not match the URI-reference ABNF
    /// rule from RFC 3986, or if the port does not fit in 16 bits.
    ///
    /// # Examples
    ///
    /// ```
    /// use uriutils::{error::Component, ParseErrorKind, Uri};
    ///
    /// let e = Uri::parse("http://example.com/a b").unwrap_err();
    /// assert_eq!(e.index(), 20);
    /// assert_eq!(e.kind(), ParseErrorKind::UnexpectedChar);
    /// assert_eq!(e.component(), Some(Component::Path));
    /// ```
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let mut uri = Self::from_components(parse::parse(s)?);
        uri.cache.string = OnceLock::from(s.to_owned());
        Ok(uri)
    }

    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Creates a builder holding the components of this URI,
    /// which can be modified and built into a new URI.
    #[must_use]
    pub fn to_builder(&self) -> Builder {
        Builder::from_uri(self)
    }

    pub(crate) fn from_components(c: Components<'_>) -> Self {
        Self {
            scheme: c.scheme.map(Into::into),
            userinfo: c.userinfo.map(Into::into),
            host: c.host.map(Into::into),
            port: c.port,
            path: c.path.into(),
            query: c.query.map(Into::into),
            fragment: c.fragment.map(Into::into),
            cache: Cache::default(),
        }
    }

    /// Returns the string form of the URI.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.cache.string.get_or_init(|| self.serialize())
    }

    fn serialize(&self) -> String {
        let mut buf = String::new();
        if let Some(scheme) = &self.scheme {
            buf.push_str(scheme);
            buf.push(':');
        }
        if let Some(host) = &self.host {
            buf.push_str("//");
            if let Some(userinfo) = &self.userinfo {
                buf.push_str(userinfo);
                buf.push('@');
            }
            buf.push_str(host);
            if let Some(port) = self.port {
                buf.push(':');
                buf.push_str(&port.to_string());
            }
        }
        buf.push_str(&self.path);
        if let Some(query) = &self.query {
            buf.push('?');
            buf.push_str(query);
        }
        if let Some(fragment) = &self.fragment {
            buf.push('#');
            buf.push_str(fragment);
        }
        buf
    }

    /// Returns the [scheme] component.
    ///
    /// [scheme]: https://datatracker.ietf.org/doc/html/rfc3986/#section-3.1
    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Returns the percent-encoded [userinfo] subcomponent.
    ///
    /// [userinfo]: https://datatracker.ietf.org/doc/html/rfc3986/#section-3.2.1
    #[must_use]
    pub fn encoded_userinfo(&self) -> Option<&EStr<Userinfo>> {
        self.userinfo.as_deref().map(EStr::new_validated)
    }

    /// Returns the decoded userinfo subcomponent.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the decoded bytes are not valid UTF-8.
    pub fn userinfo(&self) -> Result<Option<&str>, DecodeError> {
        let Some(encoded) = self.encoded_userinfo() else {
            return Ok(None);
        };
        get_or_decode(&self.cache.userinfo, || {
            encoded.decode().to_string().map(Cow::into_owned)
        })
        .map(|s| Some(s.as_str()))
    }

    /// Returns the encoded [host] subcomponent.
    ///
    /// An IP literal is returned with its brackets.
    ///
    /// [host]: https://datatracker.ietf.org/doc/html/rfc3986/#section-3.2.2
    #[must_use]
    pub fn encoded_host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Returns the decoded host subcomponent.
    ///
    /// An IP literal is returned without its brackets. A registered name is
    /// percent-decoded, with ASCII-compatible `xn--` labels converted to Unicode.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the decoded bytes are not valid UTF-8.
    ///
    /// # Examples
    ///
    /// ```
    /// use uriutils::Uri;
    ///
    /// let uri = Uri::parse("http://xn--bcher-kva.example")?;
    /// assert_eq!(uri.host().unwrap(), Some("bücher.example"));
    ///
    /// let uri = Uri::parse("http://[fe80::1]:80")?;
    /// assert_eq!(uri.host().unwrap(), Some("fe80::1"));
    /// # Ok::<_, uriutils::ParseError>(())
    /// ```
    pub fn host(&self) -> Result<Option<&str>, DecodeError> {
        let Some(encoded) = self.encoded_host() else {
            return Ok(None);
        };
        get_or_decode(&self.cache.host, || host::decode(encoded)).map(|s| Some(s.as_str()))
    }

    /// Returns the host subcomponent classified by its syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::net::Ipv4Addr;
    /// use uriutils::{Host, Uri};
    ///
    /// let uri = Uri::parse("//127.0.0.1")?;
    /// assert_eq!(uri.host_parsed(), Some(Host::Ipv4(Ipv4Addr::LOCALHOST)));
    /// # Ok::<_, uriutils::ParseError>(())
    /// ```
    #[must_use]
    pub fn host_parsed(&self) -> Option<Host<'_>> {
        self.encoded_host().map(Host::classify)
    }

    /// Returns the [port] subcomponent.
    ///
    /// An empty port is the same as no port.
    ///
    /// [port]: https://datatracker.ietf.org/doc/html/rfc3986/#section-3.2.3
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Returns the percent-encoded [path] component.
    ///
    /// [path]: https://datatracker.ietf.org/doc/html/rfc3986/#section-3.3
    #[must_use]
    pub fn encoded_path(&self) -> &EStr<Path> {
        EStr::new_validated(&self.path)
    }

    /// Returns the decoded path component.
    ///
    /// Note that a decoded `'/'` cannot be told apart from a separator.
    /// Use [`path_segments`](Self::path_segments) to get the segments.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the decoded bytes are not valid UTF-8.
    pub fn path(&self) -> Result<&str, DecodeError> {
        get_or_decode(&self.cache.path, || {
            self.encoded_path().decode().to_string().map(Cow::into_owned)
        })
        .map(String::as_str)
    }

    /// Returns the decoded, non-empty segments of the path.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the decoded bytes of a segment are not valid UTF-8.
    ///
    /// # Examples
    ///
    /// ```
    /// use uriutils::Uri;
    ///
    /// let uri = Uri::parse("/a//b%2Fc/")?;
    /// assert_eq!(uri.path_segments().unwrap(), ["a", "b/c"]);
    /// # Ok::<_, uriutils::ParseError>(())
    /// ```
    pub fn path_segments(&self) -> Result<&[String], DecodeError> {
        get_or_decode(&self.cache.path_segments, || {
            let mut segs = Vec::new();
            let mut start = 0;
            for seg in self.encoded_path().split('/') {
                if !seg.is_empty() {
                    let decoded = seg.decode().to_string().map_err(|e| DecodeError {
                        index: start + e.index,
                        ..e
                    })?;
                    segs.push(decoded.into_owned());
                }
                start += seg.len() + 1;
            }
            Ok(segs)
        })
        .map(Vec::as_slice)
    }

    /// Returns the percent-encoded [query] component.
    ///
    /// [query]: https://datatracker.ietf.org/doc/html/rfc3986/#section-3.4
    #[must_use]
    pub fn encoded_query(&self) -> Option<&EStr<Query>> {
        self.query.as_deref().map(EStr::new_validated)
    }

    /// Returns the decoded parameters of the query component.
    ///
    /// See [`QueryParams`] for how the query is split.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the decoded bytes of a name or value are not valid UTF-8.
    pub fn query_params(&self) -> Result<Option<&QueryParams>, DecodeError> {
        let Some(encoded) = self.encoded_query() else {
            return Ok(None);
        };
        get_or_decode(&self.cache.query_params, || QueryParams::decode(encoded)).map(Some)
    }

    /// Returns the percent-encoded [fragment] component.
    ///
    /// [fragment]: https://datatracker.ietf.org/doc/html/rfc3986/#section-3.5
    #[must_use]
    pub fn encoded_fragment(&self) -> Option<&EStr<Fragment>> {
        self.fragment.as_deref().map(EStr::new_validated)
    }

    /// Returns the decoded fragment component.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the decoded bytes are not valid UTF-8.
    pub fn fragment(&self) -> Result<Option<&str>, DecodeError> {
        let Some(encoded) = self.encoded_fragment() else {
            return Ok(None);
        };
        get_or_decode(&self.cache.fragment, || {
            encoded.decode().to_string().map(Cow::into_owned)
        })
        .map(|s| Some(s.as_str()))
    }

    /// Checks whether an authority component is present.
    #[must_use]
    pub fn has_authority(&self) -> bool {
        self.host.is_some()
    }

    /// Checks whether the URI is a relative reference, i.e., without a scheme.
    #[must_use]
    pub fn is_relative(&self) -> bool {
        self.scheme.is_none()
    }

    /// Checks whether the URI is opaque, i.e., has a scheme
    /// but neither an authority nor a path starting with `'/'`.
    ///
    /// # Examples
    ///
    /// ```
    /// use uriutils::Uri;
    ///
    /// assert!(Uri::parse("mailto:user@example.com")?.is_opaque());
    /// assert!(!Uri::parse("file:/etc/hosts")?.is_opaque());
    /// assert!(!Uri::parse("a:b")?.is_relative());
    /// # Ok::<_, uriutils::ParseError>(())
    /// ```
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.scheme.is_some() && self.host.is_none() && !self.path.starts_with('/')
    }
}

impl PartialEq for Uri {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl PartialEq<str> for Uri {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<Uri> for str {
    fn eq(&self, other: &Uri) -> bool {
        self == other.as_str()
    }
}

impl PartialEq<&str> for Uri {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<Uri> for &str {
    fn eq(&self, other: &Uri) -> bool {
        *self == other.as_str()
    }
}

impl Eq for Uri {}

impl hash::Hash for Uri {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl PartialOrd for Uri {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Uri {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl AsRef<str> for Uri {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Uri {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, ParseError> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Uri {
    type Error = ParseError;

    fn try_from(s: &str) -> Result<Self, ParseError> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Uri {
    type Error = ParseError;

    /// Parses a URI reference, reusing the string as its string form.
    fn try_from(s: String) -> Result<Self, ParseError> {
        let mut uri = Self::from_components(parse::parse(&s)?);
        uri.cache.string = OnceLock::from(s);
        Ok(uri)
    }
}

impl From<Uri> for String {
    fn from(mut uri: Uri) -> Self {
        match uri.cache.string.take() {
            Some(s) => s,
            None => uri.serialize(),
        }
    }
}

#[cfg(feature = "serde")]
impl Serialize for Uri {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Uri {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Uri::try_from(s).map_err(de::Error::custom)
    }
}
