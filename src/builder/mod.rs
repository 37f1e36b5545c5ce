mod state;

use crate::{
    error::{BuildError, Component},
    host::{self, HostEncoding},
    parse::Components,
    pct_enc::{
        encoder::{Fragment, Path, PathSegment, Query, QueryParam, Userinfo},
        table::{ALPHA, SCHEME},
        EStr,
    },
    Uri,
};
use state::Field;

/// A builder for URI.
///
/// This struct is created by [`Builder::new`], [`Uri::builder`] or [`Uri::to_builder`].
///
/// Every component except the scheme and the port can be set either from
/// unencoded text, which is percent-encoded as needed, or from pre-encoded
/// text with one of the `encoded_*` methods, which is checked against the
/// URI syntax. The path and the query can additionally be appended to
/// piece by piece with [`append_path_segment`] and [`append_query_param`].
///
/// Once appending to a component has begun, setting it from pre-encoded
/// text fails with [`BuildError::AlreadyAppended`] until it is set from
/// unencoded text or cleared.
///
/// # Examples
///
/// ```
/// use uriutils::Builder;
///
/// let uri = Builder::new()
///     .scheme("https")?
///     .host("example.com")
///     .append_path_segment("v1")
///     .append_path_segment("users")
///     .append_query_param("name", Some("张三"))
///     .build()?;
///
/// assert_eq!(uri, "https://example.com/v1/users?name=%E5%BC%A0%E4%B8%89");
/// # Ok::<_, uriutils::BuildError>(())
/// ```
///
/// The builder may be reused after building:
///
/// ```
/// use uriutils::Builder;
///
/// let mut b = Builder::new();
/// b.scheme("foo")?.path("a:b");
/// assert_eq!(b.build()?, "foo:a:b");
///
/// b.scheme(None)?;
/// assert_eq!(b.build()?, "./a:b");
/// # Ok::<_, uriutils::BuildError>(())
/// ```
///
/// [`append_path_segment`]: Self::append_path_segment
/// [`append_query_param`]: Self::append_query_param
#[derive(Clone, Debug)]
pub struct Builder {
    scheme: Option<String>,
    userinfo: Field<Userinfo>,
    host: Option<HostInput>,
    host_encoding: Option<HostEncoding>,
    port: Option<u16>,
    path: Field<Path>,
    query: Field<Query>,
    fragment: Field<Fragment>,
}

#[derive(Clone, Debug)]
enum HostInput {
    Raw(String),
    Encoded(String),
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scheme: None,
            userinfo: Field::new(Component::Userinfo),
            host: None,
            host_encoding: None,
            port: None,
            path: Field::new(Component::Path),
            query: Field::new(Component::Query),
            fragment: Field::new(Component::Fragment),
        }
    }

    /// Creates a builder holding the components of a URI.
    pub(crate) fn from_uri(uri: &Uri) -> Self {
        Self {
            scheme: uri.scheme().map(Into::into),
            userinfo: Field::from_validated(
                Component::Userinfo,
                uri.encoded_userinfo().map(EStr::as_str),
            ),
            host: uri.encoded_host().map(|s| HostInput::Encoded(s.into())),
            host_encoding: None,
            port: uri.port(),
            path: Field::from_validated(Component::Path, Some(uri.encoded_path().as_str())),
            query: Field::from_validated(Component::Query, uri.encoded_query().map(EStr::as_str)),
            fragment: Field::from_validated(
                Component::Fragment,
                uri.encoded_fragment().map(EStr::as_str),
            ),
        }
    }

    /// Sets or clears the [scheme] component.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the scheme is empty, does not start with a letter,
    /// or contains a character other than letters, digits, `'+'`, `'-'` and `'.'`.
    /// The builder is left unchanged on error.
    ///
    /// [scheme]: https://datatracker.ietf.org/doc/html/rfc3986/#section-3.1
    pub fn scheme<'a>(
        &mut self,
        scheme: impl Into<Option<&'a str>>,
    ) -> Result<&mut Self, BuildError> {
        self.scheme = match scheme.into() {
            Some(scheme) => {
                validate_scheme(scheme)?;
                Some(scheme.into())
            }
            None => None,
        };
        Ok(self)
    }

    /// Sets or clears the [userinfo] subcomponent from unencoded text.
    ///
    /// The userinfo is only kept when a host is set.
    ///
    /// [userinfo]: https://datatracker.ietf.org/doc/html/rfc3986/#section-3.2.1
    pub fn userinfo<'a>(&mut self, userinfo: impl Into<Option<&'a str>>) -> &mut Self {
        self.userinfo.set_raw(userinfo.into());
        self
    }

    /// Sets or clears the userinfo subcomponent from pre-encoded text.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the text is not a valid userinfo.
    pub fn encoded_userinfo<'a>(
        &mut self,
        userinfo: impl Into<Option<&'a str>>,
    ) -> Result<&mut Self, BuildError> {
        self.userinfo.set_encoded(userinfo.into())?;
        Ok(self)
    }

    /// Sets or clears the [host] subcomponent from unencoded text.
    ///
    /// Text containing a colon must be an IPv6 address, which is enclosed
    /// in brackets when built. Other text is encoded when built according
    /// to the [host encoding](Self::host_encoding).
    ///
    /// [host]: https://datatracker.ietf.org/doc/html/rfc3986/#section-3.2.2
    ///
    /// # Examples
    ///
    /// ```
    /// use uriutils::{Builder, HostEncoding};
    ///
    /// let uri = Builder::new()
    ///     .scheme("http")?
    ///     .host("bücher.example")
    ///     .host_encoding(HostEncoding::DnsCompatible)
    ///     .build()?;
    /// assert_eq!(uri, "http://xn--bcher-kva.example");
    /// assert_eq!(uri.host().unwrap(), Some("bücher.example"));
    ///
    /// let uri = Builder::new().host("::1").port(8080).build()?;
    /// assert_eq!(uri, "//[::1]:8080");
    /// # Ok::<_, uriutils::BuildError>(())
    /// ```
    pub fn host<'a>(&mut self, host: impl Into<Option<&'a str>>) -> &mut Self {
        self.host = host.into().map(|s| HostInput::Raw(s.into()));
        self
    }

    /// Sets or clears the policy for encoding a host set from unencoded text.
    ///
    /// When unset, [`HostEncoding::default_for_scheme`] decides.
    pub fn host_encoding(&mut self, encoding: impl Into<Option<HostEncoding>>) -> &mut Self {
        self.host_encoding = encoding.into();
        self
    }

    /// Sets or clears the host subcomponent from pre-encoded text.
    ///
    /// The text must be either an IP literal enclosed in brackets
    /// or a percent-encoded registered name.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the text is not a valid host.
    ///
    /// # Examples
    ///
    /// ```
    /// use uriutils::Builder;
    ///
    /// let uri = Builder::new().encoded_host("[::1]")?.build()?;
    /// assert_eq!(uri.host().unwrap(), Some("::1"));
    ///
    /// assert!(Builder::new().encoded_host("[::1::]").is_err());
    /// # Ok::<_, uriutils::BuildError>(())
    /// ```
    pub fn encoded_host<'a>(
        &mut self,
        host: impl Into<Option<&'a str>>,
    ) -> Result<&mut Self, BuildError> {
        self.host = match host.into() {
            Some(host) => {
                host::validate(host)?;
                Some(HostInput::Encoded(host.into()))
            }
            None => None,
        };
        Ok(self)
    }

    /// Sets or clears the [port] subcomponent.
    ///
    /// The port is only kept when a host is set.
    ///
    /// [port]: https://datatracker.ietf.org/doc/html/rfc3986/#section-3.2.3
    pub fn port(&mut self, port: impl Into<Option<u16>>) -> &mut Self {
        self.port = port.into();
        self
    }

    /// Sets the [path] component from unencoded text.
    ///
    /// Slashes in the text are kept as segment separators.
    /// An empty string clears the path.
    ///
    /// [path]: https://datatracker.ietf.org/doc/html/rfc3986/#section-3.3
    pub fn path(&mut self, path: &str) -> &mut Self {
        self.path.set_raw(Some(path));
        self
    }

    /// Sets the path component from pre-encoded text.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the text is not a valid path,
    /// or if a segment has been appended to the path.
    pub fn encoded_path(&mut self, path: &str) -> Result<&mut Self, BuildError> {
        self.path.set_encoded(Some(path))?;
        Ok(self)
    }

    /// Appends a segment to the path.
    ///
    /// A slash is inserted before the segment unless the path already ends
    /// with one, so that appending to an empty path yields an absolute path.
    /// Slashes within the segment are percent-encoded.
    /// An empty segment appends a single slash.
    ///
    /// # Examples
    ///
    /// ```
    /// use uriutils::Builder;
    ///
    /// let uri = Builder::new()
    ///     .path("/files/")
    ///     .append_path_segment("a/b")
    ///     .append_path_segment("")
    ///     .build()?;
    /// assert_eq!(uri, "/files/a%2Fb/");
    /// assert_eq!(uri.path_segments().unwrap(), ["files", "a/b"]);
    /// # Ok::<_, uriutils::BuildError>(())
    /// ```
    pub fn append_path_segment(&mut self, segment: &str) -> &mut Self {
        let buf = self.path.accumulator();
        if segment.is_empty() || !buf.as_str().ends_with('/') {
            buf.push('/');
        }
        buf.encode_str::<PathSegment>(segment);
        self
    }

    /// Sets or clears the [query] component from unencoded text.
    ///
    /// [query]: https://datatracker.ietf.org/doc/html/rfc3986/#section-3.4
    pub fn query<'a>(&mut self, query: impl Into<Option<&'a str>>) -> &mut Self {
        self.query.set_raw(query.into());
        self
    }

    /// Sets or clears the query component from pre-encoded text.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the text is not a valid query,
    /// or if a parameter has been appended to the query.
    pub fn encoded_query<'a>(
        &mut self,
        query: impl Into<Option<&'a str>>,
    ) -> Result<&mut Self, BuildError> {
        self.query.set_encoded(query.into())?;
        Ok(self)
    }

    /// Appends a parameter to the query, separated from any previous one by `'&'`.
    ///
    /// The name and the value are percent-encoded so that they contain
    /// none of `'&'`, `'='` and `'+'`. A parameter without a value
    /// is appended without `'='`.
    ///
    /// # Examples
    ///
    /// ```
    /// use uriutils::Builder;
    ///
    /// let uri = Builder::new()
    ///     .query("a=1")
    ///     .append_query_param("b", None)
    ///     .append_query_param("c&d", Some("1+1=2"))
    ///     .build()?;
    /// assert_eq!(uri, "?a=1&b&c%26d=1%2B1%3D2");
    /// # Ok::<_, uriutils::BuildError>(())
    /// ```
    pub fn append_query_param(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        let buf = self.query.accumulator();
        if !buf.is_empty() {
            buf.push('&');
        }
        buf.encode_str::<QueryParam>(name);
        if let Some(value) = value {
            buf.push('=');
            buf.encode_str::<QueryParam>(value);
        }
        self
    }

    /// Sets or clears the [fragment] component from unencoded text.
    ///
    /// [fragment]: https://datatracker.ietf.org/doc/html/rfc3986/#section-3.5
    pub fn fragment<'a>(&mut self, fragment: impl Into<Option<&'a str>>) -> &mut Self {
        self.fragment.set_raw(fragment.into());
        self
    }

    /// Sets or clears the fragment component from pre-encoded text.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the text is not a valid fragment.
    pub fn encoded_fragment<'a>(
        &mut self,
        fragment: impl Into<Option<&'a str>>,
    ) -> Result<&mut Self, BuildError> {
        self.fragment.set_encoded(fragment.into())?;
        Ok(self)
    }

    /// Builds the URI.
    ///
    /// A path without a leading slash is prefixed with `"./"` when neither
    /// scheme nor host is set and its first segment contains a colon, so that
    /// it is not mistaken for a scheme.
    ///
    /// # Errors
    ///
    /// Returns `Err` if
    ///
    /// - a host is set and the path is neither empty nor starts with `'/'`;
    /// - no host is set and the path starts with `"//"`;
    /// - the host cannot be encoded.
    pub fn build(&self) -> Result<Uri, BuildError> {
        let mut path = self.path.get().map_or("", EStr::as_str);

        let dotted;
        if !path.is_empty() && !path.starts_with('/') {
            if self.host.is_some() {
                return Err(BuildError::RootlessPathWithAuthority);
            }
            if self.scheme.is_none() && first_segment_contains_colon(path) {
                dotted = format!("./{path}");
                path = &dotted;
            }
        }
        if self.host.is_none() && path.starts_with("//") {
            return Err(BuildError::PathStartsWithDoubleSlash);
        }

        let host = match &self.host {
            Some(HostInput::Encoded(host)) => Some(host.clone()),
            Some(HostInput::Raw(host)) => {
                let encoding = self
                    .host_encoding
                    .unwrap_or_else(|| HostEncoding::default_for_scheme(self.scheme.as_deref()));
                Some(host::encode(host, encoding)?)
            }
            None => None,
        };

        Ok(Uri::from_components(Components {
            scheme: self.scheme.as_deref(),
            userinfo: host.as_ref().and(self.userinfo.get().map(EStr::as_str)),
            host: host.as_deref(),
            port: host.as_ref().and(self.port),
            path,
            query: self.query.get().map(EStr::as_str),
            fragment: self.fragment.get().map(EStr::as_str),
        }))
    }
}

fn validate_scheme(scheme: &str) -> Result<(), BuildError> {
    let bytes = scheme.as_bytes();
    match bytes.first() {
        None => Err(BuildError::EmptyScheme),
        Some(&x) if !ALPHA.allows_ascii(x) => Err(BuildError::InvalidScheme { index: 0 }),
        Some(_) => match bytes.iter().position(|&x| !SCHEME.allows_ascii(x)) {
            Some(index) => Err(BuildError::InvalidScheme { index }),
            None => Ok(()),
        },
    }
}

fn first_segment_contains_colon(path: &str) -> bool {
    path.split_once('/').map_or(path, |x| x.0).contains(':')
}
