#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]

//! A URI parser and builder that adheres to IETF [RFC 3986].
//!
//! [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986/
//!
//! The central types are [`Uri`], an immutable URI reference with lazily
//! decoded components, and [`Builder`], which assembles a `Uri` from
//! components given in either unencoded or pre-encoded form.
//!
//! Lower-level utilities are exposed in the [`pct_enc`] module for
//! percent-encoding under a character [`Table`](pct_enc::Table),
//! and in the [`ip`] module for parsing IP address literals.
//!
//! # Examples
//!
//! ```
//! use uriutils::{Builder, Uri};
//!
//! let uri = Uri::parse("http://user@example.com:8080/a%20b?x=1&y#top")?;
//! assert_eq!(uri.path()?, "/a b");
//! assert_eq!(uri.query_params()?.unwrap().first("x"), Some(Some("1")));
//!
//! let built = Builder::new()
//!     .scheme("http")?
//!     .userinfo("user")
//!     .host("example.com")
//!     .port(8080)
//!     .path("/a b")
//!     .encoded_query("x=1&y")?
//!     .fragment("top")
//!     .build()?;
//! assert_eq!(built, uri);
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! # Feature flags
//!
//! - `serde`: Implements `Serialize` and `Deserialize` for [`Uri`],
//!   as its string form.

mod builder;
pub mod error;
mod fmt;
mod host;
pub mod ip;
mod parse;
pub mod pct_enc;
mod query;
mod uri;

pub use builder::Builder;
pub use error::{
    BuildError, Component, DecodeError, DecodeErrorKind, ErrorClass, ParseError, ParseErrorKind,
};
pub use host::{Host, HostEncoding};
pub use query::{Iter as QueryParamsIter, QueryParams};
pub use uri::Uri;
