//! Percent-encoders for URI components.
//!
//! Each encoder pairs a URI component with the [`Table`] of characters that
//! may appear unencoded in it.

use super::{table::*, Encoder, Table};

/// An encoder for userinfo.
#[derive(Clone, Copy, Debug)]
pub struct Userinfo;

impl Encoder for Userinfo {
    const TABLE: Table = USERINFO;
}

/// An encoder for registered names.
#[derive(Clone, Copy, Debug)]
pub struct RegName;

impl Encoder for RegName {
    const TABLE: Table = REG_NAME;
}

/// An encoder for path.
#[derive(Clone, Copy, Debug)]
pub struct Path;

impl Encoder for Path {
    const TABLE: Table = PATH;
}

/// An encoder for a single path segment, which encodes `'/'`.
#[derive(Clone, Copy, Debug)]
pub struct PathSegment;

impl Encoder for PathSegment {
    const TABLE: Table = PCHAR;
}

/// An encoder for query.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Encoder for Query {
    const TABLE: Table = QUERY;
}

/// An encoder for the name or value of a query parameter.
#[derive(Clone, Copy, Debug)]
pub struct QueryParam;

impl Encoder for QueryParam {
    const TABLE: Table = QUERY_PARAM;
}

/// An encoder for fragment.
#[derive(Clone, Copy, Debug)]
pub struct Fragment;

impl Encoder for Fragment {
    const TABLE: Table = FRAGMENT;
}
