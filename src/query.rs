//! Decoded query parameters.

use crate::{
    error::DecodeError,
    pct_enc::{self, encoder::Query, EStr},
};
use std::{borrow::Cow, collections::HashMap, slice};

/// An ordered multimap of decoded query parameters.
///
/// Parameters are kept in the order their names first appear,
/// with the values of each name in the order they appear.
/// A parameter without `'='` has an absent value.
///
/// # Examples
///
/// ```
/// use uriutils::Uri;
///
/// let uri = Uri::parse("?a=1&b&a=2&&c=%20")?;
/// let params = uri.query_params().unwrap().unwrap();
///
/// assert_eq!(params.get("a"), Some(&[Some("1".to_owned()), Some("2".to_owned())][..]));
/// assert_eq!(params.get("b"), Some(&[None][..]));
/// assert_eq!(params.first("c"), Some(Some(" ")));
/// assert!(params.iter().map(|(name, _)| name).eq(["a", "b", "c"]));
/// # Ok::<_, uriutils::ParseError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Vec<Option<String>>)>,
    // Name to position in `entries`.
    index: HashMap<String, usize>,
}

impl QueryParams {
    /// Decodes the parameters of an encoded query.
    ///
    /// The query is split on `'&'`, skipping empty pieces, and each piece on
    /// its first `'='`. Names and values are percent-decoded independently,
    /// without taking `'+'` for a space.
    pub(crate) fn decode(query: &EStr<Query>) -> Result<Self, DecodeError> {
        let mut params = Self::default();
        let mut start = 0;
        for pair in query.split('&') {
            let offset = start;
            start += pair.len() + 1;
            if pair.is_empty() {
                continue;
            }

            let decode = |s: &str, at: usize| {
                pct_enc::decode(s)
                    .map(Cow::into_owned)
                    .map_err(|e| DecodeError {
                        index: offset + at + e.index,
                        ..e
                    })
            };
            let (name, value) = match pair.split_once('=') {
                Some((name, value)) => (
                    decode(name.as_str(), 0)?,
                    Some(decode(value.as_str(), name.len() + 1)?),
                ),
                None => (decode(pair.as_str(), 0)?, None),
            };
            params.insert(name, value);
        }
        Ok(params)
    }

    fn insert(&mut self, name: String, value: Option<String>) {
        match self.index.get(&name) {
            Some(&i) => self.entries[i].1.push(value),
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, vec![value]));
            }
        }
    }

    /// Returns all values of the parameter with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[Option<String>]> {
        let &i = self.index.get(name)?;
        Some(&self.entries[i].1)
    }

    /// Returns the first value of the parameter with the given name.
    ///
    /// The outer `Option` is `None` if no such parameter exists,
    /// and the inner one if its first value is absent.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<Option<&str>> {
        self.get(name)?.first().map(Option::as_deref)
    }

    /// Checks whether a parameter with the given name exists.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the number of distinct parameter names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the names and their values, in order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }
}

impl<'a> IntoIterator for &'a QueryParams {
    type Item = (&'a str, &'a [Option<String>]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// An iterator over the parameters of a [`QueryParams`].
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a> {
    inner: slice::Iter<'a, (String, Vec<Option<String>>)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a [Option<String>]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(name, values)| (name.as_str(), &values[..]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}
