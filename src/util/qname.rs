//! `QName` (qualified name) handling.
//!
//! A `QName` is a name of the form `prefix:localname` or just `localname` (with
//! no prefix). This module provides utilities for splitting and joining
//! qualified names as defined by the Namespaces in XML 1.0 specification.
//!
//! See <https://www.w3.org/TR/xml-names/#NT-QName>

use std::borrow::Cow;

/// Splits a `QName` into its prefix and local name parts.
///
/// Returns `(Some(prefix), localname)` if the name contains a colon,
/// or `(None, localname)` if it does not.
///
/// # Examples
///
/// ```
/// use xmloutput::util::qname::split_qname;
///
/// assert_eq!(split_qname("svg:rect"), (Some("svg"), "rect"));
/// assert_eq!(split_qname("div"), (None, "div"));
/// ```
#[must_use]
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.find(':') {
        Some(pos) => (Some(&qname[..pos]), &qname[pos + 1..]),
        None => (None, qname),
    }
}

/// Splits a `QName`, treating malformed names as unprefixed.
///
/// A name with an empty prefix (`":x"`) or an empty local part (`"p:"`)
/// does not resolve to a prefix; the whole string is returned as the local
/// name.
#[must_use]
pub fn split_qname_lenient(qname: &str) -> (Option<&str>, &str) {
    match split_qname(qname) {
        (Some(prefix), local) if !prefix.is_empty() && !local.is_empty() => (Some(prefix), local),
        _ => (None, qname),
    }
}

/// Joins a prefix and a local name into a `QName`.
///
/// An empty prefix yields the local name unchanged (borrowed).
#[must_use]
pub fn join_qname<'a>(prefix: &str, local: &'a str) -> Cow<'a, str> {
    if prefix.is_empty() {
        Cow::Borrowed(local)
    } else {
        Cow::Owned(format!("{prefix}:{local}"))
    }
}
