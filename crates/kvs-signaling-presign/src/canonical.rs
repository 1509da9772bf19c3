//! Canonical request construction for AWS Signature Version 4.
//!
//! This module implements the canonical request format as specified by AWS:
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! A signaling WebSocket upgrade is always a bodyless `GET` with `host` as
//! the only signed header, so the method, header set, and payload hash are
//! fixed here rather than caller-supplied.

use std::collections::BTreeMap;

use http::Uri;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::sigv4::hash_payload;

/// The HTTP method of a WebSocket upgrade request.
pub(crate) const METHOD: &str = "GET";

/// The only header included in the signature.
pub(crate) const SIGNED_HEADERS: &str = "host";

/// The set of characters that must be percent-encoded in query values.
///
/// Per RFC 3986, all characters except unreserved characters
/// (A-Z, a-z, 0-9, `-`, `_`, `.`, `~`) must be encoded, with uppercase hex.
/// Note that this is NOT form encoding: space becomes `%20`, never `+`.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a string using the RFC 3986 unreserved-character rules.
///
/// # Examples
///
/// ```
/// use kvs_signaling_presign::canonical::uri_encode;
///
/// assert_eq!(uri_encode("hello world"), "hello%20world");
/// assert_eq!(uri_encode("a/b:c"), "a%2Fb%3Ac");
/// ```
#[must_use]
pub fn uri_encode(input: &str) -> String {
    utf8_percent_encode(input, QUERY_ENCODE_SET).to_string()
}

/// Return the canonical URI for the request: the URI's path, or `/` when
/// the URI carries no path.
#[must_use]
pub fn canonical_uri(uri: &Uri) -> String {
    let path = uri.path();
    if path.is_empty() {
        "/".to_owned()
    } else {
        path.to_owned()
    }
}

/// Build the canonical query string from an already-encoded parameter map.
///
/// Values must be percent-encoded before insertion; the `BTreeMap` supplies
/// the strict ascending byte-wise key order SigV4 requires.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use kvs_signaling_presign::canonical::canonical_query_string;
///
/// let mut params = BTreeMap::new();
/// params.insert("Param2".to_owned(), "value2".to_owned());
/// params.insert("Param1".to_owned(), "value1".to_owned());
/// assert_eq!(canonical_query_string(&params), "Param1=value1&Param2=value2");
/// ```
#[must_use]
pub fn canonical_query_string(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the full canonical request string for a signaling URL.
///
/// The payload hash is always the SHA-256 of the empty string, since the
/// WebSocket handshake carries no body.
#[must_use]
pub fn canonical_request(uri: &Uri, canonical_querystring: &str) -> String {
    let path = canonical_uri(uri);
    let host = uri.host().unwrap_or("");
    let payload_hash = hash_payload(b"");

    format!(
        "{METHOD}\n{path}\n{canonical_querystring}\nhost:{host}\n\n{SIGNED_HEADERS}\n{payload_hash}"
    )
}
