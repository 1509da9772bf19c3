//! Presigned URL construction for KVS signaling WebSocket endpoints.
//!
//! A presigned URL carries its authentication in query parameters rather than
//! HTTP headers, which is what a WebSocket handshake requires (no custom
//! header support). The signed query string contains:
//!
//! - `X-Amz-Algorithm` - Always `AWS4-HMAC-SHA256`
//! - `X-Amz-Credential` - `AKID/date/region/kinesisvideo/aws4_request`, percent-encoded
//! - `X-Amz-Date` - ISO 8601 basic format timestamp (`YYYYMMDDTHHMMSSZ`)
//! - `X-Amz-Expires` - Always `299` seconds
//! - `X-Amz-Security-Token` - Only present for temporary credentials
//! - `X-Amz-SignedHeaders` - Always `host`
//! - `X-Amz-Signature` - The hex-encoded signature, appended last
//!
//! plus every query parameter already present on the caller's URI (channel
//! ARN, client id), re-encoded per RFC 3986.
//!
//! The main entry point is [`presign`].

use std::collections::BTreeMap;

use chrono::DateTime;
use http::Uri;
use tracing::debug;

use crate::canonical::{
    SIGNED_HEADERS, canonical_query_string, canonical_request, canonical_uri, uri_encode,
};
use crate::error::PresignError;
use crate::sigv4::{
    ALGORITHM, SERVICE, build_string_to_sign, compute_signature, credential_scope,
    derive_signing_key,
};
use crate::time::{format_amz_date, format_date_stamp};

const X_AMZ_ALGORITHM: &str = "X-Amz-Algorithm";
const X_AMZ_CREDENTIAL: &str = "X-Amz-Credential";
const X_AMZ_DATE: &str = "X-Amz-Date";
const X_AMZ_EXPIRES: &str = "X-Amz-Expires";
const X_AMZ_SECURITY_TOKEN: &str = "X-Amz-Security-Token";
const X_AMZ_SIGNATURE: &str = "X-Amz-Signature";
const X_AMZ_SIGNED_HEADERS: &str = "X-Amz-SignedHeaders";

/// Validity of the presigned URL, in seconds.
///
/// AWS caps query-string-authenticated requests at 300 seconds; 299 stays
/// under the ceiling. Signaling messages continue over the already-open
/// socket past expiry.
const EXPIRES_SECONDS: &str = "299";

/// Assemble the full set of query parameters to be signed.
///
/// The fixed `X-Amz-*` parameters are combined with every parameter already
/// present on the caller's URI, each value percent-encoded. The security
/// token parameter is present if and only if `session_token` is non-empty.
///
/// Caller-supplied parameters that collide with a fixed name are a
/// configuration error upstream; they are not resolved here.
#[must_use]
pub fn build_query_params(
    uri: &Uri,
    access_key: &str,
    session_token: &str,
    region: &str,
    amz_date: &str,
    date_stamp: &str,
) -> BTreeMap<String, String> {
    let credential = uri_encode(&format!(
        "{access_key}/{}",
        credential_scope(date_stamp, region)
    ));

    let mut params = BTreeMap::new();
    params.insert(X_AMZ_ALGORITHM.to_owned(), ALGORITHM.to_owned());
    params.insert(X_AMZ_CREDENTIAL.to_owned(), credential);
    params.insert(X_AMZ_DATE.to_owned(), amz_date.to_owned());
    params.insert(X_AMZ_EXPIRES.to_owned(), EXPIRES_SECONDS.to_owned());

    if !session_token.is_empty() {
        params.insert(X_AMZ_SECURITY_TOKEN.to_owned(), uri_encode(session_token));
    }

    params.insert(X_AMZ_SIGNED_HEADERS.to_owned(), SIGNED_HEADERS.to_owned());

    // Re-encode the parameters already on the caller's URI (channel ARN,
    // client id) so raw values like `arn:aws:...` canonicalize correctly.
    if let Some(query) = uri.query() {
        for param in query.split('&') {
            if let Some((key, value)) = param.split_once('=') {
                params.insert(key.to_owned(), uri_encode(value));
            }
        }
    }

    params
}

/// Sign a signaling WebSocket URI with SigV4 query-string authentication.
///
/// This is a pure function of its six inputs: identical inputs always yield
/// a byte-identical signed URL. Pass an empty `session_token` for long-term
/// (non-temporary) credentials.
///
/// The returned URI preserves the input's scheme and authority, defaults an
/// empty path to `/`, and carries the canonical query string with
/// `X-Amz-Signature` appended last.
///
/// # Errors
///
/// Returns [`PresignError::InvalidUri`] if the base URI has no scheme or
/// authority, or if the composed signed string cannot be re-parsed as a URI.
/// Returns [`PresignError::TimestampOutOfRange`] if `date_millis` cannot be
/// represented as a calendar date.
pub fn presign(
    uri: &Uri,
    access_key: &str,
    secret_key: &str,
    session_token: &str,
    region: &str,
    date_millis: i64,
) -> Result<Uri, PresignError> {
    let scheme = uri
        .scheme_str()
        .ok_or_else(|| PresignError::InvalidUri(uri.to_string()))?;
    let authority = uri
        .authority()
        .ok_or_else(|| PresignError::InvalidUri(uri.to_string()))?;

    let date = DateTime::from_timestamp_millis(date_millis)
        .ok_or(PresignError::TimestampOutOfRange(date_millis))?;
    let amz_date = format_amz_date(&date);
    let date_stamp = format_date_stamp(&date);

    debug!(%uri, region, amz_date, "Signing signaling URL");

    // Step 1: canonical request.
    let params = build_query_params(uri, access_key, session_token, region, &amz_date, &date_stamp);
    let canonical_querystring = canonical_query_string(&params);
    let canonical_req = canonical_request(uri, &canonical_querystring);
    debug!(canonical_request = %canonical_req, "Built canonical request");

    // Step 2: string to sign.
    let scope = credential_scope(&date_stamp, region);
    let string_to_sign = build_string_to_sign(&amz_date, &scope, &canonical_req);
    debug!(string_to_sign, "Built string to sign");

    // Step 3: derive the one-time signing key and compute the signature.
    let signing_key = derive_signing_key(secret_key, &date_stamp, region, SERVICE);
    let signature = compute_signature(&signing_key, &string_to_sign);

    // Step 4: recompose the URI with the signature appended after the
    // sorted canonical query string.
    let signed = format!(
        "{scheme}://{authority}{path}?{canonical_querystring}&{X_AMZ_SIGNATURE}={signature}",
        path = canonical_uri(uri)
    );

    signed
        .parse::<Uri>()
        .map_err(|_| PresignError::InvalidUri(signed.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_URI: &str = "wss://v-a1b2c3d4.kinesisvideo.us-west-2.amazonaws.com\
        ?X-Amz-ChannelARN=arn:aws:kinesisvideo:us-west-2:123456789012:channel/demo-channel/1234567890123\
        &X-Amz-ClientId=d7d1c6e2-9cb0-4d61-bea9-ecb3d3816557";

    #[test]
    fn test_should_build_query_params_with_temporary_credentials() {
        let uri: Uri = TEST_URI.parse().unwrap();

        let mut expected = BTreeMap::new();
        expected.insert(X_AMZ_ALGORITHM.to_owned(), "AWS4-HMAC-SHA256".to_owned());
        expected.insert(
            X_AMZ_CREDENTIAL.to_owned(),
            "AKIDEXAMPLE%2F20230724%2Fus-west-2%2Fkinesisvideo%2Faws4_request".to_owned(),
        );
        expected.insert(X_AMZ_DATE.to_owned(), "20230724T000000Z".to_owned());
        expected.insert(X_AMZ_EXPIRES.to_owned(), "299".to_owned());
        expected.insert(X_AMZ_SECURITY_TOKEN.to_owned(), "SSEXAMPLE".to_owned());
        expected.insert(X_AMZ_SIGNED_HEADERS.to_owned(), "host".to_owned());
        expected.insert(
            "X-Amz-ChannelARN".to_owned(),
            "arn%3Aaws%3Akinesisvideo%3Aus-west-2%3A123456789012%3Achannel%2Fdemo-channel%2F1234567890123"
                .to_owned(),
        );
        expected.insert(
            "X-Amz-ClientId".to_owned(),
            "d7d1c6e2-9cb0-4d61-bea9-ecb3d3816557".to_owned(),
        );

        let actual = build_query_params(
            &uri,
            "AKIDEXAMPLE",
            "SSEXAMPLE",
            "us-west-2",
            "20230724T000000Z",
            "20230724",
        );

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_should_omit_security_token_for_long_term_credentials() {
        let uri: Uri = TEST_URI.parse().unwrap();
        let params = build_query_params(
            &uri,
            "AKIDEXAMPLE",
            "",
            "us-west-2",
            "20230724T000000Z",
            "20230724",
        );
        assert!(!params.contains_key(X_AMZ_SECURITY_TOKEN));
    }

    #[test]
    fn test_should_reject_uri_without_scheme() {
        let uri: Uri = "/just/a/path".parse().unwrap();
        let result = presign(&uri, "AKIDEXAMPLE", "secret", "", "us-west-2", 1690186022951);
        assert!(matches!(result, Err(PresignError::InvalidUri(_))));
    }

    #[test]
    fn test_should_reject_timestamp_out_of_range() {
        let uri: Uri = TEST_URI.parse().unwrap();
        let result = presign(&uri, "AKIDEXAMPLE", "secret", "", "us-west-2", i64::MAX);
        assert!(matches!(
            result,
            Err(PresignError::TimestampOutOfRange(_))
        ));
    }
}
