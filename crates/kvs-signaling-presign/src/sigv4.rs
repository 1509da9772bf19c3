//! SigV4 signature primitives: credential scope, string to sign, and
//! signing-key derivation.
//!
//! The signing key is derived fresh for every signature through a chain of
//! HMAC-SHA256 operations, each stage's output keying the next:
//!
//! ```text
//! DateKey              = HMAC-SHA256("AWS4" + secret_key, date)
//! DateRegionKey        = HMAC-SHA256(DateKey, region)
//! DateRegionServiceKey = HMAC-SHA256(DateRegionKey, service)
//! SigningKey           = HMAC-SHA256(DateRegionServiceKey, "aws4_request")
//! ```
//!
//! The derived key is valid only for one date/region/service combination and
//! is never cached or persisted.

use hmac::{Hmac, KeyInit, Mac};
use sha2::{Digest, Sha256};

/// The only algorithm this signer emits.
pub(crate) const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// The fixed terminator of the credential scope and key-derivation chain.
pub(crate) const AWS4_REQUEST: &str = "aws4_request";

/// The signaling service name baked into the scope and signing key.
pub(crate) const SERVICE: &str = "kinesisvideo";

type HmacSha256 = Hmac<Sha256>;

/// Build the credential scope string: `date/region/kinesisvideo/aws4_request`.
///
/// The scope appears twice in a presigned URL: percent-encoded inside
/// `X-Amz-Credential`, and raw inside the string to sign.
///
/// # Examples
///
/// ```
/// use kvs_signaling_presign::sigv4::credential_scope;
///
/// assert_eq!(
///     credential_scope("20230724", "us-west-2"),
///     "20230724/us-west-2/kinesisvideo/aws4_request"
/// );
/// ```
#[must_use]
pub fn credential_scope(date_stamp: &str, region: &str) -> String {
    format!("{date_stamp}/{region}/{SERVICE}/{AWS4_REQUEST}")
}

/// Build the SigV4 string to sign.
///
/// Format:
/// ```text
/// AWS4-HMAC-SHA256\n
/// <ISO8601 timestamp>\n
/// <credential_scope>\n
/// <hex(SHA256(canonical_request))>
/// ```
///
/// This is the exact byte sequence the final HMAC signs.
#[must_use]
pub fn build_string_to_sign(
    amz_date: &str,
    credential_scope: &str,
    canonical_request: &str,
) -> String {
    let canonical_hash = hex::encode(Sha256::digest(canonical_request.as_bytes()));
    format!("{ALGORITHM}\n{amz_date}\n{credential_scope}\n{canonical_hash}")
}

/// Derive the SigV4 signing key using the HMAC-SHA256 chain.
///
/// # Examples
///
/// ```
/// use kvs_signaling_presign::sigv4::derive_signing_key;
///
/// let key = derive_signing_key(
///     "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY",
///     "20230724",
///     "us-west-2",
///     "kinesisvideo",
/// );
/// assert_eq!(key.len(), 32);
/// ```
#[must_use]
pub fn derive_signing_key(
    secret_key: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
) -> Vec<u8> {
    let date_key = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date_stamp.as_bytes());
    let date_region_key = hmac_sha256(&date_key, region.as_bytes());
    let date_region_service_key = hmac_sha256(&date_region_key, service.as_bytes());
    hmac_sha256(&date_region_service_key, AWS4_REQUEST.as_bytes())
}

/// Compute the HMAC-SHA256 signature of `data` using the given `signing_key`.
///
/// Returns the lowercase hex-encoded signature.
#[must_use]
pub fn compute_signature(signing_key: &[u8], data: &str) -> String {
    hex::encode(hmac_sha256(signing_key, data.as_bytes()))
}

/// Compute the SHA-256 hash of the given payload as a lowercase hex string.
///
/// # Examples
///
/// ```
/// use kvs_signaling_presign::sigv4::hash_payload;
///
/// assert_eq!(
///     hash_payload(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

/// Compute HMAC-SHA256 and return the raw bytes.
fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
