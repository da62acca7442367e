//! Alibaba Cloud RPC request signing (signature version 1.0, `HMAC-SHA1`).
//!
//! See <https://www.alibabacloud.com/help/en/sdk/product-overview/rpc-mechanism>.
use crate::alidns::credentials::Credentials;
use crate::records::ApiError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lazy_static::lazy_static;
use ring::hmac;
use std::collections::BTreeMap;
use time::macros::format_description;
use time::OffsetDateTime;

pub(crate) const API_VERSION: &str = "2015-01-09";
const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const SIGNATURE_VERSION: &str = "1.0";

lazy_static! {
    static ref TIMESTAMP_FORMAT: &'static [time::format_description::FormatItem<'static>] =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");
}

/// Build the complete, signed query string for an API `action` with its own `params`.
pub(crate) fn signed_query(
    credentials: &Credentials,
    action: &str,
    params: &[(&str, String)],
    now: OffsetDateTime,
    nonce: &str,
) -> Result<String, ApiError> {
    let mut all: BTreeMap<String, String> = params
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect();
    all.insert("Action".into(), action.into());
    all.insert("Format".into(), "JSON".into());
    all.insert("Version".into(), API_VERSION.into());
    all.insert("AccessKeyId".into(), credentials.access_key_id.clone());
    all.insert("SignatureMethod".into(), SIGNATURE_METHOD.into());
    all.insert("SignatureVersion".into(), SIGNATURE_VERSION.into());
    all.insert("SignatureNonce".into(), nonce.into());
    all.insert("Timestamp".into(), timestamp(now)?);
    if let Some(token) = &credentials.security_token {
        all.insert("SecurityToken".into(), token.clone());
    }

    let query = canonicalized_query(&all);
    let signature = sign(&credentials.access_key_secret, &string_to_sign(&query));
    Ok(format!("{query}&Signature={}", urlencoding::encode(&signature)))
}

fn timestamp(now: OffsetDateTime) -> Result<String, ApiError> {
    now.to_offset(time::UtcOffset::UTC)
        .format(*TIMESTAMP_FORMAT)
        .map_err(|err| ApiError::Signing(Box::new(err)))
}

/// Parameters sorted by name, each name and value RFC 3986 percent-encoded.
fn canonicalized_query(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn string_to_sign(canonicalized_query: &str) -> String {
    format!(
        "GET&{}&{}",
        urlencoding::encode("/"),
        urlencoding::encode(canonicalized_query)
    )
}

fn sign(access_key_secret: &str, string_to_sign: &str) -> String {
    let key = hmac::Key::new(
        hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
        format!("{access_key_secret}&").as_bytes(),
    );
    STANDARD.encode(hmac::sign(&key, string_to_sign.as_bytes()).as_ref())
}
