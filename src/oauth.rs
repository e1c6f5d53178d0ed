use std::env;

use anyhow::{Result, anyhow, bail};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use rand::Rng;
use rand::distr::Alphanumeric;
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

const CREDENTIAL_KEYS: [&str; 4] = [
    "CONSUMER_KEY",
    "CONSUMER_SECRET",
    "ACCESS_TOKEN",
    "ACCESS_SECRET",
];

#[derive(Clone)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("access_token", &self.access_token)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Collects all four values, reporting every missing one at once.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut values = Vec::with_capacity(CREDENTIAL_KEYS.len());
        let mut missing = Vec::new();
        for key in CREDENTIAL_KEYS {
            match lookup(key).filter(|value| !value.trim().is_empty()) {
                Some(value) => values.push(value),
                None => missing.push(key),
            }
        }
        if !missing.is_empty() {
            bail!("missing env vars: {}", missing.join(", "));
        }

        let mut values = values.into_iter();
        let mut next = || values.next().unwrap_or_default();
        Ok(Self {
            consumer_key: next(),
            consumer_secret: next(),
            access_token: next(),
            access_secret: next(),
        })
    }
}

/// `Authorization` header value for a request whose body is not form-encoded.
pub fn authorization_header(credentials: &Credentials, method: &str, url: &str) -> Result<String> {
    let nonce = rand::rng()
        .sample_iter(Alphanumeric)
        .take(32)
        .map(char::from)
        .collect::<String>();
    let timestamp = chrono::Utc::now().timestamp().to_string();
    signed_header(credentials, method, url, &nonce, &timestamp)
}

pub(crate) fn signed_header(
    credentials: &Credentials,
    method: &str,
    url: &str,
    nonce: &str,
    timestamp: &str,
) -> Result<String> {
    let mut params = vec![
        ("oauth_consumer_key", credentials.consumer_key.as_str()),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", timestamp),
        ("oauth_token", credentials.access_token.as_str()),
        ("oauth_version", "1.0"),
    ];

    let base = signature_base_string(method, url, &params);
    let key = format!(
        "{}&{}",
        percent_encode(&credentials.consumer_secret),
        percent_encode(&credentials.access_secret)
    );
    let signature = sign(&key, &base)?;
    params.push(("oauth_signature", signature.as_str()));
    params.sort_unstable();

    let fields = params
        .iter()
        .map(|(name, value)| format!("{}=\"{}\"", percent_encode(name), percent_encode(value)))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("OAuth {fields}"))
}

pub(crate) fn signature_base_string(method: &str, url: &str, params: &[(&str, &str)]) -> String {
    let mut encoded = params
        .iter()
        .map(|(name, value)| (percent_encode(name), percent_encode(value)))
        .collect::<Vec<_>>();
    encoded.sort();
    let param_string = encoded
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(url),
        percent_encode(&param_string)
    )
}

fn sign(key: &str, base: &str) -> Result<String> {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|err| anyhow!("invalid signing key: {err}"))?;
    mac.update(base.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// RFC 3986 encoding: everything but `A-Z a-z 0-9 - . _ ~` is escaped.
pub(crate) fn percent_encode(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}
