//! Request metadata as the signer and validator see it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::{ParseError, Url};

use super::error::JwsError;

/// Origin relative request URIs are resolved against. Only its path is read.
const RELATIVE_BASE: &str = "http://localhost/";

/// HTTP headers with case-insensitive names.
///
/// Names are lowercased on the way in, so `FSPIOP-Source` and
/// `fspiop-source` address the same entry. Values are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>")]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header, returning the previous value.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.to_ascii_lowercase(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(&name.to_ascii_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<BTreeMap<String, String>> for Headers {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name.as_ref(), value);
        }
        headers
    }
}

/// An HTTP request about to be signed, or just received.
#[derive(Debug, Clone, PartialEq)]
pub struct JwsRequest {
    pub method: String,
    /// Absolute URL or bare path; only the path takes part in signing.
    pub uri: String,
    pub headers: Headers,
    /// Parsed JSON body. `None` means the request has no body at all, which
    /// is distinct from a JSON `null`.
    pub body: Option<Value>,
}

impl JwsRequest {
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Replaces the headers, typically with the map returned by
    /// [`JwsSigner::sign`](super::JwsSigner::sign).
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }
}

/// The path component of a request URI.
///
/// Scheme, authority, query and fragment are dropped:
/// `https://fsp.example/quotes/1?x=y` becomes `/quotes/1`. A relative
/// reference is resolved against a placeholder origin, so `//host/p` is read
/// as scheme-relative and yields `/p`. Percent-encoding is kept as sent; dot
/// segments are resolved.
pub fn request_path(uri: &str) -> Result<String, JwsError> {
    let invalid = |reason: String| JwsError::InvalidUri {
        uri: uri.to_string(),
        reason,
    };

    let url = match Url::parse(uri) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => Url::parse(RELATIVE_BASE)
            .and_then(|base| base.join(uri))
            .map_err(|e| invalid(e.to_string()))?,
        Err(e) => return Err(invalid(e.to_string())),
    };
    if url.cannot_be_a_base() {
        return Err(invalid("URI has no hierarchical path".to_string()));
    }
    Ok(url.path().to_string())
}
