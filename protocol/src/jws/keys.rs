//! Registry of FSP verification keys.

use std::collections::BTreeMap;
use std::fmt;

use jsonwebtoken::DecodingKey;

use super::error::JwsError;

/// RS256 public keys keyed by FSP id (the `fspiop-source` value).
///
/// A validator owns its registry and never changes it. To rotate keys,
/// build a new registry and a new validator.
#[derive(Clone, Default)]
pub struct ValidationKeys {
    keys: BTreeMap<String, DecodingKey>,
}

impl ValidationKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a PEM public key (SPKI or PKCS#1) for `source`.
    pub fn insert_pem(&mut self, source: impl Into<String>, pem: &[u8]) -> Result<(), JwsError> {
        let source = source.into();
        let key = DecodingKey::from_rsa_pem(pem).map_err(|e| JwsError::InvalidKey {
            owner: source.clone(),
            reason: e.to_string(),
        })?;
        self.keys.insert(source, key);
        Ok(())
    }

    /// Builds a registry from `(source, pem)` pairs.
    pub fn from_pems<I, S, P>(pems: I) -> Result<Self, JwsError>
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
        P: AsRef<[u8]>,
    {
        let mut keys = Self::new();
        for (source, pem) in pems {
            keys.insert_pem(source, pem.as_ref())?;
        }
        Ok(keys)
    }

    pub fn get(&self, source: &str) -> Option<&DecodingKey> {
        self.keys.get(source)
    }

    /// Registered sources in sorted order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Debug for ValidationKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationKeys")
            .field("sources", &self.sources().collect::<Vec<_>>())
            .finish()
    }
}
