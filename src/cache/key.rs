//! Key Module
//!
//! Caller-facing `NamedKey`, the wire-level `CompositeKey`, and the
//! `KeyComposer` that folds a namespace generation into every key.

use std::borrow::Borrow;
use std::fmt;

use sha2::{Digest, Sha256};

use crate::error::{CacheError, Result};

/// Separator between composite key fields.
const SEPARATOR: char = ':';
/// Marks the digest form; never the first character of the readable form.
const DIGEST_MARKER: char = '#';
/// Hex-encoded SHA-256 length.
const DIGEST_HEX_LEN: usize = 64;

// == Named Key ==
/// A raw key scoped to a namespace.
///
/// Equality and hashing are structural, so two keys built from the same
/// namespace and bytes address the same cache slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedKey {
    namespace: String,
    key: Vec<u8>,
}

impl NamedKey {
    /// Creates a key, rejecting an empty namespace.
    pub fn new(namespace: impl Into<String>, key: impl Into<Vec<u8>>) -> Result<Self> {
        let namespace = namespace.into();
        validate_namespace(&namespace)?;
        Ok(Self {
            namespace,
            key: key.into(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }
}

/// Rejects namespaces that indicate a caller bug.
pub(crate) fn validate_namespace(namespace: &str) -> Result<()> {
    if namespace.is_empty() {
        return Err(CacheError::InvalidNamespace(
            "namespace cannot be empty".to_string(),
        ));
    }
    Ok(())
}

// == Composite Key ==
/// The literal identifier sent to the remote store.
///
/// Always printable ASCII without whitespace, so it is a legal memcached key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey(String);

impl CompositeKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this key used the hashed form.
    pub fn is_digest(&self) -> bool {
        self.0
            .split_once(SEPARATOR)
            .is_some_and(|(_, rest)| rest.starts_with(DIGEST_MARKER))
    }
}

impl Borrow<str> for CompositeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// == Key Composer ==
/// Builds bounded-length composite keys.
///
/// Readable form: `{prefix}:{ns_len}:{namespace}:{generation}:{hex(key)}`.
/// Digest form, used when the namespace has characters memcached won't
/// accept or the readable form is too long: `{prefix}:#{sha256}`.
#[derive(Debug, Clone)]
pub struct KeyComposer {
    prefix: String,
    max_key_length: usize,
}

impl KeyComposer {
    /// Fails if `prefix` isn't a usable key fragment or `max_key_length`
    /// leaves no room for a digest-form key.
    pub fn new(prefix: impl Into<String>, max_key_length: usize) -> Result<Self> {
        let prefix = prefix.into();

        if prefix.is_empty() {
            return Err(CacheError::InvalidConfig(
                "cache prefix cannot be empty".to_string(),
            ));
        }
        if !prefix
            .chars()
            .all(|c| is_key_char(c) && c != SEPARATOR && c != DIGEST_MARKER)
        {
            return Err(CacheError::InvalidConfig(format!(
                "cache prefix {prefix:?} must be printable ASCII without ':' or '#'"
            )));
        }

        let digest_len = prefix.len() + 2 + DIGEST_HEX_LEN;
        if max_key_length < digest_len {
            return Err(CacheError::InvalidConfig(format!(
                "max key length {max_key_length} is below the {digest_len} bytes a hashed key needs"
            )));
        }

        Ok(Self {
            prefix,
            max_key_length,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn max_key_length(&self) -> usize {
        self.max_key_length
    }

    // == Compose ==
    /// Derives the composite key for `raw_key` in `namespace` at `generation`.
    pub fn compose(&self, namespace: &str, generation: u64, raw_key: &[u8]) -> CompositeKey {
        if namespace.chars().all(is_key_char)
            && self.prefix.len() + namespace.len() + raw_key.len() * 2 < self.max_key_length
        {
            let readable = format!(
                "{prefix}{SEPARATOR}{ns_len}{SEPARATOR}{namespace}{SEPARATOR}{generation}{SEPARATOR}{key}",
                prefix = self.prefix,
                ns_len = namespace.len(),
                key = hex::encode(raw_key),
            );
            if readable.len() <= self.max_key_length {
                return CompositeKey(readable);
            }
        }

        self.digest(namespace, generation, raw_key)
    }

    fn digest(&self, namespace: &str, generation: u64, raw_key: &[u8]) -> CompositeKey {
        let mut hasher = Sha256::new();
        hasher.update((namespace.len() as u64).to_be_bytes());
        hasher.update(namespace.as_bytes());
        hasher.update(generation.to_be_bytes());
        hasher.update(raw_key);
        let digest = hasher.finalize();

        CompositeKey(format!(
            "{}{SEPARATOR}{DIGEST_MARKER}{}",
            self.prefix,
            hex::encode(digest)
        ))
    }
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_graphic()
}
