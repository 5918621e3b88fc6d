//! Stored Entry Module
//!
//! A value held by the in-memory store together with its expiry deadline.

use std::time::{Duration, Instant};

// == Stored Entry ==
/// A single framed value and when it stops being visible.
#[derive(Debug, Clone)]
pub struct StoredEntry {
    /// Encoded payload, exactly as the client sent it
    pub value: Vec<u8>,
    /// Deadline after which the entry is gone; None = never expires
    pub expires_at: Option<Instant>,
}

impl StoredEntry {
    // == Constructor ==
    /// Creates an entry. A zero `expiry` never expires, as in memcached.
    pub fn new(value: Vec<u8>, expiry: Duration) -> Self {
        let expires_at = if expiry.is_zero() {
            None
        } else {
            Instant::now().checked_add(expiry)
        };

        Self { value, expires_at }
    }

    // == Is Expired ==
    /// An entry is expired once `now` reaches its deadline.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}
