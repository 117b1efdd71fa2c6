//! Per-request session handles.
//!
//! The queue protocol correlates the hash submission and the parameter
//! submission on one connection with a short random token.  A fresh handle is
//! minted for every generation attempt and dropped with the connection.

use std::fmt;

use rand::Rng;

/// Length of every session handle.
pub const SESSION_HASH_LEN: usize = 10;

/// Alphabet session handles are drawn from.
const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// A 10-character lowercase-alphanumeric session token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionHash(String);

impl SessionHash {
    /// Generates a new handle from the thread-local random source.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Generates a new handle from `rng`.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let hash = (0..SESSION_HASH_LEN)
            .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
            .collect();
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
