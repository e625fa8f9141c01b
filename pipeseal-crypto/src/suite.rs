//! Cipher suite registry.
//!
//! A suite fixes the asymmetric wrap, symmetric cipher, key size, and IV
//! size for one message, and owns a single wire identifier byte so a
//! decryptor can self-configure from the first byte of a negotiated
//! envelope. The set is closed: behavior is chosen once at configuration
//! time and never re-examined per chunk.

use crate::error::{CryptoError, CryptoResult};
use std::fmt;

/// Supported (asymmetric, symmetric) combinations. All suites wrap the
/// symmetric key with RSA-OAEP.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CipherSuite {
    /// AES-256 in Galois/Counter Mode. Authenticated.
    Aes256Gcm,
    /// ChaCha20 with a Poly1305 tag (RFC 8439). Authenticated.
    ChaCha20Poly1305,
    /// AES-256 in plain counter mode. No authentication tag.
    Aes256Ctr,
}

impl CipherSuite {
    /// Wire identifier emitted as the leading envelope byte in
    /// negotiated mode.
    pub const fn id(self) -> u8 {
        match self {
            Self::Aes256Gcm => 0x01,
            Self::ChaCha20Poly1305 => 0x02,
            Self::Aes256Ctr => 0x03,
        }
    }

    /// Looks up a suite by its wire identifier.
    pub fn from_id(id: u8) -> CryptoResult<Self> {
        match id {
            0x01 => Ok(Self::Aes256Gcm),
            0x02 => Ok(Self::ChaCha20Poly1305),
            0x03 => Ok(Self::Aes256Ctr),
            other => Err(CryptoError::UnknownSuite(other)),
        }
    }

    /// Symmetric key length in bytes.
    pub const fn key_size(self) -> usize {
        32
    }

    /// IV length in bytes as it appears in the envelope header.
    pub const fn iv_size(self) -> usize {
        match self {
            Self::Aes256Gcm | Self::ChaCha20Poly1305 => 12,
            Self::Aes256Ctr => 16,
        }
    }

    /// Trailing authentication tag length in bytes; zero for plain suites.
    pub const fn tag_size(self) -> usize {
        match self {
            Self::Aes256Gcm | Self::ChaCha20Poly1305 => 16,
            Self::Aes256Ctr => 0,
        }
    }

    pub const fn is_authenticated(self) -> bool {
        self.tag_size() != 0
    }
}

impl Default for CipherSuite {
    fn default() -> Self {
        Self::Aes256Gcm
    }
}

impl fmt::Display for CipherSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Aes256Gcm => "AES-256-GCM",
            Self::ChaCha20Poly1305 => "CHACHA20-POLY1305",
            Self::Aes256Ctr => "AES-256-CTR",
        })
    }
}
