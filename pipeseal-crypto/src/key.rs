//! Ephemeral per-message key material.

use crate::suite::CipherSuite;
use rand::{CryptoRng, RngCore};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Symmetric key and IV for exactly one message.
///
/// Generated fresh on the encrypt side, recovered by unwrapping on the
/// decrypt side. Configuration of a cipher engine consumes the material,
/// so it cannot outlive its single use; the buffers are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKeyMaterial {
    key: Vec<u8>,
    iv: Vec<u8>,
}

impl SymmetricKeyMaterial {
    /// Draws fresh key and IV bytes for `suite` from `rng`.
    pub fn generate<R: RngCore + CryptoRng>(suite: CipherSuite, rng: &mut R) -> Self {
        let mut key = vec![0u8; suite.key_size()];
        rng.fill_bytes(&mut key);
        let mut iv = vec![0u8; suite.iv_size()];
        rng.fill_bytes(&mut iv);
        Self { key, iv }
    }

    /// Rebuilds material from an unwrapped key and the header IV.
    pub(crate) fn from_parts(suite: CipherSuite, key: &[u8], iv: &[u8]) -> Self {
        debug_assert_eq!(key.len(), suite.key_size());
        debug_assert_eq!(iv.len(), suite.iv_size());
        Self {
            key: key.to_vec(),
            iv: iv.to_vec(),
        }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn iv(&self) -> &[u8] {
        &self.iv
    }
}

impl fmt::Debug for SymmetricKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKeyMaterial")
            .field("key", &"<redacted>")
            .field("iv_len", &self.iv.len())
            .finish()
    }
}
