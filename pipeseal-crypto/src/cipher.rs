//! Symmetric cipher engines behind one closed variant.
//!
//! The suite picks the engine exactly once, at configuration; no per-chunk
//! dispatch on capabilities happens afterwards. Construction consumes the
//! key material so it cannot be retained past configuration.

use crate::chacha::ChaChaPolyStream;
use crate::error::{CryptoError, CryptoResult};
use crate::gcm::GcmStream;
use crate::key::SymmetricKeyMaterial;
use crate::suite::CipherSuite;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{KeyIvInit, StreamCipher};
use aes::Aes256;
use ctr::Ctr128BE;
use subtle::ConstantTimeEq;

pub(crate) enum CipherEngine {
    Aes256Gcm(GcmStream),
    ChaCha20Poly1305(ChaChaPolyStream),
    Aes256Ctr(Box<Ctr128BE<Aes256>>),
}

impl CipherEngine {
    pub fn new(suite: CipherSuite, material: SymmetricKeyMaterial) -> Self {
        match suite {
            CipherSuite::Aes256Gcm => {
                Self::Aes256Gcm(GcmStream::new(material.key(), material.iv()))
            }
            CipherSuite::ChaCha20Poly1305 => {
                Self::ChaCha20Poly1305(ChaChaPolyStream::new(material.key(), material.iv()))
            }
            CipherSuite::Aes256Ctr => Self::Aes256Ctr(Box::new(Ctr128BE::<Aes256>::new(
                GenericArray::from_slice(material.key()),
                GenericArray::from_slice(material.iv()),
            ))),
        }
    }

    /// Binds the envelope header into the tag. No-op for plain suites.
    pub fn set_aad(&mut self, aad: &[u8]) {
        match self {
            Self::Aes256Gcm(engine) => engine.set_aad(aad),
            Self::ChaCha20Poly1305(engine) => engine.set_aad(aad),
            Self::Aes256Ctr(_) => {}
        }
    }

    pub fn encrypt(&mut self, chunk: &[u8]) -> Vec<u8> {
        match self {
            Self::Aes256Gcm(engine) => engine.encrypt(chunk),
            Self::ChaCha20Poly1305(engine) => engine.encrypt(chunk),
            Self::Aes256Ctr(keystream) => {
                let mut out = chunk.to_vec();
                keystream.apply_keystream(&mut out);
                out
            }
        }
    }

    pub fn decrypt(&mut self, chunk: &[u8]) -> Vec<u8> {
        match self {
            Self::Aes256Gcm(engine) => engine.decrypt(chunk),
            Self::ChaCha20Poly1305(engine) => engine.decrypt(chunk),
            Self::Aes256Ctr(keystream) => {
                let mut out = chunk.to_vec();
                keystream.apply_keystream(&mut out);
                out
            }
        }
    }

    /// Encrypt-side completion: the tag for authenticated suites.
    pub fn finalize_tag(self) -> Option<Vec<u8>> {
        match self {
            Self::Aes256Gcm(engine) => Some(engine.finalize().to_vec()),
            Self::ChaCha20Poly1305(engine) => Some(engine.finalize().to_vec()),
            Self::Aes256Ctr(_) => None,
        }
    }

    /// Decrypt-side completion: constant-time comparison of the received
    /// tag against the computed one.
    pub fn verify_tag(self, received: &[u8]) -> CryptoResult<()> {
        let computed = match self {
            Self::Aes256Gcm(engine) => engine.finalize(),
            Self::ChaCha20Poly1305(engine) => engine.finalize(),
            Self::Aes256Ctr(_) => return Err(CryptoError::Protocol("plain suite has no tag")),
        };
        if bool::from(computed.as_slice().ct_eq(received)) {
            Ok(())
        } else {
            Err(CryptoError::AuthenticationFailure)
        }
    }
}

/// Decrypt-side holdback of the trailing tag bytes.
///
/// The decryptor cannot know where the ciphertext ends until end-of-input,
/// so the last `window` bytes seen so far are withheld from the cipher;
/// whatever remains in the window at finalize is the tag.
pub(crate) struct TagTrailer {
    window: usize,
    pending: Vec<u8>,
}

impl TagTrailer {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            pending: Vec::with_capacity(window),
        }
    }

    /// Accepts a chunk and releases the bytes that can no longer be part
    /// of the tag.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<u8> {
        self.pending.extend_from_slice(chunk);
        if self.pending.len() > self.window {
            let release = self.pending.len() - self.window;
            self.pending.drain(..release).collect()
        } else {
            Vec::new()
        }
    }

    /// The withheld tag, or `None` if the stream was too short to carry
    /// a full tag.
    pub fn take(self) -> Option<Vec<u8>> {
        (self.pending.len() == self.window).then_some(self.pending)
    }
}
