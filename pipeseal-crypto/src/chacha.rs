//! Incremental ChaCha20-Poly1305 (RFC 8439).
//!
//! Same situation as the GCM engine: the one-shot `chacha20poly1305` crate
//! cannot stream, so the construction is assembled from `chacha20` and
//! `poly1305`. Block 0 of the keystream keys the Poly1305 authenticator,
//! the payload starts at block 1, and the tag covers padded AAD, padded
//! ciphertext, and the little-endian byte lengths. The unit tests hold the
//! output byte-equal to `chacha20poly1305`.

use crate::mac::StreamingMac;
use chacha20::cipher::generic_array::GenericArray;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::ChaCha20;
use poly1305::Poly1305;
use universal_hash::KeyInit;
use zeroize::Zeroize;

pub(crate) const CHACHA_IV_LEN: usize = 12;
pub(crate) const CHACHA_TAG_LEN: usize = 16;

pub(crate) struct ChaChaPolyStream {
    keystream: ChaCha20,
    poly: StreamingMac<Poly1305>,
    aad_len: u64,
    ct_len: u64,
}

impl ChaChaPolyStream {
    pub fn new(key: &[u8], iv: &[u8]) -> Self {
        debug_assert_eq!(key.len(), 32);
        debug_assert_eq!(iv.len(), CHACHA_IV_LEN);

        let mut keystream = ChaCha20::new(
            GenericArray::from_slice(key),
            GenericArray::from_slice(iv),
        );

        // The first keystream block keys the authenticator; consuming all
        // 64 bytes leaves the cipher positioned at block 1 for payload.
        let mut mac_key = [0u8; 64];
        keystream.apply_keystream(&mut mac_key);
        let poly = StreamingMac::new(Poly1305::new(poly1305::Key::from_slice(&mac_key[..32])));
        mac_key.zeroize();

        Self {
            keystream,
            poly,
            aad_len: 0,
            ct_len: 0,
        }
    }

    /// Binds associated data into the tag. Must precede all payload.
    pub fn set_aad(&mut self, aad: &[u8]) {
        debug_assert_eq!(self.ct_len, 0);
        self.poly.absorb_padded(aad);
        self.aad_len = aad.len() as u64;
    }

    pub fn encrypt(&mut self, plaintext: &[u8]) -> Vec<u8> {
        let mut out = plaintext.to_vec();
        self.keystream.apply_keystream(&mut out);
        self.absorb_ciphertext(&out);
        out
    }

    pub fn decrypt(&mut self, ciphertext: &[u8]) -> Vec<u8> {
        self.absorb_ciphertext(ciphertext);
        let mut out = ciphertext.to_vec();
        self.keystream.apply_keystream(&mut out);
        out
    }

    fn absorb_ciphertext(&mut self, ciphertext: &[u8]) {
        self.ct_len += ciphertext.len() as u64;
        self.poly.absorb(ciphertext);
    }

    /// Completes the MAC with the little-endian byte-length block.
    pub fn finalize(self) -> [u8; CHACHA_TAG_LEN] {
        let mut lengths = GenericArray::default();
        lengths[..8].copy_from_slice(&self.aad_len.to_le_bytes());
        lengths[8..].copy_from_slice(&self.ct_len.to_le_bytes());
        self.poly.finalize_with_lengths(lengths).into()
    }
}
