//! Incremental AES-256-GCM.
//!
//! The one-shot `aes-gcm` crate offers no streaming interface, so the mode
//! is assembled here from the same components it uses: AES-CTR for the
//! keystream and GHASH over the ciphertext, producing a single tag for the
//! whole message (NIST SP 800-38D, 96-bit IV). The unit tests hold this
//! implementation byte-equal to `aes-gcm` across arbitrary chunkings.

use crate::mac::StreamingMac;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit, KeyIvInit, StreamCipher};
use aes::Aes256;
use ctr::Ctr32BE;
use ghash::GHash;

pub(crate) const GCM_IV_LEN: usize = 12;
pub(crate) const GCM_TAG_LEN: usize = 16;

pub(crate) struct GcmStream {
    keystream: Ctr32BE<Aes256>,
    ghash: StreamingMac<GHash>,
    tag_mask: [u8; GCM_TAG_LEN],
    aad_len: u64,
    ct_len: u64,
}

impl GcmStream {
    pub fn new(key: &[u8], iv: &[u8]) -> Self {
        debug_assert_eq!(key.len(), 32);
        debug_assert_eq!(iv.len(), GCM_IV_LEN);

        let block = Aes256::new(GenericArray::from_slice(key));

        // Hash subkey H = E_K(0).
        let mut h = GenericArray::default();
        block.encrypt_block(&mut h);
        let ghash = StreamingMac::new(GHash::new(&h));

        // J0 = IV || 0^31 || 1; the tag mask is E_K(J0) and the payload
        // keystream starts at inc32(J0).
        let mut j0 = [0u8; 16];
        j0[..GCM_IV_LEN].copy_from_slice(iv);
        j0[15] = 1;
        let mut tag_mask = GenericArray::clone_from_slice(&j0);
        block.encrypt_block(&mut tag_mask);

        let mut ctr_iv = j0;
        ctr_iv[15] = 2;
        let keystream = Ctr32BE::<Aes256>::new(
            GenericArray::from_slice(key),
            GenericArray::from_slice(&ctr_iv),
        );

        Self {
            keystream,
            ghash,
            tag_mask: tag_mask.into(),
            aad_len: 0,
            ct_len: 0,
        }
    }

    /// Binds associated data into the tag. Must precede all payload.
    pub fn set_aad(&mut self, aad: &[u8]) {
        debug_assert_eq!(self.ct_len, 0);
        self.ghash.absorb_padded(aad);
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
        self.ghash.absorb(ciphertext);
    }

    /// Completes GHASH with the bit-length block and masks with E_K(J0).
    pub fn finalize(self) -> [u8; GCM_TAG_LEN] {
        let mut lengths = GenericArray::default();
        lengths[..8].copy_from_slice(&(self.aad_len * 8).to_be_bytes());
        lengths[8..].copy_from_slice(&(self.ct_len * 8).to_be_bytes());
        let digest = self.ghash.finalize_with_lengths(lengths);

        let mut tag = self.tag_mask;
        for (t, d) in tag.iter_mut().zip(digest.iter()) {
            *t ^= d;
        }
        tag
    }
}
