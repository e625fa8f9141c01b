//! Incremental block feeding for the AEAD authenticators.
//!
//! GHASH and Poly1305 both absorb fixed 16-byte blocks, but ciphertext
//! arrives in arbitrary chunkings. The accumulator holds at most one
//! partial block between chunks so the authenticator state stays exact
//! regardless of how the stream was split.

use universal_hash::{Block, UniversalHash};

pub(crate) struct StreamingMac<M: UniversalHash> {
    mac: M,
    pending: Block<M>,
    pending_len: usize,
}

impl<M: UniversalHash> StreamingMac<M> {
    pub fn new(mac: M) -> Self {
        Self {
            mac,
            pending: Block::<M>::default(),
            pending_len: 0,
        }
    }

    /// Absorbs a contiguous region, zero-padded to a whole block. Used for
    /// associated data, which is fed in one piece before any payload.
    pub fn absorb_padded(&mut self, bytes: &[u8]) {
        debug_assert_eq!(self.pending_len, 0);
        self.mac.update_padded(bytes);
    }

    /// Absorbs a payload chunk, carrying a partial block across calls.
    pub fn absorb(&mut self, mut bytes: &[u8]) {
        let block_len = self.pending.len();
        if self.pending_len > 0 {
            let take = (block_len - self.pending_len).min(bytes.len());
            self.pending[self.pending_len..self.pending_len + take]
                .copy_from_slice(&bytes[..take]);
            self.pending_len += take;
            bytes = &bytes[take..];
            if self.pending_len < block_len {
                return;
            }
            self.mac.update(&[self.pending.clone()]);
            self.pending_len = 0;
        }
        let full = bytes.len() - bytes.len() % block_len;
        for block in bytes[..full].chunks_exact(block_len) {
            self.mac.update(&[Block::<M>::clone_from_slice(block)]);
        }
        let rest = &bytes[full..];
        self.pending[..rest.len()].copy_from_slice(rest);
        self.pending_len = rest.len();
    }

    /// Zero-pads any trailing partial block, absorbs the final `lengths`
    /// block, and returns the authenticator output.
    pub fn finalize_with_lengths(mut self, lengths: Block<M>) -> Block<M> {
        if self.pending_len > 0 {
            for byte in &mut self.pending[self.pending_len..] {
                *byte = 0;
            }
            self.mac.update(&[self.pending.clone()]);
        }
        self.mac.update(&[lengths]);
        self.mac.finalize()
    }
}
