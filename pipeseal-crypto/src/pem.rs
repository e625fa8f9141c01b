//! PEM armor removal for key files.
//!
//! Keys arrive as base64 DER between `-----BEGIN ...-----` and
//! `-----END ...-----` fences. The filter drops the fences (and the label
//! text between the dash runs) by counting fence characters: each delimiter
//! line contains exactly ten dashes, so bytes are swallowed from the first
//! dash until the tenth has been consumed.
//!
//! Known limitation, kept deliberately: body text that itself contains a
//! dash starts a counted run and is dropped until ten dashes have passed.
//! Standard single-line PEM fences never trigger this; base64 bodies cannot
//! (the alphabet has no dash).

use crate::error::{CryptoError, CryptoResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const FENCE: u8 = b'-';
const FENCE_RUN_LEN: u8 = 10;

/// Stateful byte-stream transform stripping PEM delimiter fences.
///
/// Push bytes in any chunking, including one at a time; output is identical
/// regardless of chunk boundaries. The transform never fails — malformed
/// armor just yields bytes the downstream key parser will reject.
#[derive(Debug, Default)]
pub struct PemArmorFilter {
    fence_run: u8,
}

impl PemArmorFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters `input`, appending emitted bytes to `out`.
    pub fn filter_into(&mut self, input: &[u8], out: &mut Vec<u8>) {
        for &byte in input {
            if byte == FENCE {
                self.fence_run += 1;
            }
            if self.fence_run != 0 {
                if self.fence_run == FENCE_RUN_LEN {
                    self.fence_run = 0;
                }
                continue;
            }
            out.push(byte);
        }
    }

    /// Filters `input` into a fresh buffer.
    pub fn filter(&mut self, input: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(input.len());
        self.filter_into(input, &mut out);
        out
    }
}

/// One-shot armor strip over a complete buffer.
pub fn strip_armor(input: &[u8]) -> Vec<u8> {
    PemArmorFilter::new().filter(input)
}

/// Strips armor, drops whitespace, and base64-decodes the body, yielding
/// raw DER for the key parser.
pub(crate) fn decode_armored(input: &[u8]) -> CryptoResult<Vec<u8>> {
    let body: Vec<u8> = strip_armor(input)
        .into_iter()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(&body)
        .map_err(|e| CryptoError::InvalidKeyMaterial(format!("base64 decode failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_standard_fences() {
        let input = b"-----BEGIN KEY-----\nABCD\n-----END KEY-----\n";
        assert_eq!(strip_armor(input), b"\nABCD\n\n");
    }

    #[test]
    fn output_is_chunking_independent() {
        let input = b"-----BEGIN PUBLIC KEY-----\nMIIBIjAN\nBgkqhkiG\n-----END PUBLIC KEY-----\n";
        let whole = strip_armor(input);

        let mut filter = PemArmorFilter::new();
        let mut byte_at_a_time = Vec::new();
        for b in input {
            filter.filter_into(std::slice::from_ref(b), &mut byte_at_a_time);
        }
        assert_eq!(whole, byte_at_a_time);
    }

    #[test]
    fn unarmored_input_passes_through() {
        let input = b"no fences here, just text\n";
        assert_eq!(strip_armor(input), input);
    }

    #[test]
    fn ten_dashes_mid_line_swallow_content() {
        // Documented limitation: a counted run of ten dashes inside body
        // text is treated as a fence and dropped along with what follows
        // the first dash.
        let input = b"ab--cd--ef--gh--ij--kl";
        assert_eq!(strip_armor(input), b"abkl");
    }

    #[test]
    fn decode_armored_yields_raw_bytes() {
        let input = b"-----BEGIN KEY-----\naGVsbG8gd29ybGQ=\n-----END KEY-----\n";
        assert_eq!(decode_armored(input).unwrap(), b"hello world");
    }

    #[test]
    fn decode_armored_rejects_garbage() {
        assert!(decode_armored(b"-----BEGIN KEY-----\n!!!\n-----END KEY-----\n").is_err());
    }
}
