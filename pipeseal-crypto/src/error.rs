//! Error types for the encryption engine.

use thiserror::Error;

/// Result type for envelope encryption operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// All errors that can occur while producing or consuming an envelope.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key file contents could not be parsed or failed validation.
    /// Raised at load time, never at first use.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// OAEP unwrap of the symmetric key failed. Padding and length
    /// failures are reported uniformly.
    #[error("symmetric key unwrap failed")]
    KeyUnwrap,

    /// The leading suite-identifier byte maps to no known cipher suite.
    #[error("unknown cipher suite id: {0:#04x}")]
    UnknownSuite(u8),

    /// Authentication tag mismatch at finalize. The ciphertext was
    /// corrupted or forged; plaintext already emitted by earlier
    /// `update` calls was never verified.
    #[error("authentication failed: ciphertext corrupted or forged")]
    AuthenticationFailure,

    /// The stream ended before a complete envelope header was seen.
    #[error("truncated stream: ended before a complete header")]
    TruncatedStream,

    /// State machine misuse, e.g. `update` after `finalize`.
    #[error("protocol violation: {0}")]
    Protocol(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
