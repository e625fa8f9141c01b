//! Streaming hybrid (envelope) encryption for PipeSeal.
//!
//! Encrypts arbitrary-length byte streams under bounded memory:
//! - a fresh symmetric key and IV are generated per message,
//! - the payload streams through an AEAD (or plain) cipher chunk by chunk,
//! - the symmetric key is wrapped with RSA-OAEP so only the holder of the
//!   matching private key can recover it.
//!
//! # Wire envelope
//!
//! ```text
//! [1-byte suite id]   negotiated variant only
//! [wrapped key]       RSA modulus length, fixed per key
//! [iv]                fixed per suite
//! [ciphertext]        arbitrary length, chunk boundaries irrelevant
//! [tag]               authenticated suites only, emitted at finalize
//! ```
//!
//! The wrapped key and IV are bound into the authentication tag as
//! associated data (authenticated but not encrypted). The decrypt side
//! buffers input until the fixed-size header is complete, unwraps the key,
//! then replays the remainder through the configured cipher.
//!
//! # Trust boundary
//!
//! Authenticated decryption emits plaintext as it streams; the tag is
//! verified only at finalize. Callers that must not act on unverified data
//! have to buffer the output until [`Decryptor::finalize`] succeeds.

mod chacha;
mod cipher;
mod decryptor;
mod encryptor;
mod error;
mod gcm;
mod key;
mod keywrap;
mod mac;
pub mod pem;
mod stream;
mod suite;

pub use decryptor::Decryptor;
pub use encryptor::Encryptor;
pub use error::{CryptoError, CryptoResult};
pub use key::SymmetricKeyMaterial;
pub use keywrap::{KeyUnwrapper, KeyWrapper};
pub use pem::{strip_armor, PemArmorFilter};
pub use stream::{
    decrypt_stream, encrypt_stream, encrypt_stream_with_suite, DEFAULT_CHUNK_SIZE,
};
pub use suite::CipherSuite;
