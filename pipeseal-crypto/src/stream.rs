//! Chunked end-to-end processing over `Read`/`Write` pairs.
//!
//! This is the collaborator surface the engine exposes: load the key file,
//! pump the input through the encryptor or decryptor in fixed-size chunks
//! until end-of-input, finalize once, flush. Everything is blocking and
//! single-threaded; two concurrent streams need two independent calls.

use crate::decryptor::Decryptor;
use crate::encryptor::Encryptor;
use crate::error::CryptoResult;
use crate::keywrap::{KeyUnwrapper, KeyWrapper};
use crate::suite::CipherSuite;
use rand::rngs::OsRng;
use std::io::{Read, Write};
use std::path::Path;

/// Read-loop buffer size, in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;

/// Encrypts `input` to `output` under the public key at `key_file`, using
/// the default suite and the negotiated envelope variant.
pub fn encrypt_stream<I: Read, O: Write>(
    key_file: impl AsRef<Path>,
    input: &mut I,
    output: &mut O,
) -> CryptoResult<()> {
    encrypt_stream_with_suite(key_file, CipherSuite::default(), input, output)
}

/// Encrypts `input` to `output` with an explicit suite.
pub fn encrypt_stream_with_suite<I: Read, O: Write>(
    key_file: impl AsRef<Path>,
    suite: CipherSuite,
    input: &mut I,
    output: &mut O,
) -> CryptoResult<()> {
    let wrapper = KeyWrapper::from_pem_file(key_file)?;
    let mut encryptor = Encryptor::negotiated(suite, wrapper, OsRng);

    // Explicit initialize so a zero-length input still yields a complete
    // envelope (header plus tag).
    output.write_all(&encryptor.initialize()?)?;

    let mut total = 0u64;
    let mut buf = vec![0u8; DEFAULT_CHUNK_SIZE];
    loop {
        let n = input.read(&mut buf)?;
        if n == 0 {
            break;
        }
        total += n as u64;
        output.write_all(&encryptor.update(&buf[..n])?)?;
    }
    output.write_all(&encryptor.finalize()?)?;
    output.flush()?;
    tracing::debug!(suite = %suite, plaintext_bytes = total, "encrypted stream");
    Ok(())
}

/// Decrypts a negotiated-variant envelope from `input` to `output` using
/// the private key at `key_file`.
///
/// Plaintext is written as it streams, before the authentication tag has
/// been checked; an error from this function means the written output must
/// be discarded.
pub fn decrypt_stream<I: Read, O: Write>(
    key_file: impl AsRef<Path>,
    input: &mut I,
    output: &mut O,
) -> CryptoResult<()> {
    let unwrapper = KeyUnwrapper::from_pem_file(key_file)?;
    let mut decryptor = Decryptor::negotiated(unwrapper, OsRng);

    let mut total = 0u64;
    let mut buf = vec![0u8; DEFAULT_CHUNK_SIZE];
    loop {
        let n = input.read(&mut buf)?;
        if n == 0 {
            break;
        }
        let plaintext = decryptor.update(&buf[..n])?;
        total += plaintext.len() as u64;
        output.write_all(&plaintext)?;
    }
    let plaintext = decryptor.finalize()?;
    total += plaintext.len() as u64;
    output.write_all(&plaintext)?;
    output.flush()?;
    tracing::debug!(plaintext_bytes = total, "decrypted stream");
    Ok(())
}
