//! Decrypt-side streaming state machine.

use crate::cipher::{CipherEngine, TagTrailer};
use crate::error::{CryptoError, CryptoResult};
use crate::key::SymmetricKeyMaterial;
use crate::keywrap::KeyUnwrapper;
use crate::suite::CipherSuite;
use rand::{CryptoRng, RngCore};

enum State {
    Buffering(Vec<u8>),
    Streaming {
        engine: CipherEngine,
        trailer: Option<TagTrailer>,
    },
    Finished,
}

/// Consumes a hybrid-encrypted envelope incrementally.
///
/// Input bytes accumulate in an internal buffer until the fixed-size
/// header (wrapped key + IV, preceded by the suite-id byte in negotiated
/// mode) is complete; `update` returns no output until then, which is flow
/// control rather than an error. Once the key is unwrapped and the cipher
/// configured, the buffered remainder and all subsequent chunks stream
/// straight through.
///
/// Authenticated suites verify the trailing tag only at `finalize`:
/// plaintext returned by earlier `update` calls has **not yet been
/// authenticated**. Callers that need all-or-nothing trust must buffer the
/// output until `finalize` succeeds.
pub struct Decryptor<R: RngCore + CryptoRng> {
    suite: Option<CipherSuite>,
    unwrapper: KeyUnwrapper,
    rng: R,
    negotiated: bool,
    state: State,
}

impl<R: RngCore + CryptoRng> Decryptor<R> {
    /// Decryptor for the headerless variant: the suite was agreed out of
    /// band.
    pub fn new(suite: CipherSuite, unwrapper: KeyUnwrapper, rng: R) -> Self {
        Self {
            suite: Some(suite),
            unwrapper,
            rng,
            negotiated: false,
            state: State::Buffering(Vec::new()),
        }
    }

    /// Decryptor for the negotiated variant: the envelope's leading byte
    /// selects the suite.
    pub fn negotiated(unwrapper: KeyUnwrapper, rng: R) -> Self {
        Self {
            suite: None,
            unwrapper,
            rng,
            negotiated: true,
            state: State::Buffering(Vec::new()),
        }
    }

    /// Bytes that must be buffered before the cipher can be configured.
    /// Unknown until the suite-id byte has arrived in negotiated mode.
    pub fn header_len(&self) -> Option<usize> {
        self.suite
            .map(|s| usize::from(self.negotiated) + self.unwrapper.wrapped_len() + s.iv_size())
    }

    /// Decrypts a chunk, returning any plaintext that became available.
    /// Fails after `finalize`.
    pub fn update(&mut self, chunk: &[u8]) -> CryptoResult<Vec<u8>> {
        match &mut self.state {
            State::Finished => return Err(CryptoError::Protocol("update after finalize")),
            State::Streaming { engine, trailer } => {
                return Ok(Self::stream_chunk(engine, trailer, chunk));
            }
            State::Buffering(buf) => buf.extend_from_slice(chunk),
        }
        self.try_configure()
    }

    /// Completes the envelope. For authenticated suites this verifies the
    /// withheld tag; a mismatch (or a stream too short to carry a full
    /// tag) is an authentication failure. A stream that never produced a
    /// complete header is a truncation error.
    pub fn finalize(&mut self) -> CryptoResult<Vec<u8>> {
        match std::mem::replace(&mut self.state, State::Finished) {
            State::Finished => Err(CryptoError::Protocol("finalize after finalize")),
            State::Buffering(_) => Err(CryptoError::TruncatedStream),
            State::Streaming { engine, trailer } => match trailer {
                Some(trailer) => {
                    let tag = trailer.take().ok_or(CryptoError::AuthenticationFailure)?;
                    engine.verify_tag(&tag)?;
                    Ok(Vec::new())
                }
                None => Ok(Vec::new()),
            },
        }
    }

    fn stream_chunk(
        engine: &mut CipherEngine,
        trailer: &mut Option<TagTrailer>,
        chunk: &[u8],
    ) -> Vec<u8> {
        match trailer {
            Some(trailer) => {
                let released = trailer.push(chunk);
                engine.decrypt(&released)
            }
            None => engine.decrypt(chunk),
        }
    }

    /// Configures the cipher once enough bytes are buffered, replaying the
    /// remainder; returns empty output while the header is incomplete.
    fn try_configure(&mut self) -> CryptoResult<Vec<u8>> {
        let offset = usize::from(self.negotiated);

        let suite = match self.suite {
            Some(suite) => suite,
            None => {
                let State::Buffering(buf) = &self.state else {
                    unreachable!("try_configure outside buffering state");
                };
                let Some(&id) = buf.first() else {
                    return Ok(Vec::new());
                };
                let suite = CipherSuite::from_id(id)?;
                self.suite = Some(suite);
                suite
            }
        };

        let header_len = self.unwrapper.wrapped_len() + suite.iv_size();
        let buf = {
            let State::Buffering(buf) = &mut self.state else {
                unreachable!("try_configure outside buffering state");
            };
            if buf.len() < offset + header_len {
                return Ok(Vec::new());
            }
            std::mem::take(buf)
        };

        let header = &buf[offset..offset + header_len];
        let (wrapped, iv) = header.split_at(self.unwrapper.wrapped_len());
        let key = self.unwrapper.unwrap_key(&mut self.rng, wrapped)?;
        if key.len() != suite.key_size() {
            return Err(CryptoError::KeyUnwrap);
        }

        let material = SymmetricKeyMaterial::from_parts(suite, &key, iv);
        let mut engine = CipherEngine::new(suite, material);
        if suite.is_authenticated() {
            engine.set_aad(header);
        }
        let mut trailer = suite
            .is_authenticated()
            .then(|| TagTrailer::new(suite.tag_size()));
        tracing::debug!(suite = %suite, header_len, "decryptor configured");

        let out = Self::stream_chunk(&mut engine, &mut trailer, &buf[offset + header_len..]);
        self.state = State::Streaming { engine, trailer };
        Ok(out)
    }
}
