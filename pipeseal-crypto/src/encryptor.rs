//! Encrypt-side streaming state machine.

use crate::cipher::CipherEngine;
use crate::error::{CryptoError, CryptoResult};
use crate::key::SymmetricKeyMaterial;
use crate::keywrap::KeyWrapper;
use crate::suite::CipherSuite;
use rand::{CryptoRng, RngCore};

enum State {
    Idle,
    Streaming {
        engine: CipherEngine,
        header: Vec<u8>,
    },
    Finished {
        header: Vec<u8>,
    },
}

/// Produces a hybrid-encrypted envelope incrementally.
///
/// The first `update` (or an explicit `initialize`) generates the
/// per-message key and IV from the injected random source, wraps the key
/// under the recipient's public key, and prepends the envelope header
/// `wrapped_key ++ iv` to the output. Subsequent chunks stream through the
/// symmetric cipher; `finalize` emits the authentication tag for
/// authenticated suites.
pub struct Encryptor<R: RngCore + CryptoRng> {
    suite: CipherSuite,
    wrapper: KeyWrapper,
    rng: R,
    embed_suite_id: bool,
    state: State,
}

impl<R: RngCore + CryptoRng> Encryptor<R> {
    /// Encryptor for the headerless envelope variant: both sides agree on
    /// the suite out of band.
    pub fn new(suite: CipherSuite, wrapper: KeyWrapper, rng: R) -> Self {
        Self {
            suite,
            wrapper,
            rng,
            embed_suite_id: false,
            state: State::Idle,
        }
    }

    /// Encryptor for the negotiated variant: the suite's identifier byte
    /// leads the envelope so the decryptor can self-configure.
    pub fn negotiated(suite: CipherSuite, wrapper: KeyWrapper, rng: R) -> Self {
        Self {
            embed_suite_id: true,
            ..Self::new(suite, wrapper, rng)
        }
    }

    pub fn suite(&self) -> CipherSuite {
        self.suite
    }

    /// Total header length this encryptor will emit before any ciphertext.
    pub fn header_len(&self) -> usize {
        usize::from(self.embed_suite_id) + self.wrapper.wrapped_len() + self.suite.iv_size()
    }

    /// Generates and wraps the per-message key, returning the envelope
    /// header. Fails if already initialized.
    pub fn initialize(&mut self) -> CryptoResult<Vec<u8>> {
        match self.state {
            State::Idle => {}
            State::Streaming { .. } => return Err(CryptoError::Protocol("already initialized")),
            State::Finished { .. } => return Err(CryptoError::Protocol("already finalized")),
        }

        let material = SymmetricKeyMaterial::generate(self.suite, &mut self.rng);
        let mut header = self.wrapper.wrap_key(&mut self.rng, material.key())?;
        header.extend_from_slice(material.iv());

        let mut engine = CipherEngine::new(self.suite, material);
        if self.suite.is_authenticated() {
            engine.set_aad(&header);
        }
        tracing::debug!(suite = %self.suite, header_len = self.header_len(), "encryptor configured");

        let out = if self.embed_suite_id {
            let mut framed = Vec::with_capacity(1 + header.len());
            framed.push(self.suite.id());
            framed.extend_from_slice(&header);
            framed
        } else {
            header.clone()
        };
        self.state = State::Streaming { engine, header };
        Ok(out)
    }

    /// Encrypts a chunk, lazily initializing on first use (the header is
    /// prepended to that first output). Fails after `finalize`.
    pub fn update(&mut self, chunk: &[u8]) -> CryptoResult<Vec<u8>> {
        if let State::Finished { .. } = self.state {
            return Err(CryptoError::Protocol("update after finalize"));
        }
        let mut out = Vec::new();
        if matches!(self.state, State::Idle) {
            out = self.initialize()?;
        }
        let State::Streaming { engine, .. } = &mut self.state else {
            unreachable!("initialize left the encryptor unconfigured");
        };
        out.extend_from_slice(&engine.encrypt(chunk));
        Ok(out)
    }

    /// Completes the envelope, emitting the tag for authenticated suites
    /// (empty output otherwise). Fails if never initialized or called
    /// twice.
    pub fn finalize(&mut self) -> CryptoResult<Vec<u8>> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => Err(CryptoError::Protocol("finalize on unconfigured encryptor")),
            State::Finished { header } => {
                self.state = State::Finished { header };
                Err(CryptoError::Protocol("finalize after finalize"))
            }
            State::Streaming { engine, header } => {
                let tag = engine.finalize_tag().unwrap_or_default();
                self.state = State::Finished { header };
                Ok(tag)
            }
        }
    }

    /// The associated data bound into the tag: exactly the wrapped key and
    /// IV bytes. Available only after a successful `finalize`, and only
    /// for authenticated suites.
    pub fn associated_data(&self) -> CryptoResult<&[u8]> {
        if !self.suite.is_authenticated() {
            return Err(CryptoError::Protocol("suite has no associated data"));
        }
        match &self.state {
            State::Finished { header } => Ok(header),
            _ => Err(CryptoError::Protocol("associated data requires finalize")),
        }
    }
}
