//! Asymmetric wrapping of the per-message symmetric key.
//!
//! The encrypt side loads an RSA public key and wraps the symmetric key
//! with OAEP; the decrypt side loads the matching private key and unwraps
//! it. Key files are PEM-armored base64 DER; both SPKI/PKCS#8 and bare
//! PKCS#1 encodings are accepted. Invalid key material fails at load time,
//! never at first use.

use crate::error::{CryptoError, CryptoResult};
use crate::pem;
use rand::{CryptoRng, RngCore};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use std::path::Path;
use zeroize::Zeroizing;

fn oaep() -> Oaep {
    Oaep::new::<Sha256>()
}

/// Wraps symmetric keys under a recipient's RSA public key.
pub struct KeyWrapper {
    key: RsaPublicKey,
}

impl KeyWrapper {
    /// Loads a public key from a PEM-armored file.
    pub fn from_pem_file(path: impl AsRef<Path>) -> CryptoResult<Self> {
        Self::from_pem_bytes(&std::fs::read(path)?)
    }

    /// Loads a public key from PEM-armored bytes.
    pub fn from_pem_bytes(armored: &[u8]) -> CryptoResult<Self> {
        let der = pem::decode_armored(armored)?;
        let key = RsaPublicKey::from_public_key_der(&der)
            .or_else(|_| RsaPublicKey::from_pkcs1_der(&der))
            .map_err(|e| {
                CryptoError::InvalidKeyMaterial(format!("RSA public key parse failed: {e}"))
            })?;
        tracing::debug!(modulus_bits = key.size() * 8, "loaded RSA public key");
        Ok(Self { key })
    }

    /// Length of a wrapped key: the modulus size in bytes, independent of
    /// the plaintext key content.
    pub fn wrapped_len(&self) -> usize {
        self.key.size()
    }

    /// OAEP-encrypts `key_bytes`.
    pub fn wrap_key<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        key_bytes: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        self.key.encrypt(rng, oaep(), key_bytes).map_err(|_| {
            CryptoError::InvalidKeyMaterial("modulus too small to wrap the suite key".into())
        })
    }
}

/// Unwraps symmetric keys with the recipient's RSA private key.
pub struct KeyUnwrapper {
    key: RsaPrivateKey,
}

impl KeyUnwrapper {
    /// Loads and validates a private key from a PEM-armored file.
    pub fn from_pem_file(path: impl AsRef<Path>) -> CryptoResult<Self> {
        Self::from_pem_bytes(&std::fs::read(path)?)
    }

    /// Loads and validates a private key from PEM-armored bytes.
    pub fn from_pem_bytes(armored: &[u8]) -> CryptoResult<Self> {
        let der = pem::decode_armored(armored)?;
        let key = RsaPrivateKey::from_pkcs8_der(&der)
            .or_else(|_| RsaPrivateKey::from_pkcs1_der(&der))
            .map_err(|e| {
                CryptoError::InvalidKeyMaterial(format!("RSA private key parse failed: {e}"))
            })?;
        key.validate()
            .map_err(|e| CryptoError::InvalidKeyMaterial(format!("RSA key validation failed: {e}")))?;
        tracing::debug!(modulus_bits = key.size() * 8, "loaded RSA private key");
        Ok(Self { key })
    }

    /// Length of a wrapped key under this key's modulus.
    pub fn wrapped_len(&self) -> usize {
        self.key.size()
    }

    /// OAEP-decrypts `wrapped`, using blinding with `rng`. Padding and
    /// length failures are reported uniformly as [`CryptoError::KeyUnwrap`].
    pub fn unwrap_key<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        wrapped: &[u8],
    ) -> CryptoResult<Zeroizing<Vec<u8>>> {
        if wrapped.len() != self.wrapped_len() {
            return Err(CryptoError::KeyUnwrap);
        }
        self.key
            .decrypt_blinded(rng, oaep(), wrapped)
            .map(Zeroizing::new)
            .map_err(|_| CryptoError::KeyUnwrap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey};
    use std::sync::OnceLock;

    fn test_key() -> &'static RsaPrivateKey {
        static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
        KEY.get_or_init(|| {
            let mut rng = StdRng::seed_from_u64(0xC0FFEE);
            RsaPrivateKey::new(&mut rng, 2048).expect("keygen")
        })
    }

    fn armored(label: &str, der: &[u8]) -> Vec<u8> {
        let b64 = STANDARD.encode(der);
        let mut out = format!("-----BEGIN {label}-----\n");
        for line in b64.as_bytes().chunks(64) {
            out.push_str(std::str::from_utf8(line).unwrap());
            out.push('\n');
        }
        out.push_str(&format!("-----END {label}-----\n"));
        out.into_bytes()
    }

    fn wrapper() -> KeyWrapper {
        let der = test_key()
            .to_public_key()
            .to_public_key_der()
            .unwrap();
        KeyWrapper::from_pem_bytes(&armored("PUBLIC KEY", der.as_bytes())).unwrap()
    }

    fn unwrapper() -> KeyUnwrapper {
        let der = test_key().to_pkcs8_der().unwrap();
        KeyUnwrapper::from_pem_bytes(&armored("PRIVATE KEY", der.as_bytes())).unwrap()
    }

    #[test]
    fn wrap_unwrap_roundtrip() {
        let mut rng = StdRng::seed_from_u64(1);
        let key_bytes = [0x42u8; 32];

        let wrapped = wrapper().wrap_key(&mut rng, &key_bytes).unwrap();
        assert_eq!(wrapped.len(), 256);

        let recovered = unwrapper().unwrap_key(&mut rng, &wrapped).unwrap();
        assert_eq!(recovered.as_slice(), key_bytes);
    }

    #[test]
    fn wrapped_length_is_modulus_size() {
        let mut rng = StdRng::seed_from_u64(2);
        let w = wrapper();
        let a = w.wrap_key(&mut rng, &[0u8; 32]).unwrap();
        let b = w.wrap_key(&mut rng, &[0xffu8; 32]).unwrap();
        assert_eq!(a.len(), w.wrapped_len());
        assert_eq!(b.len(), w.wrapped_len());
    }

    #[test]
    fn tampered_wrapped_key_fails_uniformly() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut wrapped = wrapper().wrap_key(&mut rng, &[7u8; 32]).unwrap();
        wrapped[10] ^= 0x01;
        assert!(matches!(
            unwrapper().unwrap_key(&mut rng, &wrapped),
            Err(CryptoError::KeyUnwrap)
        ));
    }

    #[test]
    fn short_wrapped_key_fails() {
        let mut rng = StdRng::seed_from_u64(4);
        assert!(matches!(
            unwrapper().unwrap_key(&mut rng, &[0u8; 16]),
            Err(CryptoError::KeyUnwrap)
        ));
    }

    #[test]
    fn corrupt_der_fails_at_load() {
        let junk = armored("PUBLIC KEY", b"not a DER document at all");
        assert!(matches!(
            KeyWrapper::from_pem_bytes(&junk),
            Err(CryptoError::InvalidKeyMaterial(_))
        ));
        let junk = armored("PRIVATE KEY", b"not a DER document at all");
        assert!(matches!(
            KeyUnwrapper::from_pem_bytes(&junk),
            Err(CryptoError::InvalidKeyMaterial(_))
        ));
    }

    #[test]
    fn loads_from_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipient.pub");
        let der = test_key().to_public_key().to_public_key_der().unwrap();
        std::fs::write(&path, armored("PUBLIC KEY", der.as_bytes())).unwrap();

        let w = KeyWrapper::from_pem_file(&path).unwrap();
        assert_eq!(w.wrapped_len(), 256);
    }

    #[test]
    fn missing_file_surfaces_io_error() {
        assert!(matches!(
            KeyWrapper::from_pem_file("/definitely/not/here.pem"),
            Err(CryptoError::Io(_))
        ));
    }
}
