//! Envelope cipher - AES-256-CTR over HKDF-derived keys
//!
//! An envelope is `hex(iv):hex(ciphertext)` with a fresh random 16-byte IV
//! per call. CTR is a stream cipher: decryption cannot fail once the IV
//! parses, so corruption of the ciphertext surfaces downstream as a tag
//! mismatch rather than a cipher error.

use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use ctr::Ctr128BE;
use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;

use crate::error::CryptoError;

type Aes256Ctr = Ctr128BE<Aes256>;

/// Separator between the hex IV and hex ciphertext halves of an envelope
pub const ENVELOPE_SEPARATOR: char = ':';

/// IV length in bytes (AES block size)
pub const IV_LENGTH: usize = 16;

/// Fixed HKDF salt, shared by all peers.
///
/// Non-secret by design: both ends must derive the same key from the same
/// secret. See the crate-level docs for why this is kept as-is.
const KEY_SALT: &[u8] = b"pulse-envelope-v1";

/// HKDF info string binding the derived key to this use
const KEY_INFO: &[u8] = b"envelope cipher key";

/// Symmetric envelope cipher
///
/// Derives its 32-byte key once at construction; `encrypt`/`decrypt` are
/// cheap per-call and take `&self`, so one cipher can be shared across
/// connections behind an `Arc`.
pub struct EnvelopeCipher {
    key: [u8; 32],
}

impl EnvelopeCipher {
    /// Derive the envelope key from the shared secret
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let hk = Hkdf::<Sha256>::new(Some(KEY_SALT), secret.as_ref());
        let mut key = [0u8; 32];
        hk.expand(KEY_INFO, &mut key)
            .expect("32 bytes is a valid HKDF-SHA256 output length");
        Self { key }
    }

    /// Encrypt plaintext into an envelope string
    ///
    /// Generates a fresh random IV per call; the IV is never reused.
    pub fn encrypt(&self, plaintext: &[u8]) -> String {
        let mut iv = [0u8; IV_LENGTH];
        rand::rng().fill_bytes(&mut iv);

        let mut buf = plaintext.to_vec();
        let mut cipher = Aes256Ctr::new(&self.key.into(), &iv.into());
        cipher.apply_keystream(&mut buf);

        format!(
            "{}{}{}",
            hex::encode(iv),
            ENVELOPE_SEPARATOR,
            hex::encode(buf)
        )
    }

    /// Decrypt an envelope string back into plaintext
    ///
    /// # Errors
    ///
    /// `MalformedEnvelope` if the envelope does not split into exactly two
    /// hex parts or the IV is not 16 bytes.
    pub fn decrypt(&self, envelope: &str) -> Result<Vec<u8>, CryptoError> {
        let mut parts = envelope.splitn(3, ENVELOPE_SEPARATOR);
        let (iv_hex, ct_hex) = match (parts.next(), parts.next(), parts.next()) {
            (Some(iv), Some(ct), None) => (iv, ct),
            _ => return Err(CryptoError::malformed("expected iv:ciphertext")),
        };

        let iv_bytes =
            hex::decode(iv_hex).map_err(|_| CryptoError::malformed("iv is not valid hex"))?;
        let iv: [u8; IV_LENGTH] = iv_bytes
            .try_into()
            .map_err(|_| CryptoError::malformed("iv is not 16 bytes"))?;

        let mut buf = hex::decode(ct_hex)
            .map_err(|_| CryptoError::malformed("ciphertext is not valid hex"))?;

        let mut cipher = Aes256Ctr::new(&self.key.into(), &iv.into());
        cipher.apply_keystream(&mut buf);

        Ok(buf)
    }
}

impl std::fmt::Debug for EnvelopeCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material
        f.debug_struct("EnvelopeCipher").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "cipher_test.rs"]
mod cipher_test;
