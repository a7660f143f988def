//! Pulse Crypto - Envelope encryption and integrity tagging
//!
//! Every event record crosses the wire as an *envelope*: the record's JSON
//! bytes encrypted with AES-256-CTR under a key derived from a shared secret,
//! carried as `hex(iv):hex(ciphertext)`. Integrity is proven separately by an
//! embedded *tag*, a SHA-256 digest over the record's fields in canonical
//! (key-sorted) order.
//!
//! # Known limitation
//!
//! Key derivation uses HKDF-SHA256 with a fixed, non-secret salt so that any
//! two peers sharing the same secret derive the same envelope key. This is
//! deliberately preserved for wire compatibility with existing producers;
//! rotating to per-connection salts would break every deployed peer. Treat
//! the shared secret accordingly.
//!
//! # Example
//!
//! ```
//! use pulse_crypto::EnvelopeCipher;
//!
//! let cipher = EnvelopeCipher::new("shared-secret");
//! let envelope = cipher.encrypt(b"hello");
//! assert_eq!(cipher.decrypt(&envelope).unwrap(), b"hello");
//! ```

mod cipher;
mod error;
mod integrity;

pub use cipher::{EnvelopeCipher, ENVELOPE_SEPARATOR, IV_LENGTH};
pub use error::CryptoError;
pub use integrity::{canonical_hash, tag_message, validate_tag, TAG_FIELD};
