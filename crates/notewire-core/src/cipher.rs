//! Password-derived keystream transform for note bodies.
//!
//! This is an obfuscation step, not encryption: a one-byte base key is
//! derived from the password and each character is mixed with a key that
//! advances by 31 per position, then shifted by 3. The encoded form is
//! lowercase hex, two digits per character.
//!
//! ```text
//! k_i = (base + i * 31) mod 256
//! b_i = ((c_i XOR k_i) + 3) mod 256
//! ```
//!
//! Only byte-valued text (code points U+0000..=U+00FF) can be encoded.
//! Wider characters are rejected instead of being truncated, so that
//! `decode(encode(s, p), p) == s` always holds for accepted input.
//!
//! # Example
//!
//! ```rust
//! use notewire_core::cipher::{decode, encode};
//!
//! let hex = encode("Hi", "secret").unwrap();
//! assert_eq!(hex, "d1cf");
//! assert_eq!(decode(&hex, "secret").unwrap(), "Hi");
//! ```

use thiserror::Error;

/// Per-position step of the keystream.
const KEY_STEP: u8 = 31;

/// Constant added after mixing.
const SHIFT: u8 = 3;

/// Errors produced by the keystream transform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// Encoded text is not a sequence of two-digit hex groups.
    #[error("malformed ciphertext: {reason}")]
    MalformedCiphertext { reason: String },

    /// Plaintext contains a character outside the single-byte range.
    #[error("unsupported character {ch:?} at index {index}: only U+0000..=U+00FF can be encoded")]
    UnsupportedCharacter { index: usize, ch: char },
}

/// Derives the base key: the sum of the password's character codes mod 256.
///
/// An empty password yields `0`.
pub fn derive_base_key(password: &str) -> u8 {
    password
        .encode_utf16()
        .fold(0u8, |key, unit| key.wrapping_add(unit as u8))
}

/// Keystream byte for position `index`.
fn key_at(base: u8, index: usize) -> u8 {
    // (i * 31) mod 256 only depends on i mod 256
    base.wrapping_add((index as u8).wrapping_mul(KEY_STEP))
}

/// Encodes `plaintext` into lowercase hex using the keystream for `password`.
///
/// # Errors
///
/// Returns [`CipherError::UnsupportedCharacter`] when `plaintext` contains a
/// character above U+00FF.
pub fn encode(plaintext: &str, password: &str) -> Result<String, CipherError> {
    let base = derive_base_key(password);
    let mut bytes = Vec::with_capacity(plaintext.len());

    for (index, ch) in plaintext.chars().enumerate() {
        let code = u8::try_from(u32::from(ch))
            .map_err(|_| CipherError::UnsupportedCharacter { index, ch })?;
        let mixed = code ^ key_at(base, index);
        bytes.push(mixed.wrapping_add(SHIFT));
    }

    Ok(hex::encode(bytes))
}

/// Decodes hex produced by [`encode`] back into text.
///
/// Each decoded byte becomes the character with that code point.
///
/// # Errors
///
/// Returns [`CipherError::MalformedCiphertext`] for odd-length input or
/// non-hex characters.
pub fn decode(ciphertext: &str, password: &str) -> Result<String, CipherError> {
    let base = derive_base_key(password);
    let bytes = hex::decode(ciphertext).map_err(|e| CipherError::MalformedCiphertext {
        reason: e.to_string(),
    })?;

    let text = bytes
        .into_iter()
        .enumerate()
        .map(|(index, byte)| {
            let mixed = byte.wrapping_sub(SHIFT);
            char::from(mixed ^ key_at(base, index))
        })
        .collect();

    Ok(text)
}
