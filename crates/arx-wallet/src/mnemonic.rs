//! BIP39 mnemonic ↔ entropy ↔ seed conversions, plus the TON variant.
//!
//! Entropy of 16/24/32 bytes maps to 12/18/24 words: the top
//! `len/4` bits of SHA-256(entropy) are appended as a checksum and the
//! combined bit-stream is cut into 11-bit indices into the English
//! wordlist. Seeds are PBKDF2-HMAC-SHA512 stretches of the phrase —
//! 2048 rounds with salt `"mnemonic"` for BIP39.
//!
//! TON derives differently for 24-word phrases: entropy is
//! `HMAC-SHA512(key = phrase, msg = "")` with no checksum validation
//! (TON's own derivation rule), stretched with salt
//! `"TON default seed"` at 100 000 rounds. 12- and 18-word phrases fall
//! back to the standard BIP39 path.

use tracing::debug;

use arx_core::provider::{EntropyProvider, HashProvider};

use crate::derive::Seed;
use crate::error::MnemonicError;
use crate::wordlist::{ENGLISH, word_index};

/// PBKDF2 rounds for BIP39 seed stretching.
pub const BIP39_PBKDF2_ROUNDS: u32 = 2048;

/// PBKDF2 salt for BIP39 seed stretching.
const BIP39_SALT: &[u8] = b"mnemonic";

/// PBKDF2 rounds for TON seed stretching.
pub const TON_PBKDF2_ROUNDS: u32 = 100_000;

/// PBKDF2 salt for TON seed stretching.
const TON_SALT: &[u8] = b"TON default seed";

/// Word count for a given entropy byte length, if valid.
fn word_count_for_entropy(len: usize) -> Option<usize> {
    match len {
        16 => Some(12),
        24 => Some(18),
        32 => Some(24),
        _ => None,
    }
}

/// Entropy byte length for a given word count, if valid.
fn entropy_len_for_words(count: usize) -> Option<usize> {
    match count {
        12 => Some(16),
        18 => Some(24),
        24 => Some(32),
        _ => None,
    }
}

/// Fill a buffer of 16, 24, or 32 bytes from the entropy provider.
pub fn generate_entropy<P: EntropyProvider>(
    provider: &P,
    len: usize,
) -> Result<Vec<u8>, MnemonicError> {
    if word_count_for_entropy(len).is_none() {
        return Err(MnemonicError::EntropyLength(len));
    }
    let mut entropy = vec![0u8; len];
    provider.fill_random(&mut entropy)?;
    Ok(entropy)
}

/// Convert entropy to a space-joined English mnemonic phrase.
pub fn entropy_to_mnemonic<P: HashProvider>(
    provider: &P,
    entropy: &[u8],
) -> Result<String, MnemonicError> {
    let word_count = word_count_for_entropy(entropy.len())
        .ok_or(MnemonicError::EntropyLength(entropy.len()))?;

    // entropy ∥ checksum byte; at most 8 checksum bits are ever used
    let mut stream = [0u8; 33];
    stream[..entropy.len()].copy_from_slice(entropy);
    stream[entropy.len()] = provider.sha256(entropy)[0];

    let mut phrase = String::new();
    for i in 0..word_count {
        let bit = i * 11;
        let byte = bit / 8;
        // 24-bit window starting at `byte`; the last window may run one
        // byte past the stream, which reads as zero
        let mut window = (stream[byte] as u32) << 16;
        window |= (*stream.get(byte + 1).unwrap_or(&0) as u32) << 8;
        window |= *stream.get(byte + 2).unwrap_or(&0) as u32;
        let index = (window >> (13 - (bit % 8))) & 0x7ff;

        if i != 0 {
            phrase.push(' ');
        }
        phrase.push_str(ENGLISH[index as usize]);
    }
    Ok(phrase)
}

/// Map a phrase's words to their wordlist indices.
pub fn phrase_to_indices(phrase: &str) -> Result<Vec<u16>, MnemonicError> {
    phrase
        .split_whitespace()
        .map(|word| {
            word_index(word).ok_or_else(|| MnemonicError::UnknownWord(word.to_string()))
        })
        .collect()
}

/// Reconstruct entropy from word indices, verifying the checksum.
///
/// The indices' combined bit-stream is entropy followed by
/// `count*11 - len*8` checksum bits; those must equal the top bits of
/// SHA-256 over the reconstructed entropy.
pub fn mnemonic_to_entropy<P: HashProvider>(
    provider: &P,
    indices: &[u16],
) -> Result<Vec<u8>, MnemonicError> {
    let entropy_len =
        entropy_len_for_words(indices.len()).ok_or(MnemonicError::WordCount(indices.len()))?;

    let mut stream = [0u8; 33];
    for (i, &index) in indices.iter().enumerate() {
        if index >= 2048 {
            return Err(MnemonicError::WordIndex(index));
        }
        for j in 0..11 {
            if index & (1 << (10 - j)) != 0 {
                let bit = i * 11 + j;
                stream[bit / 8] |= 1 << (7 - bit % 8);
            }
        }
    }

    let sha = provider.sha256(&stream[..entropy_len]);
    let checksum_bits = indices.len() * 11 - entropy_len * 8;
    let mask = 0xffu8 << (8 - checksum_bits);
    let expected = sha[0] & mask;
    if expected != stream[entropy_len] {
        debug!(
            got = stream[entropy_len],
            expected, "mnemonic checksum mismatch"
        );
        return Err(MnemonicError::ChecksumMismatch);
    }

    Ok(stream[..entropy_len].to_vec())
}

/// Reconstruct entropy from a phrase, verifying words and checksum.
pub fn phrase_to_entropy<P: HashProvider>(
    provider: &P,
    phrase: &str,
) -> Result<Vec<u8>, MnemonicError> {
    mnemonic_to_entropy(provider, &phrase_to_indices(phrase)?)
}

/// Stretch a mnemonic phrase into a 64-byte seed
/// (PBKDF2-HMAC-SHA512, salt `"mnemonic"`, 2048 rounds).
///
/// The phrase is used as given; no wordlist or checksum validation
/// happens here. This is the multi-second path on constrained hardware.
pub fn mnemonic_to_seed<P: HashProvider>(provider: &P, phrase: &str) -> Seed {
    let mut seed = [0u8; 64];
    provider.pbkdf2_hmac_sha512(phrase.as_bytes(), BIP39_SALT, BIP39_PBKDF2_ROUNDS, &mut seed);
    Seed::from_bytes(seed)
}

/// Entropy straight to seed: render the mnemonic, then stretch it.
pub fn entropy_to_seed<P: HashProvider>(
    provider: &P,
    entropy: &[u8],
) -> Result<Seed, MnemonicError> {
    let phrase = entropy_to_mnemonic(provider, entropy)?;
    Ok(mnemonic_to_seed(provider, &phrase))
}

/// TON entropy for a phrase: `HMAC-SHA512(key = phrase, msg = "")`.
///
/// No checksum is validated on this path; TON's derivation hashes the
/// raw phrase.
pub fn ton_mnemonic_to_entropy<P: HashProvider>(provider: &P, phrase: &str) -> [u8; 64] {
    provider.hmac_sha512(phrase.as_bytes(), b"")
}

/// Stretch 64 bytes of TON entropy into a seed
/// (PBKDF2-HMAC-SHA512, salt `"TON default seed"`, 100 000 rounds).
pub fn ton_entropy_to_seed<P: HashProvider>(provider: &P, entropy: &[u8; 64]) -> Seed {
    let mut seed = [0u8; 64];
    provider.pbkdf2_hmac_sha512(entropy, TON_SALT, TON_PBKDF2_ROUNDS, &mut seed);
    Seed::from_bytes(seed)
}

/// Seed for a TON wallet phrase.
///
/// Exactly 24 words take the TON derivation; 12 and 18 words fall back
/// to the standard BIP39 path; anything else is rejected.
pub fn ton_mnemonic_to_seed<P: HashProvider>(
    provider: &P,
    phrase: &str,
) -> Result<Seed, MnemonicError> {
    let count = phrase.split_whitespace().count();
    if entropy_len_for_words(count).is_none() {
        return Err(MnemonicError::WordCount(count));
    }
    if count != 24 {
        return Ok(mnemonic_to_seed(provider, phrase));
    }
    let entropy = ton_mnemonic_to_entropy(provider, phrase);
    Ok(ton_entropy_to_seed(provider, &entropy))
}
