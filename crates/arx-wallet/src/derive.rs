//! BIP32 hierarchical-deterministic key derivation.
//!
//! An [`ExtendedSecret`] is a 32-byte private key paired with a 32-byte
//! chain code. Each derivation step is a pure function from
//! `(secret, index)` to a new secret, so a path walk is a fold over its
//! indices; intermediate secrets stay inspectable and everything zeroes
//! itself on drop.
//!
//! Child keys follow the standard construction: HMAC-SHA512 keyed by the
//! chain code over either the parent public key (normal) or the parent
//! private key (hardened), then `child = parent + IL (mod n)` over the
//! secp256k1 group order. The NEAR chain uses a different rule — see
//! [`derive_child_near`].

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use arx_core::provider::{CurveProvider, HashProvider};
use arx_uint::{U128, U256};

use crate::error::DeriveError;

/// HMAC key for standard BIP32 master-secret derivation.
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// HMAC key for ed25519-style chains (NEAR).
pub const ED25519_MASTER_HMAC_KEY: &[u8] = b"ed25519 seed";

/// The secp256k1 group order `n`.
const SECP256K1_ORDER: U256 = U256::new(
    U128::new(0xbfd25e8c_d0364141, 0xbaaedce6_af48a03b),
    U128::new(0xffffffff_fffffffe, 0xffffffff_ffffffff),
);

/// A 64-byte master seed, the output of mnemonic stretching.
///
/// Zeroized on drop; `Debug` never prints the bytes.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Seed {
    bytes: [u8; 64],
}

impl Seed {
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self { bytes }
    }

    /// Raw seed bytes. Handle with care.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.bytes
    }
}

impl Clone for Seed {
    fn clone(&self) -> Self {
        Self { bytes: self.bytes }
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seed").field("bytes", &"[REDACTED]").finish()
    }
}

/// One step of a derivation path.
///
/// The top bit marks hardened derivation, mirroring the on-path
/// `0x8000_0000` convention; `ChildIndex::hardened(44)` is the `44'` of
/// path notation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChildIndex(u32);

impl ChildIndex {
    /// Flag bit distinguishing hardened child numbers.
    pub const HARDENED_FLAG: u32 = 0x8000_0000;

    /// A normal (public-derivable) child number.
    pub const fn normal(n: u32) -> Self {
        Self(n)
    }

    /// A hardened child number.
    pub const fn hardened(n: u32) -> Self {
        Self(n | Self::HARDENED_FLAG)
    }

    /// Wrap an already-flagged raw index.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn is_hardened(self) -> bool {
        self.0 & Self::HARDENED_FLAG != 0
    }

    /// The child number without the hardened flag.
    pub const fn number(self) -> u32 {
        self.0 & !Self::HARDENED_FLAG
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_hardened() {
            write!(f, "{}'", self.number())
        } else {
            write!(f, "{}", self.number())
        }
    }
}

impl fmt::Debug for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChildIndex({self})")
    }
}

/// Which child-derivation rule a path walk applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DerivationScheme {
    /// Standard BIP32 over secp256k1.
    Secp256k1,
    /// NEAR's ed25519-style rule: always hardened-form HMAC input, raw
    /// HMAC output replaces the whole secret.
    Near,
}

/// Private key and chain code at one node of the derivation tree.
///
/// Zeroized on drop; `Debug` never prints the bytes.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ExtendedSecret {
    key: [u8; 32],
    chain_code: [u8; 32],
}

impl ExtendedSecret {
    pub fn new(key: [u8; 32], chain_code: [u8; 32]) -> Self {
        Self { key, chain_code }
    }

    /// The 32-byte private key. Handle with care.
    pub fn key(&self) -> &[u8; 32] {
        &self.key
    }

    /// The 32-byte chain code.
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }
}

impl Clone for ExtendedSecret {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            chain_code: self.chain_code,
        }
    }
}

impl fmt::Debug for ExtendedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedSecret")
            .field("key", &"[REDACTED]")
            .field("chain_code", &"[REDACTED]")
            .finish()
    }
}

/// Split a 64-byte HMAC output into an extended secret (IL ∥ IR).
fn secret_from_digest(digest: &[u8; 64]) -> ExtendedSecret {
    let mut key = [0u8; 32];
    let mut chain_code = [0u8; 32];
    key.copy_from_slice(&digest[..32]);
    chain_code.copy_from_slice(&digest[32..]);
    ExtendedSecret::new(key, chain_code)
}

/// Master secret for a seed: `HMAC-SHA512(key = "Bitcoin seed", seed)`.
pub fn master_from_seed<P: HashProvider>(provider: &P, seed: &Seed) -> ExtendedSecret {
    master_from_seed_with_key(provider, seed, MASTER_HMAC_KEY)
}

/// Master secret with a caller-chosen HMAC key string, for chains that
/// replace `"Bitcoin seed"` (NEAR uses [`ED25519_MASTER_HMAC_KEY`]).
pub fn master_from_seed_with_key<P: HashProvider>(
    provider: &P,
    seed: &Seed,
    hmac_key: &[u8],
) -> ExtendedSecret {
    let digest = provider.hmac_sha512(hmac_key, seed.as_bytes());
    secret_from_digest(&digest)
}

/// `(a + b) mod n` over the secp256k1 group order, with the carry out of
/// bit 255 folded into the reduction decision.
fn scalar_add_mod_order(a: U256, b: U256) -> U256 {
    let (sum, carry) = a.overflowing_add(b);
    if carry || sum >= SECP256K1_ORDER {
        sum.wrapping_sub(SECP256K1_ORDER)
    } else {
        sum
    }
}

/// The 37-byte HMAC input for hardened derivation:
/// `0x00 ∥ private_key ∥ be32(index)`.
fn hardened_hmac_input(secret: &ExtendedSecret, index: ChildIndex) -> [u8; 37] {
    let mut input = [0u8; 37];
    input[1..33].copy_from_slice(secret.key());
    input[33..].copy_from_slice(&index.raw().to_be_bytes());
    input
}

/// Derive one child of `secret` by `index`.
///
/// Hardened indices key the HMAC walk off the parent private key;
/// normal indices use the parent's compressed public key, which the
/// curve provider computes.
pub fn derive_child<P: HashProvider + CurveProvider>(
    provider: &P,
    secret: &ExtendedSecret,
    index: ChildIndex,
) -> Result<ExtendedSecret, DeriveError> {
    let digest = if index.is_hardened() {
        let input = hardened_hmac_input(secret, index);
        provider.hmac_sha512(secret.chain_code(), &input)
    } else {
        let pubkey = provider.secp256k1_public_key(secret.key(), true)?;
        if pubkey.len() != 33 {
            return Err(arx_core::ProviderError::InvalidPublicKey.into());
        }
        let mut input = [0u8; 37];
        input[..33].copy_from_slice(&pubkey);
        input[33..].copy_from_slice(&index.raw().to_be_bytes());
        provider.hmac_sha512(secret.chain_code(), &input)
    };

    let il = U256::from_be_bytes(digest[..32].try_into().expect("IL is 32 bytes"));
    let parent = U256::from_be_bytes(*secret.key());
    let child_key = scalar_add_mod_order(parent, il);

    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(&digest[32..]);
    Ok(ExtendedSecret::new(child_key.to_be_bytes(), chain_code))
}

/// Derive one child with NEAR's rule: the HMAC input always takes the
/// hardened form regardless of the index's top bit, and the raw HMAC
/// output replaces the entire secret — no scalar addition.
pub fn derive_child_near<P: HashProvider>(
    provider: &P,
    secret: &ExtendedSecret,
    index: ChildIndex,
) -> ExtendedSecret {
    let input = hardened_hmac_input(secret, index);
    let digest = provider.hmac_sha512(secret.chain_code(), &input);
    secret_from_digest(&digest)
}

/// Fold a derivation path over `secret` with the given scheme.
pub fn derive_path<P: HashProvider + CurveProvider>(
    provider: &P,
    secret: &ExtendedSecret,
    path: &[ChildIndex],
    scheme: DerivationScheme,
) -> Result<ExtendedSecret, DeriveError> {
    let mut current = secret.clone();
    for &index in path {
        current = match scheme {
            DerivationScheme::Secp256k1 => derive_child(provider, &current, index)?,
            DerivationScheme::Near => derive_child_near(provider, &current, index),
        };
    }
    Ok(current)
}

/// Derivation from a path string (`"m/44'/0'/0'"`).
///
/// Not supported; callers pass `&[ChildIndex]` to [`derive_path`].
pub fn derive_path_str<P: HashProvider + CurveProvider>(
    _provider: &P,
    _secret: &ExtendedSecret,
    _path: &str,
) -> Result<ExtendedSecret, DeriveError> {
    Err(DeriveError::NotImplemented)
}
