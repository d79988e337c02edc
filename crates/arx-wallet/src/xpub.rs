//! Extended-public-key records for account-level exports.
//!
//! An account record is the 78-byte structure wallets exchange:
//! version prefix, depth, parent fingerprint, child index, chain code,
//! and compressed public key. The version prefix encodes the BIP
//! standard and network so consumers render `xpub…`/`tpub…`/`vpub…`
//! strings with the right first characters.

use std::fmt;

use arx_core::provider::{CurveProvider, HashProvider};

use crate::derive::{
    ChildIndex, DerivationScheme, ED25519_MASTER_HMAC_KEY, ExtendedSecret, Seed, derive_child,
    derive_path, master_from_seed, master_from_seed_with_key,
};
use crate::error::DeriveError;

/// SLIP-44 coin types this module selects versions and chains by.
pub mod coin {
    pub const BITCOIN: u32 = 0;
    pub const BITCOIN_TESTNET: u32 = 1;
    pub const LITECOIN: u32 = 2;
    pub const DOGECOIN: u32 = 3;
    pub const ETHEREUM: u32 = 60;
    pub const NEAR: u32 = 397;
}

/// `xpub` — BIP44 mainnet.
pub const VERSION_XPUB: [u8; 4] = [0x04, 0x88, 0xb2, 0x1e];
/// `tpub` — BIP44 testnet.
pub const VERSION_TPUB: [u8; 4] = [0x04, 0x35, 0x87, 0xcf];
/// `Ltub` — BIP44 Litecoin.
pub const VERSION_LTUB: [u8; 4] = [0x01, 0x9d, 0xa4, 0x62];
/// `dgub` — BIP44 Dogecoin.
pub const VERSION_DGUB: [u8; 4] = [0x02, 0xfa, 0xca, 0xfd];
/// `zpub` — BIP84 mainnet.
pub const VERSION_ZPUB: [u8; 4] = [0x04, 0xb2, 0x47, 0x46];
/// `vpub` — BIP84 testnet.
pub const VERSION_VPUB: [u8; 4] = [0x04, 0x5f, 0x1c, 0xf6];

/// Account records sit at depth 3 (purpose / coin / account).
const ACCOUNT_DEPTH: u8 = 0x03;

/// Serialized length of an extended public key.
pub const EXTENDED_PUBKEY_LEN: usize = 78;

/// Version prefix for a BIP standard and coin type.
///
/// The hardened flag is ignored on both inputs. Unrecognized coins fall
/// back to the mainnet prefix of the standard — that is how Ethereum
/// (coin 60) account records come out as `xpub`.
pub fn version_bytes(bip_standard: u32, coin_type: u32) -> [u8; 4] {
    let standard = bip_standard & !ChildIndex::HARDENED_FLAG;
    let coin_type = coin_type & !ChildIndex::HARDENED_FLAG;
    if standard == 84 {
        match coin_type {
            coin::BITCOIN_TESTNET => VERSION_VPUB,
            _ => VERSION_ZPUB,
        }
    } else {
        match coin_type {
            coin::BITCOIN_TESTNET => VERSION_TPUB,
            coin::LITECOIN => VERSION_LTUB,
            coin::DOGECOIN => VERSION_DGUB,
            _ => VERSION_XPUB,
        }
    }
}

/// A serialized 78-byte extended public key.
#[derive(Clone, PartialEq, Eq)]
pub struct ExtendedPubkey([u8; EXTENDED_PUBKEY_LEN]);

impl ExtendedPubkey {
    pub fn from_bytes(bytes: [u8; EXTENDED_PUBKEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; EXTENDED_PUBKEY_LEN] {
        &self.0
    }

    pub fn version(&self) -> [u8; 4] {
        self.0[..4].try_into().expect("4-byte version field")
    }

    pub fn depth(&self) -> u8 {
        self.0[4]
    }

    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.0[5..9].try_into().expect("4-byte fingerprint field")
    }

    /// Raw child index, hardened flag included.
    pub fn child_index(&self) -> u32 {
        u32::from_be_bytes(self.0[9..13].try_into().expect("4-byte index field"))
    }

    pub fn chain_code(&self) -> &[u8] {
        &self.0[13..45]
    }

    /// The 33-byte compressed public key.
    pub fn public_key(&self) -> &[u8] {
        &self.0[45..]
    }

    /// Base58Check rendering (`xpub…`, `vpub…`, …): the 78 bytes plus
    /// the first four bytes of their double SHA-256.
    pub fn to_base58<P: HashProvider>(&self, provider: &P) -> String {
        let checksum = provider.sha256d(&self.0);
        let mut payload = self.0.to_vec();
        payload.extend_from_slice(&checksum[..4]);
        bs58::encode(payload).into_string()
    }
}

impl fmt::Display for ExtendedPubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for ExtendedPubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExtendedPubkey({self})")
    }
}

/// Derive the account-level extended public key for
/// `purpose / coin / account` from a seed.
///
/// `bip_standard`, `coin_type`, and `account` are raw child indices —
/// pass them with the hardened bit set for hardened derivation, exactly
/// as they appear in the path.
///
/// The NEAR coin type switches the first two levels to the ed25519-seed
/// master and NEAR derivation rule; the account level always derives
/// with the standard rule.
pub fn account_pubkey<P: HashProvider + CurveProvider>(
    provider: &P,
    seed: &Seed,
    bip_standard: u32,
    coin_type: u32,
    account: u32,
) -> Result<ExtendedPubkey, DeriveError> {
    let version = version_bytes(bip_standard, coin_type);

    let purpose_coin = [
        ChildIndex::from_raw(bip_standard),
        ChildIndex::from_raw(coin_type),
    ];
    let parent: ExtendedSecret = if coin_type & !ChildIndex::HARDENED_FLAG == coin::NEAR {
        let master = master_from_seed_with_key(provider, seed, ED25519_MASTER_HMAC_KEY);
        derive_path(provider, &master, &purpose_coin, DerivationScheme::Near)?
    } else {
        let master = master_from_seed(provider, seed);
        derive_path(provider, &master, &purpose_coin, DerivationScheme::Secp256k1)?
    };

    let parent_pubkey = provider.secp256k1_public_key(parent.key(), true)?;
    let fingerprint = provider.hash160(&parent_pubkey);

    let account_secret = derive_child(provider, &parent, ChildIndex::from_raw(account))?;
    let child_pubkey = provider.secp256k1_public_key(account_secret.key(), true)?;
    if child_pubkey.len() != 33 {
        return Err(arx_core::ProviderError::InvalidPublicKey.into());
    }

    let mut record = [0u8; EXTENDED_PUBKEY_LEN];
    record[..4].copy_from_slice(&version);
    record[4] = ACCOUNT_DEPTH;
    record[5..9].copy_from_slice(&fingerprint[..4]);
    record[9..13].copy_from_slice(&account.to_be_bytes());
    record[13..45].copy_from_slice(account_secret.chain_code());
    record[45..].copy_from_slice(&child_pubkey);
    Ok(ExtendedPubkey::from_bytes(record))
}
