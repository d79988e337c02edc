//! # arx-wallet — deterministic key derivation and address encoding.
//!
//! Converts entropy to BIP39 mnemonics and back, stretches mnemonics
//! into seeds, walks BIP32 derivation paths (including the NEAR and TON
//! chain variants), serializes extended public keys, and renders
//! Base58Check and Bech32 addresses.
//!
//! All hash, curve, and entropy primitives come through the provider
//! traits in [`arx_core`]; pass
//! [`SoftwareCrypto`](arx_core::SoftwareCrypto) unless you are on
//! hardware with its own crypto cell.
//!
//! # Modules
//!
//! - [`error`] — `MnemonicError`, `DeriveError`, `AddressError`
//! - [`wordlist`] — the 2048-entry English list
//! - [`mnemonic`] — BIP39 engine and TON variant
//! - [`derive`] — `Seed`, `ExtendedSecret`, child/path derivation
//! - [`xpub`] — extended-public-key records and version prefixes
//! - [`address`] — Base58Check and Bech32 encoding

pub mod address;
pub mod derive;
pub mod error;
pub mod mnemonic;
pub mod wordlist;
pub mod xpub;

pub use derive::{ChildIndex, DerivationScheme, ExtendedSecret, Seed};
pub use error::{AddressError, DeriveError, MnemonicError};
pub use xpub::ExtendedPubkey;
