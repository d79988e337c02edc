//! # arx-core — crypto providers and wire encoding.
//!
//! The platform seam of the Arx wallet core. Hash, curve, and entropy
//! primitives sit behind the [`provider`] traits so the derivation and
//! encoding algorithms above them stay platform-independent; the
//! [`soft`] module is the software backend used on desktop and in tests
//! (hardware builds supply their own).
//!
//! # Modules
//!
//! - [`error`] — `ProviderError`, `RlpError`
//! - [`provider`] — `HashProvider`, `CurveProvider`, `EntropyProvider`
//! - [`soft`] — `SoftwareCrypto`, the RustCrypto-backed implementation
//! - [`rlp`] — recursive-length-prefix value/list codec

pub mod error;
pub mod provider;
pub mod rlp;
pub mod soft;

pub use error::{ProviderError, RlpError};
pub use provider::{CurveProvider, EntropyProvider, HashProvider};
pub use soft::SoftwareCrypto;
