//! Backend traits for hash, curve, and entropy primitives.
//!
//! The wallet core never computes a digest or a curve point itself; it
//! goes through these traits. Desktop and test builds use
//! [`SoftwareCrypto`](crate::soft::SoftwareCrypto); hardware builds
//! substitute an implementation backed by their crypto cell. Providers
//! are stateless values — constructing one is the only "initialization"
//! there is, and doing it twice is harmless.

use crate::error::ProviderError;

/// Digest and MAC primitives.
pub trait HashProvider {
    fn sha256(&self, data: &[u8]) -> [u8; 32];

    fn sha512(&self, data: &[u8]) -> [u8; 64];

    fn hmac_sha256(&self, key: &[u8], msg: &[u8]) -> [u8; 32];

    fn hmac_sha512(&self, key: &[u8], msg: &[u8]) -> [u8; 64];

    fn ripemd160(&self, data: &[u8]) -> [u8; 20];

    /// Keccak-256 over the concatenation of `parts`, so callers can hash
    /// split buffers (e.g. prefix ∥ payload) without copying.
    fn keccak256(&self, parts: &[&[u8]]) -> [u8; 32];

    /// PBKDF2 with HMAC-SHA-512, filling all of `out`.
    ///
    /// This is the mnemonic seed-stretching path; at the BIP39/TON
    /// iteration counts it can take seconds on constrained hardware.
    fn pbkdf2_hmac_sha512(&self, password: &[u8], salt: &[u8], rounds: u32, out: &mut [u8]);

    /// Double SHA-256, the Base58Check checksum hash.
    fn sha256d(&self, data: &[u8]) -> [u8; 32] {
        self.sha256(&self.sha256(data))
    }

    /// RIPEMD-160 of SHA-256, the address hash of a public key.
    fn hash160(&self, data: &[u8]) -> [u8; 20] {
        self.ripemd160(&self.sha256(data))
    }
}

/// Elliptic-curve primitives for secp256k1 and Ed25519.
pub trait CurveProvider {
    /// Public key for a secp256k1 private key: 33 bytes compressed or
    /// 65 bytes uncompressed SEC1.
    fn secp256k1_public_key(
        &self,
        private_key: &[u8; 32],
        compressed: bool,
    ) -> Result<Vec<u8>, ProviderError>;

    /// ECDSA signature (64-byte `r ∥ s`) over a prehashed message.
    fn secp256k1_sign(
        &self,
        hash: &[u8; 32],
        private_key: &[u8; 32],
    ) -> Result<[u8; 64], ProviderError>;

    /// ECDSA signature plus its recovery id.
    fn secp256k1_sign_recoverable(
        &self,
        hash: &[u8; 32],
        private_key: &[u8; 32],
    ) -> Result<([u8; 64], u8), ProviderError>;

    /// ECDH shared secret (x coordinate) with a SEC1-encoded peer key.
    fn secp256k1_ecdh(
        &self,
        private_key: &[u8; 32],
        public_key: &[u8],
    ) -> Result<[u8; 32], ProviderError>;

    fn ed25519_public_key(&self, private_key: &[u8; 32]) -> Result<[u8; 32], ProviderError>;

    fn ed25519_sign(&self, msg: &[u8], private_key: &[u8; 32])
    -> Result<[u8; 64], ProviderError>;
}

/// Cryptographically secure random bytes.
pub trait EntropyProvider {
    fn fill_random(&self, buf: &mut [u8]) -> Result<(), ProviderError>;
}
