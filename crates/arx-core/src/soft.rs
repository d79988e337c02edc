//! Software provider backend on the RustCrypto stack.

use hmac::{Hmac, Mac};
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{Signature, SigningKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{PublicKey, SecretKey};
use rand::RngCore;
use rand::rngs::OsRng;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};
use sha3::Keccak256;

use crate::error::ProviderError;
use crate::provider::{CurveProvider, EntropyProvider, HashProvider};

/// Provider backend for desktop builds and tests.
///
/// Stateless and free to copy; there is no initialization step beyond
/// constructing the value.
#[derive(Clone, Copy, Debug, Default)]
pub struct SoftwareCrypto;

impl HashProvider for SoftwareCrypto {
    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        Sha256::digest(data).into()
    }

    fn sha512(&self, data: &[u8]) -> [u8; 64] {
        let mut out = [0u8; 64];
        out.copy_from_slice(&Sha512::digest(data));
        out
    }

    fn hmac_sha256(&self, key: &[u8], msg: &[u8]) -> [u8; 32] {
        let mut mac =
            Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts any key length");
        mac.update(msg);
        mac.finalize().into_bytes().into()
    }

    fn hmac_sha512(&self, key: &[u8], msg: &[u8]) -> [u8; 64] {
        let mut mac =
            Hmac::<Sha512>::new_from_slice(key).expect("HMAC accepts any key length");
        mac.update(msg);
        let mut out = [0u8; 64];
        out.copy_from_slice(&mac.finalize().into_bytes());
        out
    }

    fn ripemd160(&self, data: &[u8]) -> [u8; 20] {
        Ripemd160::digest(data).into()
    }

    fn keccak256(&self, parts: &[&[u8]]) -> [u8; 32] {
        let mut hasher = Keccak256::new();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().into()
    }

    fn pbkdf2_hmac_sha512(&self, password: &[u8], salt: &[u8], rounds: u32, out: &mut [u8]) {
        pbkdf2::pbkdf2_hmac::<Sha512>(password, salt, rounds, out);
    }
}

impl CurveProvider for SoftwareCrypto {
    fn secp256k1_public_key(
        &self,
        private_key: &[u8; 32],
        compressed: bool,
    ) -> Result<Vec<u8>, ProviderError> {
        let secret = SecretKey::from_slice(private_key)
            .map_err(|_| ProviderError::InvalidPrivateKey)?;
        Ok(secret
            .public_key()
            .to_encoded_point(compressed)
            .as_bytes()
            .to_vec())
    }

    fn secp256k1_sign(
        &self,
        hash: &[u8; 32],
        private_key: &[u8; 32],
    ) -> Result<[u8; 64], ProviderError> {
        let signing_key = SigningKey::from_slice(private_key)
            .map_err(|_| ProviderError::InvalidPrivateKey)?;
        let signature: Signature = signing_key
            .sign_prehash(hash)
            .map_err(|e| ProviderError::Signing(e.to_string()))?;
        let mut out = [0u8; 64];
        out.copy_from_slice(&signature.to_bytes());
        Ok(out)
    }

    fn secp256k1_sign_recoverable(
        &self,
        hash: &[u8; 32],
        private_key: &[u8; 32],
    ) -> Result<([u8; 64], u8), ProviderError> {
        let signing_key = SigningKey::from_slice(private_key)
            .map_err(|_| ProviderError::InvalidPrivateKey)?;
        let (signature, recovery_id) = signing_key
            .sign_prehash_recoverable(hash)
            .map_err(|e| ProviderError::Signing(e.to_string()))?;
        let mut out = [0u8; 64];
        out.copy_from_slice(&signature.to_bytes());
        Ok((out, recovery_id.to_byte()))
    }

    fn secp256k1_ecdh(
        &self,
        private_key: &[u8; 32],
        public_key: &[u8],
    ) -> Result<[u8; 32], ProviderError> {
        let secret = SecretKey::from_slice(private_key)
            .map_err(|_| ProviderError::InvalidPrivateKey)?;
        let public = PublicKey::from_sec1_bytes(public_key)
            .map_err(|_| ProviderError::InvalidPublicKey)?;
        let shared =
            k256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), public.as_affine());
        let mut out = [0u8; 32];
        out.copy_from_slice(shared.raw_secret_bytes());
        Ok(out)
    }

    fn ed25519_public_key(&self, private_key: &[u8; 32]) -> Result<[u8; 32], ProviderError> {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(private_key);
        Ok(signing_key.verifying_key().to_bytes())
    }

    fn ed25519_sign(
        &self,
        msg: &[u8],
        private_key: &[u8; 32],
    ) -> Result<[u8; 64], ProviderError> {
        use ed25519_dalek::Signer;
        let signing_key = ed25519_dalek::SigningKey::from_bytes(private_key);
        Ok(signing_key.sign(msg).to_bytes())
    }
}

impl EntropyProvider for SoftwareCrypto {
    fn fill_random(&self, buf: &mut [u8]) -> Result<(), ProviderError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|_| ProviderError::Entropy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CRYPTO: SoftwareCrypto = SoftwareCrypto;

    // --- Hashes ---

    #[test]
    fn sha256_abc() {
        assert_eq!(
            hex::encode(CRYPTO.sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sha512_abc() {
        assert_eq!(
            hex::encode(CRYPTO.sha512(b"abc")),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn ripemd160_abc() {
        assert_eq!(
            hex::encode(CRYPTO.ripemd160(b"abc")),
            "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"
        );
    }

    // RFC 4231 test case 1
    #[test]
    fn hmac_sha256_rfc4231() {
        let key = [0x0b; 20];
        assert_eq!(
            hex::encode(CRYPTO.hmac_sha256(&key, b"Hi There")),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );
    }

    #[test]
    fn hmac_sha512_rfc4231() {
        let key = [0x0b; 20];
        assert_eq!(
            hex::encode(CRYPTO.hmac_sha512(&key, b"Hi There")),
            "87aa7cdea5ef619d4ff0b4241a1d6cb02379f4e2ce4ec2787ad0b30545e17cde\
             daa833b7d6b8a702038b274eaea3f4e4be9d914eeb61f1702e696c203a126854"
        );
    }

    #[test]
    fn keccak256_empty() {
        assert_eq!(
            hex::encode(CRYPTO.keccak256(&[])),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a456"
        );
    }

    #[test]
    fn keccak256_concatenates_parts() {
        let whole = CRYPTO.keccak256(&[b"hello world"]);
        let split = CRYPTO.keccak256(&[b"hello ", b"world"]);
        assert_eq!(whole, split);
    }

    #[test]
    fn sha256d_is_double_sha() {
        let once = CRYPTO.sha256(b"arx");
        assert_eq!(CRYPTO.sha256d(b"arx"), CRYPTO.sha256(&once));
    }

    #[test]
    fn hash160_composes() {
        let sha = CRYPTO.sha256(b"arx");
        assert_eq!(CRYPTO.hash160(b"arx"), CRYPTO.ripemd160(&sha));
    }

    #[test]
    fn pbkdf2_sha512_known_vector() {
        let mut out = [0u8; 64];
        CRYPTO.pbkdf2_hmac_sha512(b"password", b"salt", 1, &mut out);
        assert_eq!(
            hex::encode(out),
            "867f70cf1ade02cff3752599a3a53dc4af34c7a669815ae5d513554e1c8cf252\
             c02d470a285a0501bad999bfe943c08f050235d7d68b1da55e63f73b60a57fce"
        );
    }

    // --- secp256k1 ---

    fn one_key() -> [u8; 32] {
        let mut k = [0u8; 32];
        k[31] = 1;
        k
    }

    #[test]
    fn secp256k1_pubkey_of_one_is_generator() {
        let pubkey = CRYPTO.secp256k1_public_key(&one_key(), true).unwrap();
        assert_eq!(
            hex::encode(pubkey),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
    }

    #[test]
    fn secp256k1_pubkey_uncompressed_len() {
        let pubkey = CRYPTO.secp256k1_public_key(&one_key(), false).unwrap();
        assert_eq!(pubkey.len(), 65);
        assert_eq!(pubkey[0], 0x04);
    }

    #[test]
    fn secp256k1_rejects_zero_key() {
        assert_eq!(
            CRYPTO.secp256k1_public_key(&[0u8; 32], true),
            Err(ProviderError::InvalidPrivateKey)
        );
    }

    #[test]
    fn secp256k1_sign_is_deterministic() {
        let hash = CRYPTO.sha256(b"message");
        let key = one_key();
        let sig1 = CRYPTO.secp256k1_sign(&hash, &key).unwrap();
        let sig2 = CRYPTO.secp256k1_sign(&hash, &key).unwrap();
        assert_eq!(sig1, sig2);

        let other = CRYPTO.sha256(b"other message");
        assert_ne!(sig1, CRYPTO.secp256k1_sign(&other, &key).unwrap());
    }

    #[test]
    fn secp256k1_recoverable_matches_plain() {
        let hash = CRYPTO.sha256(b"message");
        let key = one_key();
        let plain = CRYPTO.secp256k1_sign(&hash, &key).unwrap();
        let (recoverable, recovery_id) =
            CRYPTO.secp256k1_sign_recoverable(&hash, &key).unwrap();
        assert_eq!(plain, recoverable);
        assert!(recovery_id < 4);
    }

    #[test]
    fn secp256k1_ecdh_is_symmetric() {
        let mut key_a = [0u8; 32];
        key_a[31] = 2;
        let mut key_b = [0u8; 32];
        key_b[31] = 3;

        let pub_a = CRYPTO.secp256k1_public_key(&key_a, true).unwrap();
        let pub_b = CRYPTO.secp256k1_public_key(&key_b, true).unwrap();

        let ab = CRYPTO.secp256k1_ecdh(&key_a, &pub_b).unwrap();
        let ba = CRYPTO.secp256k1_ecdh(&key_b, &pub_a).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn secp256k1_ecdh_rejects_garbage_pubkey() {
        let err = CRYPTO.secp256k1_ecdh(&one_key(), &[0u8; 33]).unwrap_err();
        assert_eq!(err, ProviderError::InvalidPublicKey);
    }

    // --- Ed25519 (RFC 8032, test 1) ---

    #[test]
    fn ed25519_rfc8032_public_key() {
        let secret: [u8; 32] =
            hex::decode("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60")
                .unwrap()
                .try_into()
                .unwrap();
        assert_eq!(
            hex::encode(CRYPTO.ed25519_public_key(&secret).unwrap()),
            "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"
        );
    }

    #[test]
    fn ed25519_rfc8032_signature() {
        let secret: [u8; 32] =
            hex::decode("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60")
                .unwrap()
                .try_into()
                .unwrap();
        assert_eq!(
            hex::encode(CRYPTO.ed25519_sign(b"", &secret).unwrap()),
            "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e06522490155\
             5fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b"
        );
    }

    // --- Entropy ---

    #[test]
    fn fill_random_produces_distinct_buffers() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        CRYPTO.fill_random(&mut a).unwrap();
        CRYPTO.fill_random(&mut b).unwrap();
        assert_ne!(a, b);
    }
}
