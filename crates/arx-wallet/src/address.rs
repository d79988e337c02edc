//! Base58Check and Bech32 address encoding.
//!
//! Base58Check wraps a version byte and a 20- or 32-byte hash with the
//! first four bytes of a double SHA-256 as checksum. Bech32 encoding
//! covers witness-version-0 programs per BIP-173.

use bech32::Hrp;

use arx_core::provider::HashProvider;

use crate::error::AddressError;

/// Base58Check-encode `version ∥ hash ∥ checksum(4)`.
///
/// `hash` must be 20 bytes (hash160) or 32 bytes.
pub fn base58check_hash<P: HashProvider>(
    provider: &P,
    hash: &[u8],
    version: u8,
) -> Result<String, AddressError> {
    if hash.len() != 20 && hash.len() != 32 {
        return Err(AddressError::HashLength(hash.len()));
    }
    let mut payload = Vec::with_capacity(1 + hash.len() + 4);
    payload.push(version);
    payload.extend_from_slice(hash);
    let checksum = provider.sha256d(&payload);
    payload.extend_from_slice(&checksum[..4]);
    Ok(bs58::encode(payload).into_string())
}

/// Base58Check address for a public key: hash160 the key, then encode.
///
/// Accepts compressed (33-byte) or uncompressed (65-byte) SEC1 keys —
/// the hash commits to whichever form is given.
pub fn base58check_address<P: HashProvider>(
    provider: &P,
    pubkey: &[u8],
    version: u8,
) -> Result<String, AddressError> {
    let hash160 = provider.hash160(pubkey);
    base58check_hash(provider, &hash160, version)
}

/// Bech32 witness-version-0 address for a 20-byte (P2WPKH) or 32-byte
/// (P2WSH) program.
pub fn segwit_v0_address(hrp: &str, hash: &[u8]) -> Result<String, AddressError> {
    if hash.len() != 20 && hash.len() != 32 {
        return Err(AddressError::HashLength(hash.len()));
    }
    let hrp = Hrp::parse(hrp).map_err(|_| AddressError::InvalidHrp(hrp.to_string()))?;
    bech32::segwit::encode_v0(hrp, hash).map_err(|e| AddressError::Bech32(e.to_string()))
}

/// Expand bytes into raw 5-bit groups (no charset mapping, no padding
/// beyond the final left-aligned partial group).
pub fn base32_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() * 8 / 5 + 1);
    let mut acc = 0u32;
    let mut bits = 0u32;
    for &byte in data {
        acc = (acc << 8) | byte as u32;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(((acc >> bits) & 0x1f) as u8);
        }
    }
    if bits > 0 {
        out.push(((acc << (5 - bits)) & 0x1f) as u8);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use arx_core::SoftwareCrypto;
    use arx_core::provider::CurveProvider;

    const CRYPTO: SoftwareCrypto = SoftwareCrypto;

    fn one_key() -> [u8; 32] {
        let mut k = [0u8; 32];
        k[31] = 1;
        k
    }

    // --- Base58Check ---

    #[test]
    fn p2pkh_address_for_known_key() {
        // uncompressed public key of private key 1
        let pubkey = CRYPTO.secp256k1_public_key(&one_key(), false).unwrap();
        let address = base58check_address(&CRYPTO, &pubkey, 0).unwrap();
        assert_eq!(address, "1EHNa6Q4Jz2uvNExL497mE43ikXhwF6kZm");
    }

    #[test]
    fn zero_hash160_is_burn_address() {
        let address = base58check_hash(&CRYPTO, &[0u8; 20], 0).unwrap();
        assert_eq!(address, "1111111111111111111114oLvT2");
    }

    #[test]
    fn version_byte_changes_address() {
        let hash = [0x11u8; 20];
        let mainnet = base58check_hash(&CRYPTO, &hash, 0).unwrap();
        let testnet = base58check_hash(&CRYPTO, &hash, 0x6f).unwrap();
        assert_ne!(mainnet, testnet);
    }

    #[test]
    fn thirty_two_byte_hash_accepted() {
        let address = base58check_hash(&CRYPTO, &[0x22u8; 32], 5).unwrap();
        assert!(!address.is_empty());
    }

    #[test]
    fn bad_hash_lengths_rejected() {
        for len in [0, 19, 21, 31, 33] {
            assert_eq!(
                base58check_hash(&CRYPTO, &vec![0u8; len], 0).unwrap_err(),
                AddressError::HashLength(len)
            );
        }
    }

    #[test]
    fn checksum_is_double_sha() {
        let hash = [0x33u8; 20];
        let address = base58check_hash(&CRYPTO, &hash, 0).unwrap();
        let decoded = bs58::decode(&address).into_vec().unwrap();
        assert_eq!(decoded.len(), 25);
        let checksum = CRYPTO.sha256d(&decoded[..21]);
        assert_eq!(&decoded[21..], &checksum[..4]);
    }

    // --- Bech32 ---

    #[test]
    fn p2wpkh_bip173_vector() {
        let program = hex::decode("751e76e8199196d454941c45d1b3a323f1433bd6").unwrap();
        let address = segwit_v0_address("bc", &program).unwrap();
        assert_eq!(address, "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4");
    }

    #[test]
    fn p2wsh_bip173_vector() {
        let program =
            hex::decode("1863143c14c5166804bd19203356da136c985678cd4d27a1b8c6329604903262")
                .unwrap();
        let address = segwit_v0_address("bc", &program).unwrap();
        assert_eq!(
            address,
            "bc1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3qccfmv2"
        );
    }

    #[test]
    fn testnet_hrp() {
        let program = hex::decode("751e76e8199196d454941c45d1b3a323f1433bd6").unwrap();
        let address = segwit_v0_address("tb", &program).unwrap();
        assert!(address.starts_with("tb1q"));
    }

    #[test]
    fn witness_program_length_enforced() {
        for len in [0, 19, 21, 31, 33] {
            assert_eq!(
                segwit_v0_address("bc", &vec![0u8; len]).unwrap_err(),
                AddressError::HashLength(len)
            );
        }
    }

    #[test]
    fn empty_hrp_rejected() {
        let err = segwit_v0_address("", &[0u8; 20]).unwrap_err();
        assert_eq!(err, AddressError::InvalidHrp(String::new()));
    }

    // --- Raw base32 ---

    #[test]
    fn base32_full_byte() {
        // 11111111 → 11111, 111(00)
        assert_eq!(base32_encode(&[0xff]), vec![0x1f, 0x1c]);
    }

    #[test]
    fn base32_zero_byte() {
        assert_eq!(base32_encode(&[0x00]), vec![0x00, 0x00]);
    }

    #[test]
    fn base32_five_bytes_no_padding() {
        // 40 bits cut evenly into eight 5-bit groups
        assert_eq!(base32_encode(&[0xff; 5]), vec![0x1f; 8]);
    }

    #[test]
    fn base32_empty() {
        assert!(base32_encode(&[]).is_empty());
    }

    #[test]
    fn base32_known_pattern() {
        // 10000000 00000001 → 10000, 00000, 00000, 1(0000)
        assert_eq!(base32_encode(&[0x80, 0x01]), vec![0x10, 0x00, 0x00, 0x10]);
    }
}
