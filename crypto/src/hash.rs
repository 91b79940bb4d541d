//! Keccak-256 hashing (the pre-standard SHA-3 variant used by Ethereum).

use keccak_hash::keccak;

/// Compute the Keccak-256 digest of arbitrary data.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    keccak(data).0
}

/// Hash multiple byte slices as if they were concatenated.
pub fn keccak256_multi(parts: &[&[u8]]) -> [u8; 32] {
    keccak256(&parts.concat())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak_empty_matches_known_digest() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn keccak_deterministic() {
        assert_eq!(keccak256(b"hello stamp"), keccak256(b"hello stamp"));
    }

    #[test]
    fn keccak_different_inputs() {
        assert_ne!(keccak256(b"hello"), keccak256(b"world"));
    }

    #[test]
    fn keccak_multi_equivalent() {
        let single = keccak256(b"helloworld");
        let multi = keccak256_multi(&[b"hello", b"world"]);
        assert_eq!(single, multi);
    }
}
