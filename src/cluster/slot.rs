//! Cluster slot calculation.
//!
//! Redis Cluster maps keys to 16384 hash slots with CRC16. This module
//! provides the key-to-slot mapping, including hash-tag extraction.

use crc::{Crc, CRC_16_XMODEM};

/// Number of hash slots in a Redis Cluster.
pub const SLOT_COUNT: u16 = 16384;

/// CRC-16/XMODEM (polynomial 0x1021, init 0, no reflection), the variant
/// Redis derives slot numbers from.
const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// Calculates the cluster slot for a key.
///
/// If the key contains a `{...}` hash tag, only the bytes inside the braces
/// are hashed, so related keys can be pinned to the same slot.
///
/// # Examples
///
/// ```
/// use shardis::key_slot;
///
/// assert_eq!(key_slot(b"foo"), 12182);
/// assert_eq!(
///     key_slot(b"{user1000}.following"),
///     key_slot(b"{user1000}.followers"),
/// );
/// ```
pub fn key_slot(key: &[u8]) -> u16 {
    let hash_key = extract_hash_tag(key);
    CRC16.checksum(hash_key) & (SLOT_COUNT - 1)
}

/// Extracts the hash tag from a key.
///
/// A valid tag is the first `{` followed by at least one byte before the
/// next `}`. An empty tag, or unmatched braces, mean the whole key hashes.
fn extract_hash_tag(key: &[u8]) -> &[u8] {
    if let Some(start) = key.iter().position(|&b| b == b'{') {
        if let Some(len) = key[start + 1..].iter().position(|&b| b == b'}') {
            if len > 0 {
                return &key[start + 1..start + 1 + len];
            }
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_slot_vectors() {
        assert_eq!(key_slot(b"foo"), 12182);
        assert_eq!(key_slot(b"bar"), 5061);
        assert_eq!(key_slot(b"{user1000}.following"), 5474);
        assert_eq!(key_slot(b"{user1000}.followers"), 5474);
    }

    #[test]
    fn test_slot_is_in_range() {
        for key in [&b""[..], b"a", b"user:1000", b"\x00\xff\x7f"] {
            assert!(key_slot(key) < SLOT_COUNT);
        }
    }

    #[test]
    fn test_hash_tag_pins_related_keys() {
        let slot = key_slot(b"{user1000}");
        assert_eq!(key_slot(b"{user1000}.posts"), slot);
        assert_eq!(key_slot(b"prefix{user1000}suffix"), slot);
    }

    #[test]
    fn test_extract_hash_tag() {
        assert_eq!(extract_hash_tag(b"foo{bar}"), b"bar");
        assert_eq!(extract_hash_tag(b"{user1000}.following"), b"user1000");
        assert_eq!(extract_hash_tag(b"foo{bar}{baz}"), b"bar");
    }

    #[test]
    fn test_empty_or_unmatched_tag_hashes_whole_key() {
        assert_eq!(extract_hash_tag(b"foo{}bar"), b"foo{}bar");
        assert_eq!(extract_hash_tag(b"foo{bar"), b"foo{bar");
        assert_eq!(extract_hash_tag(b"foo}bar"), b"foo}bar");
        assert_eq!(extract_hash_tag(b"{}"), b"{}");
    }

    #[test]
    fn test_tag_is_binary_safe() {
        // hashing is over raw bytes, not UTF-8
        assert_eq!(key_slot(b"{\x01\x02}x"), key_slot(b"{\x01\x02}y"));
    }

    #[test]
    fn test_distribution_over_slots() {
        let mut slots = std::collections::HashSet::new();
        for i in 0..100 {
            slots.insert(key_slot(format!("key{}", i).as_bytes()));
        }
        assert!(slots.len() >= 50, "keys should spread across slots");
    }
}
