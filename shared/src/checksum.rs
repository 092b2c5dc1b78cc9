//! Content checksums for branch comparison.

use xxhash_rust::xxh3::xxh3_64;

/// Checksum a checkpoint frame's pixel buffer.
///
/// xxHash3 is SIMD-optimized and fast enough to hash full frame buffers
/// every detection iteration. Used strictly as an equality proxy for
/// "did this branch diverge" comparisons, never as a cryptographic
/// guarantee; a collision makes a real divergence go unnoticed.
pub fn checkpoint_checksum(bytes: &[u8]) -> u64 {
    xxh3_64(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_deterministic() {
        let buffer = vec![0x42u8; 512];
        assert_eq!(checkpoint_checksum(&buffer), checkpoint_checksum(&buffer));
    }

    #[test]
    fn test_checksum_distinguishes_content() {
        let mut a = vec![0u8; 512];
        let b = a.clone();
        a[511] = 1;
        assert_ne!(checkpoint_checksum(&a), checkpoint_checksum(&b));
    }
}
