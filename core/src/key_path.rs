//! Conversions between 32 byte keys and 256 bit paths.
//!
//! A path is the big-endian integer reading of a key. It is consumed from the most significant
//! bit (the root) to the least significant bit (the leaf): bit `i`, counted from the MSB, selects
//! the left (0) or right (1) child at depth `i`. Descending one level shifts the path left by one,
//! so the bits still to be consumed stay left-aligned and zeros fill in from the right.

use crate::trie::KeyPath;

use ruint::aliases::U256;

/// A 256 bit path through the trie.
pub type Path = U256;

/// Read a key as a path.
pub fn key_to_path(key: &KeyPath) -> Path {
    Path::from_be_bytes(*key)
}

/// Write a path back out as a key.
pub fn path_to_key(path: Path) -> KeyPath {
    path.to_be_bytes::<32>()
}

/// The bits of `key` below `depth`, left-aligned.
pub fn remaining_path(key: &KeyPath, depth: usize) -> Path {
    descend_path(&key_to_path(key), depth)
}

/// Shift `levels` bits out of a left-aligned path. Shifting by 256 or more leaves nothing.
pub fn descend_path(path: &Path, levels: usize) -> Path {
    if levels >= 256 {
        Path::ZERO
    } else {
        *path << levels
    }
}

/// The next bit of a left-aligned path, i.e. the branch taken at the current depth.
pub fn next_bit(path: &Path) -> bool {
    path.bit(255)
}

/// Bit `i` of a left-aligned path, counted from the most significant bit.
pub fn path_bit(path: &Path, i: usize) -> bool {
    path.bit(255 - i)
}

/// The number of leading bits two left-aligned paths share.
///
/// Returns 256 for equal paths.
pub fn shared_prefix_len(a: &Path, b: &Path) -> usize {
    (*a ^ *b).leading_zeros()
}

/// Undo one level of descent: prepend `bit` to the path, dropping its last bit.
pub fn lift_path(path: &Path, bit: bool) -> Path {
    let mut lifted = *path >> 1usize;
    lifted.set_bit(255, bit);
    lifted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_with(byte: usize, value: u8) -> KeyPath {
        let mut key = [0u8; 32];
        key[byte] = value;
        key
    }

    #[test]
    fn path_reads_big_endian() {
        let key = key_with(31, 1);
        assert_eq!(key_to_path(&key), Path::from(1u64));
        assert_eq!(path_to_key(key_to_path(&key)), key);

        let key = key_with(0, 0b1000_0000);
        assert!(next_bit(&key_to_path(&key)));
        assert!(!path_bit(&key_to_path(&key), 1));
    }

    #[test]
    fn remaining_path_shifts_out_consumed_bits() {
        let key = key_with(0, 0b0100_0000);
        let path = remaining_path(&key, 1);
        assert!(next_bit(&path));
        assert_eq!(remaining_path(&key, 2), Path::ZERO);

        let key = key_with(31, 1);
        assert!(next_bit(&remaining_path(&key, 255)));
        assert_eq!(remaining_path(&key, 256), Path::ZERO);
    }

    #[test]
    fn lift_reverses_descent() {
        let key = [0xA5; 32];
        for depth in 1..256 {
            let below = remaining_path(&key, depth);
            let bit = path_bit(&key_to_path(&key), depth - 1);
            assert_eq!(lift_path(&below, bit), remaining_path(&key, depth - 1));
        }
    }

    #[test]
    fn shared_prefix() {
        let a = key_to_path(&key_with(0, 0b1010_0000));
        let b = key_to_path(&key_with(0, 0b1011_0000));
        assert_eq!(shared_prefix_len(&a, &b), 3);
        assert_eq!(shared_prefix_len(&a, &a), 256);
    }
}
