//! Stable hashing of circuit snapshots.
//!
//! `std`'s `DefaultHasher` is seeded per process; [`StateHasher`] is plain
//! FNV-1a over a byte stream, so equal circuits hash equally across runs.

use crate::value::Signal;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Order-sensitive FNV-1a hasher for element and node state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHasher {
    state: u64,
}

impl StateHasher {
    pub fn new() -> Self {
        StateHasher { state: FNV_OFFSET }
    }

    pub fn write_bytes(&mut self, data: &[u8]) {
        for &b in data {
            self.state ^= u64::from(b);
            self.state = self.state.wrapping_mul(FNV_PRIME);
        }
    }

    pub fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Hash a node value. An unknown value is tagged apart from every
    /// defined one, including 0.
    pub fn write_signal(&mut self, signal: Signal) {
        match signal {
            Some(v) => {
                self.write_bytes(&[1]);
                self.write_bytes(&v.to_le_bytes());
            }
            None => self.write_bytes(&[0]),
        }
    }

    pub fn finish(&self) -> u64 {
        self.state
    }
}

impl Default for StateHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_of(f: impl FnOnce(&mut StateHasher)) -> u64 {
        let mut h = StateHasher::new();
        f(&mut h);
        h.finish()
    }

    #[test]
    fn test_empty_is_offset_basis() {
        assert_eq!(StateHasher::new().finish(), FNV_OFFSET);
    }

    #[test]
    fn test_known_fnv1a_value() {
        // FNV-1a 64 of "a".
        assert_eq!(hash_of(|h| h.write_bytes(b"a")), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn test_order_sensitive() {
        let ab = hash_of(|h| {
            h.write_u64(1);
            h.write_u64(2);
        });
        let ba = hash_of(|h| {
            h.write_u64(2);
            h.write_u64(1);
        });
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_unknown_differs_from_zero() {
        assert_ne!(
            hash_of(|h| h.write_signal(None)),
            hash_of(|h| h.write_signal(Some(0)))
        );
    }
}
