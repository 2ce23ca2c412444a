//! Bit widths and the values a node can carry.

use crate::error::{SimResult, SimulationError};

/// The value stored in a node: `None` means unknown/floating.
pub type Signal = Option<u32>;

/// Number of bits a node value is defined over, always in `1..=32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(try_from = "u32", into = "u32"))]
pub struct BitWidth(u8);

impl BitWidth {
    /// Narrowest legal width.
    pub const MIN: u32 = 1;
    /// Widest legal width.
    pub const MAX: u32 = 32;

    /// A single wire.
    pub const ONE: BitWidth = BitWidth(1);

    /// Validate a requested width.
    pub fn new(bits: u32) -> SimResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&bits) {
            Ok(BitWidth(bits as u8))
        } else {
            Err(SimulationError::InvalidWidth(bits))
        }
    }

    /// Number of bits.
    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Largest value representable at this width.
    #[inline]
    pub fn mask(self) -> u32 {
        if self.0 >= 32 {
            u32::MAX
        } else {
            (1u32 << self.0) - 1
        }
    }

    /// Whether `value` fits in this width.
    #[inline]
    pub fn fits(self, value: u32) -> bool {
        value <= self.mask()
    }

    /// Number of distinct values at this width (`2^bits`).
    #[inline]
    pub fn cardinality(self) -> u64 {
        1u64 << self.0
    }
}

impl TryFrom<u32> for BitWidth {
    type Error = SimulationError;

    fn try_from(bits: u32) -> SimResult<Self> {
        BitWidth::new(bits)
    }
}

impl From<BitWidth> for u32 {
    fn from(width: BitWidth) -> u32 {
        width.0 as u32
    }
}

impl std::fmt::Display for BitWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Render a signal the way output pins show it: the number, or `x` when unknown.
pub fn display_signal(signal: Signal) -> String {
    match signal {
        Some(v) => v.to_string(),
        None => "x".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(8)]
    #[case(32)]
    fn test_valid_widths(#[case] bits: u32) {
        assert_eq!(BitWidth::new(bits).unwrap().bits() as u32, bits);
    }

    #[rstest]
    #[case(0)]
    #[case(33)]
    #[case(u32::MAX)]
    fn test_invalid_widths(#[case] bits: u32) {
        assert_eq!(BitWidth::new(bits), Err(SimulationError::InvalidWidth(bits)));
    }

    #[test]
    fn test_mask_and_fits() {
        let w = BitWidth::new(3).unwrap();
        assert_eq!(w.mask(), 7);
        assert!(w.fits(7));
        assert!(!w.fits(8));
        assert_eq!(BitWidth::new(32).unwrap().mask(), u32::MAX);
    }

    #[test]
    fn test_cardinality() {
        assert_eq!(BitWidth::ONE.cardinality(), 2);
        assert_eq!(BitWidth::new(32).unwrap().cardinality(), 1 << 32);
    }

    #[test]
    fn test_display_signal() {
        assert_eq!(display_signal(Some(5)), "5");
        assert_eq!(display_signal(None), "x");
    }
}
