//! Logical simulation ticks.
//!
//! A tick is one complete drain of the scheduler. There is no notion of
//! delay inside a tick: every value settles before the next one begins.

/// A drain counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(u64);

impl Tick {
    /// The tick before any drain has run.
    pub const ZERO: Tick = Tick(0);

    /// Create a `Tick` from a raw counter value.
    #[inline]
    pub fn new(count: u64) -> Self {
        Tick(count)
    }

    /// Return the raw counter value.
    #[inline]
    pub fn count(self) -> u64 {
        self.0
    }

    /// The tick that follows `self`. Saturates at `u64::MAX`.
    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "T={}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(Tick::ZERO.count(), 0);
        assert_eq!(Tick::default(), Tick::ZERO);
    }

    #[test]
    fn test_next() {
        assert_eq!(Tick::new(41).next(), Tick::new(42));
        assert_eq!(Tick::new(u64::MAX).next(), Tick::new(u64::MAX));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Tick::new(7)), "T=7");
    }
}
