//! Node and element IDs: lightweight, ordered, copyable arena handles.

/// A handle to a node in a [`Circuit`](crate::Circuit).
///
/// IDs are minted from a monotonic counter and never reused, so an ID
/// held after its node is deleted can only ever miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(u64);

impl NodeId {
    /// Create a node ID from a raw integer.
    #[inline]
    pub fn new(id: u64) -> Self {
        NodeId(id)
    }

    /// Return the underlying integer.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// A handle to an element in a [`Circuit`](crate::Circuit).
///
/// Rebuilding an element (e.g. on resize) allocates a fresh ID; the old
/// one acts as an invalidation token from then on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementId(u64);

impl ElementId {
    /// Create an element ID from a raw integer.
    #[inline]
    pub fn new(id: u64) -> Self {
        ElementId(id)
    }

    /// Return the underlying integer.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// Strictly-increasing raw ID generator shared by both handle kinds.
#[derive(Debug, Clone, Default)]
pub struct IdGen {
    next: u64,
}

impl IdGen {
    /// Create a generator starting at 0.
    pub fn new() -> Self {
        IdGen { next: 0 }
    }

    /// Mint the next raw ID.
    pub fn next_raw(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_gen_monotonic() {
        let mut gen = IdGen::new();
        assert_eq!(gen.next_raw(), 0);
        assert_eq!(gen.next_raw(), 1);
        assert_eq!(gen.next_raw(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(NodeId::new(3).to_string(), "N3");
        assert_eq!(ElementId::new(9).to_string(), "E9");
    }
}
