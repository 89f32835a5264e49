use serde::{Deserialize, Serialize};

/// A single restriction fragment on one reference sequence.
///
/// Coordinates are 1-based and inclusive. `index` is 1-based and matches the
/// index column of the digest file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fragment {
    pub index: u32,
    pub start: u64,
    pub end: u64,
}

impl Fragment {
    #[must_use]
    pub fn new(index: u32, start: u64, end: u64) -> Self {
        debug_assert!(start >= 1 && end >= start);
        Self { index, start, end }
    }

    /// Fragment length in bases
    #[must_use]
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Whether a 1-based position lies within this fragment
    #[must_use]
    pub fn contains(&self, position: u64) -> bool {
        (self.start..=self.end).contains(&position)
    }

    /// Number of fragments between this one and `other`
    #[must_use]
    pub fn separation(&self, other: &Fragment) -> u32 {
        self.index.abs_diff(other.index)
    }
}

impl std::fmt::Display for Fragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} [{}-{}]", self.index, self.start, self.end)
    }
}
