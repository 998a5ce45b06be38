//! Balanced splitter ratio strings (`"1:N"`).

use std::fmt;

/// A parsed balanced split ratio.
///
/// Only the denominator matters: it is the number of output branches.
/// Parsing is lenient about whitespace and strict about everything else;
/// callers decide what a malformed ratio falls back to.
///
/// # Examples
///
/// ```
/// use pon_topology::SplitRatio;
///
/// let r = SplitRatio::parse("1:8").unwrap();
/// assert_eq!(r.branches(), 8);
/// assert!(r.is_standard());
///
/// assert!(SplitRatio::parse("1:0").is_none());
/// assert!(SplitRatio::parse("eight").is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SplitRatio {
    branches: u32,
}

impl SplitRatio {
    /// Largest branch count offered by standard PLC splitters.
    pub const MAX_STANDARD: u32 = 128;

    /// Wrap a positive branch count. Returns `None` for zero.
    pub fn new(branches: u32) -> Option<Self> {
        (branches > 0).then_some(Self { branches })
    }

    /// Parse a `"1:N"` ratio string.
    ///
    /// Returns `None` if there is no `:` separator or if `N` is not a
    /// positive integer. The numerator is not checked.
    pub fn parse(s: &str) -> Option<Self> {
        let (_, denominator) = s.trim().split_once(':')?;
        let branches: u32 = denominator.trim().parse().ok()?;
        Self::new(branches)
    }

    /// Number of output branches.
    pub fn branches(self) -> u32 {
        self.branches
    }

    /// `true` if the branch count is a power of two in `2..=128`.
    pub fn is_standard(self) -> bool {
        self.branches >= 2 && self.branches <= Self::MAX_STANDARD && self.branches.is_power_of_two()
    }
}

impl fmt::Display for SplitRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1:{}", self.branches)
    }
}

/// Branch count a ratio string can be built with: `None` if it does not
/// parse or asks for more than [`SplitRatio::MAX_STANDARD`] branches.
pub fn usable_branches(ratio: &str) -> Option<u32> {
    SplitRatio::parse(ratio)
        .map(SplitRatio::branches)
        .filter(|&n| n <= SplitRatio::MAX_STANDARD)
}

/// Branch count of a balanced splitter, falling back when the ratio is
/// absent, malformed or oversized.
pub fn branch_count(ratio: Option<&str>, fallback: u32) -> u32 {
    ratio.and_then(usable_branches).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_standard_ratios() {
        for n in [2u32, 4, 8, 16, 32, 64, 128] {
            let r = SplitRatio::parse(&format!("1:{n}")).unwrap();
            assert_eq!(r.branches(), n);
            assert!(r.is_standard());
        }
    }

    #[test]
    fn parse_tolerates_whitespace() {
        assert_eq!(SplitRatio::parse(" 1 : 16 ").map(SplitRatio::branches), Some(16));
    }

    #[test]
    fn parse_rejects_malformed() {
        for s in ["", "1", "1:", "1:x", "1:-4", "1:0", "1/8", "1:8.5"] {
            assert!(SplitRatio::parse(s).is_none(), "accepted {s:?}");
        }
    }

    #[test]
    fn non_power_of_two_is_not_standard() {
        let r = SplitRatio::parse("1:3").unwrap();
        assert_eq!(r.branches(), 3);
        assert!(!r.is_standard());
        assert!(!SplitRatio::parse("1:256").unwrap().is_standard());
        assert!(!SplitRatio::parse("1:1").unwrap().is_standard());
    }

    #[test]
    fn branch_count_falls_back() {
        assert_eq!(branch_count(None, 2), 2);
        assert_eq!(branch_count(Some("garbage"), 2), 2);
        assert_eq!(branch_count(Some("1:32"), 2), 32);
    }

    #[test]
    fn oversized_ratio_is_not_usable() {
        assert_eq!(usable_branches("1:128"), Some(128));
        assert_eq!(usable_branches("1:3"), Some(3));
        assert_eq!(usable_branches("1:129"), None);
        assert_eq!(usable_branches("1:4294967295"), None);
        assert_eq!(branch_count(Some("1:4294967295"), 2), 2);
    }

    #[test]
    fn display_round_trips() {
        let r = SplitRatio::new(64).unwrap();
        assert_eq!(SplitRatio::parse(&r.to_string()), Some(r));
    }

    proptest! {
        #[test]
        fn parse_accepts_every_positive_count(n in 1u32..10_000) {
            let r = SplitRatio::parse(&format!("1:{n}"));
            prop_assert_eq!(r.map(SplitRatio::branches), Some(n));
        }
    }
}
