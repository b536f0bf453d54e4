//! Inclusive block ranges and chunking.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;

/// Blocks `from..=to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockRange {
    pub from: u64,
    pub to: u64,
}

impl BlockRange {
    pub fn new(from: u64, to: u64) -> Self {
        Self { from, to }
    }

    /// Number of blocks covered.
    pub fn len(&self) -> u64 {
        self.to.saturating_sub(self.from).saturating_add(1)
    }

    pub fn is_empty(&self) -> bool {
        self.from > self.to
    }

    pub fn contains(&self, block: u64) -> bool {
        self.from <= block && block <= self.to
    }

    pub fn overlaps(&self, other: &BlockRange) -> bool {
        self.from <= other.to && other.from <= self.to
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.from, self.to)
    }
}

/// Split `from..=to` into consecutive ranges ending on multiples of `width`.
///
/// The last range is capped at `to`. Aligning on multiples keeps chunk
/// boundaries stable across scans with different start blocks, so a scan
/// starting mid-window gets a short first chunk: `100..=20_000` at width 9000
/// yields `[100, 9000]`, `[9001, 18000]`, `[18001, 20000]`.
///
/// ```
/// use lineage_fetch::{chunk_ranges, BlockRange};
/// use std::num::NonZeroU64;
///
/// let width = NonZeroU64::new(9000).unwrap();
/// let chunks: Vec<_> = chunk_ranges(0, 20_000, width).collect();
/// assert_eq!(
///     chunks,
///     vec![
///         BlockRange::new(0, 9000),
///         BlockRange::new(9001, 18_000),
///         BlockRange::new(18_001, 20_000),
///     ]
/// );
/// ```
pub fn chunk_ranges(from: u64, to: u64, width: NonZeroU64) -> ChunkRanges {
    ChunkRanges {
        next: (from <= to).then_some(from),
        to,
        width: width.get(),
    }
}

/// Iterator returned by [`chunk_ranges`].
#[derive(Debug, Clone)]
pub struct ChunkRanges {
    next: Option<u64>,
    to: u64,
    width: u64,
}

impl Iterator for ChunkRanges {
    type Item = BlockRange;

    fn next(&mut self) -> Option<BlockRange> {
        let from = self.next?;
        let boundary = (from / self.width)
            .saturating_add(1)
            .saturating_mul(self.width);
        let end = boundary.min(self.to);

        self.next = if end >= self.to { None } else { Some(end + 1) };
        Some(BlockRange::new(from, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn width(n: u64) -> NonZeroU64 {
        NonZeroU64::new(n).unwrap()
    }

    #[test]
    fn test_chunks_cover_range_without_gaps() {
        let chunks: Vec<_> = chunk_ranges(12, 100_000, width(9000)).collect();

        assert_eq!(chunks.first().unwrap().from, 12);
        assert_eq!(chunks.last().unwrap().to, 100_000);
        for pair in chunks.windows(2) {
            assert_eq!(pair[0].to + 1, pair[1].from);
        }
        assert!(chunks.iter().all(|c| c.len() <= 9001));
    }

    #[test]
    fn test_nonzero_start_aligns_to_width() {
        let chunks: Vec<_> = chunk_ranges(100, 20_000, width(9000)).collect();
        assert_eq!(
            chunks,
            vec![
                BlockRange::new(100, 9000),
                BlockRange::new(9001, 18_000),
                BlockRange::new(18_001, 20_000),
            ]
        );

        // Same boundaries as a scan from genesis past the first window.
        let from_zero: Vec<_> = chunk_ranges(0, 20_000, width(9000)).collect();
        assert_eq!(&chunks[1..], &from_zero[1..]);
    }

    #[test]
    fn test_start_on_multiple_runs_to_next_multiple() {
        let chunks: Vec<_> = chunk_ranges(9000, 20_000, width(9000)).collect();
        assert_eq!(
            chunks,
            vec![BlockRange::new(9000, 18_000), BlockRange::new(18_001, 20_000)]
        );
    }

    #[test]
    fn test_single_block_range() {
        let chunks: Vec<_> = chunk_ranges(5, 5, width(9000)).collect();
        assert_eq!(chunks, vec![BlockRange::new(5, 5)]);
    }

    #[test]
    fn test_empty_when_from_after_to() {
        assert_eq!(chunk_ranges(10, 9, width(9000)).count(), 0);
    }

    #[test]
    fn test_range_smaller_than_width() {
        let chunks: Vec<_> = chunk_ranges(0, 500, width(9000)).collect();
        assert_eq!(chunks, vec![BlockRange::new(0, 500)]);
    }

    #[test]
    fn test_width_one() {
        let chunks: Vec<_> = chunk_ranges(0, 2, width(1)).collect();
        assert_eq!(
            chunks,
            vec![
                BlockRange::new(0, 1),
                BlockRange::new(2, 2),
            ]
        );
    }

    #[test]
    fn test_terminates_at_u64_max() {
        let chunks: Vec<_> = chunk_ranges(u64::MAX - 10, u64::MAX, width(4)).collect();
        assert_eq!(chunks.last().unwrap().to, u64::MAX);
        assert!(chunks.len() <= 4);
    }

    #[test]
    fn test_overlap_and_contains() {
        let a = BlockRange::new(0, 9000);
        let b = BlockRange::new(9000, 18_000);
        let c = BlockRange::new(9001, 18_000);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.contains(9000));
        assert!(!a.contains(9001));
        assert_eq!(a.len(), 9001);
    }
}
