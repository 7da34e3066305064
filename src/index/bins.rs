//! Hierarchical coordinate binning.
//!
//! Five levels of bins: 128 kb at the finest level, each coarser level 8x
//! larger (1 Mb, 8 Mb, 64 Mb, 512 Mb). Per-level offsets keep keys unique
//! across levels, so a key identifies both the level and the position.

use crate::types::GenomicInterval;

/// Index key of one bin.
pub type BinKey = u64;

/// Offset added to the shifted coordinate at each level, finest first.
pub const BIN_OFFSETS: [BinKey; 5] = [512 + 64 + 8 + 1, 64 + 8 + 1, 8 + 1, 1, 0];
/// Bits shifted away at the finest level.
pub const BIN_FIRST_SHIFT: u32 = 17;
/// Bits shifted away per coarser level.
pub const BIN_NEXT_SHIFT: u32 = 3;

/// Bins touched by an interval.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BinSet {
    /// One key per level at which the interval fits in a single bin,
    /// finest first. `upper[0]` is the smallest bin containing the interval.
    pub upper: Vec<BinKey>,
    /// Every key between the start and end bin at the levels where the
    /// interval spans more than one bin.
    pub lower: Vec<BinKey>,
}

impl BinSet {
    /// The smallest bin fully containing the interval, if any level has one.
    pub fn own_bin(&self) -> Option<BinKey> {
        self.upper.first().copied()
    }

    /// All keys, `upper` then `lower`. No key appears twice.
    pub fn keys(&self) -> impl Iterator<Item = BinKey> + '_ {
        self.upper.iter().chain(self.lower.iter()).copied()
    }

    pub fn len(&self) -> usize {
        self.upper.len() + self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upper.is_empty() && self.lower.is_empty()
    }
}

/// Bins of an interval.
pub fn bin_of(interval: &GenomicInterval) -> BinSet {
    bin_of_range(interval.start, interval.end)
}

/// Bins of the half-open range `[start, end)`.
///
/// `start` must be non-negative. An empty range is treated as the single
/// position `start`.
pub fn bin_of_range(start: i64, end: i64) -> BinSet {
    debug_assert!(start >= 0);
    let mut start_bin = (start as BinKey) >> BIN_FIRST_SHIFT;
    let mut end_bin = ((end.max(start + 1) - 1) as BinKey) >> BIN_FIRST_SHIFT;

    let mut bins = BinSet::default();
    for offset in BIN_OFFSETS {
        if start_bin == end_bin {
            bins.upper.push(offset + start_bin);
        } else {
            bins.lower.extend((offset + start_bin)..=(offset + end_bin));
        }
        start_bin >>= BIN_NEXT_SHIFT;
        end_bin >>= BIN_NEXT_SHIFT;
    }
    bins
}

/// Keys under which a stored interval is filed.
///
/// This is the interval's own bin. An interval crossing a coarsest-level
/// boundary has none and is filed under every coarsest-level bin it touches.
pub fn index_keys(interval: &GenomicInterval) -> Vec<BinKey> {
    if let Some(key) = bin_of(interval).own_bin() {
        return vec![key];
    }
    let shift = BIN_FIRST_SHIFT + BIN_NEXT_SHIFT * (BIN_OFFSETS.len() as u32 - 1);
    let first = (interval.start as BinKey) >> shift;
    let last = ((interval.end - 1) as BinKey) >> shift;
    (first..=last).map(|b| BIN_OFFSETS[BIN_OFFSETS.len() - 1] + b).collect()
}

/// Finest-level key of the bin containing `pos`.
pub fn finest_bin(pos: i64) -> BinKey {
    BIN_OFFSETS[0] + ((pos as BinKey) >> BIN_FIRST_SHIFT)
}
