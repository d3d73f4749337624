// GcrScope - An inspector for 1541 GCR halftrack bitstreams
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Bit range arithmetic on a circular halftrack.
//!
//! A halftrack bitstream has no beginning or end on the physical disk: the
//! head keeps spinning past the last bit straight into the first one. A sector
//! or an erroneous bit sequence may therefore start near the end of the buffer
//! and continue at its beginning. This module turns such a (possibly wrapping)
//! selection into at most two plain half-open ranges that a renderer can color.

use std::cmp::Ordering;
use std::ops::Range;

/// A half-open range of bit offsets `[start, end)` inside a halftrack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitRange {
    /// First bit (inclusive)
    pub start: usize,
    /// Last bit (exclusive)
    pub end: usize,
}

impl BitRange {
    /// Create a new bit range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a range covering a single bit.
    pub fn bit(offset: usize) -> Self {
        Self::new(offset, offset + 1)
    }

    /// Get the number of bits in this range.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the range covers no bits.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Check if a bit offset lies inside this range.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

impl From<Range<usize>> for BitRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<BitRange> for Range<usize> {
    fn from(range: BitRange) -> Self {
        range.start..range.end
    }
}

/// Raw begin/end markers as reported by the drive.
///
/// Unlike [`BitRange`], the two offsets are not ordered: `end < begin` means
/// the marked area wraps around the end of the halftrack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub begin: usize,
    pub end: usize,
}

impl Bounds {
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    /// Check if both markers point to the same bit.
    pub fn is_degenerate(&self) -> bool {
        self.begin == self.end
    }
}

/// Zero, one or two disjoint ranges describing one logical selection.
///
/// When a selection wraps, `first` holds the part at the start of the buffer
/// and `second` the part running up to the buffer end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangePair {
    first: Option<BitRange>,
    second: Option<BitRange>,
}

impl RangePair {
    /// A pair without any ranges.
    pub const EMPTY: RangePair = RangePair {
        first: None,
        second: None,
    };

    fn single(range: BitRange) -> Self {
        Self::from_parts(Some(range), None)
    }

    fn split(head: BitRange, tail: BitRange) -> Self {
        Self::from_parts(Some(head), Some(tail))
    }

    fn from_parts(first: Option<BitRange>, second: Option<BitRange>) -> Self {
        // Empty parts are dropped so callers never see zero-length spans
        let first = first.filter(|r| !r.is_empty());
        let second = second.filter(|r| !r.is_empty());
        match (first, second) {
            (None, Some(only)) => Self {
                first: Some(only),
                second: None,
            },
            (first, second) => Self { first, second },
        }
    }

    /// The first range, if any.
    pub fn first(&self) -> Option<BitRange> {
        self.first
    }

    /// The second range, present only for wrapped selections.
    pub fn second(&self) -> Option<BitRange> {
        self.second
    }

    /// Check if the pair highlights nothing.
    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    /// Check if the selection wrapped into two ranges.
    pub fn is_wrapped(&self) -> bool {
        self.second.is_some()
    }

    /// Iterate over the contained ranges in order.
    pub fn iter(&self) -> impl Iterator<Item = BitRange> + '_ {
        self.first.iter().chain(self.second.iter()).copied()
    }

    /// Total number of highlighted bits.
    pub fn bit_count(&self) -> usize {
        self.iter().map(|r| r.len()).sum()
    }

    /// Check if a bit offset is highlighted by either range.
    pub fn contains(&self, offset: usize) -> bool {
        self.iter().any(|r| r.contains(offset))
    }
}

/// Map a selection onto a circular buffer of `length` bits.
///
/// Both markers are reduced modulo `length + 1` before they are compared.
/// The extra slot lets a marker sit directly behind the last bit, which is
/// how the drive reports a block that ends exactly at the track boundary.
///
/// - `left < right`: one range `[left, right)`.
/// - `left > right`: the selection wraps and yields `[0, right + 1)` and
///   `[left, length)`.
/// - `left == right` or `length == 0`: nothing to highlight.
pub fn wrap_range(begin: usize, end: usize, length: usize) -> RangePair {
    if length == 0 {
        return RangePair::EMPTY;
    }

    let modulus = length + 1;
    let left = begin % modulus;
    let right = end % modulus;

    match left.cmp(&right) {
        Ordering::Less => RangePair::single(BitRange::new(left, right)),
        Ordering::Greater => {
            RangePair::split(BitRange::new(0, right + 1), BitRange::new(left, length))
        }
        Ordering::Equal => RangePair::EMPTY,
    }
}

/// Map drive [`Bounds`] onto a circular buffer of `length` bits.
pub fn wrap_bounds(bounds: Bounds, length: usize) -> RangePair {
    wrap_range(bounds.begin, bounds.end, length)
}
