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

//! The set of highlighted bit ranges shown over the bitstream.

use crate::range::{wrap_bounds, BitRange, Bounds, RangePair};

/// What a highlighted bit is marked as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Marking {
    /// The bit belongs to the selected sector block or error.
    pub sector: bool,
    /// The bit is under the drive head.
    pub head: bool,
}

impl Marking {
    pub fn is_plain(&self) -> bool {
        !self.sector && !self.head
    }
}

/// At most one head marker and one (possibly wrapped) sector marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightSet {
    head: Option<BitRange>,
    sector: RangePair,
}

impl HighlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the bit under the head, replacing any previous head marker.
    pub fn set_head(&mut self, offset: usize) {
        self.head = Some(BitRange::bit(offset));
    }

    pub fn remove_head(&mut self) {
        self.head = None;
    }

    /// Mark a sector block or error, replacing the previous sector marker.
    pub fn set_sector_markers(&mut self, begin: usize, end: usize, length: usize) {
        self.set_sector_bounds(Bounds::new(begin, end), length);
    }

    /// Same as [`HighlightSet::set_sector_markers`] for drive bounds.
    pub fn set_sector_bounds(&mut self, bounds: Bounds, length: usize) {
        self.sector = wrap_bounds(bounds, length);
    }

    pub fn remove_sector_markers(&mut self) {
        self.sector = RangePair::EMPTY;
    }

    /// The head marker, if set.
    pub fn head(&self) -> Option<BitRange> {
        self.head
    }

    /// The sector marker ranges.
    pub fn sector_markers(&self) -> &RangePair {
        &self.sector
    }

    /// The range a view should scroll to when a sector is selected.
    pub fn first_sector_marker(&self) -> Option<BitRange> {
        self.sector.first()
    }

    /// Check if nothing is highlighted.
    pub fn is_empty(&self) -> bool {
        self.head.is_none() && self.sector.is_empty()
    }

    /// How a single bit is marked.
    pub fn marking(&self, offset: usize) -> Marking {
        Marking {
            sector: self.sector.contains(offset),
            head: self.head.is_some_and(|r| r.contains(offset)),
        }
    }
}
