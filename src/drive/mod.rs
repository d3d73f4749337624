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

//! The drive interface the inspector reads from.
//!
//! The inspector never owns disk data. Each poll it takes snapshot reads from
//! a [`Drive`], which may be an emulator core running on its own thread or the
//! in-memory [`MemoryDrive`] used by the command line tool. Anything can change
//! between two polls.
//!
//! A 1541 disk has up to 42 tracks. The head can also stop halfway between
//! two tracks, which gives 84 addressable halftracks numbered from 1.

pub mod memory;

pub use memory::{DiskSnapshot, ErrorRecord, HalftrackImage, MemoryDrive, SectorRecord};

use crate::range::Bounds;

/// Halftrack number, `1..=MAX_HALFTRACKS`.
pub type Halftrack = u32;

/// Track number, `1..=MAX_TRACKS`.
pub type Track = u32;

/// Sector slot number, `0..MAX_SECTORS`.
pub type Sector = usize;

/// Number of tracks the drive head can reach.
pub const MAX_TRACKS: Track = 42;

/// Number of halftracks the drive head can reach.
pub const MAX_HALFTRACKS: Halftrack = 2 * MAX_TRACKS;

/// Number of sector slots scanned per halftrack.
pub const MAX_SECTORS: Sector = 22;

/// Get the track a halftrack belongs to.
pub fn track_of_halftrack(halftrack: Halftrack) -> Track {
    (halftrack + 1) / 2
}

/// Get the track position of a halftrack, e.g. `17.5` for halftrack 34.
pub fn track_position(halftrack: Halftrack) -> f64 {
    f64::from(halftrack + 1) / 2.0
}

/// Get the first halftrack of a track.
pub fn first_halftrack_of_track(track: Track) -> Halftrack {
    (2 * track).saturating_sub(1)
}

/// Which block of a sector a selection refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectorHalf {
    /// The header block (track, sector, id, checksum).
    Header,
    /// The data block.
    Data,
}

/// Bit positions of one sector inside the analyzed halftrack.
///
/// A sector is present iff its header range is non-empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectorInfo {
    pub header_begin: usize,
    pub header_end: usize,
    pub data_begin: usize,
    pub data_end: usize,
}

impl SectorInfo {
    /// Check if the analyzer found this sector on the halftrack.
    pub fn is_present(&self) -> bool {
        self.header_begin != self.header_end
    }

    /// Markers of the header block.
    pub fn header(&self) -> Bounds {
        Bounds::new(self.header_begin, self.header_end)
    }

    /// Markers of the data block.
    pub fn data(&self) -> Bounds {
        Bounds::new(self.data_begin, self.data_end)
    }

    /// Markers of the requested block.
    pub fn bounds(&self, half: SectorHalf) -> Bounds {
        match half {
            SectorHalf::Header => self.header(),
            SectorHalf::Data => self.data(),
        }
    }
}

/// Read access to a floppy drive plus the handful of commands a user can issue.
///
/// Sector and error queries refer to the halftrack most recently passed to
/// [`Drive::analyze_halftrack`].
pub trait Drive {
    /// Check if a disk is inserted.
    fn has_disk(&self) -> bool;

    /// Check if the drive motor spins.
    fn is_rotating(&self) -> bool {
        false
    }

    /// Current head halftrack.
    fn halftrack(&self) -> Halftrack;

    /// Current head bit position within the halftrack.
    fn offset(&self) -> usize;

    /// Number of bits on the current halftrack.
    fn size_of_current_halftrack(&self) -> usize;

    /// Scan a halftrack for sectors and errors.
    fn analyze_halftrack(&mut self, halftrack: Halftrack);

    /// Sector positions found by the last analysis.
    fn sector_info(&self, sector: Sector) -> SectorInfo;

    /// Number of errors found by the last analysis.
    fn num_errors(&self) -> usize;

    /// Markers of the erroneous bit sequence `nr`.
    fn error_bounds(&self, nr: usize) -> Bounds;

    /// Description of error `nr`.
    fn error_message(&self, nr: usize) -> String;

    /// Header bytes of a sector as text.
    fn sector_header_text(&self, sector: Sector) -> String;

    /// Data bytes of a sector as text.
    fn sector_data_text(&self, sector: Sector) -> String;

    /// The current halftrack as a string of `0` and `1` characters.
    fn track_bits(&self) -> String;

    /// Bit under the head.
    fn read_bit_from_head(&self) -> u8;

    /// Overwrite the bit under the head.
    fn write_bit_to_head(&mut self, bit: u8);

    /// Move the head within the current halftrack.
    fn set_offset(&mut self, offset: usize);

    /// Move the head to another halftrack.
    fn set_halftrack(&mut self, halftrack: Halftrack);

    /// Move the head to the first halftrack of a track.
    fn set_track(&mut self, track: Track) {
        self.set_halftrack(first_halftrack_of_track(track));
    }

    /// Advance the disk by one bit.
    fn rotate_disk(&mut self);

    /// Turn the disk back by one bit.
    fn rotate_back(&mut self);
}
