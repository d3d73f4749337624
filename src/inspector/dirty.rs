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

//! Change tracking for the three inspector aggregates.
//!
//! Each poll reads the disk presence, head halftrack and head offset from the
//! drive. A change marks every aggregate that depends on it as dirty; the
//! inspector then recomputes only what is dirty and clears those flags.
//! The tracker makes no assumption about how far values moved between polls.

use crate::drive::{Drive, Halftrack};

/// The upstream values the tracker compares between polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveState {
    pub has_disk: bool,
    pub halftrack: Halftrack,
    pub offset: usize,
}

impl DriveState {
    /// Take a snapshot read of a drive.
    pub fn read(drive: &dyn Drive) -> Self {
        Self {
            has_disk: drive.has_disk(),
            halftrack: drive.halftrack(),
            offset: drive.offset(),
        }
    }
}

/// Dirty flags plus the last observed drive state.
#[derive(Debug, Clone)]
pub struct DirtyTracker {
    has_disk: bool,
    halftrack: Option<Halftrack>,
    offset: Option<usize>,
    disk_info: bool,
    track_data: bool,
    head_position: bool,
}

impl Default for DirtyTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DirtyTracker {
    /// Create a tracker with all flags set, so the first refresh computes everything.
    pub fn new() -> Self {
        Self {
            has_disk: false,
            halftrack: None,
            offset: None,
            disk_info: true,
            track_data: true,
            head_position: true,
        }
    }

    /// Compare a fresh drive state against the last one and raise flags.
    ///
    /// Returns `true` if any flag is set afterwards.
    pub fn observe(&mut self, state: DriveState) -> bool {
        if state.has_disk != self.has_disk {
            self.disk_info = true;
            self.track_data = true;
            self.head_position = true;
            self.has_disk = state.has_disk;
        }
        if Some(state.halftrack) != self.halftrack {
            self.track_data = true;
            self.head_position = true;
            self.halftrack = Some(state.halftrack);
        }
        if Some(state.offset) != self.offset {
            self.head_position = true;
            self.offset = Some(state.offset);
        }
        self.any()
    }

    /// Last observed disk presence.
    pub fn has_disk(&self) -> bool {
        self.has_disk
    }

    /// Last observed halftrack, if any poll happened yet.
    pub fn halftrack(&self) -> Option<Halftrack> {
        self.halftrack
    }

    /// Last observed head offset, if any poll happened yet.
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    pub fn disk_info_dirty(&self) -> bool {
        self.disk_info
    }

    pub fn track_data_dirty(&self) -> bool {
        self.track_data
    }

    pub fn head_position_dirty(&self) -> bool {
        self.head_position
    }

    /// Check if anything needs a recompute.
    pub fn any(&self) -> bool {
        self.disk_info || self.track_data || self.head_position
    }

    /// Force a track data recompute, e.g. after a bit was written.
    pub fn invalidate_track_data(&mut self) {
        self.track_data = true;
    }

    /// Force a head position recompute, e.g. after the bit under the head changed.
    pub fn invalidate_head_position(&mut self) {
        self.head_position = true;
    }

    pub fn clear_disk_info(&mut self) {
        self.disk_info = false;
    }

    pub fn clear_track_data(&mut self) {
        self.track_data = false;
    }

    pub fn clear_head_position(&mut self) {
        self.head_position = false;
    }
}
