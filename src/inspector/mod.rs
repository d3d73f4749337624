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

//! The disk inspector controller.
//!
//! [`DiskInspector`] polls a [`Drive`] and keeps the derived display state of
//! a halftrack inspector: the bitstream text, the sector and error tables and
//! the highlighted ranges. Only aggregates whose inputs changed since the
//! last poll are recomputed; rebuilding the sector table is the expensive
//! path and runs only when the disk or the halftrack changes.
//!
//! # Example
//!
//! ```
//! use gcrscope::drive::{HalftrackImage, MemoryDrive};
//! use gcrscope::inspector::DiskInspector;
//! use gcrscope::Preferences;
//!
//! let mut drive = MemoryDrive::new().with_halftrack(1, HalftrackImage::zeroed(6000));
//! let mut inspector = DiskInspector::new(&Preferences::default());
//!
//! let report = inspector.refresh(&mut drive);
//! assert!(report.track_data);
//! assert_eq!(inspector.view().title, "GCR Bitstream (6000 Bits)");
//!
//! // Nothing changed, nothing to do
//! assert!(!inspector.refresh(&mut drive).any());
//! ```

pub mod dirty;
pub mod highlight;
pub mod rows;
pub mod table;

pub use dirty::{DirtyTracker, DriveState};
pub use highlight::{HighlightSet, Marking};
pub use rows::{resolve, RowMap, RowSelection, Selection};
pub use table::{error_summary, CellStyle, ErrorTable, SectorTable, TableModel};

use tracing::{debug, trace, warn};

use crate::config::Preferences;
use crate::drive::{
    track_of_halftrack, track_position, Drive, Halftrack, MAX_HALFTRACKS, MAX_TRACKS,
};
use crate::error::{InspectorError, Result, TableKind};
use crate::range::BitRange;
use crate::runner::CancelHandle;

/// Display state derived from the drive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InspectorView {
    /// Disk presence as shown by the disk icon.
    pub has_disk: bool,
    /// Displayed halftrack.
    pub halftrack: Halftrack,
    /// Displayed track position, e.g. `17.5`.
    pub track_position: f64,
    /// Bit length of the displayed halftrack.
    pub track_length: usize,
    /// Title of the bitstream view.
    pub title: String,
    /// The bitstream as `0`/`1` characters.
    pub bitstream: String,
    /// Head field; empty without a disk.
    pub head: Option<usize>,
    /// Value field (bit under the head); empty without a disk.
    pub value: Option<u8>,
    /// Whether head and value may be edited.
    pub edit_enabled: bool,
}

/// Which aggregates a refresh recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub disk_info: bool,
    pub track_data: bool,
    pub head_position: bool,
}

impl RefreshReport {
    pub fn any(&self) -> bool {
        self.disk_info || self.track_data || self.head_position
    }
}

/// Inspector state for one drive.
#[derive(Debug)]
pub struct DiskInspector {
    tracker: DirtyTracker,
    rows: RowMap,
    highlights: HighlightSet,
    selection: Option<RowSelection>,
    mark_head: bool,
    view: InspectorView,
    timer: Option<CancelHandle>,
}

impl DiskInspector {
    /// Create an inspector. The first refresh computes everything.
    pub fn new(prefs: &Preferences) -> Self {
        Self {
            tracker: DirtyTracker::new(),
            rows: RowMap::default(),
            highlights: HighlightSet::new(),
            selection: Some(RowSelection::sector_row(0)),
            mark_head: prefs.mark_head,
            view: InspectorView::default(),
            timer: None,
        }
    }

    /// Poll the drive and recompute whatever changed.
    pub fn refresh(&mut self, drive: &mut dyn Drive) -> RefreshReport {
        let state = DriveState::read(drive);
        self.tracker.observe(state);
        self.view.edit_enabled = state.has_disk && !drive.is_rotating();

        let mut report = RefreshReport::default();

        if self.tracker.disk_info_dirty() {
            self.view.has_disk = state.has_disk;
            debug!(has_disk = state.has_disk, "Disk info updated");
            self.tracker.clear_disk_info();
            report.disk_info = true;
        }

        if self.tracker.track_data_dirty() {
            self.refresh_track_data(drive, state);
            self.tracker.clear_track_data();
            report.track_data = true;
        }

        if self.tracker.head_position_dirty() {
            self.refresh_head_position(drive, state);
            self.tracker.clear_head_position();
            report.head_position = true;
        }

        trace!(?report, "Refresh");
        report
    }

    fn refresh_track_data(&mut self, drive: &mut dyn Drive, state: DriveState) {
        self.view.halftrack = state.halftrack;
        self.view.track_position = track_position(state.halftrack);

        drive.analyze_halftrack(state.halftrack);
        self.rows = RowMap::scan(drive);
        self.view.track_length = drive.size_of_current_halftrack();

        if state.has_disk {
            self.view.title = format!("GCR Bitstream ({} Bits)", self.view.track_length);
            self.view.bitstream = drive.track_bits();
        } else {
            self.view.title = "GCR Bitstream".to_string();
            self.view.bitstream.clear();
        }

        debug!(
            halftrack = state.halftrack,
            bits = self.view.track_length,
            sectors = self.rows.len(),
            errors = drive.num_errors(),
            "Track data updated"
        );

        self.apply_selection(drive);
    }

    fn refresh_head_position(&mut self, drive: &dyn Drive, state: DriveState) {
        if state.has_disk {
            self.view.head = Some(state.offset);
            self.view.value = Some(drive.read_bit_from_head());
        } else {
            self.view.head = None;
            self.view.value = None;
        }

        if self.mark_head {
            match self.view.head {
                Some(offset) => self.highlights.set_head(offset),
                None => self.highlights.remove_head(),
            }
        }
    }

    /// Re-resolve the current selection against the analyzed halftrack.
    ///
    /// A selection that no longer fits its table highlights nothing but is
    /// kept, so it applies again once the table grows back.
    fn apply_selection(&mut self, drive: &dyn Drive) {
        let bounds = self
            .selection
            .filter(|sel| sel.row < self.row_count(sel.table, drive))
            .and_then(|sel| sel.to_selection(&self.rows))
            .map(|sel| resolve(sel, drive));

        match bounds {
            Some(bounds) => self
                .highlights
                .set_sector_bounds(bounds, self.view.track_length),
            None => self.highlights.remove_sector_markers(),
        }
    }

    fn row_count(&self, table: TableKind, drive: &dyn Drive) -> usize {
        match table {
            TableKind::Sectors => self.sector_table(drive).row_count(),
            TableKind::Errors => self.error_table(drive).row_count(),
        }
    }

    /// The sector table of the analyzed halftrack.
    pub fn sector_table<'a>(&'a self, drive: &'a dyn Drive) -> SectorTable<'a> {
        SectorTable::new(&self.rows, drive)
    }

    /// The error table of the analyzed halftrack.
    pub fn error_table<'a>(&self, drive: &'a dyn Drive) -> ErrorTable<'a> {
        ErrorTable::new(drive, self.tracker.has_disk())
    }

    /// Derived display state.
    pub fn view(&self) -> &InspectorView {
        &self.view
    }

    /// Row to sector mapping of the analyzed halftrack.
    pub fn rows(&self) -> &RowMap {
        &self.rows
    }

    /// Highlighted ranges.
    pub fn highlights(&self) -> &HighlightSet {
        &self.highlights
    }

    /// Dirty flags and last observed drive state.
    pub fn tracker(&self) -> &DirtyTracker {
        &self.tracker
    }

    /// Currently selected table row.
    pub fn selection(&self) -> Option<RowSelection> {
        self.selection
    }

    /// Check if the head marker follows the head.
    pub fn is_marking_head(&self) -> bool {
        self.mark_head
    }

    // ------------------------------------------------------------------
    // User actions
    // ------------------------------------------------------------------

    /// Move the head to a track, clamped to the reachable tracks.
    pub fn set_track(&mut self, drive: &mut dyn Drive, track: i64) -> RefreshReport {
        let track = track.clamp(1, i64::from(MAX_TRACKS));
        drive.set_track(track as u32);
        self.refresh(drive)
    }

    /// Move the head one track up or down.
    pub fn step_track(&mut self, drive: &mut dyn Drive, up: bool) -> RefreshReport {
        let current = i64::from(track_of_halftrack(drive.halftrack()));
        self.set_track(drive, if up { current + 1 } else { current - 1 })
    }

    /// Move the head to a halftrack, clamped to the reachable halftracks.
    pub fn set_halftrack(&mut self, drive: &mut dyn Drive, halftrack: i64) -> RefreshReport {
        let halftrack = halftrack.clamp(1, i64::from(MAX_HALFTRACKS));
        drive.set_halftrack(halftrack as u32);
        self.refresh(drive)
    }

    /// Move the head one halftrack up or down.
    pub fn step_halftrack(&mut self, drive: &mut dyn Drive, up: bool) -> RefreshReport {
        let current = i64::from(drive.halftrack());
        self.set_halftrack(drive, if up { current + 1 } else { current - 1 })
    }

    /// Move the head to a bit offset, clamped to the current halftrack.
    pub fn set_head(&mut self, drive: &mut dyn Drive, offset: i64) -> RefreshReport {
        let max = drive.size_of_current_halftrack() as i64;
        let offset = offset.min(max - 1).max(0);
        drive.set_offset(offset as usize);
        self.refresh(drive)
    }

    /// Rotate the disk one bit forward or backward.
    pub fn step_head(&mut self, drive: &mut dyn Drive, forward: bool) -> RefreshReport {
        if forward {
            drive.rotate_disk();
        } else {
            drive.rotate_back();
        }
        self.refresh(drive)
    }

    /// Fail unless head and value may be edited.
    pub fn ensure_editable(&self) -> Result<()> {
        if self.view.edit_enabled {
            Ok(())
        } else {
            warn!(has_disk = self.view.has_disk, "Edit rejected");
            Err(InspectorError::EditingDisabled)
        }
    }

    /// Write a bit under the head.
    pub fn write_value(&mut self, drive: &mut dyn Drive, bit: u8) -> RefreshReport {
        drive.write_bit_to_head(bit);
        self.tracker.invalidate_track_data();
        self.tracker.invalidate_head_position();
        self.refresh(drive)
    }

    /// Invert the bit under the head.
    pub fn toggle_value(&mut self, drive: &mut dyn Drive) -> RefreshReport {
        let bit = if drive.read_bit_from_head() == 0 { 1 } else { 0 };
        self.write_value(drive, bit)
    }

    /// Turn the head marker on or off.
    pub fn mark_head(&mut self, drive: &dyn Drive, on: bool) {
        self.mark_head = on;
        if on && drive.has_disk() {
            self.highlights.set_head(drive.offset());
        } else {
            self.highlights.remove_head();
        }
    }

    /// Select a row of the sector table and highlight its block.
    pub fn select_sector_row(&mut self, drive: &dyn Drive, row: usize) -> Result<()> {
        self.select(drive, RowSelection::sector_row(row))
    }

    /// Select a row of the error table and highlight the erroneous bits.
    pub fn select_error_row(&mut self, drive: &dyn Drive, row: usize) -> Result<()> {
        self.select(drive, RowSelection::error_row(row))
    }

    fn select(&mut self, drive: &dyn Drive, selection: RowSelection) -> Result<()> {
        let rows = self.row_count(selection.table, drive);
        if selection.row >= rows {
            warn!(table = %selection.table, row = selection.row, rows, "Selection rejected");
            return Err(InspectorError::InvalidSelection {
                table: selection.table,
                row: selection.row,
                rows,
            });
        }

        self.selection = Some(selection);
        self.apply_selection(drive);
        Ok(())
    }

    /// The range a view should scroll to.
    pub fn scroll_target(&self) -> Option<BitRange> {
        self.highlights
            .first_sector_marker()
            .or_else(|| self.view.head.map(BitRange::bit))
    }

    /// Force the next refresh to rebuild the track data, e.g. after the
    /// drive was replaced by a freshly loaded one.
    pub fn invalidate_track_data(&mut self) {
        self.tracker.invalidate_track_data();
        self.tracker.invalidate_head_position();
    }

    /// Attach the refresh timer that drives this inspector.
    pub fn bind_timer(&mut self, handle: CancelHandle) {
        self.timer = Some(handle);
    }

    /// Stop the bound refresh timer.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.timer.take() {
            debug!("Canceling refresh timer");
            handle.cancel();
        }
    }
}

impl Drop for DiskInspector {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::{ErrorRecord, HalftrackImage, MemoryDrive, SectorRecord};
    use crate::range::Bounds;
    use crate::runner::RefreshTimer;
    use std::ops::ControlFlow;
    use std::time::Duration;

    fn drive() -> MemoryDrive {
        let track = HalftrackImage::zeroed(1000)
            .with_sector(SectorRecord::new(0, Bounds::new(10, 90), Bounds::new(100, 300)))
            .with_sector(SectorRecord::new(1, Bounds::new(400, 480), Bounds::new(950, 50)))
            .with_error(ErrorRecord::new(600, 610, "Invalid GCR code"));
        let other = HalftrackImage::zeroed(500);
        MemoryDrive::new()
            .with_halftrack(1, track)
            .with_halftrack(2, other)
    }

    #[test]
    fn test_first_refresh_computes_everything() {
        let mut drive = drive();
        let mut inspector = DiskInspector::new(&Preferences::default());

        let report = inspector.refresh(&mut drive);
        assert!(report.disk_info && report.track_data && report.head_position);
        assert_eq!(inspector.rows().len(), 2);
        assert_eq!(inspector.view().head, Some(0));
        assert_eq!(inspector.view().value, Some(0));
        assert!(inspector.view().edit_enabled);

        // Sector row 0 is selected initially
        assert_eq!(
            inspector.highlights().first_sector_marker(),
            Some(BitRange::new(10, 90))
        );
    }

    #[test]
    fn test_head_step_only_touches_head() {
        let mut drive = drive();
        let mut inspector = DiskInspector::new(&Preferences::default());
        inspector.refresh(&mut drive);

        let report = inspector.step_head(&mut drive, true);
        assert_eq!(
            report,
            RefreshReport {
                disk_info: false,
                track_data: false,
                head_position: true
            }
        );
        assert_eq!(inspector.view().head, Some(1));
    }

    #[test]
    fn test_wrapped_data_block() {
        let mut drive = drive();
        let mut inspector = DiskInspector::new(&Preferences::default());
        inspector.refresh(&mut drive);

        inspector.select_sector_row(&drive, 3).unwrap();
        let markers = inspector.highlights().sector_markers();
        assert_eq!(markers.first(), Some(BitRange::new(0, 51)));
        assert_eq!(markers.second(), Some(BitRange::new(950, 1000)));
    }

    #[test]
    fn test_rejected_selection_keeps_state() {
        let mut drive = drive();
        let mut inspector = DiskInspector::new(&Preferences::default());
        inspector.refresh(&mut drive);

        let result = inspector.select_error_row(&drive, 2);
        assert!(matches!(
            result,
            Err(InspectorError::InvalidSelection {
                table: TableKind::Errors,
                row: 2,
                rows: 2
            })
        ));
        assert_eq!(inspector.selection(), Some(RowSelection::sector_row(0)));
    }

    #[test]
    fn test_selection_survives_empty_halftrack() {
        let mut drive = drive();
        let mut inspector = DiskInspector::new(&Preferences::default());
        inspector.refresh(&mut drive);

        inspector.set_halftrack(&mut drive, 2);
        assert!(inspector.rows().is_empty());
        assert!(inspector.highlights().sector_markers().is_empty());

        inspector.set_halftrack(&mut drive, 1);
        assert_eq!(
            inspector.highlights().first_sector_marker(),
            Some(BitRange::new(10, 90))
        );
    }

    #[test]
    fn test_track_input_is_clamped() {
        let mut drive = drive();
        let mut inspector = DiskInspector::new(&Preferences::default());

        inspector.set_track(&mut drive, 99);
        assert_eq!(drive.halftrack(), 83);
        inspector.set_track(&mut drive, -4);
        assert_eq!(drive.halftrack(), 1);
        inspector.set_halftrack(&mut drive, 500);
        assert_eq!(drive.halftrack(), MAX_HALFTRACKS);
        inspector.step_halftrack(&mut drive, true);
        assert_eq!(drive.halftrack(), MAX_HALFTRACKS);
    }

    #[test]
    fn test_head_input_is_clamped() {
        let mut drive = drive();
        let mut inspector = DiskInspector::new(&Preferences::default());
        inspector.refresh(&mut drive);

        inspector.set_head(&mut drive, 5000);
        assert_eq!(inspector.view().head, Some(999));
        inspector.set_head(&mut drive, -1);
        assert_eq!(inspector.view().head, Some(0));
    }

    #[test]
    fn test_toggle_value_rebuilds_bitstream() {
        let mut drive = drive();
        let mut inspector = DiskInspector::new(&Preferences::default());
        inspector.refresh(&mut drive);
        inspector.set_head(&mut drive, 2);

        let report = inspector.toggle_value(&mut drive);
        assert!(report.track_data);
        assert_eq!(inspector.view().value, Some(1));
        assert!(inspector.view().bitstream.starts_with("001"));
    }

    #[test]
    fn test_head_marker_follows_head() {
        let mut drive = drive();
        let mut inspector = DiskInspector::new(&Preferences::default());
        inspector.refresh(&mut drive);

        inspector.mark_head(&drive, true);
        assert_eq!(inspector.highlights().head(), Some(BitRange::new(0, 1)));

        inspector.step_head(&mut drive, false);
        assert_eq!(inspector.highlights().head(), Some(BitRange::new(999, 1000)));

        inspector.mark_head(&drive, false);
        assert_eq!(inspector.highlights().head(), None);
    }

    #[test]
    fn test_eject_clears_fields() {
        let mut drive = drive();
        let mut inspector = DiskInspector::new(&Preferences::default());
        inspector.refresh(&mut drive);

        drive.eject_disk();
        let report = inspector.refresh(&mut drive);
        assert!(report.disk_info && report.track_data && report.head_position);
        assert!(!inspector.view().has_disk);
        assert_eq!(inspector.view().title, "GCR Bitstream");
        assert_eq!(inspector.view().head, None);
        assert!(!inspector.view().edit_enabled);
        assert_eq!(inspector.error_table(&drive).row_count(), 0);
    }

    #[test]
    fn test_scroll_target_falls_back_to_head() {
        let mut drive = drive();
        let mut inspector = DiskInspector::new(&Preferences::default());
        inspector.refresh(&mut drive);
        inspector.set_head(&mut drive, 42);

        inspector.select_error_row(&drive, 0).unwrap();
        assert_eq!(inspector.scroll_target(), Some(BitRange::new(42, 43)));
    }

    #[test]
    fn test_cancel_stops_timer() {
        let handle = CancelHandle::new();
        let mut inspector = DiskInspector::new(&Preferences::default());
        inspector.bind_timer(handle.clone());

        inspector.cancel();
        assert!(handle.is_cancelled());
        // Canceling twice is a no-op
        inspector.cancel();
    }

    #[test]
    fn test_editing_needs_idle_drive_with_disk() {
        let mut drive = drive();
        let mut inspector = DiskInspector::new(&Preferences::default());
        inspector.refresh(&mut drive);
        assert!(inspector.ensure_editable().is_ok());

        drive.set_rotating(true);
        inspector.refresh(&mut drive);
        assert!(matches!(
            inspector.ensure_editable(),
            Err(InspectorError::EditingDisabled)
        ));

        drive.set_rotating(false);
        drive.eject_disk();
        inspector.refresh(&mut drive);
        assert!(inspector.ensure_editable().is_err());
    }

    #[test]
    fn test_drop_stops_timer() {
        let handle = CancelHandle::new();
        {
            let mut inspector = DiskInspector::new(&Preferences::default());
            inspector.bind_timer(handle.clone());
            assert!(!handle.is_cancelled());
        }
        assert!(handle.is_cancelled());
    }

    #[test]
    fn test_drop_ends_running_timer() {
        let timer = RefreshTimer::new(Duration::from_millis(1));
        let mut inspector = Some(DiskInspector::new(&Preferences::default()));
        if let Some(inspector) = inspector.as_mut() {
            inspector.bind_timer(timer.handle());
        }

        let ticks = timer.run(|| {
            inspector = None;
            ControlFlow::Continue(())
        });
        assert_eq!(ticks, 1);
    }
}
