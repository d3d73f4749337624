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

//! Property-based tests for GcrScope.
//!
//! These tests verify invariants of the wraparound arithmetic, the row map
//! and the dirty tracker for arbitrary inputs, using proptest for random
//! input generation.

use gcrscope::drive::{HalftrackImage, MemoryDrive, SectorInfo, SectorRecord, MAX_SECTORS};
use gcrscope::inspector::{DirtyTracker, DriveState, RowMap, TableModel};
use gcrscope::{wrap_range, BitRange, Bounds, DiskInspector, Preferences};
use proptest::prelude::*;

fn clean_tracker(state: DriveState) -> DirtyTracker {
    let mut tracker = DirtyTracker::new();
    tracker.observe(state);
    tracker.clear_disk_info();
    tracker.clear_track_data();
    tracker.clear_head_position();
    tracker
}

fn drive_state() -> impl Strategy<Value = DriveState> {
    (any::<bool>(), 1u32..=84, 0usize..8000).prop_map(|(has_disk, halftrack, offset)| {
        DriveState {
            has_disk,
            halftrack,
            offset,
        }
    })
}

// ============================================================================
// Wraparound Property Tests
// ============================================================================

proptest! {
    /// Property: Markers that agree modulo `length + 1` highlight nothing.
    #[test]
    fn prop_equal_markers_are_empty(
        length in 1usize..10_000,
        begin in 0usize..100_000,
        laps in 0usize..5,
    ) {
        let end = begin % (length + 1) + laps * (length + 1);
        prop_assert!(wrap_range(begin, end, length).is_empty());
    }

    /// Property: Ordered markers yield exactly one range.
    #[test]
    fn prop_ordered_markers_single_range(
        (length, left, right) in (2usize..10_000).prop_flat_map(|length| {
            (0..length - 1).prop_flat_map(move |left| {
                (Just(length), Just(left), left + 1..length)
            })
        })
    ) {
        let pair = wrap_range(left, right, length);
        prop_assert!(!pair.is_wrapped());
        prop_assert_eq!(pair.first(), Some(BitRange::new(left, right)));
    }

    /// Property: Wrapped markers cover the forward walk from `left` to `right`.
    #[test]
    fn prop_wrapped_markers_cover_walk(
        (length, left, right) in (2usize..10_000).prop_flat_map(|length| {
            (1..length).prop_flat_map(move |left| {
                (Just(length), Just(left), 0..left)
            })
        })
    ) {
        let pair = wrap_range(left, right, length);
        prop_assert!(pair.is_wrapped());
        prop_assert_eq!(pair.bit_count(), (length - left) + (right + 1));

        let (first, second) = (pair.first().unwrap(), pair.second().unwrap());
        prop_assert!(first.end <= second.start, "Ranges overlap: {:?} {:?}", first, second);

        for offset in 0..length {
            let walked = offset >= left || offset <= right;
            prop_assert_eq!(pair.contains(offset), walked, "Offset {}", offset);
        }
    }

    /// Property: An empty halftrack never highlights anything.
    #[test]
    fn prop_zero_length_is_empty(begin in any::<usize>(), end in any::<usize>()) {
        prop_assert!(wrap_range(begin, end, 0).is_empty());
    }

    /// Property: Highlighted bits always lie inside the halftrack.
    #[test]
    fn prop_ranges_in_bounds(
        length in 1usize..10_000,
        begin in 0usize..100_000,
        end in 0usize..100_000,
    ) {
        for range in wrap_range(begin, end, length).iter() {
            prop_assert!(!range.is_empty());
            prop_assert!(range.end <= length, "{:?} exceeds {}", range, length);
        }
    }
}

// ============================================================================
// Dirty Tracker Property Tests
// ============================================================================

proptest! {
    /// Property: Observing an unchanged drive raises no flag.
    #[test]
    fn prop_unchanged_state_stays_clean(state in drive_state()) {
        let mut tracker = clean_tracker(state);
        prop_assert!(!tracker.observe(state));
    }

    /// Property: A pure head move only dirties the head position.
    #[test]
    fn prop_offset_change_dirties_head(state in drive_state(), offset in 0usize..8000) {
        prop_assume!(offset != state.offset);
        let mut tracker = clean_tracker(state);
        tracker.observe(DriveState { offset, ..state });

        prop_assert!(!tracker.disk_info_dirty());
        prop_assert!(!tracker.track_data_dirty());
        prop_assert!(tracker.head_position_dirty());
    }

    /// Property: Any jump between two states dirties exactly what depends on it.
    #[test]
    fn prop_flags_follow_dependencies(before in drive_state(), after in drive_state()) {
        let mut tracker = clean_tracker(before);
        tracker.observe(after);

        let disk = before.has_disk != after.has_disk;
        let track = disk || before.halftrack != after.halftrack;
        let head = track || before.offset != after.offset;

        prop_assert_eq!(tracker.disk_info_dirty(), disk);
        prop_assert_eq!(tracker.track_data_dirty(), track);
        prop_assert_eq!(tracker.head_position_dirty(), head);
        prop_assert_eq!(tracker.halftrack(), Some(after.halftrack));
        prop_assert_eq!(tracker.offset(), Some(after.offset));
    }
}

// ============================================================================
// Row Map Property Tests
// ============================================================================

proptest! {
    /// Property: The row map lists exactly the present sectors, densely and in order.
    #[test]
    fn prop_row_map_dense(present in proptest::collection::vec(any::<bool>(), MAX_SECTORS)) {
        let infos = present.iter().enumerate().map(|(sector, &is_present)| {
            let info = if is_present {
                SectorInfo { header_begin: sector, header_end: sector + 10, data_begin: 0, data_end: 0 }
            } else {
                SectorInfo::default()
            };
            (sector, info)
        });
        let rows = RowMap::from_infos(infos);

        let expected: Vec<usize> = present
            .iter()
            .enumerate()
            .filter(|(_, p)| **p)
            .map(|(sector, _)| sector)
            .collect();
        prop_assert_eq!(rows.len(), expected.len());
        for (row, sector) in rows.iter() {
            prop_assert_eq!(sector, expected[row]);
        }
    }

    /// Property: Every sector table row resolves to a highlight inside the track.
    #[test]
    fn prop_sector_rows_resolve_in_bounds(
        length in 1usize..512,
        markers in proptest::collection::vec((0usize..600, 0usize..600, 0usize..600, 0usize..600), 0..MAX_SECTORS),
    ) {
        let mut image = HalftrackImage::zeroed(length);
        for (sector, &(hb, he, db, de)) in markers.iter().enumerate() {
            image = image.with_sector(SectorRecord::new(sector, Bounds::new(hb, he), Bounds::new(db, de)));
        }
        let mut drive = MemoryDrive::new().with_halftrack(1, image);
        let mut inspector = DiskInspector::new(&Preferences::default());
        inspector.refresh(&mut drive);

        let rows = inspector.sector_table(&drive).row_count();
        prop_assert_eq!(rows, 2 * inspector.rows().len());
        for row in 0..rows {
            prop_assert!(inspector.select_sector_row(&drive, row).is_ok());
            for range in inspector.highlights().sector_markers().iter() {
                prop_assert!(range.end <= length);
            }
        }
        prop_assert!(inspector.select_sector_row(&drive, rows).is_err());
    }
}
