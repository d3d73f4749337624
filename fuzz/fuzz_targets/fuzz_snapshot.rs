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

//! Fuzz target for loading and inspecting disk snapshots.
//!
//! Feeds random JSON through snapshot parsing, a full refresh and every
//! table selection to find panics in the inspector.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_snapshot

#![no_main]

use gcrscope::inspector::TableModel;
use gcrscope::render::{render_inspector, RenderOptions};
use gcrscope::{DiskInspector, MemoryDrive, Preferences};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mut drive) = MemoryDrive::from_json(json) else {
        return;
    };

    let mut inspector = DiskInspector::new(&Preferences::default());
    inspector.refresh(&mut drive);

    let sector_rows = inspector.sector_table(&drive).row_count();
    for row in 0..sector_rows {
        let _ = inspector.select_sector_row(&drive, row);
    }
    let error_rows = inspector.error_table(&drive).row_count();
    for row in 0..error_rows {
        let _ = inspector.select_error_row(&drive, row);
    }

    let _ = render_inspector(&inspector, &drive, &RenderOptions::default());
});
