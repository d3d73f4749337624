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

//! Snapshot tests for the text rendering of the inspector.
//!
//! All renders use the plain (uncolored) layout so the snapshots stay
//! readable; sector bits are underlined with `~`, the head with `^`.

use gcrscope::drive::MemoryDrive;
use gcrscope::render::{render_inspector, render_table, RenderOptions};
use gcrscope::{DiskInspector, Preferences};
use insta::assert_snapshot;
use pretty_assertions::assert_eq;

const OPTS: RenderOptions = RenderOptions {
    bits_per_line: 32,
    color: false,
};

fn fixture() -> MemoryDrive {
    MemoryDrive::from_json(include_str!("fixtures/disk.json")).unwrap()
}

fn inspect(drive: &mut MemoryDrive, prefs: &Preferences) -> DiskInspector {
    let mut inspector = DiskInspector::new(prefs);
    inspector.refresh(drive);
    inspector
}

#[test]
fn test_default_view() {
    let mut drive = fixture();
    let inspector = inspect(&mut drive, &Preferences::default());

    assert_snapshot!(render_inspector(&inspector, &drive, &OPTS), @r###"
    Disk: inserted
    Track 18 (halftrack 35)
    Head: 5  Value: 1

    GCR Bitstream (64 Bits)
       0 | 11111111110101010101010111111111
         |           ~~~~~~~~~~
      32 | 11111010101010101010101001010101

    Sectors:
    SECTOR  TYPE     DATA
    0       Header:  08 12 00 12
            Data:    12 01 41
    2       Header:  08 12 02 12
            Data:    00 FF

    Errors:
    MESSAGE
    The GCR bitstream contains 2 errors.
    Missing sync mark after sector 0
    Invalid GCR code at bit 60
    "###);
}

#[test]
fn test_wrapped_data_block_with_head() {
    let mut drive = fixture();
    let prefs = Preferences {
        mark_head: true,
        ..Preferences::default()
    };
    let mut inspector = inspect(&mut drive, &prefs);
    inspector.select_sector_row(&drive, 3).unwrap();

    assert_snapshot!(render_inspector(&inspector, &drive, &OPTS), @r###"
    Disk: inserted
    Track 18 (halftrack 35)
    Head: 5  Value: 1

    GCR Bitstream (64 Bits)
       0 | 11111111110101010101010111111111
         | ~~~~~^~
      32 | 11111010101010101010101001010101
         |                         ~~~~~~~~

    Sectors:
    SECTOR  TYPE     DATA
    0       Header:  08 12 00 12
            Data:    12 01 41
    2       Header:  08 12 02 12
            Data:    00 FF

    Errors:
    MESSAGE
    The GCR bitstream contains 2 errors.
    Missing sync mark after sector 0
    Invalid GCR code at bit 60
    "###);
}

#[test]
fn test_wrapped_error() {
    let mut drive = fixture();
    let mut inspector = inspect(&mut drive, &Preferences::default());
    inspector.select_error_row(&drive, 2).unwrap();

    let rendered = render_inspector(&inspector, &drive, &OPTS);
    let bitstream: Vec<&str> = rendered.lines().skip(5).take(4).collect();
    assert_eq!(
        bitstream,
        vec![
            "   0 | 11111111110101010101010111111111",
            "     | ~~~",
            "  32 | 11111010101010101010101001010101",
            "     |                             ~~~~",
        ]
    );
}

#[test]
fn test_empty_halftrack() {
    let mut drive = fixture();
    let mut inspector = inspect(&mut drive, &Preferences::default());
    inspector.set_halftrack(&mut drive, 36);

    assert_snapshot!(render_inspector(&inspector, &drive, &OPTS), @r###"
    Disk: inserted
    Track 18.5 (halftrack 36)
    Head: 5  Value: 1

    GCR Bitstream (32 Bits)
       0 | 01010101010101010101010101010101

    Sectors:
    (no sectors found)

    Errors:
    MESSAGE
    The GCR bitstream has been scanned without errors.
    "###);
}

#[test]
fn test_ejected_disk() {
    let mut drive = fixture();
    let mut inspector = inspect(&mut drive, &Preferences::default());
    drive.eject_disk();
    inspector.refresh(&mut drive);

    assert_snapshot!(render_inspector(&inspector, &drive, &OPTS), @r###"
    Disk: none
    Track 18 (halftrack 35)
    Head: -  Value: -

    GCR Bitstream

    Sectors:
    (no sectors found)

    Errors:
    (no disk)
    "###);
}

#[test]
fn test_error_table() {
    let mut drive = fixture();
    let inspector = inspect(&mut drive, &Preferences::default());

    assert_snapshot!(render_table(&inspector.error_table(&drive), false), @r###"
    MESSAGE
    The GCR bitstream contains 2 errors.
    Missing sync mark after sector 0
    Invalid GCR code at bit 60
    "###);
}
