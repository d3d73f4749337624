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

//! Fuzz target for the wraparound range arithmetic.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_wrap_range
//!
//! Run for a specific duration:
//!   cargo +nightly fuzz run fuzz_wrap_range -- -max_total_time=60

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Markers {
    begin: usize,
    end: usize,
    length: u32,
}

fuzz_target!(|input: Markers| {
    let length = input.length as usize;
    let pair = gcrscope::wrap_range(input.begin, input.end, length);

    // Highlighted bits never leave the halftrack
    for range in pair.iter() {
        assert!(range.start < range.end);
        assert!(range.end <= length);
    }
    assert!(pair.bit_count() <= length);
});
