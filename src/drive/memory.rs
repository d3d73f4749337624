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

//! An in-memory drive loaded from a JSON disk snapshot.
//!
//! The snapshot carries raw GCR bitstreams for any number of halftracks
//! together with the sector positions and read errors an emulator core found
//! while scanning them. [`MemoryDrive`] serves those through the [`Drive`]
//! trait and applies head movement and bit writes in memory.
//!
//! ```json
//! {
//!   "halftrack": 35,
//!   "offset": 0,
//!   "halftracks": {
//!     "35": {
//!       "bits": "0101...",
//!       "sectors": [{ "sector": 0, "header_begin": 40, "header_end": 120,
//!                     "data_begin": 200, "data_end": 2800 }],
//!       "errors": [{ "first": 3000, "last": 3010, "message": "Invalid GCR" }]
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use super::{Drive, Halftrack, Sector, SectorInfo, MAX_HALFTRACKS, MAX_SECTORS};
use crate::error::{InspectorError, Result};
use crate::range::Bounds;

/// Position of one sector inside a halftrack image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorRecord {
    pub sector: Sector,
    pub header_begin: usize,
    pub header_end: usize,
    pub data_begin: usize,
    pub data_end: usize,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub header_text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data_text: String,
}

impl SectorRecord {
    /// Create a sector record without byte text.
    pub fn new(sector: Sector, header: Bounds, data: Bounds) -> Self {
        Self {
            sector,
            header_begin: header.begin,
            header_end: header.end,
            data_begin: data.begin,
            data_end: data.end,
            header_text: String::new(),
            data_text: String::new(),
        }
    }

    /// Attach the decoded header and data bytes as text.
    pub fn with_text(mut self, header: impl Into<String>, data: impl Into<String>) -> Self {
        self.header_text = header.into();
        self.data_text = data.into();
        self
    }

    fn info(&self) -> SectorInfo {
        SectorInfo {
            header_begin: self.header_begin,
            header_end: self.header_end,
            data_begin: self.data_begin,
            data_end: self.data_end,
        }
    }
}

/// An erroneous bit sequence found on a halftrack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub first: usize,
    pub last: usize,
    pub message: String,
}

impl ErrorRecord {
    pub fn new(first: usize, last: usize, message: impl Into<String>) -> Self {
        Self {
            first,
            last,
            message: message.into(),
        }
    }
}

/// Raw bits and scan results of one halftrack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalftrackImage {
    #[serde(serialize_with = "serialize_bits", deserialize_with = "deserialize_bits")]
    pub bits: Vec<u8>,
    #[serde(default)]
    pub sectors: Vec<SectorRecord>,
    #[serde(default)]
    pub errors: Vec<ErrorRecord>,
}

impl HalftrackImage {
    /// Create an image from a bit vector. Every byte is reduced to its lowest bit.
    pub fn new(bits: Vec<u8>) -> Self {
        Self {
            bits: bits.into_iter().map(|b| b & 1).collect(),
            sectors: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Create an image from a string of `0` and `1` characters.
    pub fn from_bit_str(bits: &str) -> Result<Self> {
        Ok(Self::new(parse_bits(bits).map_err(InspectorError::InvalidSnapshot)?))
    }

    /// Create an image of `len` zero bits.
    pub fn zeroed(len: usize) -> Self {
        Self::new(vec![0; len])
    }

    pub fn with_sector(mut self, sector: SectorRecord) -> Self {
        self.sectors.push(sector);
        self
    }

    pub fn with_error(mut self, error: ErrorRecord) -> Self {
        self.errors.push(error);
        self
    }

    /// Number of bits on this halftrack.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    fn sector(&self, sector: Sector) -> Option<&SectorRecord> {
        self.sectors.iter().find(|s| s.sector == sector)
    }
}

fn parse_bits(text: &str) -> std::result::Result<Vec<u8>, String> {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .enumerate()
        .map(|(i, c)| match c {
            '0' => Ok(0),
            '1' => Ok(1),
            other => Err(format!("Invalid bit '{}' at position {}", other, i)),
        })
        .collect()
}

fn bits_to_string(bits: &[u8]) -> String {
    bits.iter()
        .map(|&b| if b == 0 { '0' } else { '1' })
        .collect()
}

fn serialize_bits<S: Serializer>(bits: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&bits_to_string(bits))
}

fn deserialize_bits<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<u8>, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse_bits(&text).map_err(serde::de::Error::custom)
}

fn default_true() -> bool {
    true
}

fn default_halftrack() -> Halftrack {
    1
}

/// The serialized state of a drive and its disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskSnapshot {
    #[serde(default = "default_true")]
    pub has_disk: bool,
    #[serde(default)]
    pub rotating: bool,
    #[serde(default = "default_halftrack")]
    pub halftrack: Halftrack,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub halftracks: BTreeMap<Halftrack, HalftrackImage>,
}

impl Default for DiskSnapshot {
    fn default() -> Self {
        Self {
            has_disk: true,
            rotating: false,
            halftrack: default_halftrack(),
            offset: 0,
            halftracks: BTreeMap::new(),
        }
    }
}

impl DiskSnapshot {
    /// Check that all halftrack and sector numbers are addressable.
    pub fn validate(&self) -> Result<()> {
        let valid_halftrack = |ht: Halftrack| (1..=MAX_HALFTRACKS).contains(&ht);

        if !valid_halftrack(self.halftrack) {
            return Err(InspectorError::InvalidSnapshot(format!(
                "Head halftrack {} is outside 1..={}",
                self.halftrack, MAX_HALFTRACKS
            )));
        }

        for (&ht, image) in &self.halftracks {
            if !valid_halftrack(ht) {
                return Err(InspectorError::InvalidSnapshot(format!(
                    "Halftrack {} is outside 1..={}",
                    ht, MAX_HALFTRACKS
                )));
            }
            for record in &image.sectors {
                if record.sector >= MAX_SECTORS {
                    return Err(InspectorError::InvalidSnapshot(format!(
                        "Sector {} on halftrack {} is outside 0..{}",
                        record.sector, ht, MAX_SECTORS
                    )));
                }
            }
        }

        Ok(())
    }
}

/// A [`Drive`] backed by a [`DiskSnapshot`].
#[derive(Debug, Clone, Default)]
pub struct MemoryDrive {
    snapshot: DiskSnapshot,
    analyzed: Option<Halftrack>,
}

impl MemoryDrive {
    /// Create a drive with an empty disk on halftrack 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a drive from a snapshot.
    pub fn from_snapshot(mut snapshot: DiskSnapshot) -> Result<Self> {
        snapshot.validate()?;
        let len = snapshot
            .halftracks
            .get(&snapshot.halftrack)
            .map_or(0, HalftrackImage::len);
        snapshot.offset = clamp_offset(snapshot.offset, len);
        Ok(Self {
            snapshot,
            analyzed: None,
        })
    }

    /// Parse a drive from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_snapshot(serde_json::from_str(json)?)
    }

    /// Load a drive from a JSON snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| InspectorError::io(path, e))?;
        let drive = Self::from_json(&json)?;
        debug!(
            path = %path.display(),
            halftracks = drive.snapshot.halftracks.len(),
            "Loaded disk snapshot"
        );
        Ok(drive)
    }

    /// Serialize the drive state as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot)?)
    }

    /// Write the drive state to a JSON snapshot file.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?).map_err(|e| InspectorError::io(path, e))
    }

    /// Put a halftrack image on the disk.
    pub fn with_halftrack(mut self, halftrack: Halftrack, image: HalftrackImage) -> Self {
        self.snapshot.halftracks.insert(halftrack, image);
        self
    }

    /// The underlying snapshot.
    pub fn snapshot(&self) -> &DiskSnapshot {
        &self.snapshot
    }

    pub fn insert_disk(&mut self) {
        self.snapshot.has_disk = true;
    }

    pub fn eject_disk(&mut self) {
        self.snapshot.has_disk = false;
    }

    pub fn set_rotating(&mut self, rotating: bool) {
        self.snapshot.rotating = rotating;
    }

    fn current(&self) -> Option<&HalftrackImage> {
        if !self.snapshot.has_disk {
            return None;
        }
        self.snapshot.halftracks.get(&self.snapshot.halftrack)
    }

    fn analysis(&self) -> Option<&HalftrackImage> {
        if !self.snapshot.has_disk {
            return None;
        }
        self.snapshot.halftracks.get(&self.analyzed?)
    }
}

fn clamp_offset(offset: usize, len: usize) -> usize {
    offset.min(len.saturating_sub(1))
}

impl Drive for MemoryDrive {
    fn has_disk(&self) -> bool {
        self.snapshot.has_disk
    }

    fn is_rotating(&self) -> bool {
        self.snapshot.rotating
    }

    fn halftrack(&self) -> Halftrack {
        self.snapshot.halftrack
    }

    fn offset(&self) -> usize {
        self.snapshot.offset
    }

    fn size_of_current_halftrack(&self) -> usize {
        self.current().map_or(0, HalftrackImage::len)
    }

    fn analyze_halftrack(&mut self, halftrack: Halftrack) {
        self.analyzed = Some(halftrack);
    }

    fn sector_info(&self, sector: Sector) -> SectorInfo {
        self.analysis()
            .and_then(|image| image.sector(sector))
            .map(SectorRecord::info)
            .unwrap_or_default()
    }

    fn num_errors(&self) -> usize {
        self.analysis().map_or(0, |image| image.errors.len())
    }

    fn error_bounds(&self, nr: usize) -> Bounds {
        self.analysis()
            .and_then(|image| image.errors.get(nr))
            .map(|e| Bounds::new(e.first, e.last))
            .unwrap_or_default()
    }

    fn error_message(&self, nr: usize) -> String {
        self.analysis()
            .and_then(|image| image.errors.get(nr))
            .map(|e| e.message.clone())
            .unwrap_or_default()
    }

    fn sector_header_text(&self, sector: Sector) -> String {
        self.analysis()
            .and_then(|image| image.sector(sector))
            .map(|s| s.header_text.clone())
            .unwrap_or_default()
    }

    fn sector_data_text(&self, sector: Sector) -> String {
        self.analysis()
            .and_then(|image| image.sector(sector))
            .map(|s| s.data_text.clone())
            .unwrap_or_default()
    }

    fn track_bits(&self) -> String {
        self.current()
            .map(|image| bits_to_string(&image.bits))
            .unwrap_or_default()
    }

    fn read_bit_from_head(&self) -> u8 {
        self.current()
            .and_then(|image| image.bits.get(self.snapshot.offset).copied())
            .unwrap_or(0)
    }

    fn write_bit_to_head(&mut self, bit: u8) {
        if !self.snapshot.has_disk {
            return;
        }
        let offset = self.snapshot.offset;
        if let Some(slot) = self
            .snapshot
            .halftracks
            .get_mut(&self.snapshot.halftrack)
            .and_then(|image| image.bits.get_mut(offset))
        {
            *slot = bit & 1;
        }
    }

    fn set_offset(&mut self, offset: usize) {
        self.snapshot.offset = clamp_offset(offset, self.size_of_current_halftrack());
    }

    fn set_halftrack(&mut self, halftrack: Halftrack) {
        self.snapshot.halftrack = halftrack.clamp(1, MAX_HALFTRACKS);
        // Head geometry does not depend on the disk being inserted
        let len = self
            .snapshot
            .halftracks
            .get(&self.snapshot.halftrack)
            .map_or(0, HalftrackImage::len);
        self.snapshot.offset = clamp_offset(self.snapshot.offset, len);
    }

    fn rotate_disk(&mut self) {
        let len = self.size_of_current_halftrack();
        if len > 0 {
            self.snapshot.offset = (self.snapshot.offset + 1) % len;
        }
    }

    fn rotate_back(&mut self) {
        let len = self.size_of_current_halftrack();
        if len > 0 {
            self.snapshot.offset = match self.snapshot.offset {
                0 => len - 1,
                offset => offset - 1,
            };
        }
    }
}
