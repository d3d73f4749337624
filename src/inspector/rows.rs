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

//! Row mapping and selection resolution.
//!
//! Damaged or copy protected disks often carry only some of the sectors a
//! track should have, in any order. The [`RowMap`] compacts the sectors the
//! analyzer found into a dense list of display rows, keeping scan order.
//! [`resolve`] turns a selection into the raw bit markers to highlight.

use crate::drive::{Drive, Sector, SectorHalf, SectorInfo, MAX_SECTORS};
use crate::error::TableKind;
use crate::range::Bounds;

/// Dense display rows mapped to the sector numbers found on a halftrack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowMap {
    sectors: Vec<Sector>,
}

impl RowMap {
    /// Scan all sector slots of the analyzed halftrack.
    pub fn scan(drive: &dyn Drive) -> Self {
        Self::from_infos((0..MAX_SECTORS).map(|sector| (sector, drive.sector_info(sector))))
    }

    /// Build a map from sector slots in scan order, skipping absent sectors.
    pub fn from_infos(infos: impl IntoIterator<Item = (Sector, SectorInfo)>) -> Self {
        let sectors = infos
            .into_iter()
            .filter(|(_, info)| info.is_present())
            .map(|(sector, _)| sector)
            .collect();
        Self { sectors }
    }

    /// Number of sectors found.
    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    /// Sector number shown in a display row.
    pub fn sector(&self, row: usize) -> Option<Sector> {
        self.sectors.get(row).copied()
    }

    /// Iterate over `(row, sector)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Sector)> + '_ {
        self.sectors.iter().copied().enumerate()
    }
}

/// A selected row in one of the two tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSelection {
    pub table: TableKind,
    pub row: usize,
}

impl RowSelection {
    pub fn sector_row(row: usize) -> Self {
        Self {
            table: TableKind::Sectors,
            row,
        }
    }

    pub fn error_row(row: usize) -> Self {
        Self {
            table: TableKind::Errors,
            row,
        }
    }

    /// Translate the row into a selection key.
    ///
    /// Sector table rows come in pairs: the even row shows the header, the odd
    /// row the data block of the same sector. Returns `None` if the row lies
    /// outside the row map.
    pub fn to_selection(self, rows: &RowMap) -> Option<Selection> {
        match self.table {
            TableKind::Sectors => {
                let sector = rows.sector(self.row / 2)?;
                let half = if self.row % 2 == 0 {
                    SectorHalf::Header
                } else {
                    SectorHalf::Data
                };
                Some(Selection::Sector { sector, half })
            }
            TableKind::Errors => Some(Selection::Error { row: self.row }),
        }
    }
}

/// What the user wants to see highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// One block of a sector, by sector number.
    Sector { sector: Sector, half: SectorHalf },
    /// A row of the error table. Row 0 is the summary line.
    Error { row: usize },
}

/// Resolve a selection into bit markers on the analyzed halftrack.
///
/// The selection must come from the current tables; error rows past
/// `num_errors()` yield whatever the drive reports for them.
pub fn resolve(selection: Selection, drive: &dyn Drive) -> Bounds {
    match selection {
        Selection::Sector { sector, half } => drive.sector_info(sector).bounds(half),
        Selection::Error { row: 0 } => Bounds::default(),
        Selection::Error { row } => drive.error_bounds(row - 1),
    }
}
