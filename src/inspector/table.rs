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

//! Toolkit independent table models for the sector and error lists.

use super::rows::RowMap;
use crate::drive::Drive;

/// How a row should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    Normal,
    /// The row reports a problem.
    Alert,
}

/// A read-only table a presentation layer can display.
pub trait TableModel {
    /// Column identifiers, in display order.
    fn columns(&self) -> &'static [&'static str];

    /// Number of rows.
    fn row_count(&self) -> usize;

    /// Cell text, or `None` for unknown rows and columns.
    fn value_at(&self, row: usize, column: &str) -> Option<String>;

    /// Presentation hint for a row.
    fn row_style(&self, _row: usize) -> CellStyle {
        CellStyle::Normal
    }
}

/// Two rows per sector found on the analyzed halftrack: header, then data.
pub struct SectorTable<'a> {
    rows: &'a RowMap,
    drive: &'a dyn Drive,
}

impl<'a> SectorTable<'a> {
    pub const COLUMNS: &'static [&'static str] = &["sector", "type", "data"];

    pub fn new(rows: &'a RowMap, drive: &'a dyn Drive) -> Self {
        Self { rows, drive }
    }
}

impl TableModel for SectorTable<'_> {
    fn columns(&self) -> &'static [&'static str] {
        Self::COLUMNS
    }

    fn row_count(&self) -> usize {
        2 * self.rows.len()
    }

    fn value_at(&self, row: usize, column: &str) -> Option<String> {
        let sector = self.rows.sector(row / 2)?;
        let header_row = row % 2 == 0;

        match column {
            "sector" if header_row => Some(sector.to_string()),
            "sector" => Some(String::new()),
            "type" if header_row => Some("Header:".to_string()),
            "type" => Some("Data:".to_string()),
            "data" if header_row => Some(self.drive.sector_header_text(sector)),
            "data" => Some(self.drive.sector_data_text(sector)),
            _ => None,
        }
    }
}

/// A summary row followed by one row per read error.
pub struct ErrorTable<'a> {
    drive: &'a dyn Drive,
    has_disk: bool,
}

impl<'a> ErrorTable<'a> {
    pub const COLUMNS: &'static [&'static str] = &["message"];

    pub fn new(drive: &'a dyn Drive, has_disk: bool) -> Self {
        Self { drive, has_disk }
    }
}

/// The text of the error table's first row.
pub fn error_summary(count: usize) -> String {
    match count {
        0 => "The GCR bitstream has been scanned without errors.".to_string(),
        1 => "The GCR bitstream contains 1 error.".to_string(),
        n => format!("The GCR bitstream contains {} errors.", n),
    }
}

impl TableModel for ErrorTable<'_> {
    fn columns(&self) -> &'static [&'static str] {
        Self::COLUMNS
    }

    fn row_count(&self) -> usize {
        if self.has_disk {
            self.drive.num_errors() + 1
        } else {
            0
        }
    }

    fn value_at(&self, row: usize, column: &str) -> Option<String> {
        if column != "message" || row >= self.row_count() {
            return None;
        }
        match row {
            0 => Some(error_summary(self.drive.num_errors())),
            row => Some(self.drive.error_message(row - 1)),
        }
    }

    fn row_style(&self, row: usize) -> CellStyle {
        if row == 0 {
            CellStyle::Normal
        } else {
            CellStyle::Alert
        }
    }
}
