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

//! Error types for GcrScope.
//!
//! Degenerate inputs (an empty halftrack, an empty selection) are not errors;
//! they simply produce nothing to highlight. The variants below cover file
//! access, malformed input and rejected user selections.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The two tables a user can select rows in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Sector headers and data blocks.
    Sectors,
    /// Read errors found while scanning the bitstream.
    Errors,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Sectors => write!(f, "sector"),
            TableKind::Errors => write!(f, "error"),
        }
    }
}

/// Errors reported by the inspector and its collaborators.
#[derive(Debug, Error)]
pub enum InspectorError {
    /// A file could not be read or written.
    #[error("Cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A disk snapshot or preferences file is not valid JSON.
    #[error("Malformed JSON: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// A disk snapshot is well-formed JSON but describes an impossible disk.
    #[error("Invalid disk snapshot: {0}")]
    InvalidSnapshot(String),

    /// A preferences value could not be applied.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A row outside the current table was selected.
    #[error("Row {row} is outside the {table} table ({rows} rows)")]
    InvalidSelection {
        table: TableKind,
        row: usize,
        rows: usize,
    },

    /// The head or the bit under it was edited while editing is disabled.
    #[error("Editing is disabled while no disk is inserted or the drive is rotating")]
    EditingDisabled,

    /// Watching the snapshot file failed.
    #[error("File watch error: {0}")]
    Watch(String),
}

impl InspectorError {
    /// Wrap an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for inspector operations.
pub type Result<T> = std::result::Result<T, InspectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_selection_message() {
        let error = InspectorError::InvalidSelection {
            table: TableKind::Errors,
            row: 5,
            rows: 3,
        };
        assert_eq!(error.to_string(), "Row 5 is outside the error table (3 rows)");
    }

    #[test]
    fn test_io_error_message() {
        let error = InspectorError::io(
            "/tmp/disk.json",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(error.to_string(), "Cannot access /tmp/disk.json: missing");
    }
}
