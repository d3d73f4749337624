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

//! GcrScope Library
//!
//! This library inspects the raw GCR bitstream of a 1541 floppy halftrack:
//! it maps sectors and read errors to bit ranges, tracks which parts of the
//! display need recomputing as the drive changes, and renders the result.
//!
//! # Modules
//!
//! - [`error`] - Error types
//! - [`range`] - Bit range arithmetic on a circular halftrack
//! - [`drive`] - The drive interface and an in-memory drive
//! - [`inspector`] - The inspector controller, dirty tracking, tables and highlights
//! - [`render`] - Text rendering
//! - [`config`] - User preferences
//! - [`runner`] - Refresh timer and snapshot watching
//!
//! # Example
//!
//! ```no_run
//! use gcrscope::drive::MemoryDrive;
//! use gcrscope::inspector::DiskInspector;
//! use gcrscope::render::{render_inspector, RenderOptions};
//! use gcrscope::Preferences;
//! use std::path::Path;
//!
//! fn inspect(path: &Path) -> gcrscope::Result<String> {
//!     let prefs = Preferences::default();
//!     let mut drive = MemoryDrive::load(path)?;
//!     let mut inspector = DiskInspector::new(&prefs);
//!
//!     inspector.refresh(&mut drive);
//!     inspector.select_error_row(&drive, 0)?;
//!
//!     Ok(render_inspector(&inspector, &drive, &RenderOptions::from_preferences(&prefs)))
//! }
//! ```

pub mod config;
pub mod drive;
pub mod error;
pub mod inspector;
pub mod range;
pub mod render;
pub mod runner;

// Re-export commonly used types
pub use config::Preferences;
pub use drive::{Drive, MemoryDrive};
pub use error::{InspectorError, Result, TableKind};
pub use inspector::DiskInspector;
pub use range::{wrap_range, BitRange, Bounds, RangePair};

/// The version of GcrScope.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the tool.
pub const NAME: &str = "GcrScope";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "GcrScope");
    }
}
