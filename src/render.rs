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

//! Text rendering of the inspector state.
//!
//! The bitstream is printed in fixed-width lines prefixed with the offset of
//! their first bit. Highlighted bits are colored with ANSI escapes, or
//! underlined on a second line when colors are off:
//!
//! ```text
//!    0 | 0000111100001111
//!      |   ~~~~^
//! ```
//!
//! `~` marks the selected sector block or error, `^` the bit under the head.

use std::fmt::Write;

use crate::config::Preferences;
use crate::drive::Drive;
use crate::inspector::{CellStyle, DiskInspector, HighlightSet, Marking, TableModel};

const RESET: &str = "\x1b[0m";
const SECTOR: &str = "\x1b[34m";
const HEAD: &str = "\x1b[41m";
const SECTOR_AND_HEAD: &str = "\x1b[34;41m";
const ALERT: &str = "\x1b[31m";

/// Layout options for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub bits_per_line: usize,
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_preferences(&Preferences::default())
    }
}

impl RenderOptions {
    pub fn from_preferences(prefs: &Preferences) -> Self {
        Self {
            bits_per_line: prefs.bits_per_line,
            color: prefs.color,
        }
    }
}

fn escape(marking: Marking) -> &'static str {
    match (marking.sector, marking.head) {
        (true, true) => SECTOR_AND_HEAD,
        (false, true) => HEAD,
        (true, false) => SECTOR,
        (false, false) => "",
    }
}

fn underline(marking: Marking) -> char {
    if marking.head {
        '^'
    } else if marking.sector {
        '~'
    } else {
        ' '
    }
}

/// Render a bitstream with its highlighted ranges.
pub fn render_bitstream(bits: &str, highlights: &HighlightSet, opts: &RenderOptions) -> String {
    let width = opts.bits_per_line.max(1);
    let bits: Vec<char> = bits.chars().collect();
    let label_width = bits.len().saturating_sub(1).to_string().len().max(4);
    let mut out = String::new();

    for (line, chunk) in bits.chunks(width).enumerate() {
        let start = line * width;
        let _ = write!(out, "{:>w$} | ", start, w = label_width);

        if opts.color {
            let mut current = Marking::default();
            for (i, &bit) in chunk.iter().enumerate() {
                let marking = highlights.marking(start + i);
                if marking != current {
                    if !current.is_plain() {
                        out.push_str(RESET);
                    }
                    out.push_str(escape(marking));
                    current = marking;
                }
                out.push(bit);
            }
            if !current.is_plain() {
                out.push_str(RESET);
            }
            out.push('\n');
        } else {
            out.extend(chunk.iter());
            out.push('\n');

            let marks: String = (start..start + chunk.len())
                .map(|offset| underline(highlights.marking(offset)))
                .collect();
            if !marks.trim().is_empty() {
                let _ = writeln!(out, "{:>w$} | {}", "", marks.trim_end(), w = label_width);
            }
        }
    }

    out
}

/// Render a table model as aligned text columns.
pub fn render_table(table: &dyn TableModel, color: bool) -> String {
    let columns = table.columns();
    let cells: Vec<Vec<String>> = (0..table.row_count())
        .map(|row| {
            columns
                .iter()
                .map(|column| table.value_at(row, column).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_row = |values: &[String]| -> String {
        let line = values
            .iter()
            .zip(&widths)
            .map(|(value, &w)| format!("{:<w$}", value, w = w))
            .collect::<Vec<_>>()
            .join("  ");
        line.trim_end().to_string()
    };

    let header: Vec<String> = columns.iter().map(|c| c.to_uppercase()).collect();
    let mut out = format_row(&header);
    out.push('\n');

    for (row, values) in cells.iter().enumerate() {
        let line = format_row(values);
        if color && table.row_style(row) == CellStyle::Alert {
            let _ = writeln!(out, "{}{}{}", ALERT, line, RESET);
        } else {
            let _ = writeln!(out, "{}", line);
        }
    }

    out
}

/// Render the complete inspector: drive status, bitstream and both tables.
pub fn render_inspector(
    inspector: &DiskInspector,
    drive: &dyn Drive,
    opts: &RenderOptions,
) -> String {
    let view = inspector.view();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Disk: {}",
        if view.has_disk { "inserted" } else { "none" }
    );
    let _ = writeln!(
        out,
        "Track {} (halftrack {})",
        view.track_position, view.halftrack
    );
    match (view.head, view.value) {
        (Some(head), Some(value)) => {
            let _ = writeln!(out, "Head: {}  Value: {}", head, value);
        }
        _ => out.push_str("Head: -  Value: -\n"),
    }
    out.push('\n');

    let _ = writeln!(out, "{}", view.title);
    out.push_str(&render_bitstream(
        &view.bitstream,
        inspector.highlights(),
        opts,
    ));
    out.push('\n');

    out.push_str("Sectors:\n");
    let sectors = inspector.sector_table(drive);
    if sectors.row_count() == 0 {
        out.push_str("(no sectors found)\n");
    } else {
        out.push_str(&render_table(&sectors, opts.color));
    }
    out.push('\n');

    out.push_str("Errors:\n");
    let errors = inspector.error_table(drive);
    if errors.row_count() == 0 {
        out.push_str("(no disk)\n");
    } else {
        out.push_str(&render_table(&errors, opts.color));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plain(width: usize) -> RenderOptions {
        RenderOptions {
            bits_per_line: width,
            color: false,
        }
    }

    #[test]
    fn test_plain_lines() {
        let out = render_bitstream("0000111100001111", &HighlightSet::new(), &plain(8));
        assert_eq!(out, "   0 | 00001111\n   8 | 00001111\n");
    }

    #[test]
    fn test_plain_underline() {
        let mut highlights = HighlightSet::new();
        highlights.set_sector_markers(2, 6, 16);
        highlights.set_head(6);

        let out = render_bitstream("0000111100001111", &highlights, &plain(16));
        assert_eq!(out, "   0 | 0000111100001111\n     |   ~~~~^\n");
    }

    #[test]
    fn test_wrapped_underline() {
        let mut highlights = HighlightSet::new();
        highlights.set_sector_markers(14, 1, 16);

        let out = render_bitstream("0000111100001111", &highlights, &plain(8));
        assert_eq!(
            out,
            "   0 | 00001111\n     | ~~\n   8 | 00001111\n     |       ~~\n"
        );
    }

    #[test]
    fn test_colored_runs() {
        let mut highlights = HighlightSet::new();
        highlights.set_sector_markers(1, 3, 4);
        let opts = RenderOptions {
            bits_per_line: 8,
            color: true,
        };

        let out = render_bitstream("0110", &highlights, &opts);
        assert_eq!(out, "   0 | 0\x1b[34m11\x1b[0m0\n");
    }

    #[test]
    fn test_empty_bitstream() {
        assert_eq!(render_bitstream("", &HighlightSet::new(), &plain(8)), "");
    }
}
