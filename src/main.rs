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

//! GcrScope CLI
//!
//! Inspects the GCR bitstream of a 1541 halftrack stored in a disk snapshot.

use clap::Parser;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use gcrscope::drive::MemoryDrive;
use gcrscope::inspector::DiskInspector;
use gcrscope::render::{render_inspector, RenderOptions};
use gcrscope::runner::{RefreshTimer, SnapshotWatcher};
use gcrscope::{InspectorError, Preferences};

/// GcrScope - An inspector for 1541 GCR halftrack bitstreams
#[derive(Parser, Debug)]
#[command(name = "gcrscope")]
#[command(version)]
#[command(about = "An inspector for 1541 GCR halftrack bitstreams")]
#[command(long_about = r#"
GcrScope shows the raw GCR bitstream of a 1541 floppy halftrack together
with the sectors and read errors found on it. Selecting a sector block or
an error highlights its bits, even when it wraps around the end of the track.

Example usage:
  gcrscope disk.json --track 18
  gcrscope disk.json --halftrack 35 --sector-row 1
  gcrscope disk.json --error-row 2 --no-color

Edit a bit and save the result:
  gcrscope disk.json --head 1200 --flip-bit -o patched.json

Watch mode (reload whenever the snapshot is rewritten):
  gcrscope disk.json --watch
"#)]
struct Cli {
    /// Disk snapshot to inspect (.json)
    snapshot: PathBuf,

    /// Move the head to a track (1-42)
    #[arg(short, long, allow_negative_numbers = true, conflicts_with = "halftrack")]
    track: Option<i64>,

    /// Move the head to a halftrack (1-84)
    #[arg(long, allow_negative_numbers = true)]
    halftrack: Option<i64>,

    /// Move the head to a bit offset within the halftrack
    #[arg(long, allow_negative_numbers = true)]
    head: Option<i64>,

    /// Highlight a row of the sector table (even rows: header, odd rows: data)
    #[arg(short, long, conflicts_with = "error_row")]
    sector_row: Option<usize>,

    /// Highlight a row of the error table (row 0 is the summary)
    #[arg(short, long)]
    error_row: Option<usize>,

    /// Highlight the bit under the head
    #[arg(short, long)]
    mark_head: bool,

    /// Invert the bit under the head
    #[arg(long)]
    flip_bit: bool,

    /// Write the (possibly modified) snapshot to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Reload and redraw whenever the snapshot file changes
    #[arg(short, long)]
    watch: bool,

    /// Preferences file (.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "gcrscope=debug"
    } else {
        "gcrscope=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn exit_code(error: &InspectorError) -> ExitCode {
    match error {
        InspectorError::Io { .. } => ExitCode::from(3),
        _ => ExitCode::from(1),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut prefs = match Preferences::load_or_default(cli.config.as_deref()) {
        Ok(prefs) => prefs,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_code(&e);
        }
    };
    if cli.no_color {
        prefs.color = false;
    }
    if cli.mark_head {
        prefs.mark_head = true;
    }

    if cli.verbose {
        println!("GcrScope v{}", gcrscope::VERSION);
        println!("Snapshot: {}", cli.snapshot.display());
        println!("Refresh interval: {} ms", prefs.refresh_interval_ms);
        println!();
    }

    let mut drive = match MemoryDrive::load(&cli.snapshot) {
        Ok(drive) => drive,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_code(&e);
        }
    };

    let mut inspector = DiskInspector::new(&prefs);
    inspector.refresh(&mut drive);

    if let Err(e) = apply_actions(&cli, &mut inspector, &mut drive) {
        eprintln!("Error: {}", e);
        return exit_code(&e);
    }

    if let Some(path) = &cli.output {
        if let Err(e) = drive.save(path) {
            eprintln!("Error: {}", e);
            return exit_code(&e);
        }
        if cli.verbose {
            println!("Wrote {}", path.display());
        }
    }

    let opts = RenderOptions::from_preferences(&prefs);
    print!("{}", render_inspector(&inspector, &drive, &opts));

    if cli.watch {
        return run_watch_loop(&cli, &prefs, inspector, drive);
    }

    ExitCode::SUCCESS
}

/// Apply the head movement, edit and selection options in order.
fn apply_actions(
    cli: &Cli,
    inspector: &mut DiskInspector,
    drive: &mut MemoryDrive,
) -> gcrscope::Result<()> {
    if let Some(track) = cli.track {
        inspector.set_track(drive, track);
    }
    if let Some(halftrack) = cli.halftrack {
        inspector.set_halftrack(drive, halftrack);
    }
    if cli.head.is_some() || cli.flip_bit {
        inspector.ensure_editable()?;
    }
    if let Some(head) = cli.head {
        inspector.set_head(drive, head);
    }
    if cli.flip_bit {
        inspector.toggle_value(drive);
    }
    if let Some(row) = cli.sector_row {
        inspector.select_sector_row(drive, row)?;
    }
    if let Some(row) = cli.error_row {
        inspector.select_error_row(drive, row)?;
    }
    Ok(())
}

/// Poll the snapshot file and redraw whenever something visible changed.
fn run_watch_loop(
    cli: &Cli,
    prefs: &Preferences,
    mut inspector: DiskInspector,
    mut drive: MemoryDrive,
) -> ExitCode {
    let watcher = match SnapshotWatcher::new(&cli.snapshot) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error: Failed to create file watcher: {}", e);
            return ExitCode::from(6);
        }
    };

    let opts = RenderOptions::from_preferences(prefs);
    let timer = RefreshTimer::from_preferences(prefs);
    inspector.bind_timer(timer.handle());

    println!();
    println!("Watching for changes... (Press Ctrl+C to stop)");

    let mut failed = false;
    timer.run(|| {
        match watcher.poll_change() {
            Ok(true) => match MemoryDrive::load(&cli.snapshot) {
                Ok(fresh) => {
                    drive = fresh;
                    inspector.invalidate_track_data();
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    println!("Fix the snapshot and save to retry.");
                    return ControlFlow::Continue(());
                }
            },
            Ok(false) => {}
            Err(e) => {
                eprintln!("Watch error: {}", e);
                failed = true;
                return ControlFlow::Break(());
            }
        }

        if inspector.refresh(&mut drive).any() {
            println!();
            print!("{}", render_inspector(&inspector, &drive, &opts));
        }
        ControlFlow::Continue(())
    });

    inspector.cancel();

    if failed {
        ExitCode::from(6)
    } else {
        ExitCode::SUCCESS
    }
}
