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

//! File watching for live snapshot reloads.
//!
//! An emulator (or a script) can keep rewriting a disk snapshot while the
//! inspector runs. [`SnapshotWatcher`] reports those rewrites so the
//! snapshot can be reloaded on the next refresh tick.
//!
//! Writers replace files in different ways: some truncate and write, most
//! write a temporary file and rename it over the original. The watcher
//! therefore watches the parent directory and filters events by file name.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::debug;

use crate::error::{InspectorError, Result};

/// Debounce window for file change events.
/// Multiple rapid changes within this window are collapsed into one.
const DEBOUNCE_DURATION: Duration = Duration::from_millis(100);

/// Watches one snapshot file for changes.
pub struct SnapshotWatcher {
    /// The underlying file system watcher.
    _watcher: RecommendedWatcher,
    /// Receiver for file system events.
    rx: Receiver<std::result::Result<Event, notify::Error>>,
    /// Canonical path of the watched file.
    path: PathBuf,
}

impl SnapshotWatcher {
    /// Start watching a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`InspectorError::Watch`] if the file cannot be resolved or
    /// its directory cannot be watched.
    pub fn new(path: &Path) -> Result<Self> {
        let (tx, rx) = mpsc::channel();

        let mut watcher = notify::recommended_watcher(tx)
            .map_err(|e| InspectorError::Watch(format!("Failed to create watcher: {}", e)))?;

        let canonical = path.canonicalize().map_err(|e| {
            InspectorError::Watch(format!("Cannot resolve path {}: {}", path.display(), e))
        })?;

        if let Some(parent) = canonical.parent() {
            watcher
                .watch(parent, RecursiveMode::NonRecursive)
                .map_err(|e| {
                    InspectorError::Watch(format!("Failed to watch {}: {}", parent.display(), e))
                })?;
        }

        debug!(path = %canonical.display(), "Watching snapshot");

        Ok(Self {
            _watcher: watcher,
            rx,
            path: canonical,
        })
    }

    /// The watched path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block until the snapshot file changes.
    pub fn wait_for_change(&self) -> Result<()> {
        loop {
            let event = self
                .rx
                .recv()
                .map_err(|e| InspectorError::Watch(format!("Watch channel closed: {}", e)))?
                .map_err(|e| InspectorError::Watch(format!("Watch error: {}", e)))?;

            if self.is_relevant_event(&event) {
                self.settle();
                return Ok(());
            }
        }
    }

    /// Check without blocking whether the snapshot file changed since the last call.
    pub fn poll_change(&self) -> Result<bool> {
        loop {
            match self.rx.try_recv() {
                Ok(Ok(event)) => {
                    if self.is_relevant_event(&event) {
                        self.settle();
                        return Ok(true);
                    }
                }
                Ok(Err(e)) => return Err(InspectorError::Watch(format!("Watch error: {}", e))),
                Err(TryRecvError::Empty) => return Ok(false),
                Err(TryRecvError::Disconnected) => {
                    return Err(InspectorError::Watch("Watch channel closed".to_string()))
                }
            }
        }
    }

    /// Wait for the writer to finish, then drop the events it caused.
    fn settle(&self) {
        std::thread::sleep(DEBOUNCE_DURATION);
        while self.rx.try_recv().is_ok() {
            // Discard event
        }
    }

    /// Check if an event touches the watched file.
    fn is_relevant_event(&self, event: &Event) -> bool {
        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) => {}
            _ => return false,
        }

        event.paths.iter().any(|event_path| {
            let canonical = event_path
                .canonicalize()
                .unwrap_or_else(|_| event_path.clone());
            if canonical == self.path {
                return true;
            }
            // Atomic saves may report the path before the rename settled
            canonical.file_name() == self.path.file_name()
                && canonical.parent() == self.path.parent()
        })
    }
}
