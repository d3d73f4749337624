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

//! Runner module for periodic refresh and live snapshot reloading.
//!
//! This module provides:
//! - A refresh timer that calls a tick function at a fixed period until it is
//!   explicitly canceled
//! - A file watcher that reports when a disk snapshot was rewritten

mod timer;
mod watcher;

pub use timer::{CancelHandle, RefreshTimer};
pub use watcher::SnapshotWatcher;
