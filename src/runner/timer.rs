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

//! A periodic refresh timer with explicit cancellation.
//!
//! The inspector never schedules itself. A [`RefreshTimer`] owns the period
//! and calls a tick function from the thread that runs it; anyone holding a
//! [`CancelHandle`] can stop it from any thread.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::config::Preferences;

/// Longest single sleep, so cancellation is noticed promptly on long periods.
const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// A shared flag that stops a [`RefreshTimer`].
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the timer after the current tick.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Calls a tick function at a fixed period.
#[derive(Debug)]
pub struct RefreshTimer {
    period: Duration,
    handle: CancelHandle,
}

impl RefreshTimer {
    /// Create a timer with the given period.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: CancelHandle::new(),
        }
    }

    /// Create a timer with the configured refresh interval.
    pub fn from_preferences(prefs: &Preferences) -> Self {
        Self::new(prefs.refresh_interval())
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// A handle that cancels this timer.
    pub fn handle(&self) -> CancelHandle {
        self.handle.clone()
    }

    /// Run `tick` once per period until canceled or `tick` breaks.
    ///
    /// Blocks the calling thread. Returns the number of ticks run.
    pub fn run<F>(&self, mut tick: F) -> usize
    where
        F: FnMut() -> ControlFlow<()>,
    {
        debug!(period_ms = self.period.as_millis() as u64, "Refresh timer started");
        let mut ticks = 0;

        while !self.handle.is_cancelled() {
            let started = Instant::now();
            ticks += 1;
            trace!(tick = ticks, "Refresh tick");

            if tick().is_break() {
                break;
            }

            let deadline = started + self.period;
            loop {
                if self.handle.is_cancelled() {
                    break;
                }
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                thread::sleep((deadline - now).min(SLEEP_SLICE));
            }
        }

        debug!(ticks, "Refresh timer stopped");
        ticks
    }
}
