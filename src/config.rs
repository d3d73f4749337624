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

//! User preferences.
//!
//! Preferences are a plain value. They are loaded once at an explicit point,
//! handed by reference to whatever needs them and saved explicitly.
//! Out-of-range values are clamped on load.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{InspectorError, Result};

/// Inspector preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Preferences {
    /// Poll period of the refresh timer in milliseconds.
    pub refresh_interval_ms: u64,
    /// Keep the bit under the head highlighted.
    pub mark_head: bool,
    /// Bits per rendered bitstream line.
    pub bits_per_line: usize,
    /// Emit ANSI colors.
    pub color: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            refresh_interval_ms: Self::DEFAULT_REFRESH_MS,
            mark_head: false,
            bits_per_line: 64,
            color: true,
        }
    }
}

impl Preferences {
    pub const DEFAULT_REFRESH_MS: u64 = 100;
    pub const MIN_REFRESH_MS: u64 = 10;
    pub const MAX_REFRESH_MS: u64 = 10_000;
    pub const MIN_BITS_PER_LINE: usize = 8;
    pub const MAX_BITS_PER_LINE: usize = 512;

    /// The refresh period as a duration.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    /// Clamp all values into their valid ranges.
    ///
    /// A refresh interval of zero is rejected rather than clamped.
    pub fn normalized(mut self) -> Result<Self> {
        if self.refresh_interval_ms == 0 {
            return Err(InspectorError::Config(
                "refresh_interval_ms must be greater than zero".to_string(),
            ));
        }

        let interval = self
            .refresh_interval_ms
            .clamp(Self::MIN_REFRESH_MS, Self::MAX_REFRESH_MS);
        if interval != self.refresh_interval_ms {
            warn!(
                requested = self.refresh_interval_ms,
                applied = interval,
                "Refresh interval clamped"
            );
            self.refresh_interval_ms = interval;
        }

        let width = self
            .bits_per_line
            .clamp(Self::MIN_BITS_PER_LINE, Self::MAX_BITS_PER_LINE);
        if width != self.bits_per_line {
            warn!(
                requested = self.bits_per_line,
                applied = width,
                "Bits per line clamped"
            );
            self.bits_per_line = width;
        }

        Ok(self)
    }

    /// Parse preferences from JSON text. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str::<Self>(json)?.normalized()
    }

    /// Load preferences from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| InspectorError::io(path, e))?;
        let prefs = Self::from_json(&json)?;
        debug!(path = %path.display(), ?prefs, "Loaded preferences");
        Ok(prefs)
    }

    /// Load preferences from a file if one is given and exists, else use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                debug!(path = %path.display(), "No preferences file, using defaults");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Write preferences to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| InspectorError::io(path, e))?;
        debug!(path = %path.display(), "Saved preferences");
        Ok(())
    }
}
