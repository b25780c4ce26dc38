// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::fmt;
use std::path::PathBuf;

/// Where an offending tempo was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempoLocation {
    /// The chart's base tempo.
    Base,
    /// A tempo change declared by the section at this index.
    Section(usize),
}

impl fmt::Display for TempoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TempoLocation::Base => write!(f, "base tempo"),
            TempoLocation::Section(index) => write!(f, "section {}", index),
        }
    }
}

/// Typed error for chart load and conversion failures. Any of these aborts the whole pass.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("Malformed chart document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid tempo at {location}: {bpm} BPM (must be a positive number)")]
    InvalidTempo { location: TempoLocation, bpm: f64 },

    #[error("Unable to access chart file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ChartError::InvalidTempo {
            location: TempoLocation::Section(4),
            bpm: 0.0,
        };
        assert_eq!(
            "Invalid tempo at section 4: 0 BPM (must be a positive number)",
            err.to_string()
        );

        let err = ChartError::InvalidTempo {
            location: TempoLocation::Base,
            bpm: -120.0,
        };
        assert_eq!(
            "Invalid tempo at base tempo: -120 BPM (must be a positive number)",
            err.to_string()
        );
    }
}
