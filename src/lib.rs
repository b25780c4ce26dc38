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
//! Converts rhythm game charts between straight and swing timing.
//!
//! Note times are converted to beats against the chart's tempo log, the fractional part of each
//! beat is warped into (or out of) a 2:1 swing feel, and the result is converted back to
//! milliseconds.
pub mod chart;
pub mod config;
pub mod error;
pub mod output;
pub mod swing;
pub mod tempo;
pub mod transform;
pub mod util;

pub use chart::{Chart, Note, Section, Song};
pub use error::ChartError;
pub use swing::Direction;
pub use tempo::{TempoLog, TempoRegion};
pub use transform::transform;
