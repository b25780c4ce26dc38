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

/// Every section spans four beats (sixteen steps at four steps per beat).
pub const BEATS_PER_SECTION: f64 = 4.0;

/// Length of a single beat in seconds at the given BPM.
fn seconds_per_beat(bpm: f64) -> f64 {
    60.0 / bpm
}

/// Converts milliseconds to beats for a chart with a single tempo.
pub fn ms_to_beat_flat(ms: f64, bpm: f64) -> f64 {
    let seconds = ms / 1000.0;
    seconds / seconds_per_beat(bpm)
}

/// Converts beats to milliseconds for a chart with a single tempo.
pub fn beat_to_ms_flat(beat: f64, bpm: f64) -> f64 {
    let seconds = beat * seconds_per_beat(bpm);
    seconds * 1000.0
}

/// A region of constant tempo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoRegion {
    /// The BPM in effect for this region.
    pub bpm: f64,
    /// How long the region before this one lasted, in milliseconds.
    pub region_duration_ms: f64,
    /// The section at which this BPM took effect.
    pub start_index: usize,
}

/// An append-only log of the tempo regions seen so far in a pass.
///
/// The log always holds the base region, so the active region is the last change recorded or,
/// before any change, the base tempo. With no changes recorded the log-aware conversions reduce
/// exactly to [`ms_to_beat_flat`] and [`beat_to_ms_flat`].
#[derive(Debug, Clone, PartialEq)]
pub struct TempoLog {
    base: TempoRegion,
    changes: Vec<TempoRegion>,
}

impl TempoLog {
    /// Creates a log holding only the base tempo.
    pub fn new(base_bpm: f64) -> TempoLog {
        TempoLog {
            base: TempoRegion {
                bpm: base_bpm,
                region_duration_ms: 0.0,
                start_index: 0,
            },
            changes: Vec::new(),
        }
    }

    /// The base tempo of the chart.
    pub fn base_bpm(&self) -> f64 {
        self.base.bpm
    }

    /// The region currently in effect.
    pub fn active(&self) -> &TempoRegion {
        self.changes.last().unwrap_or(&self.base)
    }

    /// Whether any tempo change has been recorded. Once true, stays true.
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// All regions in the order they took effect, starting with the base region.
    pub fn regions(&self) -> impl Iterator<Item = &TempoRegion> {
        std::iter::once(&self.base).chain(self.changes.iter())
    }

    /// Number of regions, including the base region.
    pub fn region_count(&self) -> usize {
        self.changes.len() + 1
    }

    /// Records a tempo change at the given section.
    ///
    /// The caller is responsible for only calling this when `new_bpm` differs from the active BPM.
    /// The duration of the region being closed assumes four beats per section at that region's
    /// tempo.
    pub fn record_change(&mut self, new_bpm: f64, section_index: usize) -> &TempoRegion {
        let previous = *self.active();
        let sections_elapsed = section_index.saturating_sub(previous.start_index) as f64;
        let region_duration_ms =
            sections_elapsed * seconds_per_beat(previous.bpm) * BEATS_PER_SECTION * 1000.0;

        self.changes.push(TempoRegion {
            bpm: new_bpm,
            region_duration_ms,
            start_index: section_index,
        });
        self.active()
    }

    /// Total milliseconds elapsed before the active region began.
    pub fn cumulative_offset_ms(&self) -> f64 {
        self.regions().map(|region| region.region_duration_ms).sum()
    }

    /// Total beats elapsed before the active region began.
    pub fn beats_before(&self) -> f64 {
        self.active().start_index as f64 * BEATS_PER_SECTION
    }

    /// Start time of every region in milliseconds, paired with the region.
    pub fn region_start_times(&self) -> Vec<(f64, TempoRegion)> {
        let mut elapsed = 0.0;
        self.regions()
            .map(|region| {
                elapsed += region.region_duration_ms;
                (elapsed, *region)
            })
            .collect()
    }

    /// Converts an absolute time in milliseconds to a cumulative beat count, measured against the
    /// active region.
    pub fn ms_to_beat(&self, ms: f64) -> f64 {
        let seconds_since_region_start = (ms - self.cumulative_offset_ms()) / 1000.0;
        self.beats_before() + seconds_since_region_start / seconds_per_beat(self.active().bpm)
    }

    /// Converts a cumulative beat count to an absolute time in milliseconds, measured against the
    /// active region.
    pub fn beat_to_ms(&self, beat: f64) -> f64 {
        let local_beat = beat - self.beats_before();
        let seconds = local_beat * seconds_per_beat(self.active().bpm);
        seconds * 1000.0 + self.cumulative_offset_ms()
    }
}
