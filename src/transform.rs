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
use tracing::{debug, info, span, Level};

use crate::chart::{Chart, Note, Section};
use crate::error::{ChartError, TempoLocation};
use crate::swing::Direction;
use crate::tempo::{beat_to_ms_flat, TempoLog, TempoRegion};


/// Notes held for longer than this are treated as sustains.
pub const SUSTAIN_THRESHOLD_MS: f64 = 0.01;

fn check_bpm(bpm: f64, location: TempoLocation) -> Result<(), ChartError> {
    if bpm.is_finite() && bpm > 0.0 {
        Ok(())
    } else {
        Err(ChartError::InvalidTempo { location, bpm })
    }
}

/// Checks every tempo a pass would divide by: the base tempo and each declared tempo change.
pub fn validate(chart: &Chart) -> Result<(), ChartError> {
    check_bpm(chart.base_bpm(), TempoLocation::Base)?;
    for (index, section) in chart.song.sections.iter().enumerate() {
        if let Some(bpm) = section.declared_bpm() {
            check_bpm(bpm, TempoLocation::Section(index))?;
        }
    }
    Ok(())
}

/// Records the section's tempo change in the log if it declares one that differs from the active
/// tempo. Returns the new region if one was recorded.
fn observe_section(log: &mut TempoLog, index: usize, section: &Section) -> Option<TempoRegion> {
    let bpm = section.declared_bpm()?;
    let previous_bpm = log.active().bpm;
    if bpm == previous_bpm {
        return None;
    }

    let region = *log.record_change(bpm, index);
    info!(
        section = index,
        previous_bpm,
        bpm,
        previous_region_ms = region.region_duration_ms,
        "BPM change detected."
    );
    Some(region)
}

/// Builds the tempo log a full pass over the chart would end with, without touching any notes.
pub fn tempo_log(chart: &Chart) -> Result<TempoLog, ChartError> {
    validate(chart)?;

    let mut log = TempoLog::new(chart.base_bpm());
    for (index, section) in chart.song.sections.iter().enumerate() {
        observe_section(&mut log, index, section);
    }
    Ok(log)
}

/// Converts a single note against the tempo log as it stands.
///
/// When converting to swing, a sustain's length is shortened by however far its start was pushed
/// forward, measured at the active region's tempo, and never drops below zero. Converting from
/// swing leaves sustains alone.
pub fn convert_note(note: &mut Note, log: &TempoLog, direction: Direction) {
    let beat = log.ms_to_beat(note.time_ms);
    let warped_beat = direction.warp(beat);
    let new_ms = log.beat_to_ms(warped_beat);

    debug!(
        lane = note.lane,
        beat,
        warped_beat,
        old_ms = note.time_ms,
        new_ms,
        "Converted note."
    );
    note.time_ms = new_ms;

    if direction.adjusts_sustains() && note.sustain_ms > SUSTAIN_THRESHOLD_MS {
        let push_ms = beat_to_ms_flat(warped_beat - beat, log.active().bpm);
        note.sustain_ms = (note.sustain_ms - push_ms).max(0.0);
    }
}

/// Converts every note in the chart in the given direction and returns the converted copy. The
/// input chart is never modified, and nothing is returned unless the whole pass succeeds.
pub fn transform(chart: &Chart, direction: Direction) -> Result<Chart, ChartError> {
    let span = span!(Level::INFO, "transform");
    let _enter = span.enter();

    validate(chart)?;

    info!(
        song = chart.song.name.as_str(),
        %direction,
        bpm = chart.base_bpm(),
        notes = chart.note_count(),
        "Converting chart."
    );

    let mut converted = chart.clone();
    let mut log = TempoLog::new(chart.base_bpm());
    for (index, section) in converted.song.sections.iter_mut().enumerate() {
        observe_section(&mut log, index, section);
        for note in section.notes.iter_mut() {
            convert_note(note, &log, direction);
        }
    }

    info!(
        tempo_changes = log.region_count() - 1,
        "Chart conversion complete."
    );

    Ok(converted)
}
