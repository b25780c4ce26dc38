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
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::chart::Chart;
use crate::config::Settings;
use crate::error::ChartError;
use crate::swing::Direction;

/// The suffix appended to the song name of a converted chart.
pub fn suffix(direction: Direction) -> &'static str {
    match direction {
        Direction::ToSwing => "-swing",
        Direction::FromSwing => "-non-swing",
    }
}

/// Reduces a song name to something usable as a single file name component. Path separators
/// become dashes and leading dots are dropped, so the name can never leave the output directory.
fn file_stem(song_name: &str) -> String {
    let stem: String = song_name
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '-',
            c => c,
        })
        .collect();
    let stem = stem.trim_start_matches('.');
    if stem.is_empty() {
        "chart".to_string()
    } else {
        stem.to_string()
    }
}

/// The file name of a converted chart: the lowercased song name, a direction suffix, and the
/// extension.
pub fn output_file_name(song_name: &str, direction: Direction, extension: &str) -> String {
    format!(
        "{}{}.{}",
        file_stem(song_name),
        suffix(direction),
        extension.trim_start_matches('.')
    )
}

/// Where a converted chart is written when no explicit output path is given.
pub fn default_output_path(chart: &Chart, direction: Direction, settings: &Settings) -> PathBuf {
    settings.output_dir.join(output_file_name(
        &chart.song_name(),
        direction,
        &settings.extension,
    ))
}

/// Serializes and writes the chart to the given path, creating parent directories as needed.
pub fn save(chart: &Chart, path: &Path, pretty: bool) -> Result<(), ChartError> {
    let json = chart.to_json(pretty)?;
    let io_error = |source| ChartError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, json).map_err(io_error)?;

    info!(path = %path.display(), "Saved chart.");
    Ok(())
}
