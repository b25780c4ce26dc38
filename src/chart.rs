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
use std::path::Path;

use serde::de::Error as _;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::error::ChartError;

/// A JSON chart document. Only the timing fields are modeled; everything else is carried through
/// untouched.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Chart {
    /// The song and its sections.
    pub song: Song,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The song block of a chart.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Song {
    /// The name of the song.
    #[serde(rename = "song")]
    pub name: String,
    /// The base tempo, kept in the form it was written so it round-trips unchanged.
    pub bpm: Number,
    /// The sections of the chart, in play order.
    #[serde(rename = "notes")]
    pub sections: Vec<Section>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A section of the chart. Sections are four beats long and may change the tempo.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Section {
    /// The notes in this section.
    #[serde(rename = "sectionNotes")]
    pub notes: Vec<Note>,
    /// Whether this section changes the tempo.
    #[serde(rename = "changeBPM", default, skip_serializing_if = "Option::is_none")]
    pub change_bpm: Option<bool>,
    /// The tempo of this section, only meaningful if change_bpm is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Section {
    /// The BPM this section switches to, if it declares a change.
    pub fn declared_bpm(&self) -> Option<f64> {
        match self.change_bpm {
            Some(true) => self.bpm.as_ref().map(number_to_f64),
            _ => None,
        }
    }
}

/// Reads a chart number as a float. Numbers that have no float value read as NaN, which every
/// tempo check rejects.
fn number_to_f64(number: &Number) -> f64 {
    number.as_f64().unwrap_or(f64::NAN)
}

/// A single note, stored in the chart as `[time, lane, sustain, ...]`.
#[derive(Debug, Clone)]
pub struct Note {
    /// When the note is hit, in milliseconds from the start of the chart.
    pub time_ms: f64,
    /// The lane the note is in.
    pub lane: i64,
    /// How long the note is held, in milliseconds. Zero for tap notes.
    pub sustain_ms: f64,
    /// Trailing fields, passed through as-is.
    pub extra: Vec<Value>,
    /// The sustain as it was read. Written back in place of `sustain_ms` while the value is
    /// unchanged, so an untouched `0` stays `0`.
    sustain_read: Option<Number>,
}

impl Note {
    pub fn new(time_ms: f64, lane: i64, sustain_ms: f64) -> Note {
        Note {
            time_ms,
            lane,
            sustain_ms,
            extra: Vec::new(),
            sustain_read: None,
        }
    }
}

impl PartialEq for Note {
    fn eq(&self, other: &Self) -> bool {
        self.time_ms == other.time_ms
            && self.lane == other.lane
            && self.sustain_ms == other.sustain_ms
            && self.extra == other.extra
    }
}

impl<'de> Deserialize<'de> for Note {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields = Vec::<Value>::deserialize(deserializer)?;
        if fields.len() < 3 {
            return Err(D::Error::invalid_length(
                fields.len(),
                &"a note with time, lane, and sustain",
            ));
        }
        let extra = fields.split_off(3);

        let time_ms = fields[0]
            .as_f64()
            .ok_or_else(|| D::Error::custom(format!("note time is not a number: {}", fields[0])))?;
        let lane = fields[1]
            .as_i64()
            .or_else(|| {
                fields[1]
                    .as_f64()
                    .filter(|lane| lane.fract() == 0.0)
                    .map(|lane| lane as i64)
            })
            .ok_or_else(|| {
                D::Error::custom(format!("note lane is not an integer: {}", fields[1]))
            })?;
        let sustain_ms = fields[2].as_f64().ok_or_else(|| {
            D::Error::custom(format!("note sustain is not a number: {}", fields[2]))
        })?;

        let sustain_read = match &fields[2] {
            Value::Number(number) => Some(number.clone()),
            _ => None,
        };

        Ok(Note {
            time_ms,
            lane,
            sustain_ms,
            extra,
            sustain_read,
        })
    }
}

impl Serialize for Note {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(3 + self.extra.len()))?;
        seq.serialize_element(&self.time_ms)?;
        seq.serialize_element(&self.lane)?;
        match &self.sustain_read {
            Some(read) if read.as_f64() == Some(self.sustain_ms) => seq.serialize_element(read)?,
            _ => seq.serialize_element(&self.sustain_ms)?,
        }
        for value in &self.extra {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl Chart {
    /// Parses a chart from a JSON string.
    pub fn from_json(json: &str) -> Result<Chart, ChartError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a chart from a file.
    pub fn load(path: &Path) -> Result<Chart, ChartError> {
        let json = fs::read_to_string(path).map_err(|source| ChartError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Chart::from_json(&json)
    }

    /// Serializes the chart back to JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String, ChartError> {
        Ok(if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        })
    }

    /// The song name, lowercased. This is not necessarily the file name.
    pub fn song_name(&self) -> String {
        self.song.name.to_lowercase()
    }

    /// The base tempo of the chart.
    pub fn base_bpm(&self) -> f64 {
        number_to_f64(&self.song.bpm)
    }

    /// The total number of notes across all sections.
    pub fn note_count(&self) -> usize {
        self.song
            .sections
            .iter()
            .map(|section| section.notes.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART: &str = r#"{
        "song": {
            "song": "Bopeebo",
            "bpm": 100,
            "needsVoices": true,
            "speed": 1.5,
            "notes": [
                {
                    "lengthInSteps": 16,
                    "mustHitSection": false,
                    "sectionNotes": [[0, 1, 0], [600, 2, 300.5, "alt"]]
                },
                {
                    "lengthInSteps": 16,
                    "mustHitSection": true,
                    "changeBPM": true,
                    "bpm": 120,
                    "sectionNotes": []
                }
            ]
        },
        "generatedBy": "editor"
    }"#;

    #[test]
    fn test_parse() {
        let chart = Chart::from_json(CHART).expect("chart should parse");

        assert_eq!("Bopeebo", chart.song.name);
        assert_eq!("bopeebo", chart.song_name());
        assert_eq!(100.0, chart.base_bpm());
        assert_eq!(2, chart.song.sections.len());
        assert_eq!(2, chart.note_count());

        let first = &chart.song.sections[0];
        assert_eq!(None, first.declared_bpm());
        assert_eq!(Note::new(0.0, 1, 0.0), first.notes[0]);
        assert_eq!(600.0, first.notes[1].time_ms);
        assert_eq!(2, first.notes[1].lane);
        assert_eq!(300.5, first.notes[1].sustain_ms);
        assert_eq!(vec![Value::from("alt")], first.notes[1].extra);

        assert_eq!(Some(120.0), chart.song.sections[1].declared_bpm());
    }

    #[test]
    fn test_declared_bpm_requires_flag() {
        let section: Section =
            serde_json::from_str(r#"{"sectionNotes": [], "changeBPM": false, "bpm": 150}"#)
                .expect("section should parse");
        assert_eq!(None, section.declared_bpm());

        let section: Section = serde_json::from_str(r#"{"sectionNotes": [], "changeBPM": true}"#)
            .expect("section should parse");
        assert_eq!(None, section.declared_bpm());
    }

    #[test]
    fn test_fields_pass_through() {
        let chart = Chart::from_json(CHART).expect("chart should parse");
        let value: Value =
            serde_json::from_str(&chart.to_json(false).expect("chart should serialize"))
                .expect("output should be json");

        assert_eq!(Value::from("editor"), value["generatedBy"]);
        assert_eq!(Value::from(true), value["song"]["needsVoices"]);
        assert_eq!(Value::from(1.5), value["song"]["speed"]);
        assert_eq!(Value::from("Bopeebo"), value["song"]["song"]);

        let sections = value["song"]["notes"].as_array().expect("notes array");
        assert_eq!(Value::from(16), sections[0]["lengthInSteps"]);
        assert_eq!(Value::from(false), sections[0]["mustHitSection"]);
        assert!(sections[0].get("changeBPM").is_none());
        assert_eq!(Value::from(true), sections[1]["changeBPM"]);

        let note = sections[0]["sectionNotes"][1]
            .as_array()
            .expect("note array");
        assert_eq!(4, note.len());
        assert_eq!(Some(600.0), note[0].as_f64());
        assert_eq!(Some(2), note[1].as_i64());
        assert_eq!(Value::from("alt"), note[3]);
    }

    #[test]
    fn test_number_forms_and_key_order_survive() {
        let json = r#"{"song": {"song": "x", "bpm": 120, "zeta": 1, "alpha": 2, "notes": [
            {"sectionNotes": [[0, 1, 0], [250, 1, 0.0], [500, 2, 100]], "zeta": 1, "changeBPM": true, "bpm": 90, "alpha": 2}
        ]}, "zeta": 1, "alpha": 2}"#;
        let mut chart = Chart::from_json(json).expect("chart should parse");
        chart.song.sections[0].notes[2].sustain_ms = 62.5;
        let output = chart.to_json(false).expect("chart should serialize");

        assert!(output.contains(r#""bpm":120,"#), "{}", output);
        assert!(output.contains(r#""bpm":90"#), "{}", output);
        assert!(output.contains(r#"[0.0,1,0]"#), "{}", output);
        assert!(output.contains(r#"[250.0,1,0.0]"#), "{}", output);
        assert!(output.contains(r#"[500.0,2,62.5]"#), "{}", output);

        // Unmodeled keys keep the order they were read in at every level.
        let zetas: Vec<usize> = output.match_indices(r#""zeta""#).map(|(i, _)| i).collect();
        let alphas: Vec<usize> = output.match_indices(r#""alpha""#).map(|(i, _)| i).collect();
        assert_eq!(3, zetas.len());
        assert_eq!(3, alphas.len());
        for (zeta, alpha) in zetas.iter().zip(alphas.iter()) {
            assert!(zeta < alpha, "{}", output);
        }
    }

    #[test]
    fn test_float_lane() {
        let note: Note = serde_json::from_str("[10.5, 3.0, 0]").expect("note should parse");
        assert_eq!(3, note.lane);
    }

    #[test]
    fn test_malformed() {
        let cases = vec![
            r#"{}"#,
            r#"{"song": {"bpm": 120, "notes": []}}"#,
            r#"{"song": {"song": "x", "notes": []}}"#,
            r#"{"song": {"song": "x", "bpm": 120}}"#,
            r#"{"song": {"song": "x", "bpm": "fast", "notes": []}}"#,
            r#"{"song": {"song": "x", "bpm": 120, "notes": [{"lengthInSteps": 16}]}}"#,
            r#"{"song": {"song": "x", "bpm": 120, "notes": [{"sectionNotes": [[0, 1]]}]}}"#,
            r#"{"song": {"song": "x", "bpm": 120, "notes": [{"sectionNotes": [["a", 1, 0]]}]}}"#,
            r#"{"song": {"song": "x", "bpm": 120, "notes": [{"sectionNotes": [[0, 1.5, 0]]}]}}"#,
            r#"{"song": {"song": "x", "bpm": 120, "notes": [{"sectionNotes": [[0, 1, null]]}]}}"#,
            "not json",
        ];

        for case in cases {
            let result = Chart::from_json(case);
            assert!(
                matches!(result, Err(ChartError::Malformed(_))),
                "{} should be rejected as malformed",
                case
            );
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = Chart::load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(ChartError::Io { .. })));
    }
}
