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
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::debug;

mod error;

pub use self::error::ConfigError;

/// Prefix for environment variable overrides, e.g. SWINGCHART_OUTPUT_DIR.
pub const ENV_PREFIX: &str = "SWINGCHART";

/// Settings for converting charts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The directory converted charts are written to.
    pub output_dir: PathBuf,
    /// Input files whose name contains this are treated as already swung.
    pub swing_marker: String,
    /// The extension given to converted charts.
    pub extension: String,
    /// Whether to pretty print converted charts.
    pub pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            output_dir: PathBuf::from("."),
            swing_marker: "swing".to_string(),
            extension: "json".to_string(),
            pretty: false,
        }
    }
}

impl Settings {
    /// Loads settings from the defaults, then the given file (YAML, TOML, or JSON by extension),
    /// then SWINGCHART_* environment variables.
    pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::Missing(path.to_path_buf()));
            }
            builder = builder.add_source(File::from(path));
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize::<Settings>()?;
        debug!(?settings, "Loaded settings.");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_defaults() {
        let settings = Settings::load(None).expect("defaults should load");
        assert_eq!(Settings::default(), settings);
        assert_eq!(PathBuf::from("."), settings.output_dir);
        assert_eq!("swing", settings.swing_marker);
        assert_eq!("json", settings.extension);
        assert!(!settings.pretty);
    }

    #[test]
    #[serial]
    fn test_yaml_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("swingchart.yaml");
        fs::write(&path, "output_dir: charts/out\npretty: true\n").expect("write settings");

        let settings = Settings::load(Some(&path)).expect("settings should load");
        assert_eq!(PathBuf::from("charts/out"), settings.output_dir);
        assert!(settings.pretty);
        assert_eq!("swing", settings.swing_marker);
    }

    #[test]
    #[serial]
    fn test_toml_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("swingchart.toml");
        fs::write(&path, "swing_marker = \"jazz\"\nextension = \"chart\"\n").expect("write settings");

        let settings = Settings::load(Some(&path)).expect("settings should load");
        assert_eq!("jazz", settings.swing_marker);
        assert_eq!("chart", settings.extension);
    }

    #[test]
    #[serial]
    fn test_environment_override() {
        std::env::set_var("SWINGCHART_OUTPUT_DIR", "/tmp/swung");
        let settings = Settings::load(None);
        std::env::remove_var("SWINGCHART_OUTPUT_DIR");

        let settings = settings.expect("settings should load");
        assert_eq!(PathBuf::from("/tmp/swung"), settings.output_dir);
    }

    #[test]
    #[serial]
    fn test_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = Settings::load(Some(&dir.path().join("nope.yaml")));
        assert!(matches!(result, Err(ConfigError::Missing(_))));
    }

    #[test]
    #[serial]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("swingchart.yaml");
        fs::write(&path, "pretty: [1, 2\n").expect("write settings");

        let result = Settings::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
