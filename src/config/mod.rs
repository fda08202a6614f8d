// LogSift - GPL-3.0-or-later
// This file is part of LogSift.
//
// Copyright (C) 2026 Daniel Freiermuth
//
// LogSift is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// LogSift is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with LogSift.  If not, see <https://www.gnu.org/licenses/>.

use crate::error::{Error, Result};
use crate::parser::{ParseOptions, Vendor};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_NOISE_THRESHOLD: f64 = 5.0;

/// Analyzer defaults stored in the config directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Rows per table; `None` uses the vendor default
    pub top: Option<usize>,

    /// Minimum share (percent) for a group to be reported as noise
    pub noise_threshold: f64,

    /// Year assumed for syslog timestamps; `None` uses the current year
    pub year: Option<i32>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            top: None,
            noise_threshold: DEFAULT_NOISE_THRESHOLD,
            year: None,
        }
    }
}

impl AnalyzerConfig {
    /// Get the path to the user config file
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("logsift").join("config.json"))
    }

    /// Load the user config, returning defaults if there is none.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(_) | None => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load a config file that must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::info!("Loading config from {}", path.display());
        let config_error = |message: String| Error::Config {
            path: path.to_path_buf(),
            message,
        };

        let contents = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let config: Self =
            serde_json::from_str(&contents).map_err(|e| config_error(e.to_string()))?;

        if config.top == Some(0) {
            return Err(config_error("top must be at least 1".to_string()));
        }
        Ok(config)
    }

    #[must_use]
    pub fn top_for(&self, vendor: Vendor) -> usize {
        self.top.unwrap_or_else(|| vendor.default_top())
    }

    #[must_use]
    pub fn parse_options(&self) -> ParseOptions {
        self.year
            .map_or_else(ParseOptions::default, |year| ParseOptions { year })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config(r#"{ "top": 3 }"#);
        let config = AnalyzerConfig::load_from(file.path()).expect("valid config");
        assert_eq!(config.top, Some(3));
        assert!((config.noise_threshold - DEFAULT_NOISE_THRESHOLD).abs() < f64::EPSILON);
        assert_eq!(config.year, None);
        assert_eq!(config.top_for(Vendor::UniFi), 3);
    }

    #[test]
    fn test_vendor_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.top_for(Vendor::PaloAlto), 5);
        assert_eq!(config.top_for(Vendor::Meraki), 10);
    }

    #[test]
    fn test_year_feeds_parse_options() {
        let file = write_config(r#"{ "year": 2024, "noise_threshold": 2.5 }"#);
        let config = AnalyzerConfig::load_from(file.path()).expect("valid config");
        assert_eq!(config.parse_options().year, 2024);
        assert!((config.noise_threshold - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_files_are_config_errors() {
        for contents in ["{ not json", r#"{ "top": 0 }"#, r#"{ "colour": "red" }"#] {
            let file = write_config(contents);
            assert!(
                matches!(AnalyzerConfig::load_from(file.path()), Err(Error::Config { .. })),
                "{contents}"
            );
        }
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = AnalyzerConfig::load_from(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
