//! Configuration settings for the puzzle models

use crate::investment::Portfolio;
use crate::music::ExtraClue;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file looked up when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "config/default.yaml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub solver: SolverConfig,
    pub music: MusicConfig,
    pub investment: Portfolio,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,
    pub log_to_console: bool,
    pub log_file: Option<PathBuf>,
    /// Absolute tolerance of the plan validator, scaled by the initial funds
    pub tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_console: true,
            log_file: Some(PathBuf::from("logfile.log")),
            tolerance: 1e-6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicConfig {
    pub check_uniqueness: bool,
    pub max_solutions: usize,
    pub extra_clues: Vec<ExtraClue>,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            check_uniqueness: false,
            max_solutions: 1,
            extra_clues: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Also write the JSON result here
    pub output_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Load `path`, or the default config file if present, or built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))
            }
            None => Ok(Self::default()),
        }
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.solver.log_level.trim().is_empty() {
            anyhow::bail!("Log level must not be empty");
        }

        if !self.solver.tolerance.is_finite() || self.solver.tolerance <= 0.0 {
            anyhow::bail!("Tolerance must be positive, got {}", self.solver.tolerance);
        }

        if self.music.max_solutions == 0 {
            anyhow::bail!("Maximum solutions must be positive");
        }

        self.investment
            .validate()
            .context("Invalid investment settings")?;

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(max_solutions) = cli_overrides.max_solutions {
            self.music.max_solutions = max_solutions;
        }
        if cli_overrides.check_uniqueness {
            self.music.check_uniqueness = true;
        }
        self.music
            .extra_clues
            .extend(cli_overrides.extra_clues.iter().copied());
        if let Some(ref log_file) = cli_overrides.log_file {
            self.solver.log_file = Some(log_file.clone());
        }
        if cli_overrides.quiet_solver {
            self.solver.log_to_console = false;
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
        if let Some(ref output_file) = cli_overrides.output_file {
            self.output.output_file = Some(output_file.clone());
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub max_solutions: Option<usize>,
    pub check_uniqueness: bool,
    pub extra_clues: Vec<ExtraClue>,
    pub log_file: Option<PathBuf>,
    pub quiet_solver: bool,
    pub format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::{Artist, Slice, Song};
    use tempfile::tempdir;

    #[test]
    fn test_defaults_validate() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.solver.log_file, Some(PathBuf::from("logfile.log")));
        assert_eq!(settings.investment.initial_funds, 14000.0);
        assert_eq!(settings.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_yaml_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.yaml");

        let mut settings = Settings::default();
        settings.music.extra_clues.push(ExtraClue::forbid(
            Slice::artist(Artist::ToniTravis).with_song(Song::SevenYears),
        ));
        settings.output.format = OutputFormat::Json;

        settings.to_file(&path).unwrap();
        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.yaml");
        std::fs::write(
            &path,
            concat!(
                "music:\n",
                "  check_uniqueness: true\n",
                "  extra_clues:\n",
                "    - kind: pin\n",
                "      slice: {song: Heaven, genre: Hip Hop}\n",
            ),
        )
        .unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert!(settings.music.check_uniqueness);
        assert_eq!(settings.music.max_solutions, 1);
        assert_eq!(settings.music.extra_clues.len(), 1);
        assert_eq!(settings.investment, Portfolio::default());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "investment:\n  years: 0\n").unwrap();
        assert!(Settings::from_file(&path).is_err());

        std::fs::write(&path, "solver:\n  tolerance: -1.0\n").unwrap();
        assert!(Settings::from_file(&path).is_err());

        assert!(Settings::from_file(&dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_merge_with_cli() {
        let mut settings = Settings::default();
        let overrides = CliOverrides {
            max_solutions: Some(3),
            check_uniqueness: true,
            extra_clues: vec![ExtraClue::pin(Slice::song(Song::Heaven))],
            log_file: Some(PathBuf::from("run.log")),
            quiet_solver: true,
            format: Some(OutputFormat::Json),
            output_file: None,
        };
        settings.merge_with_cli(&overrides);

        assert_eq!(settings.music.max_solutions, 3);
        assert!(settings.music.check_uniqueness);
        assert_eq!(settings.music.extra_clues.len(), 1);
        assert_eq!(settings.solver.log_file, Some(PathBuf::from("run.log")));
        assert!(!settings.solver.log_to_console);
        assert_eq!(settings.output.format, OutputFormat::Json);
        assert!(settings.output.output_file.is_none());
    }
}
