//! Configuration management for the puzzle solver

pub mod settings;

pub use settings::{
    CliOverrides, MusicConfig, OutputConfig, OutputFormat, Settings, SolverConfig,
    DEFAULT_CONFIG_PATH,
};
