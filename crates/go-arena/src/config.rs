//! Configuration file loading for the Go arena.
//!
//! This module provides types and functions for loading and managing
//! arena configuration from TOML files.

use crate::gtp_client::{GameSettings, GtpClient};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Requested engine was not found in the configuration.
    #[error("Engine not found: {0}")]
    EngineNotFound(String),
    /// Requested preset was not found in the configuration.
    #[error("Preset not found: {0}")]
    PresetNotFound(String),
}

/// How to launch a GTP engine.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Program to run, looked up on `PATH` if not a path.
    pub command: PathBuf,
    /// Command-line arguments, e.g. `["--mode", "gtp"]`.
    #[serde(default)]
    pub args: Vec<String>,
}

impl EngineConfig {
    /// Creates a client for this engine. The process is not started.
    pub fn client(&self) -> GtpClient {
        GtpClient::new(&self.command, self.args.clone())
    }
}

/// Configuration for a match preset.
///
/// Every field is optional in the file; missing fields take the defaults
/// of a standard 19x19 game.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PresetConfig {
    pub board_size: u8,
    pub komi: f64,
    pub handicap: u8,
    pub main_time: u32,
    pub byo_yomi_time: u32,
    pub byo_yomi_stones: u32,
    /// Number of games to play in a match.
    pub games: u32,
    /// Validate moves and score games with the built-in rules engine.
    pub referee: bool,
    /// Stop a game after this many moves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_moves: Option<usize>,
}

impl Default for PresetConfig {
    fn default() -> Self {
        let settings = GameSettings::default();
        Self {
            board_size: settings.board_size,
            komi: settings.komi,
            handicap: settings.handicap,
            main_time: settings.main_time,
            byo_yomi_time: settings.byo_yomi_time,
            byo_yomi_stones: settings.byo_yomi_stones,
            games: 10,
            referee: true,
            max_moves: None,
        }
    }
}

impl PresetConfig {
    /// Returns the per-game settings sent to the engines.
    pub fn settings(&self) -> GameSettings {
        GameSettings {
            board_size: self.board_size,
            komi: self.komi,
            handicap: self.handicap,
            main_time: self.main_time,
            byo_yomi_time: self.byo_yomi_time,
            byo_yomi_stones: self.byo_yomi_stones,
        }
    }
}

/// Main arena configuration structure.
///
/// Uses `arena.toml` in the current directory by default.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct ArenaConfig {
    /// Map of engine names to how to launch them.
    #[serde(default)]
    pub engines: BTreeMap<String, EngineConfig>,
    /// Map of preset names to their configurations.
    #[serde(default)]
    pub presets: BTreeMap<String, PresetConfig>,
}

impl ArenaConfig {
    /// Loads the configuration from [`Self::config_path()`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::config_path())
    }

    /// Loads the configuration from `path`.
    ///
    /// A missing file yields the default empty configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn config_path() -> PathBuf {
        PathBuf::from("arena.toml")
    }

    /// Retrieves an engine configuration by name.
    pub fn get_engine(&self, name: &str) -> Result<&EngineConfig, ConfigError> {
        self.engines
            .get(name)
            .ok_or_else(|| ConfigError::EngineNotFound(name.to_string()))
    }

    /// Looks up `name` as a configured engine, falling back to treating it
    /// as a program path without arguments.
    pub fn resolve_engine(&self, name: &str) -> EngineConfig {
        self.get_engine(name).cloned().unwrap_or_else(|_| EngineConfig {
            command: PathBuf::from(name),
            args: Vec::new(),
        })
    }

    /// Retrieves a preset by name.
    pub fn get_preset(&self, name: &str) -> Result<&PresetConfig, ConfigError> {
        self.presets
            .get(name)
            .ok_or_else(|| ConfigError::PresetNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_valid_toml_config() {
        let toml_content = r#"
[engines.gnugo]
command = "gnugo"
args = ["--mode", "gtp", "--level", "1"]

[engines.random]
command = "./target/release/bot-random"

[presets.quick]
board_size = 9
komi = 7.0
games = 2
max_moves = 200

[presets.handicap]
handicap = 4
referee = false
"#;

        let config: ArenaConfig = toml::from_str(toml_content).unwrap();

        assert_eq!(config.engines.len(), 2);
        let gnugo = config.get_engine("gnugo").unwrap();
        assert_eq!(gnugo.command, PathBuf::from("gnugo"));
        assert_eq!(gnugo.args, vec!["--mode", "gtp", "--level", "1"]);
        assert!(config.get_engine("random").unwrap().args.is_empty());

        let quick = config.get_preset("quick").unwrap();
        assert_eq!(quick.board_size, 9);
        assert_eq!(quick.komi, 7.0);
        assert_eq!(quick.games, 2);
        assert_eq!(quick.max_moves, Some(200));
        assert!(quick.referee);

        let handicap = config.get_preset("handicap").unwrap();
        assert_eq!(handicap.handicap, 4);
        assert!(!handicap.referee);
        assert_eq!(handicap.board_size, 19);
    }

    #[test]
    fn test_preset_defaults() {
        let config: ArenaConfig = toml::from_str("[presets.minimal]").unwrap();
        let preset = config.get_preset("minimal").unwrap();
        assert_eq!(preset, &PresetConfig::default());
        assert_eq!(preset.games, 10);
        assert_eq!(preset.max_moves, None);
        assert_eq!(preset.settings(), GameSettings::default());
    }

    #[test]
    fn test_empty_config_defaults() {
        let config: ArenaConfig = toml::from_str("").unwrap();
        assert!(config.engines.is_empty());
        assert!(config.presets.is_empty());
    }

    #[test]
    fn test_lookup_errors() {
        let config = ArenaConfig::default();
        match config.get_engine("nonexistent") {
            Err(ConfigError::EngineNotFound(name)) => assert_eq!(name, "nonexistent"),
            other => panic!("Expected EngineNotFound, got {:?}", other),
        }
        assert!(matches!(
            config.get_preset("blitz"),
            Err(ConfigError::PresetNotFound(_))
        ));
    }

    #[test]
    fn test_unknown_engine_resolves_to_path() {
        let config = ArenaConfig::default();
        let engine = config.resolve_engine("/usr/games/gnugo");
        assert_eq!(engine.command, PathBuf::from("/usr/games/gnugo"));
        assert!(engine.args.is_empty());
        assert_eq!(engine.client().program(), Path::new("/usr/games/gnugo"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engines.leela]\ncommand = \"leelaz\"\nargs = [\"--gtp\"]").unwrap();

        let config = ArenaConfig::load_from(file.path()).unwrap();
        assert_eq!(config.get_engine("leela").unwrap().args, vec!["--gtp"]);
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ArenaConfig::load_from(dir.path().join("arena.toml")).unwrap();
        assert!(config.engines.is_empty());
    }

    #[test]
    fn test_load_from_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engines.broken\ncommand = ").unwrap();
        assert!(matches!(
            ArenaConfig::load_from(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_config_path_returns_expected_path() {
        assert_eq!(ArenaConfig::config_path(), PathBuf::from("arena.toml"));
    }

    #[test]
    fn test_preset_serialization_roundtrip() {
        let preset = PresetConfig {
            board_size: 13,
            handicap: 2,
            max_moves: Some(300),
            ..PresetConfig::default()
        };
        let serialized = toml::to_string(&preset).unwrap();
        let deserialized: PresetConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized, preset);
    }
}
