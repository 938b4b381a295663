use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use crate::file_utils::FileManager;
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::language_utils::{get_language_name, normalize_language_tag};
use crate::tmx::HeaderDefaults;

/// Application configuration module
/// This module handles loading, validating and saving editor settings.
/// Nothing in the core requires a configuration file: every field has a
/// built-in default and the codec works without one.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Source language for new documents
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language for new documents
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Keep a `.bak` copy of the previous file on save
    #[serde(default = "default_true")]
    pub backup_on_save: bool,

    /// Undo steps kept per session (0 = unlimited)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Header attributes for files written without a preserved header
    #[serde(default)]
    pub writer: HeaderDefaults,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching `log` filter
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "th".to_string()
}

fn default_true() -> bool {
    true
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Config {
    /// Location of the per-user configuration file (`~/.tmxalign/config.json`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".tmxalign").join("config.json"))
    }

    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Load configuration if the file exists, defaults otherwise
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if FileManager::file_exists(&path) {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        FileManager::write_atomic(path, false, |file| file.write_all(json.as_bytes()))
            .with_context(|| format!("Failed to write config file: {:?}", path))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        for (label, code) in [("Source", &self.source_language), ("Target", &self.target_language)] {
            if code.trim().is_empty() {
                return Err(anyhow!("{} language must not be empty", label));
            }
            if normalize_language_tag(code) != *code {
                return Err(anyhow!(
                    "{} language '{}' must be lowercase without surrounding spaces",
                    label,
                    code
                ));
            }
            get_language_name(code)
                .with_context(|| format!("{} language '{}' is not a known ISO 639 code", label, code))?;
        }

        // Validate writer defaults
        let writer_fields = [
            ("creation_tool", &self.writer.creation_tool),
            ("creation_tool_version", &self.writer.creation_tool_version),
            ("o_tmf", &self.writer.o_tmf),
            ("segtype", &self.writer.segtype),
            ("adminlang", &self.writer.adminlang),
            ("datatype", &self.writer.datatype),
        ];
        if let Some((name, _)) = writer_fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(anyhow!("Writer setting '{}' must not be empty", name));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            backup_on_save: default_true(),
            history_limit: default_history_limit(),
            writer: HeaderDefaults::default(),
            log_level: LogLevel::default(),
        }
    }
}
