//! Console Configuration
//!
//! Line-editor, history and logging settings for the console. Every field
//! has a default, so a configuration file only needs the keys it changes.

use std::fs;
use std::path::Path;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use super::error::Result;

/// Characters that separate words for completion
pub const DEFAULT_WORD_BREAK_CHARACTERS: &str = " \t,%!;:=*~^'\"/?<>|[](){}";

/// Configuration for the console
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub max_history_size: usize,
    pub unique_history: bool,
    pub word_break_characters: String,
    pub completion_count_cutoff: usize,
    pub double_tab_completion: bool,
    pub complete_on_empty: bool,
    pub beep_on_ambiguous_completion: bool,
    pub no_color: bool,
    /// Printed by the `version` command
    pub version: String,
    /// One of off, error, warn, info, debug, trace
    pub log_level: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            max_history_size: 10_000,
            unique_history: true,
            word_break_characters: DEFAULT_WORD_BREAK_CHARACTERS.to_string(),
            completion_count_cutoff: 256,
            double_tab_completion: false,
            complete_on_empty: true,
            beep_on_ambiguous_completion: true,
            no_color: false,
            version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ConsoleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a configuration from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Get the log level as a filter, falling back to `Info`
    pub fn log_level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    /// Whether console output should carry color codes
    pub fn color_enabled(&self) -> bool {
        !self.no_color
    }

    /// Get configuration summary for display
    pub fn get_summary(&self) -> Vec<String> {
        vec![
            format!("Max History Size: {}", self.max_history_size),
            format!("Unique History: {}", self.unique_history),
            format!("Word Break Characters: {:?}", self.word_break_characters),
            format!("Completion Cutoff: {}", self.completion_count_cutoff),
            format!("Double Tab Completion: {}", self.double_tab_completion),
            format!("Complete On Empty: {}", self.complete_on_empty),
            format!("Beep On Ambiguous Completion: {}", self.beep_on_ambiguous_completion),
            format!("No Color: {}", self.no_color),
            format!("Log Level: {}", self.log_level),
        ]
    }
}
