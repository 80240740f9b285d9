use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable naming a settings file to load at startup.
pub const CONFIG_ENV: &str = "CASCADE_CONFIG";

const DEFAULT_ROOT: &str = "App";
const DEFAULT_ERROR_LABEL: &str = "ERROR: ";
const DEFAULT_HELP_FLAG: &str = "help";
const DEFAULT_NO_COLORS_FLAG: &str = "no-colors";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout is a terminal that supports it
    #[default]
    Auto,
    Always,
    Never,
}

/// How option values are attached to their names.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Grammar {
    /// Only `--name=value`; `--name value` is a flag followed by a positional.
    #[default]
    Joined,
    /// Also accepts `--name value`, consuming the next plain token as the value.
    Lookahead,
}

/// Framework settings, optionally loaded from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Identifier of the root command, also the namespace manual runs restart from
    #[serde(default = "default_root")]
    pub root: String,

    #[serde(default)]
    pub colors: ColorMode,

    #[serde(default)]
    pub grammar: Grammar,

    /// Prefix written before `bail` messages
    #[serde(default = "default_error_label")]
    pub error_label: String,

    #[serde(default = "default_help_flag")]
    pub help_flag: String,

    #[serde(default = "default_no_colors_flag")]
    pub no_colors_flag: String,
}

fn default_root() -> String {
    DEFAULT_ROOT.to_string()
}

fn default_error_label() -> String {
    DEFAULT_ERROR_LABEL.to_string()
}

fn default_help_flag() -> String {
    DEFAULT_HELP_FLAG.to_string()
}

fn default_no_colors_flag() -> String {
    DEFAULT_NO_COLORS_FLAG.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: default_root(),
            colors: ColorMode::default(),
            grammar: Grammar::default(),
            error_label: default_error_label(),
            help_flag: default_help_flag(),
            no_colors_flag: default_no_colors_flag(),
        }
    }
}

impl Settings {
    /// Load settings from the given file, or return defaults if it does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Load from the file named by `CASCADE_CONFIG`, falling back to defaults
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_colors(mut self, colors: ColorMode) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_grammar(mut self, grammar: Grammar) -> Self {
        self.grammar = grammar;
        self
    }

    pub fn with_error_label(mut self, label: impl Into<String>) -> Self {
        self.error_label = label.into();
        self
    }
}
