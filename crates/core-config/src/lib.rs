//! Configuration loading and parsing.
//!
//! Reads `vedit.toml` (or an override path provided by the binary). Every
//! field has a default, so a missing file, a missing section or a file that
//! fails to parse all yield a usable configuration. Unknown fields are
//! ignored.
//!
//! ```toml
//! [editing]
//! tab_width = 4
//! auto_indent = true
//! page_lines = 20
//!
//! [history]
//! max_depth = 200
//! ```
//!
//! Out of range values are clamped when the settings are derived, with an
//! `info` event on the `config` target.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "vedit.toml";

/// Upper bound for `tab_width`.
pub const TAB_WIDTH_MAX: u16 = 16;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EditingConfig {
    #[serde(default = "EditingConfig::default_tab_width")]
    pub tab_width: u16,
    #[serde(default = "EditingConfig::default_auto_indent")]
    pub auto_indent: bool,
    #[serde(default = "EditingConfig::default_page_lines")]
    pub page_lines: u16,
}

impl Default for EditingConfig {
    fn default() -> Self {
        Self {
            tab_width: Self::default_tab_width(),
            auto_indent: Self::default_auto_indent(),
            page_lines: Self::default_page_lines(),
        }
    }
}

impl EditingConfig {
    const fn default_tab_width() -> u16 {
        4
    }
    const fn default_auto_indent() -> bool {
        true
    }
    const fn default_page_lines() -> u16 {
        20
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// 0 keeps every command.
    #[serde(default = "HistoryConfig::default_max_depth")]
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: Self::default_max_depth(),
        }
    }
}

impl HistoryConfig {
    const fn default_max_depth() -> usize {
        200
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub editing: EditingConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub source: Option<PathBuf>, // file the values came from, if any
    pub raw: Option<String>,     // original file string (optional)
    pub file: ConfigFile,        // parsed (or default) data
}

/// Settings the key dispatcher consumes, already clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditSettings {
    pub tab_width: usize,
    pub auto_indent: bool,
    pub page_lines: usize,
    pub history_depth: usize,
}

impl Default for EditSettings {
    fn default() -> Self {
        Config::default().edit_settings()
    }
}

impl EditSettings {
    /// The spaces inserted for one Tab key.
    pub fn tab_text(&self) -> String {
        " ".repeat(self.tab_width)
    }
}

/// Best-effort config path: working directory first, then the platform
/// config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("vedit").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_missing_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                source: Some(path),
                raw: Some(content),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Derive dispatcher settings, clamping values outside their valid range.
    pub fn edit_settings(&self) -> EditSettings {
        let editing = &self.file.editing;
        let tab_width = editing.tab_width.clamp(1, TAB_WIDTH_MAX);
        if tab_width != editing.tab_width {
            info!(target: "config", raw = editing.tab_width, clamped = tab_width, max = TAB_WIDTH_MAX, "tab_width_clamped");
        }
        let page_lines = editing.page_lines.max(1);
        if page_lines != editing.page_lines {
            info!(target: "config", raw = editing.page_lines, clamped = page_lines, "page_lines_clamped");
        }
        EditSettings {
            tab_width: usize::from(tab_width),
            auto_indent: editing.auto_indent,
            page_lines: usize::from(page_lines),
            history_depth: self.file.history.max_depth,
        }
    }
}
