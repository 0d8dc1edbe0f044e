//! Configuration loading, layering, and validation.
//!
//! Settings come from three layers, later layers winning key by key:
//!
//! ```text
//! stock defaults  →  taskol.toml  →  command-line flags
//! ```
//!
//! ## Config File
//!
//! ```toml
//! # All options are optional here, but target and link must end up set
//! # either in the file or on the command line.
//!
//! target = "D:/work"                # root holding the project folders
//! link = "D:/links"                 # flat directory receiving the shortcuts
//! format = ":tdate:_:pabb:_:tname:" # link name template
//! ignores = "!#@"                   # skip names starting with any of these
//! extension = "lnk"                 # link file extension
//!
//! [logging]
//! level = "info"                    # error | warn | info | debug | trace
//! file = "taskol.log"               # optional, plain-text log file
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::logging;
use crate::template::{LinkTemplate, TemplateError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

impl From<TemplateError> for ConfigError {
    fn from(err: TemplateError) -> Self {
        ConfigError::Validation(format!("format: {err} (--format)"))
    }
}

/// Name of the config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "taskol.toml";

/// Resolved settings for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaskolConfig {
    /// Root directory holding the project folders.
    pub target: String,
    /// Directory that receives the shortcuts.
    pub link: String,
    /// Link name template.
    pub format: String,
    /// Names starting with any of these characters are skipped.
    pub ignores: String,
    /// Link file extension, without the dot.
    pub extension: String,
    /// Log output settings.
    pub logging: LoggingConfig,
}

impl Default for TaskolConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            link: String::new(),
            format: ":tdate:_:pabb:_:tname:".to_string(),
            ignores: "!#@".to_string(),
            extension: "lnk".to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Console level.
    pub level: String,
    /// Optional log file. Written without ANSI colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl TaskolConfig {
    /// Check that a run can start. Nothing touches the filesystem before this passes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target.is_empty() {
            return Err(ConfigError::Validation(
                "target directory is not set (--target)".into(),
            ));
        }
        if self.link.is_empty() {
            return Err(ConfigError::Validation(
                "link directory is not set (--link)".into(),
            ));
        }
        LinkTemplate::parse(&self.format)?;
        let ext = self.link_extension();
        if ext.is_empty() || ext.contains(['/', '\\']) {
            return Err(ConfigError::Validation(format!(
                "extension must be a plain file extension, got {:?}",
                self.extension
            )));
        }
        if logging::parse_level(&self.logging.level).is_none() {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of error, warn, info, debug, trace; got {:?}",
                self.logging.level
            )));
        }
        Ok(())
    }

    /// The parsed link name template.
    pub fn template(&self) -> Result<LinkTemplate, ConfigError> {
        Ok(LinkTemplate::parse(&self.format)?)
    }

    /// Target root as a path.
    pub fn target_dir(&self) -> PathBuf {
        normalize_dir(&self.target)
    }

    /// Link directory as a path.
    pub fn link_dir(&self) -> PathBuf {
        normalize_dir(&self.link)
    }

    /// Extension with any leading dots removed.
    pub fn link_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}

/// Accept Windows-style separators in paths written on another machine.
fn normalize_dir(raw: &str) -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(raw)
    } else {
        PathBuf::from(raw.replace('\\', "/"))
    }
}

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub target: Option<String>,
    pub link: Option<String>,
    pub format: Option<String>,
    pub ignores: Option<String>,
    pub extension: Option<String>,
    pub log_level: Option<String>,
}

impl CliOverrides {
    /// The overrides as a sparse TOML table, ready for [`merge_toml`].
    pub fn to_value(&self) -> toml::Value {
        let mut table = toml::Table::new();
        let top = [
            ("target", &self.target),
            ("link", &self.link),
            ("format", &self.format),
            ("ignores", &self.ignores),
            ("extension", &self.extension),
        ];
        for (key, value) in top {
            if let Some(v) = value {
                table.insert(key.to_string(), toml::Value::String(v.clone()));
            }
        }
        if let Some(level) = &self.log_level {
            let mut logging = toml::Table::new();
            logging.insert("level".to_string(), toml::Value::String(level.clone()));
            table.insert("logging".to_string(), toml::Value::Table(logging));
        }
        toml::Value::Table(table)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(TaskolConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge the layers and deserialize, without validating.
///
/// `check` uses this to show what was resolved even when it is incomplete.
pub fn resolve_config(
    file: Option<toml::Value>,
    overrides: &CliOverrides,
) -> Result<TaskolConfig, ConfigError> {
    let mut merged = stock_defaults_value();
    if let Some(file) = file {
        merged = merge_toml(merged, file);
    }
    merged = merge_toml(merged, overrides.to_value());
    let config: TaskolConfig = merged.try_into()?;
    Ok(config)
}

/// Load, merge, and validate the configuration for a run.
pub fn load_config(path: &Path, overrides: &CliOverrides) -> Result<TaskolConfig, ConfigError> {
    let config = resolve_config(load_raw_config(path)?, overrides)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `taskol.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# taskol configuration
# ====================
# Values shown below are the defaults. Every key can also be given on the
# command line (--target, --link, --format, --ignores, --extension), and
# command-line values win over this file.
# Unknown keys will cause an error.

# Root directory holding the project folders. Required.
target = ""

# Directory receiving the shortcuts. Required.
# Every *.<extension> entry in it is deleted and recreated on each refresh.
link = ""

# Link name template. Placeholders:
#   :pabb:        project abbreviation
#   :pname:       project name
#   :tname:       task name
#   :tdate:       task date as YYYYMMDD
#   :tdate-:      task date as YYYY-MM-DD
#   :tdate年月日: task date as YYYY年MM月DD日
# Date placeholders are empty for tasks without a date in their name.
format = ":tdate:_:pabb:_:tname:"

# Folders and links whose name starts with any of these characters are skipped.
ignores = "!#@"

# Extension given to every link file.
extension = "lnk"

# ---------------------------------------------------------------------------
# Logging
# ---------------------------------------------------------------------------
[logging]
# Console level: error, warn, info, debug, trace. RUST_LOG overrides it.
level = "info"

# Also write logs to this file.
# file = "taskol.log"
"##
}
