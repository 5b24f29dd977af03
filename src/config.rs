//! Configuration management for agent-trace

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::codec::DEFAULT_MODEL;
use crate::error::{Result, TraceError};

/// Broad class of an IO failure, used to word error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskErrorKind {
    /// No space left, or quota hit
    DiskFull,
    PermissionDenied,
    /// Missing file or parent directory
    NotFound,
    Other,
}

impl DiskErrorKind {
    /// Short phrase appended after the failing operation
    pub fn user_message(&self) -> &'static str {
        match self {
            DiskErrorKind::DiskFull => "disk full or quota exceeded",
            DiskErrorKind::PermissionDenied => "permission denied",
            DiskErrorKind::NotFound => "file or directory not found",
            DiskErrorKind::Other => "I/O error",
        }
    }
}

/// Classify an IO error by kind, then by raw errno on Unix
pub fn categorize_io_error(e: &std::io::Error) -> DiskErrorKind {
    use std::io::ErrorKind;

    match e.kind() {
        ErrorKind::WriteZero => DiskErrorKind::DiskFull,
        ErrorKind::PermissionDenied => DiskErrorKind::PermissionDenied,
        ErrorKind::NotFound => DiskErrorKind::NotFound,

        _ => {
            #[cfg(unix)]
            {
                if let Some(os_error) = e.raw_os_error() {
                    // ENOSPC, EDQUOT (Linux), EDQUOT (macOS)
                    if os_error == 28 || os_error == 122 || os_error == 69 {
                        return DiskErrorKind::DiskFull;
                    }
                    // EACCES
                    if os_error == 13 {
                        return DiskErrorKind::PermissionDenied;
                    }
                }
            }
            DiskErrorKind::Other
        }
    }
}

/// `"<context>: <reason>"`, with the raw error text only for unclassified failures
pub fn friendly_io_error_message(e: &std::io::Error, context: &str) -> String {
    match categorize_io_error(e) {
        DiskErrorKind::Other => format!("{}: {}", context, e),
        kind => format!("{}: {}", context, kind.user_message()),
    }
}

/// Logger configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Trace file to append records to. `~` and `$VARS` are expanded.
    /// Records go to stdout when unset.
    #[serde(default)]
    pub log_file: Option<String>,

    /// Model used for stringification when a caller does not name one
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Filter for internal diagnostics (overridden by RUST_LOG)
    #[serde(default = "default_diagnostics_filter")]
    pub diagnostics_filter: String,

    /// Fixed request id seed for reproducible runs (wall clock when unset)
    #[serde(default)]
    pub request_seed: Option<i64>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_diagnostics_filter() -> String {
    "agent_trace=info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: None,
            default_model: default_model(),
            diagnostics_filter: default_diagnostics_filter(),
            request_seed: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific file, or return default if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            TraceError::Config(friendly_io_error_message(&e, "Failed to read config file"))
        })?;
        toml::from_str(&content)
            .map_err(|e| TraceError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TraceError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            TraceError::Config(friendly_io_error_message(&e, "Failed to write config file"))
        })
    }

    /// The configured trace file with `~` and environment variables expanded
    pub fn expanded_log_file(&self) -> Option<PathBuf> {
        self.log_file.as_deref().map(|raw| {
            let expanded = shellexpand::full(raw)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            PathBuf::from(expanded)
        })
    }
}

/// Get the base configuration directory (~/.agent-trace)
/// Falls back to ./.agent-trace if home directory cannot be determined
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine home directory, using current directory for config");
        PathBuf::from(".agent-trace")
    })
}

/// Try to get the base configuration directory, returning None if home dir is unavailable
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".agent-trace"))
}

/// Get the path to the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
