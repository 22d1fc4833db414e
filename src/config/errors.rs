//! Configuration error types
//!
//! Every variant carries the argument that caused it so the top level can
//! print a single `Error: ...` line and exit.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the config file or looking up options
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be opened
    #[error("Config File Not Found: {}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file is not valid INI
    #[error("Config File Cannot Be Correctly Parsed: {} ({reason})", path.display())]
    Parse { path: PathBuf, reason: String },

    /// A section lookup or switch named a section that does not exist
    #[error("Section Not Found: {0}")]
    SectionNotFound(String),

    /// An override argument did not split into exactly one key and one value
    #[error("Mismatched arguments: {0}")]
    OverrideArityMismatch(String),

    /// The option exists neither in the overrides nor in the section
    #[error("Option Not Found: {0}")]
    OptionNotFound(String),

    /// The requested split mode is not one of the known modes
    #[error("Cannot parse using mode: {0:#04x}")]
    UnsupportedSplitMode(u8),

    /// An override argument could not be read as text
    #[error("Unsupported type for overrides: {0}")]
    UnsupportedOverrideType(String),

    /// Writing the config back to disk failed
    #[error("Config File Cannot Be Written: {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    /// Whether this error only means "the key is absent"
    pub fn is_missing_option(&self) -> bool {
        matches!(self, ConfigError::OptionNotFound(_))
    }
}
