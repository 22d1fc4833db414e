//! Configuration store
//!
//! An INI file split into sections, plus a map of command-line overrides
//! that win over the file for the same key:
//! - [`ini`]: reading and writing the INI dialect
//! - [`errors`]: [`ConfigError`] and its message templates
//!
//! # Lookup order
//!
//! ```text
//! override (bare or `--` key) → [section] → [DEFAULT] → OptionNotFound
//! ```
//!
//! Values come back as a [`ConfigValue`], shaped by the [`SplitMode`] the
//! caller asks for.

pub mod errors;
pub mod ini;

pub use errors::ConfigError;

use ini::{IniDocument, Section, DEFAULT_SECTION};
use rustc_hash::FxHashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// How a raw option value is turned into a [`ConfigValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// The value as written
    Single,
    /// Comma separated list
    Comma,
    /// Colon separated list
    Colon,
    /// Space separated list
    Space,
}

impl SplitMode {
    pub const SINGLE_FLAG: u8 = 0x01;
    pub const COMMA_FLAG: u8 = 0x02;
    pub const COLON_FLAG: u8 = 0x04;
    pub const SPACE_FLAG: u8 = 0x08;

    fn separator(self) -> Option<char> {
        match self {
            SplitMode::Single => None,
            SplitMode::Comma => Some(','),
            SplitMode::Colon => Some(':'),
            SplitMode::Space => Some(' '),
        }
    }
}

impl TryFrom<u8> for SplitMode {
    type Error = ConfigError;

    /// Decode the legacy bit flags; the lowest recognised bit wins
    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        if bits & SplitMode::SINGLE_FLAG != 0 {
            Ok(SplitMode::Single)
        } else if bits & SplitMode::COMMA_FLAG != 0 {
            Ok(SplitMode::Comma)
        } else if bits & SplitMode::COLON_FLAG != 0 {
            Ok(SplitMode::Colon)
        } else if bits & SplitMode::SPACE_FLAG != 0 {
            Ok(SplitMode::Space)
        } else {
            Err(ConfigError::UnsupportedSplitMode(bits))
        }
    }
}

/// An option value after splitting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Single(String),
    List(Vec<String>),
}

impl ConfigValue {
    fn from_raw(raw: &str, mode: SplitMode) -> Self {
        match mode.separator() {
            None => ConfigValue::Single(raw.to_string()),
            Some(sep) => ConfigValue::List(
                raw.split(sep)
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
        }
    }

    /// The value as one string; lists are joined with single spaces
    pub fn into_string(self) -> String {
        match self {
            ConfigValue::Single(s) => s,
            ConfigValue::List(items) => items.join(" "),
        }
    }

    /// The value as a list; a single value becomes a one-element list
    pub fn into_list(self) -> Vec<String> {
        match self {
            ConfigValue::Single(s) => vec![s],
            ConfigValue::List(items) => items,
        }
    }
}

/// Config file contents, current section and overrides
#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    document: IniDocument,
    section: Option<String>,
    overrides: FxHashMap<String, String>,
}

impl Config {
    /// Load a config file. The current section is `section`, or the first
    /// section of the file when none is given.
    pub fn open(path: impl AsRef<Path>, section: Option<&str>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::FileNotFound {
            path: path.clone(),
            source,
        })?;
        let mut config = Config::parse(path, &text)?;
        if let Some(name) = section {
            config.change_section(name)?;
        }
        debug!(path = %config.path.display(), section = ?config.section, "loaded config");
        Ok(config)
    }

    /// Build a config from INI text; `path` is only used for messages and saving
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<Self, ConfigError> {
        let path = path.into();
        let document = IniDocument::parse(text).map_err(|reason| ConfigError::Parse {
            path: path.clone(),
            reason,
        })?;
        let section = document.sections.first().map(|s| s.name.clone());
        Ok(Config {
            path,
            document,
            section,
            overrides: FxHashMap::default(),
        })
    }

    /// Create (or truncate) a config file holding one empty section
    pub fn create(path: impl AsRef<Path>, section: &str) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        fs::write(path, format!("[{}]\n", section)).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Config::open(path, Some(section))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the section used by [`Config::get_option`]
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.document.sections.iter().map(|s| s.name.as_str())
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.document.section(name).is_some()
    }

    /// Switch the current section
    pub fn change_section(&mut self, name: &str) -> Result<(), ConfigError> {
        if !self.has_section(name) {
            return Err(ConfigError::SectionNotFound(name.to_string()));
        }
        self.section = Some(name.to_string());
        Ok(())
    }

    /// Replace the overrides with `--key=value` / `key=value` arguments.
    ///
    /// Each argument must split into exactly one key and one value.
    pub fn set_overrides<I, S>(&mut self, args: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = FxHashMap::default();
        for arg in args {
            let arg = arg.as_ref();
            let mut parts = arg.split('=');
            let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(ConfigError::OverrideArityMismatch(arg.to_string()));
            };
            let key = key.strip_prefix("--").unwrap_or(key);
            overrides.insert(key.to_lowercase(), value.to_string());
        }
        self.overrides = overrides;
        Ok(())
    }

    /// Look up `key` in `section`, honoring overrides
    pub fn get(&self, section: &str, key: &str, mode: SplitMode) -> Result<ConfigValue, ConfigError> {
        let key = key.to_lowercase();
        if let Some(value) = self.overrides.get(&key) {
            return Ok(ConfigValue::from_raw(value, mode));
        }

        let found = self
            .document
            .section(section)
            .ok_or_else(|| ConfigError::SectionNotFound(section.to_string()))?;
        let raw = found
            .get(&key)
            .or_else(|| self.document.defaults.get(&key))
            .ok_or(ConfigError::OptionNotFound(key))?;
        Ok(ConfigValue::from_raw(raw.as_deref().unwrap_or(""), mode))
    }

    /// Look up `key` in the current section
    pub fn get_option(&self, key: &str, mode: SplitMode) -> Result<ConfigValue, ConfigError> {
        let section = self.current_section()?;
        self.get(section, key, mode)
    }

    /// Look up `key` in the current section using legacy mode bits.
    /// A missing key is reported before a bad mode.
    pub fn get_option_bits(&self, key: &str, mode: u8) -> Result<ConfigValue, ConfigError> {
        let raw = self.get_option(key, SplitMode::Single)?.into_string();
        let mode = SplitMode::try_from(mode)?;
        Ok(ConfigValue::from_raw(&raw, mode))
    }

    /// Shorthand for a single string value from `section`
    pub fn get_string(&self, section: &str, key: &str) -> Result<String, ConfigError> {
        self.get(section, key, SplitMode::Single).map(ConfigValue::into_string)
    }

    /// Shorthand for a list value from `section`
    pub fn get_list(&self, section: &str, key: &str, mode: SplitMode) -> Result<Vec<String>, ConfigError> {
        self.get(section, key, mode).map(ConfigValue::into_list)
    }

    /// Every option of `section` (or the current one), without overrides
    pub fn get_all_options(&self, section: Option<&str>) -> Result<Vec<(String, String)>, ConfigError> {
        let name = match section {
            Some(name) => name,
            None => self.current_section()?,
        };
        let found = self
            .document
            .section(name)
            .ok_or_else(|| ConfigError::SectionNotFound(name.to_string()))?;
        Ok(merged_entries(&self.document.defaults, found))
    }

    /// Change a value in `section` (or the current one)
    pub fn set_option(
        &mut self,
        key: &str,
        value: impl ToString,
        section: Option<&str>,
    ) -> Result<(), ConfigError> {
        let name = match section {
            Some(name) => name.to_string(),
            None => self.current_section()?.to_string(),
        };
        let target = self
            .document
            .section_mut(&name)
            .ok_or(ConfigError::SectionNotFound(name))?;
        target.set(key.to_lowercase(), Some(value.to_string()));
        Ok(())
    }

    /// Write the config back to the file it was loaded from
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&self.path)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.document.to_ini_string()).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Help text listing every option that can be overridden from the command line
    pub fn overrides_help(&self) -> String {
        let first_is_empty = self.document.sections.first().map_or(true, Section::is_empty);
        if first_is_empty {
            return String::new();
        }

        let mut out = String::from("config file overrides:\n");
        for section in &self.document.sections {
            for (key, value) in merged_entries(&self.document.defaults, section) {
                out.push_str(&format!("  --{} = {}\n", key, value));
            }
        }
        out
    }

    fn current_section(&self) -> Result<&str, ConfigError> {
        self.section
            .as_deref()
            .ok_or_else(|| ConfigError::SectionNotFound(DEFAULT_SECTION.to_string()))
    }
}

/// Resolve a `$NAME` value from the environment, falling back to `fallback`
/// when the variable is unset. Other values are returned unchanged.
pub fn resolve_env(value: &str, fallback: &str) -> String {
    let Some(name) = value.strip_prefix('$') else {
        return value.to_string();
    };
    match std::env::var(name) {
        Ok(resolved) if !resolved.is_empty() => resolved,
        _ => {
            warn!(variable = name, fallback, "environment variable not set, using fallback");
            fallback.to_string()
        }
    }
}

/// Section entries with `[DEFAULT]` entries filled in for missing keys
fn merged_entries(defaults: &Section, section: &Section) -> Vec<(String, String)> {
    let mut entries: Vec<(String, String)> = section
        .entries
        .iter()
        .map(|(k, v)| (k.clone(), v.clone().unwrap_or_default()))
        .collect();
    for (key, value) in &defaults.entries {
        if section.get(key).is_none() {
            entries.push((key.clone(), value.clone().unwrap_or_default()));
        }
    }
    entries
}
