// Prompt and color settings from the `[editor]` section

use super::theme::{self, Theme};
use crate::config::{Config, ConfigError};
use crate::session::CaptureKind;

/// Config section for prompts and colors
pub const SECTION: &str = "editor";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSettings {
    /// Prompt for top-level input
    pub ps1: String,
    /// Prompt inside functions, globals and unfinished statements
    pub ps2: String,
    pub theme: Theme,
}

impl EditorSettings {
    pub fn new(ps1: impl Into<String>, ps2: impl Into<String>, theme: Theme) -> Self {
        EditorSettings {
            ps1: ps1.into(),
            ps2: ps2.into(),
            theme,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let color = |key: &str| -> Result<_, ConfigError> {
            Ok(theme::color_by_name(&config.get_string(SECTION, key)?))
        };
        let theme = Theme {
            regular: color("reg_color")?,
            continuation: color("cont_color")?,
            function: color("fn_color")?,
            global: color("gl_color")?,
        };
        Ok(EditorSettings::new(
            config.get_string(SECTION, "ps1")?,
            config.get_string(SECTION, "ps2")?,
            theme,
        ))
    }

    pub fn primary_prompt(&self) -> String {
        theme::prompt(&self.ps1, self.theme.regular)
    }

    pub fn continuation_prompt(&self) -> String {
        theme::prompt(&self.ps2, self.theme.continuation)
    }

    pub fn capture_prompt(&self, kind: CaptureKind) -> String {
        let color = match kind {
            CaptureKind::Function => self.theme.function,
            CaptureKind::Global => self.theme.global,
        };
        theme::prompt(&self.ps2, color)
    }
}
