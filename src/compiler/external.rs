// External helper programs: syntax highlighter, static analyzer, editor

use super::{exit_code, ToolError};
use crate::config::{resolve_env, Config, ConfigError};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use tracing::{info, warn};

/// Config section holding the helper command templates
pub const SECTION: &str = "external";

/// Token in a command template that is replaced with the output file path
pub const FILE_PLACEHOLDER: &str = "{file}";

/// Editor used when `external_editor` names an unset variable
pub const FALLBACK_EDITOR: &str = "nano";

/// A command line split on whitespace. There is no quoting, so no single
/// argument can contain a space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    name: &'static str,
    tokens: Vec<String>,
}

impl CommandTemplate {
    /// `name` identifies the template in error messages
    pub fn parse(name: &'static str, template: &str) -> Self {
        CommandTemplate {
            name,
            tokens: template.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn program(&self) -> Result<&str, ToolError> {
        self.tokens
            .first()
            .map(String::as_str)
            .ok_or(ToolError::EmptyCommand(self.name))
    }

    /// The arguments, with every [`FILE_PLACEHOLDER`] replaced by `file`
    pub fn args(&self, file: Option<&Path>) -> Vec<String> {
        let file = file.map(|p| p.display().to_string());
        self.tokens
            .iter()
            .skip(1)
            .map(|token| match &file {
                Some(path) => token.replace(FILE_PLACEHOLDER, path),
                None => token.clone(),
            })
            .collect()
    }

    /// A ready-to-spawn [`Command`]
    pub fn command(&self, file: Option<&Path>) -> Result<Command, ToolError> {
        let mut command = Command::new(self.program()?);
        command.args(self.args(file));
        Ok(command)
    }
}

/// Captured result of a helper program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub status: i32,
    pub text: String,
}

/// Highlighter, analyzer and editor commands
#[derive(Debug, Clone)]
pub struct ExternalTools {
    highlighter: CommandTemplate,
    analyzer: CommandTemplate,
    editor: String,
}

impl ExternalTools {
    pub fn new(highlighter: &str, analyzer: &str, editor: impl Into<String>) -> Self {
        ExternalTools {
            highlighter: CommandTemplate::parse("highlighter", highlighter),
            analyzer: CommandTemplate::parse("analyzer", analyzer),
            editor: editor.into(),
        }
    }

    /// Read `[external]` templates and the optional `[editor] external_editor`
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let highlighter = config.get_string(SECTION, "highlighter")?;
        let analyzer = config.get_string(SECTION, "analyzer")?;
        let editor = match config.get_string(crate::repl::settings::SECTION, "external_editor") {
            Ok(value) => value,
            Err(e) if e.is_missing_option() => "$EDITOR".to_string(),
            Err(e) => return Err(e),
        };
        Ok(ExternalTools::new(
            &highlighter,
            &analyzer,
            resolve_env(&editor, FALLBACK_EDITOR),
        ))
    }

    pub fn editor(&self) -> &str {
        &self.editor
    }

    /// Pipe `source` through the highlighter and collect what it prints
    pub fn review(&self, source: &str) -> Result<ToolOutput, ToolError> {
        let program = self.highlighter.program()?.to_string();
        info!(program = %program, "running highlighter");

        let mut child = self
            .highlighter
            .command(None)?
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| ToolError::Spawn {
                program: program.clone(),
                source,
            })?;

        // Feed stdin from another thread so a large render cannot fill both pipes
        let writer = child.stdin.take().map(|mut stdin| {
            let source = source.to_string();
            thread::spawn(move || stdin.write_all(source.as_bytes()))
        });

        let output = child.wait_with_output().map_err(|source| ToolError::Pipe {
            program: program.clone(),
            source,
        })?;

        if let Some(handle) = writer {
            match handle.join() {
                Ok(Err(e)) => warn!(program = %program, error = %e, "highlighter closed stdin early"),
                Err(_) => warn!(program = %program, "stdin writer panicked"),
                Ok(Ok(())) => {}
            }
        }

        Ok(ToolOutput {
            status: exit_code(output.status),
            text: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }

    /// Run the analyzer on `path`, collecting stdout followed by stderr
    pub fn static_check(&self, path: &Path) -> Result<ToolOutput, ToolError> {
        let program = self.analyzer.program()?.to_string();
        info!(program = %program, file = %path.display(), "running static analyzer");

        let output = self
            .analyzer
            .command(Some(path))?
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ToolError::Spawn { program, source })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(ToolOutput {
            status: exit_code(output.status),
            text,
        })
    }

    /// Open `path` in the external editor and wait for it to exit
    pub fn edit(&self, path: &Path) -> Result<i32, ToolError> {
        let template = CommandTemplate::parse("editor", &self.editor);
        let program = template.program()?.to_string();
        info!(program = %program, file = %path.display(), "opening editor");

        let status = template
            .command(None)?
            .arg(path)
            .status()
            .map_err(|source| ToolError::Spawn { program, source })?;
        Ok(exit_code(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_template_splits_on_whitespace() {
        let template = CommandTemplate::parse("analyzer", "cppcheck   --enable=all\t{file}");
        assert_eq!(template.program().unwrap(), "cppcheck");
        assert_eq!(
            template.args(Some(&PathBuf::from("out.c"))),
            vec!["--enable=all", "out.c"]
        );
    }

    #[test]
    fn test_placeholder_inside_token() {
        let template = CommandTemplate::parse("analyzer", "lint --file={file}");
        assert_eq!(template.args(Some(Path::new("a.c"))), vec!["--file=a.c"]);
        assert_eq!(template.args(None), vec!["--file={file}"]);
    }

    #[test]
    fn test_empty_template() {
        let template = CommandTemplate::parse("highlighter", "   ");
        assert!(matches!(template.program(), Err(ToolError::EmptyCommand("highlighter"))));
    }

    #[cfg(unix)]
    #[test]
    fn test_review_pipes_source_through_highlighter() {
        let tools = ExternalTools::new("cat", "true", "true");
        let output = tools.review("int main() {}\n").unwrap();
        assert_eq!(output.status, 0);
        assert_eq!(output.text, "int main() {}\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_static_check_substitutes_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.c");
        std::fs::write(&path, "int x;\n").unwrap();

        let tools = ExternalTools::new("cat", "cat {file}", "true");
        let output = tools.static_check(&path).unwrap();
        assert_eq!(output.status, 0);
        assert_eq!(output.text, "int x;\n");
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let tools = ExternalTools::new("definitely-not-a-real-highlighter-xyz", "true", "true");
        assert!(matches!(tools.review(""), Err(ToolError::Spawn { .. })));
    }
}
