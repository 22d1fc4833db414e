//! Compiler adapter
//!
//! Writes the rendered source to the configured output file, runs the
//! build command on it and, when the build succeeds, runs the binary:
//! - [`external`]: the other helper programs (highlighter, analyzer, editor)
//! - [`errors`]: [`ToolError`]
//!
//! Every program is spawned and waited on before returning. Statuses are
//! plain integers; only failing to start or talk to a program is an error.

pub mod errors;
pub mod external;

pub use errors::ToolError;
pub use external::{CommandTemplate, ExternalTools, ToolOutput};

use crate::config::{Config, ConfigError, SplitMode};
use crate::render::SourceRenderer;
use crate::session::SessionBuffer;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tracing::info;

/// Config section for the compiler settings
pub const SECTION: &str = "compiler";

/// Values read from the `[compiler]` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerSettings {
    /// Full build command line
    pub command: String,
    /// Binary produced by the build command
    pub binary: PathBuf,
    /// Where the rendered source is written
    pub output: PathBuf,
    /// Header names for the `#include` block
    pub includes: Vec<String>,
    /// Language standard, shown in the banner only
    pub std: String,
    /// Warning flags, shown in the banner only
    pub warnings: String,
}

impl CompilerSettings {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(CompilerSettings {
            std: config.get_string(SECTION, "std")?,
            warnings: config.get_string(SECTION, "warnings")?,
            command: config.get_string(SECTION, "command")?,
            includes: config.get_list(SECTION, "includes", SplitMode::Comma)?,
            output: PathBuf::from(config.get_string(SECTION, "output")?),
            binary: PathBuf::from(config.get_string(SECTION, "binary")?),
        })
    }
}

/// Renders, builds and runs
#[derive(Debug, Clone)]
pub struct Compiler {
    settings: CompilerSettings,
    build: CommandTemplate,
    renderer: SourceRenderer,
}

impl Compiler {
    pub fn new(settings: CompilerSettings) -> Self {
        Compiler {
            build: CommandTemplate::parse("build", &settings.command),
            renderer: SourceRenderer::new(&settings.includes),
            settings,
        }
    }

    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    pub fn output_path(&self) -> &Path {
        &self.settings.output
    }

    pub fn render(&self, session: &SessionBuffer) -> String {
        self.renderer.render(session)
    }

    /// Render `session` and replace the output file with it
    pub fn write_source(&self, session: &SessionBuffer) -> Result<&Path, ToolError> {
        let path = self.output_path();
        fs::write(path, self.render(session)).map_err(|source| ToolError::WriteSource {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(path)
    }

    /// Run the build command, returning its status
    pub fn build(&self) -> Result<i32, ToolError> {
        let program = self.build.program()?.to_string();
        info!(command = ?self.build.tokens(), "building");
        let status = self
            .build
            .command(None)?
            .stdin(Stdio::null())
            .status()
            .map_err(|source| ToolError::Spawn { program, source })?;
        let code = exit_code(status);
        info!(status = code, "build finished");
        Ok(code)
    }

    /// Run the built binary, returning its status
    pub fn run(&self) -> Result<i32, ToolError> {
        let binary = &self.settings.binary;
        info!(binary = %binary.display(), "running");
        let status = std::process::Command::new(binary)
            .status()
            .map_err(|source| ToolError::Spawn {
                program: binary.display().to_string(),
                source,
            })?;
        let code = exit_code(status);
        info!(status = code, "binary exited");
        Ok(code)
    }

    /// Build the last written source and run it if the build succeeded.
    ///
    /// Returns the build status when it is non-zero, otherwise the
    /// binary's status.
    pub fn compile(&self) -> Result<i32, ToolError> {
        match self.build()? {
            0 => self.run(),
            failed => Ok(failed),
        }
    }

    /// Write `session` to disk, then build and run it
    pub fn compile_session(&self, session: &SessionBuffer) -> Result<i32, ToolError> {
        self.write_source(session)?;
        self.compile()
    }
}

/// Integer status of a finished process. A process killed by a signal
/// reports 128 plus the signal number, the way shells do.
pub(crate) fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(dir: &Path, command: &str, binary: &str) -> CompilerSettings {
        CompilerSettings {
            command: command.to_string(),
            binary: PathBuf::from(binary),
            output: dir.join("main.c"),
            includes: vec!["stdio.h".to_string()],
            std: "c99".to_string(),
            warnings: "-Wall".to_string(),
        }
    }

    #[test]
    fn test_settings_from_config() {
        let config = Config::parse(
            "config.cfg",
            "[compiler]\ncommand = gcc main.c -o main\nbinary = ./main\noutput = main.c\n\
             includes = stdio.h, string.h\nstd = c99\nwarnings = -Wall\n",
        )
        .unwrap();
        let settings = CompilerSettings::from_config(&config).unwrap();
        assert_eq!(settings.includes, vec!["stdio.h", "string.h"]);
        assert_eq!(settings.binary, PathBuf::from("./main"));
        assert_eq!(settings.output, PathBuf::from("main.c"));
    }

    #[test]
    fn test_settings_missing_key() {
        let config = Config::parse("config.cfg", "[compiler]\ncommand = gcc\n").unwrap();
        assert!(CompilerSettings::from_config(&config).is_err());
    }

    #[test]
    fn test_write_source_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = Compiler::new(settings(dir.path(), "true", "true"));
        let mut session = SessionBuffer::new();
        session.append_statement("int a_rather_long_statement_name = 1;");
        compiler.write_source(&session).unwrap();
        session.undo();
        let path = compiler.write_source(&session).unwrap();

        let written = fs::read_to_string(path).unwrap();
        assert_eq!(written, compiler.render(&session));
        assert!(!written.contains("a_rather_long_statement_name"));
    }

    #[cfg(unix)]
    #[test]
    fn test_compile_returns_run_status() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Compiler::new(settings(dir.path(), "true", "true")).compile().unwrap(), 0);
        assert_eq!(Compiler::new(settings(dir.path(), "true", "false")).compile().unwrap(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_build_skips_run() {
        let dir = tempfile::tempdir().unwrap();
        // the binary does not exist, so reaching run() would be a spawn error
        let compiler = Compiler::new(settings(dir.path(), "false", "/nonexistent/binary"));
        assert_eq!(compiler.compile().unwrap(), 1);
    }

    #[test]
    fn test_empty_build_command() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = Compiler::new(settings(dir.path(), "", "true"));
        assert!(matches!(compiler.build(), Err(ToolError::EmptyCommand("build"))));
    }
}
