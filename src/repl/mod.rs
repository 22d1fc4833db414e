//! Command dispatcher
//!
//! Reads one line at a time and routes it by the token table in
//! [`command`]:
//! - [`input`]: where lines come from ([`TerminalInput`] or [`ScriptedInput`])
//! - [`settings`]: prompts and colors from the `[editor]` section
//! - [`theme`]: color names and prompt painting
//!
//! # States
//!
//! ```text
//! top level ──f──▶ function capture ──empty line──▶ top level
//!           ──g──▶ global capture   ──empty line──▶ top level
//!           ──statement without ; or }──▶ continuation ──empty line──▶ top level
//! ```
//!
//! The captures are nested loops, never re-entered. Ctrl-C anywhere ends
//! the whole loop with [`LoopExit::Interrupted`]; end of input ends it with
//! [`LoopExit::EndOfInput`]. A capture cut short either way is dropped.

pub mod command;
pub mod input;
pub mod settings;
pub mod theme;

pub use command::Command;
pub use input::{LineSource, ReadError, ScriptedInput, TerminalInput};
pub use settings::EditorSettings;

use crate::compiler::{Compiler, CompilerSettings, ExternalTools, ToolError};
use crate::session::{
    needs_continuation, CaptureKind, CaptureStep, CaptureUnit, SessionBuffer, Undone, UNDO_TOKEN,
};
use crossterm::style::Color;
use std::io::{self, Write};
use thiserror::Error;
use tracing::debug;

/// How the dispatcher loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Input ran out; the caller should render, build and run once more
    EndOfInput,
    /// The user interrupted; nothing should be built
    Interrupted,
}

/// Failures that end the dispatcher loop abnormally
#[derive(Debug, Error)]
pub enum ReplError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("cannot write to the terminal: {0}")]
    Output(#[from] io::Error),
}

/// Startup line naming the build command and its cosmetic settings
pub fn banner(settings: &CompilerSettings) -> String {
    format!(
        "crepl {} - {} (std: {}, warnings: {})\nType '{}' for help, an empty line to compile and run.",
        env!("CARGO_PKG_VERSION"),
        settings.command,
        settings.std,
        settings.warnings,
        command::HELP_TOKEN,
    )
}

/// The interactive loop. Holds the session and every collaborator it
/// drives; none of them are looked up globally.
pub struct Dispatcher<'a, I: LineSource, W: Write> {
    session: &'a mut SessionBuffer,
    compiler: &'a Compiler,
    tools: &'a ExternalTools,
    settings: &'a EditorSettings,
    input: I,
    out: W,
}

impl<'a, I: LineSource, W: Write> Dispatcher<'a, I, W> {
    pub fn new(
        session: &'a mut SessionBuffer,
        compiler: &'a Compiler,
        tools: &'a ExternalTools,
        settings: &'a EditorSettings,
        input: I,
        out: W,
    ) -> Self {
        Dispatcher {
            session,
            compiler,
            tools,
            settings,
            input,
            out,
        }
    }

    /// Give back the line source and output sink
    pub fn into_inner(self) -> (I, W) {
        (self.input, self.out)
    }

    /// Read and handle lines until interrupted or out of input
    pub fn run(&mut self) -> Result<LoopExit, ReplError> {
        loop {
            match self.step() {
                Ok(()) => {}
                Err(ReplError::Read(ReadError::Interrupted)) => {
                    debug!("interrupted");
                    return Ok(LoopExit::Interrupted);
                }
                Err(ReplError::Read(ReadError::Eof)) => {
                    debug!("end of input");
                    return Ok(LoopExit::EndOfInput);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Read one top-level line and act on it
    fn step(&mut self) -> Result<(), ReplError> {
        let line = self.input.read_line(&self.settings.primary_prompt())?;
        let command = Command::classify(&line);
        debug!(?command, "dispatching");

        match command {
            Command::Compile => self.compile(),
            Command::BeginFunction => self.capture(CaptureKind::Function),
            Command::BeginGlobal => self.capture(CaptureKind::Global),
            Command::Help => {
                write!(self.out, "{}", command::help_text())?;
                Ok(())
            }
            Command::Review => self.review(),
            Command::StaticCheck => self.static_check(),
            Command::Undo => self.undo(),
            Command::Edit => self.edit(),
            Command::Statement => self.statement(&line),
        }
    }

    fn statement(&mut self, line: &str) -> Result<(), ReplError> {
        self.session.append_statement(line);
        if needs_continuation(line) {
            self.continuation()?;
        }
        Ok(())
    }

    /// Read continuation lines of an unfinished statement until an empty line
    fn continuation(&mut self) -> Result<(), ReplError> {
        let prompt = self.settings.continuation_prompt();
        loop {
            let line = self.input.read_line(&prompt)?;
            if CaptureUnit::is_terminator(&line) {
                return Ok(());
            }
            if line.trim() == UNDO_TOKEN {
                self.undo()?;
                continue;
            }
            self.session.append_continuation(&line);
        }
    }

    /// Capture a function or global block and store it in the session
    fn capture(&mut self, kind: CaptureKind) -> Result<(), ReplError> {
        let prompt = self.settings.capture_prompt(kind);
        let mut unit = CaptureUnit::new(kind);
        loop {
            let line = self.input.read_line(&prompt)?;
            match unit.append(&line) {
                CaptureStep::Finished => break,
                CaptureStep::Removed(removed) => self.notice(&format!("undo: {}", removed))?,
                CaptureStep::Appended | CaptureStep::NothingToUndo => {}
            }
        }
        debug!(?kind, lines = unit.lines().len(), "capture finished");
        self.session.append_capture(unit);
        Ok(())
    }

    fn undo(&mut self) -> Result<(), ReplError> {
        let message = match self.session.undo() {
            Some(Undone::Statement(line)) => format!("undo: {}", line.trim()),
            Some(Undone::Function(unit)) => {
                format!("undo: function {}", unit.lines().first().map_or("", String::as_str))
            }
            Some(Undone::Global(unit)) => format!("undo: {} global line(s)", unit.lines().len()),
            None => return Ok(()),
        };
        self.notice(&message)
    }

    /// Render, build and run, reporting a non-zero status
    fn compile(&mut self) -> Result<(), ReplError> {
        self.out.flush()?;
        let result = self.compiler.compile_session(self.session);
        self.report_status(result)
    }

    fn review(&mut self) -> Result<(), ReplError> {
        let source = self.compiler.render(self.session);
        self.out.flush()?;
        match self.tools.review(&source) {
            Ok(output) => {
                write!(self.out, "{}", output.text)?;
                self.report_status(Ok(output.status))
            }
            Err(e) => self.report_error(&e),
        }
    }

    fn static_check(&mut self) -> Result<(), ReplError> {
        let result = self
            .compiler
            .write_source(self.session)
            .and_then(|path| self.tools.static_check(path));
        match result {
            Ok(output) => {
                write!(self.out, "{}", output.text)?;
                self.report_status(Ok(output.status))
            }
            Err(e) => self.report_error(&e),
        }
    }

    fn edit(&mut self) -> Result<(), ReplError> {
        self.out.flush()?;
        let result = self
            .compiler
            .write_source(self.session)
            .and_then(|path| self.tools.edit(path));
        self.report_status(result)
    }

    fn report_status(&mut self, result: Result<i32, ToolError>) -> Result<(), ReplError> {
        match result {
            Ok(0) => Ok(()),
            Ok(status) => {
                let text = theme::paint(&format!("[exit status: {}]", status), Some(Color::Red));
                writeln!(self.out, "{}", text)?;
                Ok(())
            }
            Err(e) => self.report_error(&e),
        }
    }

    fn report_error(&mut self, error: &ToolError) -> Result<(), ReplError> {
        let text = theme::paint(&format!("error: {}", error), Some(Color::Red));
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    fn notice(&mut self, message: &str) -> Result<(), ReplError> {
        writeln!(self.out, "{}", theme::paint(message, Some(Color::DarkGrey)))?;
        Ok(())
    }
}
