// Line sources for the dispatcher

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::collections::VecDeque;
use thiserror::Error;

/// Why no line was returned
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// The user pressed Ctrl-C
    #[error("interrupted")]
    Interrupted,
    /// The input ran out (Ctrl-D or end of a script)
    #[error("end of input")]
    Eof,
    /// The line editor itself failed
    #[error("line editor failed: {0}")]
    Backend(String),
}

/// Anything the dispatcher can read lines from
pub trait LineSource {
    /// Show `prompt` and read one line without its trailing newline
    fn read_line(&mut self, prompt: &str) -> Result<String, ReadError>;
}

/// Interactive input through rustyline, with in-memory history
pub struct TerminalInput {
    editor: DefaultEditor,
}

impl TerminalInput {
    pub fn new() -> Result<Self, ReadError> {
        let editor = DefaultEditor::new().map_err(|e| ReadError::Backend(e.to_string()))?;
        Ok(TerminalInput { editor })
    }
}

impl LineSource for TerminalInput {
    fn read_line(&mut self, prompt: &str) -> Result<String, ReadError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    // history is a convenience; failing to record it is harmless
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(line)
            }
            Err(ReadlineError::Interrupted) => Err(ReadError::Interrupted),
            Err(ReadlineError::Eof) => Err(ReadError::Eof),
            Err(e) => Err(ReadError::Backend(e.to_string())),
        }
    }
}

/// Pre-recorded input, used to drive the dispatcher without a terminal.
///
/// Records every prompt it is shown. When the lines run out it reports
/// end of input, or an interrupt if built with
/// [`ScriptedInput::interrupt_at_end`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Vec<String>,
    interrupt_at_end: bool,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedInput {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
            interrupt_at_end: false,
        }
    }

    pub fn interrupt_at_end(mut self) -> Self {
        self.interrupt_at_end = true;
        self
    }

    /// Prompts shown so far, in order
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Result<String, ReadError> {
        self.prompts.push(prompt.to_string());
        match self.lines.pop_front() {
            Some(line) => Ok(line),
            None if self.interrupt_at_end => Err(ReadError::Interrupted),
            None => Err(ReadError::Eof),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_input_records_prompts() {
        let mut input = ScriptedInput::new(["a", "b"]);
        assert_eq!(input.read_line("1>").unwrap(), "a");
        assert_eq!(input.read_line("2>").unwrap(), "b");
        assert_eq!(input.read_line("3>"), Err(ReadError::Eof));
        assert_eq!(input.prompts(), ["1>", "2>", "3>"]);
    }

    #[test]
    fn test_scripted_input_interrupt() {
        let mut input = ScriptedInput::new(Vec::<String>::new()).interrupt_at_end();
        assert_eq!(input.read_line(">"), Err(ReadError::Interrupted));
    }
}
