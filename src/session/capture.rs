// Capture units: named blocks of lines typed outside of main

use super::UNDO_TOKEN;

/// Which collection a capture unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    Function,
    Global,
}

/// What happened to a line handed to [`CaptureUnit::append`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureStep {
    /// The line was stored
    Appended,
    /// The undo sentinel removed this line
    Removed(String),
    /// The undo sentinel was typed with nothing left to remove
    NothingToUndo,
    /// An empty line ended the capture; nothing was stored
    Finished,
}

/// A function or global block accumulated line by line.
///
/// Lines are stored verbatim. The unit is only mutated while it is being
/// captured; once handed to the session buffer it is only ever removed
/// whole by undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureUnit {
    kind: CaptureKind,
    lines: Vec<String>,
}

impl CaptureUnit {
    pub fn new(kind: CaptureKind) -> Self {
        CaptureUnit {
            kind,
            lines: Vec::new(),
        }
    }

    pub fn function() -> Self {
        CaptureUnit::new(CaptureKind::Function)
    }

    pub fn global() -> Self {
        CaptureUnit::new(CaptureKind::Global)
    }

    /// Build a unit from already-typed lines
    pub fn from_lines<I, S>(kind: CaptureKind, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CaptureUnit {
            kind,
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn kind(&self) -> CaptureKind {
        self.kind
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Only a truly empty line ends a capture; whitespace is content
    pub fn is_terminator(line: &str) -> bool {
        line.is_empty()
    }

    /// Feed one typed line into the unit
    pub fn append(&mut self, line: &str) -> CaptureStep {
        if CaptureUnit::is_terminator(line) {
            return CaptureStep::Finished;
        }
        if line.trim() == UNDO_TOKEN {
            return match self.lines.pop() {
                Some(removed) => CaptureStep::Removed(removed),
                None => CaptureStep::NothingToUndo,
            };
        }
        self.lines.push(line.to_string());
        CaptureStep::Appended
    }

    /// Forward declaration derived from the first line of a function.
    ///
    /// Returns `None` for globals and for functions with no lines. A
    /// trailing `{` typed on the signature line is dropped before the
    /// terminator is added.
    pub fn prototype(&self) -> Option<String> {
        if self.kind != CaptureKind::Function {
            return None;
        }
        let first = self.lines.first()?;
        let signature = first.trim_end();
        let signature = signature.strip_suffix('{').unwrap_or(signature).trim_end();
        Some(format!("{};", signature))
    }
}
