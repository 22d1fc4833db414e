//! Session buffer
//!
//! Everything typed during one run of the editor lives here:
//! - top-level statement lines, stored pre-indented for `main`
//! - completed functions and globals ([`capture::CaptureUnit`])
//!
//! # Undo
//!
//! Exactly one collection is the undo target at any time: the one most
//! recently appended to. [`SessionBuffer::undo`] removes the last element
//! of that collection and never retargets, so once it is empty further
//! undos do nothing even if another collection still has content.

pub mod capture;

pub use capture::{CaptureKind, CaptureStep, CaptureUnit};

/// Token that removes the most recent line or block
pub const UNDO_TOKEN: &str = "u";

/// Indentation for a statement inside `main`
pub const STATEMENT_INDENT: &str = "\t";

/// Indentation for a continuation of an unfinished statement
pub const CONTINUATION_INDENT: &str = "\t\t";

/// The collection the next undo acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndoTarget {
    #[default]
    Statements,
    Functions,
    Globals,
}

/// What an undo removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Undone {
    Statement(String),
    Function(CaptureUnit),
    Global(CaptureUnit),
}

/// In-memory state of the editing session
#[derive(Debug, Clone, Default)]
pub struct SessionBuffer {
    statements: Vec<String>,
    functions: Vec<CaptureUnit>,
    globals: Vec<CaptureUnit>,
    undo_target: UndoTarget,
}

impl SessionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    pub fn functions(&self) -> &[CaptureUnit] {
        &self.functions
    }

    pub fn globals(&self) -> &[CaptureUnit] {
        &self.globals
    }

    pub fn undo_target(&self) -> UndoTarget {
        self.undo_target
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty() && self.functions.is_empty() && self.globals.is_empty()
    }

    /// Store a top-level statement, indented one level
    pub fn append_statement(&mut self, line: &str) {
        self.statements.push(format!("{}{}", STATEMENT_INDENT, line));
        self.undo_target = UndoTarget::Statements;
    }

    /// Store a continuation of the previous statement, indented two levels
    pub fn append_continuation(&mut self, line: &str) {
        self.statements.push(format!("{}{}", CONTINUATION_INDENT, line));
        self.undo_target = UndoTarget::Statements;
    }

    /// Store a completed capture in the collection matching its kind
    pub fn append_capture(&mut self, unit: CaptureUnit) {
        match unit.kind() {
            CaptureKind::Function => self.append_function(unit),
            CaptureKind::Global => self.append_global(unit),
        }
    }

    pub fn append_function(&mut self, unit: CaptureUnit) {
        self.functions.push(unit);
        self.undo_target = UndoTarget::Functions;
    }

    pub fn append_global(&mut self, unit: CaptureUnit) {
        self.globals.push(unit);
        self.undo_target = UndoTarget::Globals;
    }

    /// Remove the last element of the undo target, if any
    pub fn undo(&mut self) -> Option<Undone> {
        match self.undo_target {
            UndoTarget::Statements => self.statements.pop().map(Undone::Statement),
            UndoTarget::Functions => self.functions.pop().map(Undone::Function),
            UndoTarget::Globals => self.globals.pop().map(Undone::Global),
        }
    }
}

/// Whether a statement line needs continuation lines to be complete.
///
/// A line is complete when its last non-whitespace character is a
/// statement terminator or a closing brace.
pub fn needs_continuation(line: &str) -> bool {
    !matches!(line.trim_end().chars().last(), Some(';') | Some('}') | None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_are_indented_in_order() {
        let mut buffer = SessionBuffer::new();
        buffer.append_statement("int x = 1;");
        buffer.append_statement("x++;");
        assert_eq!(buffer.statements(), ["\tint x = 1;", "\tx++;"]);
        assert_eq!(buffer.undo_target(), UndoTarget::Statements);
    }

    #[test]
    fn test_undo_removes_most_recent_statement() {
        let mut buffer = SessionBuffer::new();
        buffer.append_statement("a();");
        buffer.append_statement("b();");
        buffer.append_statement("c();");
        assert_eq!(buffer.undo(), Some(Undone::Statement("\tc();".to_string())));
        assert_eq!(buffer.statements(), ["\ta();", "\tb();"]);
    }

    #[test]
    fn test_undo_on_empty_buffer_is_noop() {
        let mut buffer = SessionBuffer::new();
        assert_eq!(buffer.undo(), None);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_undo_follows_last_mutated_collection() {
        let mut buffer = SessionBuffer::new();
        buffer.append_statement("a();");
        buffer.append_global(CaptureUnit::from_lines(CaptureKind::Global, ["int g;"]));
        buffer.append_function(CaptureUnit::from_lines(CaptureKind::Function, ["int f()"]));
        assert_eq!(buffer.undo_target(), UndoTarget::Functions);

        assert!(matches!(buffer.undo(), Some(Undone::Function(_))));
        assert!(buffer.functions().is_empty());
        assert_eq!(buffer.globals().len(), 1);
        assert_eq!(buffer.statements().len(), 1);
    }

    #[test]
    fn test_undo_does_not_retarget_after_emptying() {
        let mut buffer = SessionBuffer::new();
        buffer.append_statement("a();");
        buffer.append_global(CaptureUnit::from_lines(CaptureKind::Global, ["int g;"]));

        assert!(matches!(buffer.undo(), Some(Undone::Global(_))));
        assert_eq!(buffer.undo(), None);
        assert_eq!(buffer.undo_target(), UndoTarget::Globals);
        assert_eq!(buffer.statements(), ["\ta();"]);
    }

    #[test]
    fn test_append_capture_dispatches_on_kind() {
        let mut buffer = SessionBuffer::new();
        buffer.append_capture(CaptureUnit::from_lines(CaptureKind::Global, ["int g;"]));
        assert_eq!(buffer.undo_target(), UndoTarget::Globals);
        buffer.append_capture(CaptureUnit::from_lines(CaptureKind::Function, ["void f()"]));
        assert_eq!(buffer.undo_target(), UndoTarget::Functions);
        assert_eq!(buffer.globals().len(), 1);
        assert_eq!(buffer.functions().len(), 1);
    }

    #[test]
    fn test_continuation_lines_target_statements() {
        let mut buffer = SessionBuffer::new();
        buffer.append_statement("if (x)");
        buffer.append_continuation("y = 1;");
        assert_eq!(buffer.statements(), ["\tif (x)", "\t\ty = 1;"]);
        assert_eq!(buffer.undo(), Some(Undone::Statement("\t\ty = 1;".to_string())));
        assert_eq!(buffer.statements(), ["\tif (x)"]);
    }

    #[test]
    fn test_needs_continuation() {
        assert!(needs_continuation("if (x)"));
        assert!(needs_continuation("for (i = 0; i < 3; i++) {"));
        assert!(!needs_continuation("x = 1;"));
        assert!(!needs_continuation("}"));
        assert!(!needs_continuation("x = 1;   "));
        assert!(!needs_continuation(""));
    }
}
