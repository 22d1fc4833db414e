// Command table for top-level input

use crate::session::UNDO_TOKEN;

pub const FUNCTION_TOKEN: &str = "f";
pub const GLOBAL_TOKEN: &str = "g";
pub const HELP_TOKEN: &str = "h";
pub const REVIEW_TOKEN: &str = "r";
pub const CHECK_TOKEN: &str = "s";
pub const EDIT_TOKEN: &str = "e";

/// What a line typed at the top-level prompt asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Blank line: render, build and run
    Compile,
    /// Start capturing a function
    BeginFunction,
    /// Start capturing a global declaration block
    BeginGlobal,
    Help,
    /// Show the rendered source through the highlighter
    Review,
    /// Write the rendered source and run the static analyzer on it
    StaticCheck,
    /// Remove the most recent line or block
    Undo,
    /// Write the rendered source and open it in the external editor
    Edit,
    /// Anything else is C code for `main`
    Statement,
}

/// One entry of the token table
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub token: &'static str,
    pub command: Command,
    pub summary: &'static str,
}

/// Tokens in priority order; the first match wins. A statement that is
/// exactly one of these tokens is always read as the command.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        token: FUNCTION_TOKEN,
        command: Command::BeginFunction,
        summary: "define a function, one line at a time",
    },
    CommandSpec {
        token: GLOBAL_TOKEN,
        command: Command::BeginGlobal,
        summary: "declare globals, one line at a time",
    },
    CommandSpec {
        token: HELP_TOKEN,
        command: Command::Help,
        summary: "show this message",
    },
    CommandSpec {
        token: REVIEW_TOKEN,
        command: Command::Review,
        summary: "review the generated source",
    },
    CommandSpec {
        token: CHECK_TOKEN,
        command: Command::StaticCheck,
        summary: "run the static analyzer on the generated source",
    },
    CommandSpec {
        token: UNDO_TOKEN,
        command: Command::Undo,
        summary: "undo the last line, function or global",
    },
    CommandSpec {
        token: EDIT_TOKEN,
        command: Command::Edit,
        summary: "open the generated source in the external editor",
    },
];

impl Command {
    /// Classify a line read at the top-level prompt
    pub fn classify(line: &str) -> Command {
        let token = line.trim();
        if token.is_empty() {
            return Command::Compile;
        }
        COMMANDS
            .iter()
            .find(|spec| spec.token == token)
            .map_or(Command::Statement, |spec| spec.command)
    }
}

/// Static help text listing every token
pub fn help_text() -> String {
    let mut out = String::from("Type C statements to add them to main().\n\n");
    out.push_str("  <empty>  compile and run\n");
    for spec in COMMANDS {
        out.push_str(&format!("  {:<8} {}\n", spec.token, spec.summary));
    }
    out.push_str("\nInside a function or global, an empty line finishes it and ");
    out.push_str(&format!("'{}' removes the last line.\n", UNDO_TOKEN));
    out.push_str("A statement not ending in ';' or '}' continues until an empty line.\n");
    out
}
