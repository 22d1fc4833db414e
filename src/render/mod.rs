//! Source renderer
//!
//! Turns a [`SessionBuffer`] into a complete C translation unit. The layout
//! is fixed:
//!
//! ```text
//! includes
//! prototypes      (one per non-empty function, capture order)
//! globals         (every line of every global, capture order)
//! functions       (every line of every function, capture order)
//! int main(...)   (statement lines, already indented)
//! ```
//!
//! Nothing is parsed or validated; the output is rebuilt from scratch on
//! every call, so rendering the same buffer twice gives identical text.

use crate::session::SessionBuffer;

const MAIN_HEADER: &str = "int main(int argc, char **argv)\n{\n";
const MAIN_FOOTER: &str = "\n\n\treturn 0;\n}\n";

/// Renders session buffers with a fixed set of includes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRenderer {
    includes: Vec<String>,
}

impl SourceRenderer {
    /// `headers` are bare header names (`stdio.h`) or already delimited
    /// (`<stdio.h>`, `"local.h"`)
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let includes = headers
            .into_iter()
            .map(|h| include_directive(h.as_ref()))
            .collect();
        SourceRenderer { includes }
    }

    pub fn render(&self, session: &SessionBuffer) -> String {
        let prototypes: Vec<String> = session
            .functions()
            .iter()
            .filter_map(|f| f.prototype())
            .collect();
        let globals: Vec<&str> = session
            .globals()
            .iter()
            .flat_map(|g| g.lines())
            .map(String::as_str)
            .collect();
        let functions: Vec<&str> = session
            .functions()
            .iter()
            .flat_map(|f| f.lines())
            .map(String::as_str)
            .collect();

        let mut out = String::new();
        for block in [
            self.includes.join("\n"),
            prototypes.join("\n"),
            globals.join("\n"),
            functions.join("\n"),
        ] {
            out.push_str(&block);
            out.push_str("\n\n");
        }
        out.push_str(MAIN_HEADER);
        out.push_str(&session.statements().join("\n"));
        out.push_str(MAIN_FOOTER);
        out
    }
}

fn include_directive(header: &str) -> String {
    let header = header.trim();
    let delimited = (header.starts_with('<') && header.ends_with('>'))
        || (header.len() > 1 && header.starts_with('"') && header.ends_with('"'));
    if delimited {
        format!("#include {}", header)
    } else {
        format!("#include <{}>", header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{CaptureKind, CaptureUnit};

    #[test]
    fn test_empty_buffer_renders_minimal_program() {
        let renderer = SourceRenderer::new(Vec::<String>::new());
        let source = renderer.render(&SessionBuffer::new());
        assert_eq!(
            source,
            "\n\n\n\n\n\n\n\nint main(int argc, char **argv)\n{\n\n\n\treturn 0;\n}\n"
        );
    }

    #[test]
    fn test_section_order() {
        let renderer = SourceRenderer::new(["stdio.h", "<stdlib.h>", "\"local.h\""]);
        let mut session = SessionBuffer::new();
        session.append_statement("printf(\"%d\\n\", twice(counter));");
        session.append_function(CaptureUnit::from_lines(
            CaptureKind::Function,
            ["int twice(int x)", "{", "\treturn 2 * x;", "}"],
        ));
        session.append_global(CaptureUnit::from_lines(
            CaptureKind::Global,
            ["int counter = 21;"],
        ));

        let expected = "\
#include <stdio.h>
#include <stdlib.h>
#include \"local.h\"

int twice(int x);

int counter = 21;

int twice(int x)
{
\treturn 2 * x;
}

int main(int argc, char **argv)
{
\tprintf(\"%d\\n\", twice(counter));

\treturn 0;
}
";
        assert_eq!(renderer.render(&session), expected);
    }

    #[test]
    fn test_empty_function_has_no_prototype() {
        let renderer = SourceRenderer::new(["stdio.h"]);
        let mut session = SessionBuffer::new();
        session.append_function(CaptureUnit::function());
        session.append_function(CaptureUnit::from_lines(CaptureKind::Function, ["void f()", "{}"]));
        let source = renderer.render(&session);
        assert!(source.contains("\n\nvoid f();\n\n"));
        assert!(!source.contains("\n;\n"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let renderer = SourceRenderer::new(["stdio.h"]);
        let mut session = SessionBuffer::new();
        session.append_statement("int x = 1;");
        let first = renderer.render(&session);
        assert_eq!(first, renderer.render(&session));

        // undo on an empty globals target does not change the output
        session.append_global(CaptureUnit::from_lines(CaptureKind::Global, ["int g;"]));
        session.undo();
        session.undo();
        assert_eq!(first, renderer.render(&session));
    }

    #[test]
    fn test_statements_keep_order_inside_main() {
        let renderer = SourceRenderer::default();
        let mut session = SessionBuffer::new();
        for line in ["int a = 1;", "int b = 2;", "a += b;"] {
            session.append_statement(line);
        }
        let source = renderer.render(&session);
        let main_at = source.find("int main").unwrap();
        let body = &source[main_at..];
        let a = body.find("\tint a = 1;").unwrap();
        let b = body.find("\tint b = 2;").unwrap();
        let c = body.find("\ta += b;").unwrap();
        assert!(a < b && b < c);
    }
}
