//! # Introduction
//!
//! crepl is an interactive line editor for C. Statements typed at the prompt
//! go into `main`, functions and globals are captured in their own blocks,
//! and an empty line assembles everything into one source file, compiles it
//! with an external compiler and runs the result.
//!
//! ## Pipeline
//!
//! ```text
//! Input → Dispatcher → SessionBuffer → SourceRenderer → output file → build → run
//! ```
//!
//! 1. [`repl`]: the dispatcher loop. Reads lines, classifies them against a
//!    fixed token table and drives everything else.
//! 2. [`session`]: the in-memory buffer of statements, functions and
//!    globals, with single-step undo.
//! 3. [`render`]: turns the buffer into a complete translation unit.
//! 4. [`compiler`]: writes the file, runs the build command and the binary,
//!    and the helper programs (highlighter, analyzer, editor).
//! 5. [`config`]: INI config store with command-line overrides.
//! 6. [`cli`]: flag parsing and override extraction.
//!
//! ## What is not done
//!
//! The typed C is never parsed or checked; the compiler is the only judge.

pub mod cli;
pub mod compiler;
pub mod config;
pub mod render;
pub mod repl;
pub mod session;
