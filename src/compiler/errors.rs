//! Errors from running external programs
//!
//! A program that runs and exits non-zero is not an error; its status is
//! returned to the caller. These variants cover the cases where no status
//! could be obtained at all.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    /// A configured command template had no program in it
    #[error("empty command for {0}")]
    EmptyCommand(&'static str),

    /// The program could not be started
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Talking to or waiting on a running program failed
    #[error("i/o with '{program}' failed: {source}")]
    Pipe {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The rendered source could not be written
    #[error("cannot write {}: {source}", path.display())]
    WriteSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
