// crepl: interactive C line editor

use std::io;
use std::path::Path;

use clap::{CommandFactory, Parser};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crepl::cli::{self, Cli};
use crepl::compiler::{Compiler, CompilerSettings, ExternalTools, ToolError};
use crepl::config::{Config, ConfigError};
use crepl::repl::{self, Dispatcher, EditorSettings, LoopExit, ReadError, ReplError, TerminalInput};
use crepl::session::SessionBuffer;

/// Environment variable holding the log filter
const LOG_ENV: &str = "CREPL_LOG";

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Input(#[from] ReadError),

    #[error(transparent)]
    Repl(#[from] ReplError),
}

fn main() {
    init_logging();

    match run() {
        Ok(status) => std::process::exit(status),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();
}

fn run() -> Result<i32, AppError> {
    let args = cli::collect_args(std::env::args_os())?;
    let (flags, overrides) = cli::split_overrides(args);
    let cli = Cli::parse_from(flags);

    if cli.help {
        print_help(&cli.config);
        return Ok(0);
    }

    let mut config = Config::open(&cli.config, None)?;
    config.set_overrides(&overrides)?;

    let compiler = Compiler::new(CompilerSettings::from_config(&config)?);
    let editor = EditorSettings::from_config(&config)?;
    let tools = ExternalTools::from_config(&config)?;

    if cli.rebuild_only() {
        return Ok(compiler.compile()?);
    }

    println!("{}", repl::banner(compiler.settings()));

    let mut session = SessionBuffer::new();
    let input = TerminalInput::new()?;
    let exit = Dispatcher::new(&mut session, &compiler, &tools, &editor, input, io::stdout()).run()?;

    match exit {
        LoopExit::Interrupted => Ok(0),
        LoopExit::EndOfInput => {
            println!();
            Ok(compiler.compile_session(&session)?)
        }
    }
}

/// Usage, followed by the overridable options when the config can be read
fn print_help(config_path: &Path) {
    println!("{}", Cli::command().render_help());
    if let Ok(config) = Config::open(config_path, None) {
        print!("{}", config.overrides_help());
    }
}
