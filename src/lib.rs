//! A minimal interactive command interpreter.
//!
//! Each cycle reads one line, splits it on whitespace, and either runs an
//! in-process builtin (`cd`, `help`, `exit`) or forks and executes an external
//! program, blocking until that program has terminated before prompting again.
//!
//! The main entry point is [`Interpreter`]. The public modules expose the
//! building blocks: [`lexer`] for tokenization, [`builtin`] for the registry of
//! in-process commands, [`external`] for process launching, and
//! [`io_adapters`] for the line sources the loop reads from.
//!
//! There are no pipelines, redirections, quoting rules, background jobs or
//! variables. A double-quoted argument is split like any other text.

pub mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod external;
mod interpreter;
pub mod io_adapters;
pub mod lexer;
pub mod logger;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::{DEFAULT_PROMPT, Interpreter};

/// Name used as the prefix of every diagnostic written to stderr.
pub const SHELL_NAME: &str = "tinysh";
