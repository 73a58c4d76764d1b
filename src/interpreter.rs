use crate::builtin::BuiltinRegistry;
use crate::command::{Continuation, Streams};
use crate::external::{Launcher, ProcessLauncher};
use crate::io_adapters::LineSource;
use crate::lexer;
use anyhow::Result;
use std::io;

/// Prompt shown before each line when none is configured.
pub const DEFAULT_PROMPT: &str = "> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Running,
    Stopped,
}

/// A minimal interactive interpreter that runs builtin and external commands.
///
/// Builtins are looked up first, by exact name; anything else goes to the
/// [`Launcher`]. See [`Default`] for the standard setup.
///
/// Example
/// ```
/// use tinysh::Interpreter;
/// use tinysh::command::Continuation;
/// let mut sh = Interpreter::default();
/// assert_eq!(sh.execute(&[]), Continuation::Continue);
/// assert_eq!(sh.execute(&["exit", "1"]), Continuation::Terminate);
/// ```
pub struct Interpreter {
    builtins: BuiltinRegistry,
    launcher: Box<dyn Launcher>,
    prompt: String,
}

impl Interpreter {
    /// Create an interpreter with a custom builtin table and launcher.
    pub fn new(builtins: BuiltinRegistry, launcher: Box<dyn Launcher>) -> Self {
        Self {
            builtins,
            launcher,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }

    /// Replace the prompt printed before every read.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Dispatch one argument vector, with builtins writing to the process's
    /// stdout and stderr.
    pub fn execute(&mut self, args: &[&str]) -> Continuation {
        let mut stdout = io::stdout().lock();
        let mut stderr = io::stderr();
        let mut streams = Streams::new(&mut stdout, &mut stderr);
        let continuation = self.execute_with_streams(args, &mut streams);
        if let Err(e) = io::Write::flush(&mut stdout) {
            tracing::warn!(error = %e, "can't flush stdout");
        }
        continuation
    }

    /// Dispatch one argument vector.
    ///
    /// An empty vector is a blank line and does nothing. Otherwise `args[0]`
    /// selects a builtin, or failing that an external program. Errors are
    /// reported where they happen and never change the result into anything
    /// but [`Continuation::Continue`].
    pub fn execute_with_streams(
        &mut self,
        args: &[&str],
        streams: &mut Streams<'_>,
    ) -> Continuation {
        if args.is_empty() {
            return Continuation::Continue;
        }
        tracing::debug!(?args, "dispatching");
        if let Some(continuation) = self.builtins.invoke(args, streams) {
            return continuation;
        }
        self.launcher.launch(args)
    }

    /// Read, tokenize and dispatch lines until `exit` or end of input.
    ///
    /// Only an error from `source` itself ends the loop with `Err`; command
    /// failures are reported and the loop goes on.
    pub fn repl(&mut self, source: &mut dyn LineSource) -> Result<()> {
        let mut state = LoopState::Running;
        while state == LoopState::Running {
            let Some(line) = source.read_line(&self.prompt)? else {
                tracing::debug!("end of input");
                state = LoopState::Stopped;
                continue;
            };
            let args = lexer::split_into_tokens(&line);
            if self.execute(&args) == Continuation::Terminate {
                state = LoopState::Stopped;
            }
        }
        tracing::debug!("interpreter stopped");
        Ok(())
    }
}

impl Default for Interpreter {
    /// The standard builtins (`cd`, `help`, `exit`) and a fork/exec launcher.
    fn default() -> Self {
        Self::new(BuiltinRegistry::default(), Box::new(ProcessLauncher::new()))
    }
}
