use crate::builtin::BuiltinRegistry;
use anyhow::Result;
use std::io::Write;

/// Signal produced by every dispatch path and consumed by the read-eval loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Prompt for the next line.
    Continue,
    /// Stop the loop.
    Terminate,
}

/// The output and error streams a builtin writes to.
///
/// The interpreter hands out the process's stdout and stderr; tests hand out
/// in-memory writers instead.
pub struct Streams<'a> {
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
}

impl<'a> Streams<'a> {
    pub fn new(stdout: &'a mut dyn Write, stderr: &'a mut dyn Write) -> Self {
        Self { stdout, stderr }
    }
}

/// A command implemented in-process rather than by launching a program.
///
/// Handlers receive the whole argument vector, with `args[0]` being the
/// command's own name. An `Err` is reported on the error stream by
/// [`BuiltinRegistry::invoke`] and turned into [`Continuation::Continue`].
pub trait Builtin {
    /// Canonical name the command is looked up by, e.g. "cd".
    fn name(&self) -> &'static str;

    /// Runs the command.
    fn execute(
        &self,
        args: &[&str],
        registry: &BuiltinRegistry,
        streams: &mut Streams<'_>,
    ) -> Result<Continuation>;
}
