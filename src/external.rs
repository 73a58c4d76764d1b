//! Launching external programs.
//!
//! Every launch forks, replaces the child's image with `execvp`, and blocks in
//! `waitpid` until the child has exited or been killed. A child that is merely
//! stopped (e.g. by SIGTSTP) is waited on again. Each child is reaped before
//! [`Launcher::launch`] returns, so none outlives its dispatch cycle.
//!
//! The child inherits the environment, the working directory and the standard
//! streams. Its exit code is logged but never changes the loop's continuation.

use crate::SHELL_NAME;
use crate::command::Continuation;
use anyhow::{Context, Result, bail};
use nix::errno::Errno;
use nix::sys::signal::{SigHandler, Signal, signal};
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, execvp, fork, write};
use std::ffi::CString;
use std::io;

/// Exit status of a child whose program could not be executed.
pub const EXEC_FAILURE_STATUS: i32 = 1;

/// Runs commands that are not builtins.
pub trait Launcher {
    /// Run `args[0]` with `args` as its argument vector and wait for it.
    fn launch(&mut self, args: &[&str]) -> Continuation;
}

/// How a reaped child ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildOutcome {
    Exited(i32),
    Signaled(Signal),
}

/// What a single `waitpid` call says about a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildState {
    /// Still running, or resumed after a stop.
    Running,
    /// Suspended by a job-control signal; not finished.
    Stopped(Signal),
    /// Exited or killed. The child has been reaped.
    Terminated(ChildOutcome),
}

impl From<WaitStatus> for ChildState {
    fn from(status: WaitStatus) -> Self {
        match status {
            WaitStatus::Exited(_, code) => ChildState::Terminated(ChildOutcome::Exited(code)),
            WaitStatus::Signaled(_, signal, _) => {
                ChildState::Terminated(ChildOutcome::Signaled(signal))
            }
            WaitStatus::Stopped(_, signal) => ChildState::Stopped(signal),
            _ => ChildState::Running,
        }
    }
}

/// Launcher backed by `fork`/`execvp`/`waitpid`.
#[derive(Debug, Default)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    pub fn new() -> Self {
        Self
    }

    /// Fork a child running `args[0]` and return its pid without waiting.
    ///
    /// The program is searched for in `PATH` by `execvp`. If it can't be
    /// executed, the child prints the OS error to stderr and exits with
    /// [`EXEC_FAILURE_STATUS`]; the caller still has to reap it.
    pub fn spawn(&self, args: &[&str]) -> Result<Pid> {
        let Some(program) = args.first() else {
            bail!("no program to launch");
        };
        // Everything the child needs is allocated before forking.
        let argv = args
            .iter()
            .map(|arg| {
                CString::new(*arg).with_context(|| format!("{arg:?}: argument contains a NUL byte"))
            })
            .collect::<Result<Vec<_>>>()?;
        let error_prefix = format!("{SHELL_NAME}: {program}: ");

        // SAFETY: the child only calls signal, execvp, write and _exit before
        // its image is replaced or it is gone.
        match unsafe { fork() }.context("fork")? {
            ForkResult::Child => exec_child(&argv, &error_prefix),
            ForkResult::Parent { child } => {
                tracing::debug!(pid = %child, program, "forked child");
                Ok(child)
            }
        }
    }

    /// Fork, exec and block until the child has terminated.
    pub fn spawn_and_wait(&self, args: &[&str]) -> Result<ChildOutcome> {
        let child = self.spawn(args)?;
        wait_for_termination(child)
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&mut self, args: &[&str]) -> Continuation {
        match self.spawn_and_wait(args) {
            Ok(outcome) => tracing::debug!(program = ?args.first(), ?outcome, "child reaped"),
            Err(e) => eprintln!("{SHELL_NAME}: {e:#}"),
        }
        Continuation::Continue
    }
}

/// Block until `child` has exited or been killed, retrying while it is only
/// stopped or the wait is interrupted.
pub fn wait_for_termination(child: Pid) -> Result<ChildOutcome> {
    loop {
        let status = match waitpid(child, Some(WaitPidFlag::WUNTRACED)) {
            Ok(status) => status,
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(e).with_context(|| format!("waitpid {child}")),
        };
        match ChildState::from(status) {
            ChildState::Terminated(outcome) => return Ok(outcome),
            state => tracing::debug!(pid = %child, ?state, "child not finished, waiting again"),
        }
    }
}

fn exec_child(argv: &[CString], error_prefix: &str) -> ! {
    // The Rust runtime ignores SIGPIPE; programs expect the default action.
    // SAFETY: resetting to SIG_DFL installs no handler.
    let _ = unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl) };
    let err = match execvp(&argv[0], argv) {
        Ok(never) => match never {},
        Err(err) => err,
    };
    // Raw writes only: the parent may have held locks when it forked.
    let stderr = io::stderr();
    for part in [error_prefix.as_bytes(), err.desc().as_bytes(), "\n".as_bytes()] {
        let _ = write(&stderr, part);
    }
    // SAFETY: _exit is async-signal-safe and skips the parent's atexit
    // handlers and stdio buffers duplicated by fork.
    unsafe { nix::libc::_exit(EXEC_FAILURE_STATUS) }
}
