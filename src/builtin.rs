use crate::SHELL_NAME;
use crate::command::{Builtin, Continuation, Streams};
use crate::env;
use anyhow::{Result, bail};
use std::path::Path;

/// Ordered table of builtins, looked up by exact, case-sensitive name.
///
/// Names are unique, so lookup order never changes which handler runs; it only
/// fixes the order `help` lists them in.
pub struct BuiltinRegistry {
    entries: Vec<Box<dyn Builtin>>,
}

impl BuiltinRegistry {
    /// An empty registry. See [`Default`] for the standard set.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a builtin at the end of the table. Fails if the name is taken.
    pub fn register(&mut self, builtin: impl Builtin + 'static) -> Result<()> {
        if self.lookup(builtin.name()).is_some() {
            bail!("builtin {:?} is already registered", builtin.name());
        }
        self.entries.push(Box::new(builtin));
        Ok(())
    }

    /// Number of registered builtins.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn lookup(&self, name: &str) -> Option<&dyn Builtin> {
        self.entries
            .iter()
            .find(|entry| entry.name() == name)
            .map(|entry| entry.as_ref())
    }

    /// Registered names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name())
    }

    /// Run the builtin named by `args[0]`.
    ///
    /// Returns `None` when `args` is empty or names no builtin. A handler
    /// error is written to `streams.stderr` and becomes [`Continuation::Continue`].
    pub fn invoke(&self, args: &[&str], streams: &mut Streams<'_>) -> Option<Continuation> {
        let builtin = self.lookup(args.first()?)?;
        tracing::debug!(name = builtin.name(), "running builtin");
        match builtin.execute(args, self, streams) {
            Ok(continuation) => Some(continuation),
            Err(e) => {
                if let Err(write_err) = writeln!(streams.stderr, "{SHELL_NAME}: {e:#}") {
                    tracing::warn!(error = %write_err, "can't report builtin error");
                }
                Some(Continuation::Continue)
            }
        }
    }
}

impl Default for BuiltinRegistry {
    /// The standard builtins, in this order: `cd`, `help`, `exit`.
    fn default() -> Self {
        Self {
            entries: vec![Box::new(Cd), Box::new(Help), Box::new(Exit)],
        }
    }
}

/// Change the working directory to `args[1]`.
///
/// Missing argument is a usage error. Extra arguments are ignored.
pub struct Cd;

impl Builtin for Cd {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn execute(
        &self,
        args: &[&str],
        _registry: &BuiltinRegistry,
        _streams: &mut Streams<'_>,
    ) -> Result<Continuation> {
        let Some(target) = args.get(1) else {
            bail!("expected argument to \"cd\"");
        };
        env::change_dir(Path::new(target))?;
        Ok(Continuation::Continue)
    }
}

/// Print a usage banner and the registered builtin names.
pub struct Help;

impl Builtin for Help {
    fn name(&self) -> &'static str {
        "help"
    }

    fn execute(
        &self,
        _args: &[&str],
        registry: &BuiltinRegistry,
        streams: &mut Streams<'_>,
    ) -> Result<Continuation> {
        let out = &mut *streams.stdout;
        writeln!(out, "{SHELL_NAME}: a minimal command interpreter")?;
        writeln!(out, "Type program names and arguments, and press enter.")?;
        writeln!(out, "The following are built in:")?;
        for name in registry.names() {
            writeln!(out, "{name}")?;
        }
        writeln!(out, "Use the man command for information on other programs.")?;
        out.flush()?;
        Ok(Continuation::Continue)
    }
}

/// Stop the interpreter. Arguments are ignored.
pub struct Exit;

impl Builtin for Exit {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn execute(
        &self,
        _args: &[&str],
        _registry: &BuiltinRegistry,
        _streams: &mut Streams<'_>,
    ) -> Result<Continuation> {
        Ok(Continuation::Terminate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_adapters::MemWriter;
    use crate::test_support::CWD_LOCK;
    use std::fs;

    fn run(registry: &BuiltinRegistry, args: &[&str]) -> (Option<Continuation>, String, String) {
        let (mut out, out_rc) = MemWriter::with_handle();
        let (mut err, err_rc) = MemWriter::with_handle();
        let result = registry.invoke(args, &mut Streams::new(&mut out, &mut err));
        let out = String::from_utf8(out_rc.borrow().clone()).unwrap();
        let err = String::from_utf8(err_rc.borrow().clone()).unwrap();
        (result, out, err)
    }

    #[test]
    fn test_default_registry() {
        let registry = BuiltinRegistry::default();
        assert_eq!(registry.count(), 3);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["cd", "help", "exit"]);
        assert!(registry.lookup("cd").is_some());
        assert!(registry.lookup("CD").is_none());
        assert!(registry.lookup("ls").is_none());
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = BuiltinRegistry::new();
        assert_eq!(registry.count(), 0);
        registry.register(Exit).unwrap();
        assert!(registry.register(Exit).is_err());
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_invoke_unknown_or_empty() {
        let registry = BuiltinRegistry::default();
        assert_eq!(run(&registry, &[]).0, None);
        assert_eq!(run(&registry, &["ls", "-l"]).0, None);
    }

    #[test]
    fn test_exit_ignores_arguments() {
        let registry = BuiltinRegistry::default();
        let (result, out, err) = run(&registry, &["exit", "1", "2", "3"]);
        assert_eq!(result, Some(Continuation::Terminate));
        assert!(out.is_empty());
        assert!(err.is_empty());
    }

    #[test]
    fn test_help_lists_each_builtin_on_its_own_line() {
        let registry = BuiltinRegistry::default();
        let (result, out, err) = run(&registry, &["help", "whatever"]);
        assert_eq!(result, Some(Continuation::Continue));
        assert!(err.is_empty());
        let lines: Vec<&str> = out.lines().collect();
        for name in ["cd", "help", "exit"] {
            assert!(lines.contains(&name), "{name} missing from {out:?}");
        }
    }

    #[test]
    fn test_cd_without_argument_is_usage_error() {
        let _guard = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let before = env::current_dir().unwrap();

        let registry = BuiltinRegistry::default();
        let (result, out, err) = run(&registry, &["cd"]);
        assert_eq!(result, Some(Continuation::Continue));
        assert!(out.is_empty());
        assert_eq!(err, "tinysh: expected argument to \"cd\"\n");
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_cd_to_missing_dir_reports_os_error() {
        let _guard = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let before = env::current_dir().unwrap();

        let registry = BuiltinRegistry::default();
        let (result, _, err) = run(&registry, &["cd", "/no/such/dir/for/tinysh"]);
        assert_eq!(result, Some(Continuation::Continue));
        assert!(err.starts_with("tinysh: cd: /no/such/dir/for/tinysh: "), "{err}");
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_cd_changes_directory() {
        let _guard = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let before = env::current_dir().unwrap();
        let dir = std::env::temp_dir().join(format!("tinysh_cd_{}", std::process::id()));
        fs::create_dir_all(&dir).expect("create temp dir");
        let target = dir.canonicalize().unwrap();

        let registry = BuiltinRegistry::default();
        let (result, _, err) = run(&registry, &["cd", target.to_str().unwrap(), "ignored"]);
        let after = env::current_dir().unwrap();
        env::change_dir(&before).unwrap();

        assert_eq!(result, Some(Continuation::Continue));
        assert!(err.is_empty(), "{err}");
        assert_eq!(after, target);
        let _ = fs::remove_dir_all(dir);
    }
}
